//! Key-value coefficient dictionaries.
//!
//! A turbulence model reads its coefficients from a flat dictionary of named
//! scalars, the way a case file's `<Model>Coeffs` block would be presented
//! after parsing. Parsing itself belongs to the host; models only need
//! [`Dictionary::lookup`].
//!
//! ```
//! use std::collections::BTreeMap;
//! use twine_turbulence::support::dictionary::Dictionary;
//!
//! let coeffs = BTreeMap::from([("kappa".to_string(), 0.41)]);
//! assert_eq!(coeffs.lookup("kappa"), Some(0.41));
//! assert_eq!(coeffs.lookup("Cw"), None);
//! ```

use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

/// Read access to named scalar entries.
pub trait Dictionary {
    /// Returns the value stored under `key`, if present.
    fn lookup(&self, key: &str) -> Option<f64>;
}

impl<S: BuildHasher> Dictionary for HashMap<String, f64, S> {
    fn lookup(&self, key: &str) -> Option<f64> {
        self.get(key).copied()
    }
}

impl Dictionary for BTreeMap<String, f64> {
    fn lookup(&self, key: &str) -> Option<f64> {
        self.get(key).copied()
    }
}

/// The empty dictionary, for models constructed purely from defaults.
impl Dictionary for () {
    fn lookup(&self, _key: &str) -> Option<f64> {
        None
    }
}

impl<D: Dictionary + ?Sized> Dictionary for &D {
    fn lookup(&self, key: &str) -> Option<f64> {
        (**self).lookup(key)
    }
}
