use crate::{
    models::turbulence::CoefficientError,
    support::dictionary::Dictionary,
};

use super::core::{Lookup, positive_entry};

/// Runtime switches distinguishing the Wray-Agarwal variants.
///
/// `Original` and `Revised2018` differ only in these settings, so a model
/// built from either marker can be moved between them by adjusting this
/// value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantConfig {
    /// Replaces the strain rate by `max(S, W)` in production and blending.
    pub rotation_term: bool,

    /// Weight `Cm` of the gradient limiter, `None` to disable the limiter.
    pub cm: Option<f64>,
}

/// A Wray-Agarwal formulation.
///
/// Implemented by zero-sized marker types that select the registered name,
/// the coefficients dictionary, and the default [`VariantConfig`].
pub trait Variant {
    /// Name the model is registered under.
    const TYPE_NAME: &'static str;

    /// Name of the coefficients dictionary.
    const COEFFS_DICT: &'static str;

    /// Whether the rotation-aware production term is enabled.
    const HAS_ROTATION_TERM: bool;

    /// Default gradient-limiter weight, `None` if the variant has no limiter.
    const DEFAULT_CM: Option<f64>;

    /// The default runtime configuration.
    #[must_use]
    fn config() -> VariantConfig {
        VariantConfig {
            rotation_term: Self::HAS_ROTATION_TERM,
            cm: Self::DEFAULT_CM,
        }
    }
}

/// The original 2015 formulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Original;

impl Variant for Original {
    const TYPE_NAME: &'static str = "WrayAgarwal";
    const COEFFS_DICT: &'static str = "WrayAgarwalCoeffs";
    const HAS_ROTATION_TERM: bool = false;
    const DEFAULT_CM: Option<f64> = None;
}

/// The 2018 revision with rotation-aware production and a gradient limiter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Revised2018;

impl Variant for Revised2018 {
    const TYPE_NAME: &'static str = "WrayAgarwal2018";
    const COEFFS_DICT: &'static str = "WrayAgarwal2018Coeffs";
    const HAS_ROTATION_TERM: bool = true;
    const DEFAULT_CM: Option<f64> = Some(8.0);
}

/// Reads the variant configuration, taking `Cm` from the dictionary when the
/// current configuration has a limiter.
pub(super) fn read_config(
    current: VariantConfig,
    dict: &dyn Dictionary,
    dictionary: &'static str,
    lookup: Lookup,
) -> Result<VariantConfig, CoefficientError> {
    let cm = match current.cm {
        Some(default) => Some(positive_entry(dict, dictionary, "Cm", default, lookup)?.into_inner()),
        None => None,
    };
    Ok(VariantConfig { cm, ..current })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    #[test]
    fn presets() {
        assert_eq!(
            Original::config(),
            VariantConfig {
                rotation_term: false,
                cm: None
            }
        );
        assert_eq!(
            Revised2018::config(),
            VariantConfig {
                rotation_term: true,
                cm: Some(8.0)
            }
        );
    }

    #[test]
    fn cm_is_read_only_with_a_limiter() {
        let dict = BTreeMap::from([("Cm".to_string(), 6.5)]);

        let revised = read_config(Revised2018::config(), &dict, "d", Lookup::Strict).unwrap();
        assert_eq!(revised.cm, Some(6.5));

        let original = read_config(Original::config(), &dict, "d", Lookup::Strict).unwrap();
        assert_eq!(original.cm, None);
    }

    #[test]
    fn strict_read_requires_cm() {
        let err = read_config(Revised2018::config(), &(), "d", Lookup::Strict).unwrap_err();
        assert_eq!(
            err,
            CoefficientError::Missing {
                dictionary: "d",
                key: "Cm"
            }
        );

        let lenient = read_config(Revised2018::config(), &(), "d", Lookup::WithDefaults).unwrap();
        assert_eq!(lenient.cm, Some(8.0));
    }
}
