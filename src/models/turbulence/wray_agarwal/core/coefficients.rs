use crate::{
    models::turbulence::CoefficientError,
    support::{
        constraint::{Constrained, StrictlyPositive},
        dictionary::Dictionary,
    },
};

/// How absent dictionary entries are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup {
    /// Absent entries take their default value.
    WithDefaults,

    /// Absent entries are an error.
    Strict,
}

/// One of the two coefficient sets the closure blends between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientSet {
    /// Production coefficient.
    pub c1: f64,

    /// Destruction coefficient, `c1 / kappa² + sigma`.
    pub c2: f64,

    /// Diffusion coefficient.
    pub sigma: f64,
}

impl CoefficientSet {
    fn new(c1: f64, sigma: f64, kappa: f64) -> Self {
        Self {
            c1,
            c2: c1 / (kappa * kappa) + sigma,
            sigma,
        }
    }
}

/// Validated Wray-Agarwal coefficients.
///
/// The inner (k-omega-like) set applies near walls and the outer
/// (k-epsilon-like) set far from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    inner: CoefficientSet,
    outer: CoefficientSet,
    kappa: f64,
    cmu: f64,
    cw: f64,
}

impl Coefficients {
    pub const DEFAULT_SIGMA_KW: f64 = 0.72;
    pub const DEFAULT_SIGMA_KEPS: f64 = 1.0;
    pub const DEFAULT_KAPPA: f64 = 0.41;
    pub const DEFAULT_C1_KOM: f64 = 0.0829;
    pub const DEFAULT_C1_KEPS: f64 = 0.1127;
    pub const DEFAULT_CW: f64 = 8.54;
    pub const DEFAULT_CMU: f64 = 0.09;

    /// Builds coefficients from validated values, deriving both `C2`.
    #[must_use]
    pub fn new(
        c1_kom: Constrained<f64, StrictlyPositive>,
        c1_keps: Constrained<f64, StrictlyPositive>,
        sigma_kw: Constrained<f64, StrictlyPositive>,
        sigma_keps: Constrained<f64, StrictlyPositive>,
        kappa: Constrained<f64, StrictlyPositive>,
        cmu: Constrained<f64, StrictlyPositive>,
        cw: Constrained<f64, StrictlyPositive>,
    ) -> Self {
        let kappa = kappa.into_inner();
        Self {
            inner: CoefficientSet::new(c1_kom.into_inner(), sigma_kw.into_inner(), kappa),
            outer: CoefficientSet::new(c1_keps.into_inner(), sigma_keps.into_inner(), kappa),
            kappa,
            cmu: cmu.into_inner(),
            cw: cw.into_inner(),
        }
    }

    /// Reads coefficients from `dict`, reporting errors against `dictionary`.
    pub(crate) fn from_dictionary(
        dict: &dyn Dictionary,
        dictionary: &'static str,
        lookup: Lookup,
    ) -> Result<Self, CoefficientError> {
        let entry = |key, default| positive_entry(dict, dictionary, key, default, lookup);

        Ok(Self::new(
            entry("C1kOm", Self::DEFAULT_C1_KOM)?,
            entry("C1kEps", Self::DEFAULT_C1_KEPS)?,
            entry("sigmakW", Self::DEFAULT_SIGMA_KW)?,
            entry("sigmakEps", Self::DEFAULT_SIGMA_KEPS)?,
            entry("kappa", Self::DEFAULT_KAPPA)?,
            entry("Cmu", Self::DEFAULT_CMU)?,
            entry("Cw", Self::DEFAULT_CW)?,
        ))
    }

    /// Near-wall coefficient set.
    #[must_use]
    pub fn inner(&self) -> CoefficientSet {
        self.inner
    }

    /// Far-field coefficient set.
    #[must_use]
    pub fn outer(&self) -> CoefficientSet {
        self.outer
    }

    #[must_use]
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    #[must_use]
    pub fn cmu(&self) -> f64 {
        self.cmu
    }

    #[must_use]
    pub fn cw(&self) -> f64 {
        self.cw
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        let set = |c1, sigma| CoefficientSet::new(c1, sigma, Self::DEFAULT_KAPPA);
        Self {
            inner: set(Self::DEFAULT_C1_KOM, Self::DEFAULT_SIGMA_KW),
            outer: set(Self::DEFAULT_C1_KEPS, Self::DEFAULT_SIGMA_KEPS),
            kappa: Self::DEFAULT_KAPPA,
            cmu: Self::DEFAULT_CMU,
            cw: Self::DEFAULT_CW,
        }
    }
}

/// Reads one strictly positive entry.
pub(crate) fn positive_entry(
    dict: &dyn Dictionary,
    dictionary: &'static str,
    key: &'static str,
    default: f64,
    lookup: Lookup,
) -> Result<Constrained<f64, StrictlyPositive>, CoefficientError> {
    let value = match (dict.lookup(key), lookup) {
        (Some(value), _) => value,
        (None, Lookup::WithDefaults) => default,
        (None, Lookup::Strict) => return Err(CoefficientError::Missing { dictionary, key }),
    };

    StrictlyPositive::new(value).map_err(|source| CoefficientError::Invalid { key, value, source })
}
