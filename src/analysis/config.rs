//! Analysis configuration.

use std::fmt;
use std::str::FromStr;

use super::selection::DEFAULT_RAYLEIGH;

/// Harmonic estimation strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Method {
    /// Eight standard constituents, no nodal correction
    #[default]
    Simplified,
    /// Eight standard constituents with `V0`, `f`, `u`
    Admiralty,
    /// Rayleigh-selected database constituents with Doodson `v`
    TTide,
    /// Joint least-squares fit of all constituents at once
    LeastSquares,
}

impl Method {
    pub const ALL: [Method; 4] = [
        Method::Simplified,
        Method::Admiralty,
        Method::TTide,
        Method::LeastSquares,
    ];

    /// Label reported in analysis results.
    pub fn label(&self) -> &'static str {
        match self {
            Method::Simplified => "Simplified Least-Squares",
            Method::Admiralty => "Admiralty Method (with Nodal Corrections)",
            Method::TTide => "T_TIDE Method (Pawlowicz et al. 2002)",
            Method::LeastSquares => "Joint Least-Squares",
        }
    }

    /// Short identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Method::Simplified => "simplified",
            Method::Admiralty => "admiralty",
            Method::TTide => "ttide",
            Method::LeastSquares => "least-squares",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simplified" => Ok(Method::Simplified),
            "admiralty" => Ok(Method::Admiralty),
            "ttide" | "t_tide" | "t-tide" => Ok(Method::TTide),
            "least-squares" | "least_squares" | "lsq" => Ok(Method::LeastSquares),
            other => Err(format!("unknown analysis method '{}'", other)),
        }
    }
}

/// How sample times are derived for strategies that take a fixed step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeBase {
    /// `t = index · dt`, assuming uniform sampling
    #[default]
    SampleIndex,
    /// Hours since the first observation of the window
    Timestamps,
}

/// Configuration for a harmonic analysis run.
///
/// # Example
///
/// ```ignore
/// let config = AnalysisConfig::new(Method::TTide)
///     .with_rayleigh(0.8)
///     .with_sampling_interval_hours(1.0 / 6.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
    pub method: Method,
    /// Rayleigh factor for T_TIDE selection
    pub rayleigh: f64,
    /// Sampling step in hours for T_TIDE; inferred from the window when `None`
    pub sampling_interval_hours: Option<f64>,
    /// Sample time derivation for T_TIDE
    pub time_base: TimeBase,
    /// Constituents for the joint least-squares fit; the standard eight when `None`
    pub constituents: Option<Vec<String>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            rayleigh: DEFAULT_RAYLEIGH,
            sampling_interval_hours: None,
            time_base: TimeBase::default(),
            constituents: None,
        }
    }
}

impl AnalysisConfig {
    /// Default configuration for a method.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_rayleigh(mut self, rayleigh: f64) -> Self {
        self.rayleigh = rayleigh;
        self
    }

    pub fn with_sampling_interval_hours(mut self, dt: f64) -> Self {
        self.sampling_interval_hours = Some(dt);
        self
    }

    pub fn with_time_base(mut self, time_base: TimeBase) -> Self {
        self.time_base = time_base;
        self
    }

    /// Constituents for the joint least-squares fit.
    pub fn with_constituents<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constituents = Some(names.into_iter().map(Into::into).collect());
        self
    }
}
