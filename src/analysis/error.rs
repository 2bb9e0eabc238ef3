//! Error types for harmonic analysis.

use thiserror::Error;

/// Errors raised by the harmonic estimators and the background runner.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// The analysis window contains no observations
    #[error("analysis window is empty")]
    EmptyWindow,

    /// Too few observations for the number of unknowns
    #[error("need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// A fitted coefficient came out NaN or infinite
    #[error("numeric failure while fitting {constituent}")]
    NumericFailure { constituent: String },

    /// The least-squares normal matrix could not be solved
    #[error("least-squares system is singular")]
    SingularSystem,

    /// Constituent name not found in the reference tables
    #[error("unknown constituent: {0}")]
    UnknownConstituent(String),

    /// The task was cancelled before it finished
    #[error("analysis cancelled")]
    Cancelled,

    /// A newer request replaced this one
    #[error("analysis superseded by a newer request")]
    Superseded,

    /// The worker thread panicked or could not be started
    #[error("analysis worker failed")]
    WorkerPanicked,
}

impl AnalysisError {
    /// Whether the error comes from task control rather than the data.
    pub fn is_interruption(&self) -> bool {
        matches!(self, AnalysisError::Cancelled | AnalysisError::Superseded)
    }
}
