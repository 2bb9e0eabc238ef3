//! Tidal harmonic analysis.
//!
//! This module provides:
//! - A static constituent database with Rayleigh-criterion selection
//! - Astronomical arguments and nodal corrections
//! - Four interchangeable estimators behind [`HarmonicEstimator`]
//! - A background runner that keeps only the newest request
//!
//! # Mathematical Background
//!
//! The per-constituent strategies demodulate the demeaned window against
//! each constituent in turn:
//! ```text
//! a = (2/n) Σ x_k cos(ω t_k + θ)
//! b = (2/n) Σ x_k sin(ω t_k + θ)
//! H = √(a² + b²),   g = atan2(-b, a)
//! ```
//!
//! | Strategy | Constituents | θ | Reported phase |
//! |---|---|---|---|
//! | Simplified | 8 standard | 0 | `g` |
//! | Admiralty | 8 standard | `V0 + u` | `g - V0 - u` |
//! | T_TIDE | Rayleigh-selected database | `360 (v + u)` | `g - 360 (v + u)` |
//!
//! The joint least-squares strategy solves for all constituents together.
//!
//! # Example
//!
//! ```ignore
//! use tide_rs::analysis::{AnalysisConfig, Method, analyze};
//!
//! let result = analyze(series.window(window), &AnalysisConfig::new(Method::Admiralty))?;
//! for c in result.ranked() {
//!     println!("{}: H={:.3} m, g={:.1}°", c.name, c.amplitude, c.phase);
//! }
//! ```

mod admiralty;
mod astronomy;
mod config;
mod constituents;
mod error;
mod kernel;
mod least_squares;
mod nodal;
mod result;
mod selection;
mod simplified;
mod task;
mod ttide;

pub use admiralty::AdmiraltyEstimator;
pub use astronomy::{
    ASTRO_EPOCH_JD, AstronomicalArguments, J2000_LABEL, MeanLongitudes, UNIX_EPOCH_JD,
    centuries_since_j2000, julian_date, midpoint,
};
pub use config::{AnalysisConfig, Method, TimeBase};
pub use constituents::{
    Constituent, MEAN_LEVEL, STANDARD_CONSTITUENTS, StandardConstituent, database, description,
    lookup, standard,
};
pub use error::AnalysisError;
pub use kernel::{RawFit, WindowSamples, demodulate, wrap_degrees};
pub use least_squares::LeastSquaresEstimator;
pub use nodal::{AdmiraltyTerms, NodalCorrection};
pub use result::{
    AstronomicalEpoch, ConstituentResult, FitQuality, HarmonicAnalysisResult, SelectionMetadata,
};
pub use selection::{
    DEFAULT_RAYLEIGH, Selection, is_resolvable, min_resolution, select_constituents,
};
pub use simplified::SimplifiedEstimator;
pub use task::{AnalysisHandle, AnalysisRunner, CancelToken};
pub use ttide::{DEFAULT_STEP_HOURS, TTideEstimator};

use crate::series::Observation;

/// A harmonic estimation strategy.
pub trait HarmonicEstimator: Send + Sync {
    /// Strategy implemented by this estimator.
    fn method(&self) -> Method;

    /// Estimate constituents over a window of observations.
    ///
    /// Fails with [`AnalysisError::EmptyWindow`] for an empty window and with
    /// [`AnalysisError::Cancelled`] once `cancel` is triggered.
    fn estimate(
        &self,
        window: &[Observation],
        cancel: &CancelToken,
    ) -> Result<HarmonicAnalysisResult, AnalysisError>;
}

/// Build the estimator selected by a config.
pub fn estimator_for(config: &AnalysisConfig) -> Result<Box<dyn HarmonicEstimator>, AnalysisError> {
    let estimator: Box<dyn HarmonicEstimator> = match config.method {
        Method::Simplified => Box::new(SimplifiedEstimator),
        Method::Admiralty => Box::new(AdmiraltyEstimator),
        Method::TTide => Box::new(TTideEstimator::from_config(config)),
        Method::LeastSquares => Box::new(LeastSquaresEstimator::from_config(config)?),
    };
    Ok(estimator)
}

/// Run an analysis to completion on the calling thread.
pub fn analyze(
    window: &[Observation],
    config: &AnalysisConfig,
) -> Result<HarmonicAnalysisResult, AnalysisError> {
    analyze_with_cancel(window, config, &CancelToken::new())
}

/// Run an analysis that can be interrupted through `cancel`.
pub fn analyze_with_cancel(
    window: &[Observation],
    config: &AnalysisConfig,
    cancel: &CancelToken,
) -> Result<HarmonicAnalysisResult, AnalysisError> {
    if window.is_empty() {
        return Err(AnalysisError::EmptyWindow);
    }
    estimator_for(config)?.estimate(window, cancel)
}

/// Apply a per-constituent fit to every item, polling `cancel` before each.
#[cfg(not(feature = "parallel"))]
fn map_constituents<T, R, F>(items: &[T], cancel: &CancelToken, fit: F) -> Result<Vec<R>, AnalysisError>
where
    F: Fn(&T) -> Result<R, AnalysisError>,
{
    items
        .iter()
        .map(|item| {
            cancel.check()?;
            fit(item)
        })
        .collect()
}

/// Apply a per-constituent fit to every item in parallel, polling `cancel`
/// before each.
#[cfg(feature = "parallel")]
fn map_constituents<T, R, F>(items: &[T], cancel: &CancelToken, fit: F) -> Result<Vec<R>, AnalysisError>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Result<R, AnalysisError> + Sync + Send,
{
    use rayon::prelude::*;

    items
        .par_iter()
        .map(|item| {
            cancel.check()?;
            fit(item)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn window(hours: i64) -> Vec<Observation> {
        let t0 = NaiveDate::from_ymd_opt(2025, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..hours)
            .map(|i| Observation::new(t0 + Duration::hours(i), (i % 7) as f64, i as usize + 1))
            .collect()
    }

    #[test]
    fn test_every_method_runs() {
        let w = window(24 * 20);
        for method in Method::ALL {
            let r = analyze(&w, &AnalysisConfig::new(method)).unwrap();
            assert_eq!(r.method, method);
            assert_eq!(r.data_point_count, w.len());
            assert!(!r.constituents.is_empty());
            for c in &r.constituents {
                assert!((0.0..360.0).contains(&c.phase), "{} phase {}", c.name, c.phase);
                assert!(c.amplitude >= 0.0);
            }
        }
    }

    #[test]
    fn test_empty_window_for_every_method() {
        for method in Method::ALL {
            assert_eq!(
                analyze(&[], &AnalysisConfig::new(method)),
                Err(AnalysisError::EmptyWindow)
            );
        }
    }

    #[test]
    fn test_estimator_for_unknown_constituent() {
        let config = AnalysisConfig::new(Method::LeastSquares).with_constituents(["M2", "NOPE"]);
        assert!(matches!(
            estimator_for(&config),
            Err(AnalysisError::UnknownConstituent(_))
        ));
    }

    #[test]
    fn test_estimator_method() {
        for method in Method::ALL {
            let est = estimator_for(&AnalysisConfig::new(method)).unwrap();
            assert_eq!(est.method(), method);
        }
    }
}
