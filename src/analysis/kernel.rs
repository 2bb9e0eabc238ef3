//! Demodulation kernel shared by the per-constituent strategies.
//!
//! For demeaned samples `x_k` at times `t_k` and a constituent of angular
//! speed `ω` with phase offset `θ`:
//!
//! ```text
//! arg_k = ω t_k + θ
//! a = (2/n) Σ x_k cos(arg_k)
//! b = (2/n) Σ x_k sin(arg_k)
//! H = √(a² + b²)
//! g = atan2(-b, a)          (degrees, wrapped to [0, 360))
//! ```
//!
//! so that `x(t) ≈ H cos(ω t + θ + g)`.

use tracing::warn;

use super::error::AnalysisError;
use crate::series::{Observation, TimeSpan};

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Wrap an angle in degrees to `[0, 360)`.
pub fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Demeaned samples of an analysis window.
#[derive(Clone, Debug)]
pub struct WindowSamples {
    /// Arithmetic mean of the window (MSL and chart datum)
    pub mean: f64,
    /// Raw values
    pub values: Vec<f64>,
    /// Values minus the mean
    pub detrended: Vec<f64>,
    /// Wall-clock hours since the first observation
    pub hours: Vec<f64>,
    pub span: TimeSpan,
}

impl WindowSamples {
    /// Prepare a window for demodulation.
    pub fn new(window: &[Observation]) -> Result<Self, AnalysisError> {
        let span = TimeSpan::of(window).ok_or(AnalysisError::EmptyWindow)?;
        let values: Vec<f64> = window.iter().map(|o| o.value).collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        if !mean.is_finite() {
            return Err(AnalysisError::NumericFailure {
                constituent: "Z0".to_string(),
            });
        }

        let detrended = values.iter().map(|v| v - mean).collect();
        let hours = window
            .iter()
            .map(|o| (o.timestamp - span.start).num_milliseconds() as f64 / MS_PER_HOUR)
            .collect();

        Ok(Self {
            mean,
            values,
            detrended,
            hours,
            span,
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Median spacing between samples in hours, `None` with fewer than two samples.
    pub fn median_step_hours(&self) -> Option<f64> {
        let mut steps: Vec<f64> = self.hours.windows(2).map(|w| w[1] - w[0]).collect();
        if steps.is_empty() {
            return None;
        }
        steps.sort_by(f64::total_cmp);
        Some(steps[steps.len() / 2])
    }

    /// Sample times `index · dt` for a fixed step.
    ///
    /// Logs a warning when the actual spacing departs from `dt` by more than
    /// one second anywhere in the window.
    pub fn index_hours(&self, dt_hours: f64) -> Vec<f64> {
        let tolerance = 1.0 / 3600.0;
        let irregular = self
            .hours
            .windows(2)
            .filter(|w| ((w[1] - w[0]) - dt_hours).abs() > tolerance)
            .count();
        if irregular > 0 {
            warn!(
                irregular,
                dt_hours,
                samples = self.len(),
                "window is not uniformly sampled; index-based times will misplace phases"
            );
        }
        (0..self.len()).map(|i| i as f64 * dt_hours).collect()
    }
}

/// Raw fit of one constituent before strategy-specific corrections.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawFit {
    /// `H`
    pub amplitude: f64,
    /// `g` in degrees `[0, 360)`
    pub phase: f64,
}

/// Demodulate one constituent.
///
/// `speed` is in radians per unit of `times`; `offset` is in radians.
pub fn demodulate(
    name: &str,
    detrended: &[f64],
    times: &[f64],
    speed: f64,
    offset: f64,
) -> Result<RawFit, AnalysisError> {
    let n = detrended.len();
    if n == 0 {
        return Err(AnalysisError::EmptyWindow);
    }

    let (sum_cos, sum_sin) = detrended
        .iter()
        .zip(times)
        .fold((0.0, 0.0), |(c, s), (&x, &t)| {
            let (sin, cos) = (speed * t + offset).sin_cos();
            (c + x * cos, s + x * sin)
        });

    let a = 2.0 / n as f64 * sum_cos;
    let b = 2.0 / n as f64 * sum_sin;
    let amplitude = (a * a + b * b).sqrt();
    let phase = wrap_degrees((-b).atan2(a).to_degrees());

    if !amplitude.is_finite() || !phase.is_finite() {
        return Err(AnalysisError::NumericFailure {
            constituent: name.to_string(),
        });
    }

    Ok(RawFit { amplitude, phase })
}
