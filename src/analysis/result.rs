//! Harmonic analysis results.

use super::config::Method;
use crate::series::TimeSpan;

/// Fitted amplitude and phase of one constituent.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstituentResult {
    /// Name of the constituent (e.g., "M2", "S2")
    pub name: &'static str,
    pub description: &'static str,
    /// Amplitude, in the units of the input values
    pub amplitude: f64,
    /// Reported phase in degrees `[0, 360)`
    pub phase: f64,
    /// Angular speed in radians per hour
    pub speed: f64,
    /// Phase of the fitted cosine at the start of the window (degrees).
    ///
    /// Differs from `phase` when astronomical offsets are removed from the
    /// reported value.
    pub reference_phase: f64,
    /// Frequency in cycles per hour (T_TIDE)
    pub frequency: Option<f64>,
    /// Nodal amplitude factor
    pub f: Option<f64>,
    /// Nodal phase correction (degrees)
    pub u: Option<f64>,
    /// Signal-to-noise ratio; not estimated, reported as 0 by T_TIDE
    pub snr: Option<f64>,
}

impl ConstituentResult {
    /// Evaluate the fitted constituent `hours` after the window start.
    pub fn evaluate(&self, hours: f64) -> f64 {
        let f = self.f.unwrap_or(1.0);
        f * self.amplitude * (self.speed * hours + self.reference_phase.to_radians()).cos()
    }

    /// Period in hours.
    pub fn period_hours(&self) -> f64 {
        2.0 * std::f64::consts::PI / self.speed
    }
}

/// Rayleigh selection summary attached to T_TIDE results.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionMetadata {
    pub rayleigh: f64,
    /// Minimum resolvable separation (cph)
    pub min_resolution: f64,
    pub selected_count: usize,
    /// Candidates considered (database size without `Z0`)
    pub total_count: usize,
}

/// Reference epoch attached to Admiralty results.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AstronomicalEpoch {
    /// Julian centuries since the reference epoch at the window start
    pub centuries: f64,
    pub reference: &'static str,
}

/// Goodness of fit over the analysed window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FitQuality {
    /// Residual variance (unexplained variance)
    pub residual_variance: f64,
    /// Coefficient of determination R²
    pub r_squared: f64,
}

impl FitQuality {
    /// Compare observed values with a fitted signal.
    pub fn compute(observed: &[f64], fitted: &[f64]) -> Self {
        let n = observed.len().min(fitted.len());
        if n < 2 {
            return Self {
                residual_variance: 0.0,
                r_squared: 1.0,
            };
        }

        let residual_variance = observed
            .iter()
            .zip(fitted)
            .map(|(o, f)| (o - f) * (o - f))
            .sum::<f64>()
            / (n - 1) as f64;

        let mean = observed[..n].iter().sum::<f64>() / n as f64;
        let total_variance =
            observed[..n].iter().map(|o| (o - mean) * (o - mean)).sum::<f64>() / (n - 1) as f64;

        // R² = 1 - SS_res / SS_tot
        let r_squared = if total_variance > 1e-10 {
            1.0 - residual_variance / total_variance
        } else {
            1.0
        };

        Self {
            residual_variance,
            r_squared,
        }
    }
}

/// Full result of one analysis run. Never mutated after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct HarmonicAnalysisResult {
    pub method: Method,
    /// Mean of the window
    pub mean_sea_level: f64,
    /// Demeaning reference level (equal to the mean)
    pub chart_datum: f64,
    /// Fitted constituents in analysis order
    pub constituents: Vec<ConstituentResult>,
    /// Observations in the window
    pub data_point_count: usize,
    pub time_span: TimeSpan,
    pub selection: Option<SelectionMetadata>,
    pub epoch: Option<AstronomicalEpoch>,
    pub fit: FitQuality,
}

impl HarmonicAnalysisResult {
    /// Get a constituent by name.
    pub fn get(&self, name: &str) -> Option<&ConstituentResult> {
        self.constituents.iter().find(|c| c.name == name)
    }

    /// Constituent names in analysis order.
    pub fn names(&self) -> Vec<&'static str> {
        self.constituents.iter().map(|c| c.name).collect()
    }

    /// Evaluate the fitted signal `hours` after the window start.
    pub fn evaluate(&self, hours: f64) -> f64 {
        self.mean_sea_level + self.constituents.iter().map(|c| c.evaluate(hours)).sum::<f64>()
    }

    /// Reconstruct the signal at the given times (hours since window start).
    pub fn reconstruct(&self, hours: &[f64]) -> Vec<f64> {
        hours.iter().map(|&t| self.evaluate(t)).collect()
    }

    /// Constituents sorted by decreasing amplitude.
    pub fn ranked(&self) -> Vec<&ConstituentResult> {
        let mut ranked: Vec<_> = self.constituents.iter().collect();
        ranked.sort_by(|a, b| b.amplitude.total_cmp(&a.amplitude));
        ranked
    }

    /// Attach the fit quality of this result over the analysed samples.
    pub(crate) fn with_fit(mut self, observed: &[f64], hours: &[f64]) -> Self {
        let fitted = self.reconstruct(hours);
        self.fit = FitQuality::compute(observed, &fitted);
        self
    }
}
