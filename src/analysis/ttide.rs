//! T_TIDE strategy: Rayleigh-selected database constituents with Doodson
//! nodal arguments (after Pawlowicz et al. 2002).
//!
//! Sample times are `index · dt` by default, which assumes the window is
//! uniformly sampled. A warning is logged when it is not; set
//! [`TimeBase::Timestamps`] to use wall-clock hours instead.
//!
//! ```text
//! arg   = ω · t + 2π (v + u)          v, u at the window midpoint
//! A     = H / f
//! phase = g - 360 v - 360 u           (wrapped to [0, 360))
//! ```

use tracing::{debug, info};

use super::astronomy::{AstronomicalArguments, julian_date, midpoint};
use super::config::{AnalysisConfig, Method, TimeBase};
use super::constituents::description;
use super::error::AnalysisError;
use super::kernel::{WindowSamples, demodulate, wrap_degrees};
use super::nodal::NodalCorrection;
use super::result::{ConstituentResult, FitQuality, HarmonicAnalysisResult, SelectionMetadata};
use super::selection::{DEFAULT_RAYLEIGH, select_constituents};
use super::task::CancelToken;
use super::{HarmonicEstimator, map_constituents};
use crate::series::Observation;

/// Step assumed when it can be neither configured nor inferred (10 minutes).
pub const DEFAULT_STEP_HOURS: f64 = 1.0 / 6.0;

/// Rayleigh-selected demodulation over the constituent database.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TTideEstimator {
    pub rayleigh: f64,
    /// Fixed step in hours; the median spacing of the window when `None`
    pub sampling_interval_hours: Option<f64>,
    pub time_base: TimeBase,
}

impl Default for TTideEstimator {
    fn default() -> Self {
        Self {
            rayleigh: DEFAULT_RAYLEIGH,
            sampling_interval_hours: None,
            time_base: TimeBase::SampleIndex,
        }
    }
}

impl TTideEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            rayleigh: config.rayleigh,
            sampling_interval_hours: config.sampling_interval_hours,
            time_base: config.time_base,
        }
    }

    fn step_hours(&self, samples: &WindowSamples) -> f64 {
        self.sampling_interval_hours
            .or_else(|| samples.median_step_hours())
            .filter(|dt| *dt > 0.0 && dt.is_finite())
            .unwrap_or(DEFAULT_STEP_HOURS)
    }
}

impl HarmonicEstimator for TTideEstimator {
    fn method(&self) -> Method {
        Method::TTide
    }

    fn estimate(
        &self,
        window: &[Observation],
        cancel: &CancelToken,
    ) -> Result<HarmonicAnalysisResult, AnalysisError> {
        let samples = WindowSamples::new(window)?;
        let dt = self.step_hours(&samples);
        let times = match self.time_base {
            TimeBase::SampleIndex => samples.index_hours(dt),
            TimeBase::Timestamps => samples.hours.clone(),
        };

        let selection = select_constituents(self.rayleigh, dt, samples.len());
        let jd = julian_date(&midpoint(&samples.span.start, &samples.span.end));
        let astro = AstronomicalArguments::at(jd);
        debug!(jd, dt, time_base = ?self.time_base, "t_tide epoch");

        let constituents = map_constituents(selection.constituents.as_slice(), cancel, |c| {
            let nodal = NodalCorrection::for_constituent(c, &astro);
            let offset = nodal.offset_degrees();
            let speed = c.angular_speed();
            let fit = demodulate(c.name, &samples.detrended, &times, speed, offset.to_radians())?;

            Ok(ConstituentResult {
                name: c.name,
                description: description(c.name),
                amplitude: fit.amplitude / nodal.f,
                phase: wrap_degrees(fit.phase - offset),
                speed,
                reference_phase: wrap_degrees(fit.phase + offset),
                frequency: Some(c.frequency),
                f: Some(nodal.f),
                u: Some(nodal.u * 360.0),
                snr: Some(0.0),
            })
        })?;

        info!(
            samples = samples.len(),
            selected = selection.selected_count(),
            total = selection.total_count,
            "t_tide analysis complete"
        );

        let result = HarmonicAnalysisResult {
            method: Method::TTide,
            mean_sea_level: samples.mean,
            chart_datum: samples.mean,
            constituents,
            data_point_count: samples.len(),
            time_span: samples.span,
            selection: Some(SelectionMetadata {
                rayleigh: selection.rayleigh,
                min_resolution: selection.min_resolution,
                selected_count: selection.selected_count(),
                total_count: selection.total_count,
            }),
            epoch: None,
            fit: FitQuality::default(),
        };
        Ok(result.with_fit(&samples.values, &times))
    }
}
