//! Admiralty strategy: the eight standard constituents with equilibrium
//! arguments and closed-form nodal corrections.
//!
//! With `T` Julian centuries from J2000 to the window start:
//!
//! ```text
//! arg   = ω · hours + V0 + u
//! H     = amplitude of the fit,   A = H / f
//! phase = g - V0 - u              (wrapped to [0, 360))
//! ```

use tracing::{debug, info};

use super::astronomy::{J2000_LABEL, MeanLongitudes, centuries_since_j2000};
use super::config::Method;
use super::constituents::STANDARD_CONSTITUENTS;
use super::error::AnalysisError;
use super::kernel::{WindowSamples, demodulate, wrap_degrees};
use super::nodal::AdmiraltyTerms;
use super::result::{AstronomicalEpoch, ConstituentResult, FitQuality, HarmonicAnalysisResult};
use super::task::CancelToken;
use super::{HarmonicEstimator, map_constituents};
use crate::series::Observation;

/// Demodulation against the equilibrium tide.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdmiraltyEstimator;

impl HarmonicEstimator for AdmiraltyEstimator {
    fn method(&self) -> Method {
        Method::Admiralty
    }

    fn estimate(
        &self,
        window: &[Observation],
        cancel: &CancelToken,
    ) -> Result<HarmonicAnalysisResult, AnalysisError> {
        let samples = WindowSamples::new(window)?;
        let t = centuries_since_j2000(&samples.span.start);
        let longitudes = MeanLongitudes::at_centuries(t);
        debug!(centuries = t, node = longitudes.n, "admiralty epoch");

        let constituents = map_constituents(&STANDARD_CONSTITUENTS, cancel, |sc| {
            let terms = AdmiraltyTerms::for_constituent(sc.name, &longitudes)
                .ok_or_else(|| AnalysisError::UnknownConstituent(sc.name.to_string()))?;
            let speed = sc.angular_speed();
            let offset = terms.offset_degrees();
            let fit = demodulate(
                sc.name,
                &samples.detrended,
                &samples.hours,
                speed,
                offset.to_radians(),
            )?;

            Ok(ConstituentResult {
                name: sc.name,
                description: sc.description,
                amplitude: fit.amplitude / terms.f,
                phase: wrap_degrees(fit.phase - offset),
                speed,
                reference_phase: wrap_degrees(fit.phase + offset),
                frequency: None,
                f: Some(terms.f),
                u: Some(terms.u),
                snr: None,
            })
        })?;

        info!(
            samples = samples.len(),
            days = samples.span.days(),
            "admiralty analysis complete"
        );

        let result = HarmonicAnalysisResult {
            method: Method::Admiralty,
            mean_sea_level: samples.mean,
            chart_datum: samples.mean,
            constituents,
            data_point_count: samples.len(),
            time_span: samples.span,
            selection: None,
            epoch: Some(AstronomicalEpoch {
                centuries: t,
                reference: J2000_LABEL,
            }),
            fit: FitQuality::default(),
        };
        Ok(result.with_fit(&samples.values, &samples.hours))
    }
}
