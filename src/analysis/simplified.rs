//! Simplified strategy: the eight standard constituents without nodal
//! corrections.
//!
//! `arg = ω · hours since window start`; the reported phase is the raw `g`.

use tracing::info;

use super::config::Method;
use super::constituents::STANDARD_CONSTITUENTS;
use super::error::AnalysisError;
use super::kernel::{WindowSamples, demodulate};
use super::result::{ConstituentResult, FitQuality, HarmonicAnalysisResult};
use super::task::CancelToken;
use super::{HarmonicEstimator, map_constituents};
use crate::series::Observation;

/// Per-constituent demodulation at the literature speeds.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimplifiedEstimator;

impl HarmonicEstimator for SimplifiedEstimator {
    fn method(&self) -> Method {
        Method::Simplified
    }

    fn estimate(
        &self,
        window: &[Observation],
        cancel: &CancelToken,
    ) -> Result<HarmonicAnalysisResult, AnalysisError> {
        let samples = WindowSamples::new(window)?;

        let constituents = map_constituents(&STANDARD_CONSTITUENTS, cancel, |sc| {
            let speed = sc.angular_speed();
            let fit = demodulate(sc.name, &samples.detrended, &samples.hours, speed, 0.0)?;
            Ok(ConstituentResult {
                name: sc.name,
                description: sc.description,
                amplitude: fit.amplitude,
                phase: fit.phase,
                speed,
                reference_phase: fit.phase,
                frequency: None,
                f: None,
                u: None,
                snr: None,
            })
        })?;

        info!(
            samples = samples.len(),
            days = samples.span.days(),
            "simplified analysis complete"
        );

        let result = HarmonicAnalysisResult {
            method: Method::Simplified,
            mean_sea_level: samples.mean,
            chart_datum: samples.mean,
            constituents,
            data_point_count: samples.len(),
            time_span: samples.span,
            selection: None,
            epoch: None,
            fit: FitQuality::default(),
        };
        Ok(result.with_fit(&samples.values, &samples.hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn synthetic(days: i64, step_minutes: i64, f: impl Fn(f64) -> f64) -> Vec<Observation> {
        let t0 = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..days * 24 * 60 / step_minutes)
            .map(|i| {
                let hours = (i * step_minutes) as f64 / 60.0;
                Observation::new(t0 + Duration::minutes(i * step_minutes), f(hours), i as usize + 1)
            })
            .collect()
    }

    #[test]
    fn test_recovers_m2_and_k1() {
        let m2 = 28.9841042f64.to_radians();
        let k1 = 15.0410686f64.to_radians();
        let window = synthetic(90, 30, |t| {
            1.2 + 0.9 * (m2 * t + 75f64.to_radians()).cos() + 0.3 * (k1 * t + 200f64.to_radians()).cos()
        });

        let r = SimplifiedEstimator
            .estimate(&window, &CancelToken::new())
            .unwrap();
        assert_eq!(r.method, Method::Simplified);
        assert_eq!(r.constituents.len(), 8);
        assert!((r.mean_sea_level - 1.2).abs() < 1e-3);
        assert_eq!(r.chart_datum, r.mean_sea_level);

        let c = r.get("M2").unwrap();
        assert!((c.amplitude - 0.9).abs() < 0.009, "M2 amplitude {}", c.amplitude);
        assert!((c.phase - 75.0).abs() < 2.0, "M2 phase {}", c.phase);
        assert!(c.f.is_none());

        let c = r.get("K1").unwrap();
        assert!((c.amplitude - 0.3).abs() < 0.01, "K1 amplitude {}", c.amplitude);
        assert!((c.phase - 200.0).abs() < 2.0, "K1 phase {}", c.phase);

        // P1 is not resolved from K1 in 90 days and picks up leakage
        assert!(r.fit.r_squared > 0.8, "r² {}", r.fit.r_squared);
    }

    #[test]
    fn test_empty_window() {
        let r = SimplifiedEstimator.estimate(&[], &CancelToken::new());
        assert_eq!(r, Err(AnalysisError::EmptyWindow));
    }

    #[test]
    fn test_cancelled() {
        let window = synthetic(2, 60, |_| 0.0);
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(
            SimplifiedEstimator.estimate(&window, &token),
            Err(AnalysisError::Cancelled)
        );
    }
}
