//! Joint least-squares fit of all constituents at once.
//!
//! The tidal signal is modeled as:
//! ```text
//! η(t) = η₀ + Σᵢ [Aᵢ cos(ωᵢt) + Bᵢ sin(ωᵢt)]
//! ```
//!
//! This is rewritten as a linear least-squares problem:
//! ```text
//! y = X * β  where  β = [η₀, A₁, B₁, A₂, B₂, ...]ᵀ
//! ```
//!
//! and solved through the normal equations. After solving, the amplitude and
//! phase are recovered:
//! ```text
//! Hᵢ = √(Aᵢ² + Bᵢ²)
//! φᵢ = atan2(-Bᵢ, Aᵢ)
//! ```
//!
//! Unlike the per-constituent strategies, close constituents do not leak
//! into each other once the record resolves them. Times are wall-clock hours
//! from the window start.

use faer::{Mat, linalg::solvers::Solve};
use tracing::{debug, info};

use super::config::{AnalysisConfig, Method};
use super::constituents::{MEAN_LEVEL, STANDARD_CONSTITUENTS, description, lookup, standard};
use super::error::AnalysisError;
use super::kernel::{WindowSamples, wrap_degrees};
use super::result::{ConstituentResult, FitQuality, HarmonicAnalysisResult};
use super::task::CancelToken;
use super::HarmonicEstimator;
use crate::series::Observation;

/// A constituent in the design matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Term {
    name: &'static str,
    description: &'static str,
    /// Radians per hour
    speed: f64,
}

/// Least-squares fitting of a fixed constituent list.
#[derive(Clone, Debug, PartialEq)]
pub struct LeastSquaresEstimator {
    terms: Vec<Term>,
}

impl Default for LeastSquaresEstimator {
    fn default() -> Self {
        Self::standard()
    }
}

impl LeastSquaresEstimator {
    /// Fit the eight standard constituents.
    pub fn standard() -> Self {
        Self {
            terms: STANDARD_CONSTITUENTS
                .iter()
                .map(|c| Term {
                    name: c.name,
                    description: c.description,
                    speed: c.angular_speed(),
                })
                .collect(),
        }
    }

    /// Fit named constituents.
    ///
    /// Standard constituents use their literature speeds, other names are
    /// looked up in the database. `Z0` is covered by the mean term and skipped.
    pub fn with_names<S: AsRef<str>>(names: &[S]) -> Result<Self, AnalysisError> {
        let mut terms: Vec<Term> = Vec::with_capacity(names.len());
        for name in names {
            let name: &str = name.as_ref();
            if name == MEAN_LEVEL || terms.iter().any(|t| t.name == name) {
                continue;
            }
            let term = if let Some(sc) = standard(name) {
                Term {
                    name: sc.name,
                    description: sc.description,
                    speed: sc.angular_speed(),
                }
            } else {
                let c = lookup(name)
                    .ok_or_else(|| AnalysisError::UnknownConstituent(name.to_string()))?;
                Term {
                    name: c.name,
                    description: description(c.name),
                    speed: c.angular_speed(),
                }
            };
            terms.push(term);
        }
        Ok(Self { terms })
    }

    /// Estimator for the constituents named in a config (standard set if none).
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        match &config.constituents {
            Some(names) => Self::with_names(names.as_slice()),
            None => Ok(Self::standard()),
        }
    }

    /// Get the constituent names being fitted.
    pub fn names(&self) -> Vec<&'static str> {
        self.terms.iter().map(|t| t.name).collect()
    }

    /// Number of unknowns: the mean plus a cosine and sine per constituent.
    pub fn unknowns(&self) -> usize {
        1 + 2 * self.terms.len()
    }

    /// Minimum record length in hours that separates every constituent pair
    /// (Rayleigh criterion): `T > 1 / |f₁ - f₂|`.
    pub fn minimum_record_length_hours(&self) -> f64 {
        let mut min_length: f64 = 0.0;
        for (i, a) in self.terms.iter().enumerate() {
            for b in &self.terms[i + 1..] {
                let df = (a.speed - b.speed).abs() / (2.0 * std::f64::consts::PI);
                if df > 1e-12 {
                    min_length = min_length.max(1.0 / df);
                }
            }
        }
        min_length
    }
}

impl HarmonicEstimator for LeastSquaresEstimator {
    fn method(&self) -> Method {
        Method::LeastSquares
    }

    fn estimate(
        &self,
        window: &[Observation],
        cancel: &CancelToken,
    ) -> Result<HarmonicAnalysisResult, AnalysisError> {
        let samples = WindowSamples::new(window)?;
        let n_data = samples.len();
        let n_unknowns = self.unknowns();
        if n_data < n_unknowns {
            return Err(AnalysisError::InsufficientData {
                needed: n_unknowns,
                got: n_data,
            });
        }

        let times = &samples.hours;
        let values = &samples.values;

        // Build design matrix A
        // A = [1, cos(ω₁t), sin(ω₁t), cos(ω₂t), sin(ω₂t), ...]
        let mut a = Mat::<f64>::zeros(n_data, n_unknowns);
        for (i, &t) in times.iter().enumerate() {
            a[(i, 0)] = 1.0;
            for (j, term) in self.terms.iter().enumerate() {
                let (sin, cos) = (term.speed * t).sin_cos();
                a[(i, 1 + 2 * j)] = cos;
                a[(i, 2 + 2 * j)] = sin;
            }
        }

        // Normal equations: (A'A) x = A'y
        let mut ata = Mat::<f64>::zeros(n_unknowns, n_unknowns);
        for i in 0..n_unknowns {
            cancel.check()?;
            for j in i..n_unknowns {
                let mut sum = 0.0;
                for k in 0..n_data {
                    sum += a[(k, i)] * a[(k, j)];
                }
                ata[(i, j)] = sum;
                ata[(j, i)] = sum;
            }
        }

        let mut aty = Mat::<f64>::zeros(n_unknowns, 1);
        for i in 0..n_unknowns {
            let mut sum = 0.0;
            for k in 0..n_data {
                sum += a[(k, i)] * values[k];
            }
            aty[(i, 0)] = sum;
        }

        cancel.check()?;
        let lu = ata.as_ref().full_piv_lu();
        let x = lu.solve(&aty);

        if (0..n_unknowns).any(|i| !x[(i, 0)].is_finite()) {
            return Err(AnalysisError::SingularSystem);
        }

        let mean = x[(0, 0)];
        let constituents: Vec<ConstituentResult> = self
            .terms
            .iter()
            .enumerate()
            .map(|(j, term)| {
                let a_coef = x[(1 + 2 * j, 0)];
                let b_coef = x[(2 + 2 * j, 0)];
                let phase = wrap_degrees((-b_coef).atan2(a_coef).to_degrees());
                ConstituentResult {
                    name: term.name,
                    description: term.description,
                    amplitude: (a_coef * a_coef + b_coef * b_coef).sqrt(),
                    phase,
                    speed: term.speed,
                    reference_phase: phase,
                    frequency: None,
                    f: None,
                    u: None,
                    snr: None,
                }
            })
            .collect();

        debug!(
            unknowns = n_unknowns,
            min_record_hours = self.minimum_record_length_hours(),
            "least-squares system solved"
        );
        info!(
            samples = n_data,
            constituents = constituents.len(),
            "least-squares analysis complete"
        );

        let result = HarmonicAnalysisResult {
            method: Method::LeastSquares,
            mean_sea_level: mean,
            chart_datum: mean,
            constituents,
            data_point_count: n_data,
            time_span: samples.span,
            selection: None,
            epoch: None,
            fit: FitQuality::default(),
        };
        Ok(result.with_fit(values, times))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    const TOL: f64 = 1e-6;

    fn hourly(count: i64, f: impl Fn(f64) -> f64) -> Vec<Observation> {
        let t0 = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..count)
            .map(|i| Observation::new(t0 + Duration::hours(i), f(i as f64), i as usize + 1))
            .collect()
    }

    fn wave(name: &str, amplitude: f64, phase_deg: f64) -> impl Fn(f64) -> f64 {
        let speed = standard(name).unwrap().angular_speed();
        move |t| amplitude * (speed * t + phase_deg.to_radians()).cos()
    }

    #[test]
    fn test_single_constituent_recovery() {
        let m2 = wave("M2", 1.5, 30.0);
        let est = LeastSquaresEstimator::with_names(&["M2"]).unwrap();
        let r = est.estimate(&hourly(720, m2), &CancelToken::new()).unwrap();

        let c = r.get("M2").unwrap();
        assert!((c.amplitude - 1.5).abs() < TOL, "amplitude {}", c.amplitude);
        assert!((c.phase - 30.0).abs() < TOL, "phase {}", c.phase);
        assert!(r.mean_sea_level.abs() < TOL);
        assert!(r.fit.r_squared > 0.9999);
    }

    #[test]
    fn test_separates_m2_and_s2() {
        // Need at least 15 days to separate M2 and S2 (Rayleigh criterion)
        let m2 = wave("M2", 1.0, 20.0);
        let s2 = wave("S2", 0.4, 140.0);
        let est = LeastSquaresEstimator::with_names(&["M2", "S2"]).unwrap();
        let r = est
            .estimate(&hourly(400, |t| 2.5 + m2(t) + s2(t)), &CancelToken::new())
            .unwrap();

        assert!((r.mean_sea_level - 2.5).abs() < 1e-6);
        let c = r.get("M2").unwrap();
        assert!((c.amplitude - 1.0).abs() < 1e-6, "M2 amplitude {}", c.amplitude);
        assert!((c.phase - 20.0).abs() < 1e-4, "M2 phase {}", c.phase);
        let c = r.get("S2").unwrap();
        assert!((c.amplitude - 0.4).abs() < 1e-6, "S2 amplitude {}", c.amplitude);
        assert!((c.phase - 140.0).abs() < 1e-4, "S2 phase {}", c.phase);
    }

    #[test]
    fn test_standard_set_and_reconstruction() {
        let m2 = wave("M2", 1.0, 0.0);
        let k1 = wave("K1", 0.3, 250.0);
        let o1 = wave("O1", 0.2, 90.0);
        let signal = |t: f64| 1.0 + m2(t) + k1(t) + o1(t);
        // One year resolves all eight standard constituents
        let window = hourly(24 * 366, signal);
        let r = LeastSquaresEstimator::standard()
            .estimate(&window, &CancelToken::new())
            .unwrap();

        assert_eq!(r.constituents.len(), 8);
        assert!(r.get("P1").unwrap().amplitude < 1e-6);
        for t in [0.0, 100.5, 5000.0] {
            assert!(
                (r.evaluate(t) - signal(t)).abs() < 1e-6,
                "reconstruction error at {} h",
                t
            );
        }
    }

    #[test]
    fn test_names_from_database() {
        let est = LeastSquaresEstimator::with_names(&["Z0", "M2", "M4", "M2", "MS4"]).unwrap();
        assert_eq!(est.names(), vec!["M2", "M4", "MS4"]);
        assert_eq!(est.unknowns(), 7);

        let err = LeastSquaresEstimator::with_names(&["M2", "XYZ"]).unwrap_err();
        assert_eq!(err, AnalysisError::UnknownConstituent("XYZ".to_string()));
    }

    #[test]
    fn test_insufficient_data() {
        let r = LeastSquaresEstimator::standard().estimate(&hourly(10, |_| 0.0), &CancelToken::new());
        assert_eq!(r, Err(AnalysisError::InsufficientData { needed: 17, got: 10 }));
    }

    #[test]
    fn test_minimum_record_length() {
        let est = LeastSquaresEstimator::with_names(&["M2", "S2"]).unwrap();
        // |f(M2) - f(S2)| ≈ 0.00282 cph
        let hours = est.minimum_record_length_hours();
        assert!(hours > 350.0 && hours < 360.0, "got {} hours", hours);
    }
}
