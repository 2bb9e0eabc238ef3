//! Integration tests for the harmonic analysis strategies.
//!
//! Synthetic series are built from known constituents and each strategy is
//! checked for amplitude and phase recovery, result metadata and the
//! Rayleigh selection behaviour.

use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tide_rs::analysis::{
    AdmiraltyTerms, MeanLongitudes, centuries_since_j2000, lookup, select_constituents, standard,
    wrap_degrees,
};
use tide_rs::{AnalysisConfig, HarmonicAnalysisResult, Method, Observation, Series, Window, analyze};

const Z0: f64 = 1.25;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 10)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Regularly sampled series of `f(hours since start)`.
fn synthetic(days: i64, step_minutes: i64, f: impl Fn(f64) -> f64) -> Series {
    let count = days * 24 * 60 / step_minutes;
    let observations = (0..count)
        .map(|i| {
            let hours = (i * step_minutes) as f64 / 60.0;
            Observation::new(start() + Duration::minutes(i * step_minutes), f(hours), i as usize + 1)
        })
        .collect();
    Series::new(observations)
}

/// Signed difference between two angles in degrees, in `[-180, 180)`.
fn angle_diff(a: f64, b: f64) -> f64 {
    (a - b + 180.0).rem_euclid(360.0) - 180.0
}

fn run(series: &Series, method: Method) -> HarmonicAnalysisResult {
    analyze(series.window(Window::FULL), &AnalysisConfig::new(method)).unwrap()
}

#[test]
fn test_simplified_m2_recovery() {
    let speed = standard("M2").unwrap().angular_speed();
    let (amp, phase): (f64, f64) = (0.9, 47.0);
    let series = synthetic(32, 10, |t| Z0 + amp * (speed * t + phase.to_radians()).cos());

    let result = run(&series, Method::Simplified);
    let m2 = result.get("M2").unwrap();

    assert!(
        (m2.amplitude - amp).abs() < 0.01 * amp,
        "M2 amplitude error: expected {}, got {:.4}",
        amp,
        m2.amplitude
    );
    assert!(
        angle_diff(m2.phase, phase).abs() < 2.0,
        "M2 phase error: expected {}, got {:.2}",
        phase,
        m2.phase
    );
    assert!((result.mean_sea_level - Z0).abs() < 0.01);
    assert_eq!(result.chart_datum, result.mean_sea_level);
    assert_eq!(result.ranked()[0].name, "M2");
}

#[test]
fn test_admiralty_m2_recovery() {
    let terms = AdmiraltyTerms::for_constituent(
        "M2",
        &MeanLongitudes::at_centuries(centuries_since_j2000(&start())),
    )
    .unwrap();
    let offset = terms.offset_degrees();
    let speed = standard("M2").unwrap().angular_speed();
    let (amp, greenwich) = (0.6, 215.0);

    // Observed tide carries the nodal factor and the equilibrium argument
    let series = synthetic(35, 10, |t| {
        Z0 + terms.f * amp * (speed * t + (offset + greenwich).to_radians()).cos()
    });

    let result = run(&series, Method::Admiralty);
    let m2 = result.get("M2").unwrap();

    assert!(
        (m2.amplitude - amp).abs() < 0.01 * amp,
        "M2 amplitude error: expected {}, got {:.4}",
        amp,
        m2.amplitude
    );
    let expected = wrap_degrees(greenwich - offset);
    assert!(
        angle_diff(m2.phase, expected).abs() < 2.0,
        "M2 phase error: expected {:.2}, got {:.2}",
        expected,
        m2.phase
    );
    assert_eq!(m2.f, Some(terms.f));
    assert_eq!(m2.u, Some(terms.u));

    let epoch = result.epoch.unwrap();
    assert_relative_eq!(epoch.centuries, centuries_since_j2000(&start()), epsilon = 1e-12);
}

#[test]
fn test_ttide_m2_recovery_and_metadata() {
    let speed = lookup("M2").unwrap().angular_speed();
    let series = synthetic(40, 10, |t| Z0 + 0.5 * (speed * t).cos());

    let result = run(&series, Method::TTide);
    let m2 = result.get("M2").unwrap();
    assert!((m2.amplitude - 0.5).abs() < 0.005, "M2 amplitude {:.4}", m2.amplitude);
    assert!(
        angle_diff(m2.reference_phase, 0.0).abs() < 2.0,
        "M2 reference phase {:.2}",
        m2.reference_phase
    );

    let selection = result.selection.unwrap();
    assert_eq!(selection.total_count, 145);
    assert_eq!(selection.selected_count, result.constituents.len());
    assert_relative_eq!(selection.min_resolution, 1.0 / (40.0 * 24.0), epsilon = 1e-12);
    assert!(result.get("Z0").is_none());
    assert_eq!(result.data_point_count, series.len());
    assert_relative_eq!(result.time_span.days(), 40.0 - 1.0 / 144.0, epsilon = 1e-9);
}

#[test]
fn test_least_squares_separates_close_constituents() {
    let m2 = standard("M2").unwrap().angular_speed();
    let n2 = standard("N2").unwrap().angular_speed();
    let s2 = standard("S2").unwrap().angular_speed();
    let signal = |t: f64| {
        Z0 + 1.1 * (m2 * t + 0.3).cos() + 0.25 * (n2 * t + 2.0).cos() + 0.4 * (s2 * t - 1.0).cos()
    };
    let series = synthetic(40, 30, signal);

    let config = AnalysisConfig::new(Method::LeastSquares).with_constituents(["M2", "N2", "S2"]);
    let result = analyze(series.observations(), &config).unwrap();

    assert_relative_eq!(result.get("M2").unwrap().amplitude, 1.1, epsilon = 1e-6);
    assert_relative_eq!(result.get("N2").unwrap().amplitude, 0.25, epsilon = 1e-6);
    assert_relative_eq!(result.get("S2").unwrap().amplitude, 0.4, epsilon = 1e-6);
    assert_relative_eq!(result.mean_sea_level, Z0, epsilon = 1e-6);
    assert!(result.fit.r_squared > 0.999_999);
    for t in [0.0, 12.5, 300.25] {
        assert_relative_eq!(result.evaluate(t), signal(t), epsilon = 1e-6);
    }
}

#[test]
fn test_windowed_analysis_uses_window_start() {
    let speed = standard("M2").unwrap().angular_speed();
    let series = synthetic(60, 10, |t| 0.7 * (speed * t).cos());

    // Second half of the record: the phase is referenced to its own start
    let window = Window::new(50.0, 100.0);
    let data = series.window(window);
    let t0 = (data[0].timestamp - start()).num_minutes() as f64 / 60.0;
    let result = analyze(data, &AnalysisConfig::new(Method::Simplified)).unwrap();

    let expected = wrap_degrees((speed * t0).to_degrees());
    let m2 = result.get("M2").unwrap();
    assert!(
        angle_diff(m2.phase, expected).abs() < 2.0,
        "phase {:.2} expected {:.2}",
        m2.phase,
        expected
    );
    assert_eq!(result.time_span.start, data[0].timestamp);
}

#[test]
fn test_rayleigh_selection_is_monotonic() {
    let count = 2000;
    let mut previous = select_constituents(1.0, 1.0 / 60.0, count);
    for dt in [0.1, 0.25, 0.5, 1.0, 2.0, 6.0] {
        let next = select_constituents(1.0, dt, count);
        assert!(
            next.min_resolution <= previous.min_resolution,
            "minres grew from {} to {} at dt={}",
            previous.min_resolution,
            next.min_resolution,
            dt
        );
        assert!(
            next.excluded_count() <= previous.excluded_count(),
            "exclusions grew at dt={}",
            dt
        );
        previous = next;
    }
    // Two years of hourly data resolve the whole database
    assert_eq!(select_constituents(1.0, 1.0, 24 * 731).excluded_count(), 0);
}

#[test]
fn test_all_phases_normalized() {
    let m2 = standard("M2").unwrap().angular_speed();
    let k1 = standard("K1").unwrap().angular_speed();
    let series = synthetic(20, 15, |t| 0.8 * (m2 * t + 4.0).cos() + 0.3 * (k1 * t - 2.0).cos());
    for method in Method::ALL {
        let result = run(&series, method);
        for c in &result.constituents {
            assert!(
                (0.0..360.0).contains(&c.phase),
                "{} {} phase {}",
                method,
                c.name,
                c.phase
            );
            assert!(c.amplitude.is_finite() && c.amplitude >= 0.0);
        }
    }
}
