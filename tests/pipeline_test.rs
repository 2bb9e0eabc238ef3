//! Integration tests for the normalization pipeline.
//!
//! Covers parsing, interval checks, gap filling, downsampling with undo,
//! export and the session wrapper around them.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tempfile::NamedTempFile;
use tide_rs::io::format_with_pattern;
use tide_rs::{
    DateFormat, Interval, Observation, Series, Session, Window, check_interval, downsample,
    export_series, interpolate_gaps, parse_series, read_series_file, write_series_file,
};

const TOL: f64 = 1e-12;

const GAUGE: &str = "2025/08/22 06:40 -0.26\n2025/08/22 06:50 -0.31\n2025/08/22 07:10 -0.40";

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 8, 22)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

#[test]
fn test_gauge_scenario() {
    let parsed = parse_series(GAUGE, DateFormat::default());
    assert!(parsed.is_clean());
    assert_eq!(parsed.parsed_count(), 3);

    let report = check_interval(&parsed.series, Interval::minutes(10.0)).unwrap();
    assert_eq!(report.total, 2);
    assert_eq!(report.issue_count(), 1);
    let issue = &report.issues[0];
    assert_eq!(issue.line1, 2.0);
    assert_eq!(issue.line2, 3.0);
    assert_eq!(issue.date1, "22/08/2025 06:50:00");
    assert_eq!(issue.expected_sec, 600.0);
    assert_eq!(issue.actual_sec, 1200.0);

    let filled = interpolate_gaps(&parsed.series, &report).unwrap();
    assert_eq!(filled.len(), 4);
    let inserted = filled.get(2).unwrap();
    assert_eq!(inserted.timestamp, at(7, 0, 0));
    assert!((inserted.value + 0.355).abs() < TOL, "value {}", inserted.value);
    assert!(inserted.interpolated);

    // Filled series passes the same check
    let recheck = check_interval(&filled, Interval::minutes(10.0)).unwrap();
    assert!(recheck.is_clean());
}

#[test]
fn test_interpolation_inserts_evenly_spaced_points() {
    let parsed = parse_series(
        "2025/08/22 00:00 1.0\n2025/08/22 00:30 4.0",
        DateFormat::default(),
    );
    let report = check_interval(&parsed.series, Interval::minutes(10.0)).unwrap();
    let filled = interpolate_gaps(&parsed.series, &report).unwrap();

    let times: Vec<_> = filled.iter().map(|o| o.timestamp).collect();
    assert_eq!(times, vec![at(0, 0, 0), at(0, 10, 0), at(0, 20, 0), at(0, 30, 0)]);
    let values: Vec<_> = filled.iter().map(|o| o.value).collect();
    for (v, expected) in values.iter().zip([1.0, 2.0, 3.0, 4.0]) {
        assert!((v - expected).abs() < TOL);
    }
    assert_eq!(filled.interpolated_count(), 2);
    assert!(filled.iter().filter(|o| o.interpolated).all(|o| o.source_line == 1.5));
}

#[test]
fn test_builder_sorts_and_skips_bad_lines() {
    let text = "\
# station 42
22/08/2025 07:00:00 0.3

22/08/2025 06:00:00 0.1
22/08/2025 6:30 0.2
22/08/2025 06:30:00 abc
22/08/2025 06:30:00 0.2
";
    let parsed = parse_series(text, DateFormat::from_id("dd/mm/yyyy hh:mm:ss").unwrap());
    assert_eq!(parsed.parsed_count(), 3);
    assert_eq!(parsed.warnings.len(), 2);
    assert_eq!(parsed.warnings[0].line, 5);
    assert_eq!(parsed.warnings[1].line, 6);

    let obs = parsed.series.observations();
    assert!(obs.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(obs[0].source_line, 4.0);
    assert_eq!(obs[2].timestamp, at(7, 0, 0));
}

#[test]
fn test_every_format_round_trips() {
    let ts = at(23, 59, 58);
    for format in DateFormat::ALL {
        let text = format.format(&ts);
        let parsed = format.parse(&text).unwrap();
        if format.has_seconds() {
            assert_eq!(parsed, ts, "{}", format);
        } else {
            assert_eq!(parsed, at(23, 59, 0), "{}", format);
        }
    }
}

#[test]
fn test_downsample_undo_is_identity() {
    let t0 = at(0, 0, 0);
    let series = Series::new(
        (0..50usize)
            .map(|i| {
                // Irregular spacing between 3 and 9 minutes
                let minutes: i64 = (0..i as i64).map(|k| 3 + (k * 5) % 7).sum();
                Observation::new(t0 + Duration::minutes(minutes), i as f64 * 0.01, i + 1)
            })
            .collect(),
    );

    for target in [Interval::minutes(10.0), Interval::hours(1.0), Interval::seconds(30.0)] {
        let text = export_series(&series, "yyyy/mm/dd hh:mm");
        let (session, _) = Session::new().load(&text, DateFormat::default());
        let down = session.downsample(target);
        assert!(down.series().len() <= session.series().len());
        assert_eq!(down.undo(), session);
    }

    let down = downsample(&series, Interval::minutes(10.0));
    assert_eq!(down.get(0), series.get(0));
    let kept: Vec<_> = down.iter().map(|o| o.timestamp).collect();
    assert!(
        kept.windows(2)
            .all(|w| w[1] - w[0] >= Duration::minutes(10) - Duration::seconds(1))
    );
}

#[test]
fn test_export_and_reload_through_file() {
    let parsed = parse_series(GAUGE, DateFormat::default());
    let report = check_interval(&parsed.series, Interval::minutes(10.0)).unwrap();
    let filled = interpolate_gaps(&parsed.series, &report).unwrap();

    let file = NamedTempFile::new().unwrap();
    write_series_file(file.path(), &filled, "yyyy/mm/dd hh:mm").unwrap();

    // The marker column makes the value field "(interpolated)" on reload
    let reloaded = read_series_file(file.path(), DateFormat::default()).unwrap();
    assert_eq!(reloaded.parsed_count(), 3);
    assert_eq!(reloaded.warnings.len(), 1);
    assert_eq!(reloaded.warnings[0].line, 3);
}

#[test]
fn test_export_pattern_month_and_minute() {
    let ts = NaiveDate::from_ymd_opt(2024, 2, 9)
        .unwrap()
        .and_hms_opt(13, 45, 7)
        .unwrap();
    assert_eq!(format_with_pattern(&ts, "yyyy-mm-dd hh:mm:ss"), "2024-02-09 13:45:07");
    assert_eq!(format_with_pattern(&ts, "mm/dd/yy hh:mm"), "02/09/24 13:45");
}

#[test]
fn test_session_pipeline() {
    let (session, warnings) = Session::new().load(GAUGE, DateFormat::default());
    assert!(warnings.is_empty());

    let session = session
        .check_interval(Interval::minutes(10.0))
        .interpolate()
        .with_window(Window::new(25.0, 100.0));
    assert_eq!(session.series().len(), 4);
    assert_eq!(session.window_data().len(), 3);
    assert_eq!(session.interpolated_points().len(), 1);
    assert_eq!(session.interpolated_context(0).len(), 4);

    let bounds = session.window_bounds().unwrap();
    assert_eq!(bounds.start, at(6, 50, 0));
    assert_eq!(bounds.end, at(7, 10, 0));

    let by_date = session
        .with_date_range("22/08/2025 06:45:00", "22/08/2025 07:00:00")
        .unwrap();
    assert_eq!(by_date.window(), Window::new(25.0, 75.0));
}
