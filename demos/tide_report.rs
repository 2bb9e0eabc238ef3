//! Tide Report Example
//!
//! Runs the whole pipeline over a tide gauge record and prints the harmonic
//! constituents found by every analysis method.
//!
//! This example:
//! 1. Loads a record from a file, or generates a gappy synthetic one
//! 2. Checks the sampling interval and fills the gaps
//! 3. Downsamples to 30 minutes (and shows that undo restores the record)
//! 4. Analyses the record on a background worker with each method
//! 5. Prints the largest constituents and the fit quality
//!
//! ## Run
//!
//! ```bash
//! cargo run --release --example tide_report
//! cargo run --release --example tide_report -- gauge.txt "dd/mm/yyyy hh:mm:ss"
//! RUST_LOG=debug cargo run --example tide_report
//! ```

use std::error::Error;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use tide_rs::analysis::standard;
use tide_rs::{
    AnalysisConfig, AnalysisRunner, DateFormat, HarmonicAnalysisResult, Interval, Method, Series,
    Session, export_series,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Constituents printed per method.
const TOP: usize = 6;

/// 45 days at 10 minutes with a few outages, formatted as gauge text.
fn synthetic_record() -> String {
    let t0 = NaiveDate::from_ymd_opt(2025, 8, 1)
        .unwrap_or_default()
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default();
    let wave = |name: &str, amp: f64, phase_deg: f64| {
        let speed = standard(name).map_or(0.0, |c| c.angular_speed());
        move |t: f64| amp * (speed * t + phase_deg.to_radians()).cos()
    };
    let (m2, s2, k1, o1) = (
        wave("M2", 0.92, 30.0),
        wave("S2", 0.31, 75.0),
        wave("K1", 0.11, 210.0),
        wave("O1", 0.07, 190.0),
    );

    let observations = (0..45 * 144)
        // Outages of 20 and 50 minutes
        .filter(|i| i % 500 != 17 && !(2000..2004).contains(i))
        .map(|i| {
            let t = i as f64 / 6.0;
            let value = 1.6 + m2(t) + s2(t) + k1(t) + o1(t);
            let value = (value * 1000.0).round() / 1000.0;
            tide_rs::Observation::new(t0 + Duration::minutes(i * 10), value, i as usize + 1)
        })
        .collect();
    export_series(&Series::new(observations), "yyyy/mm/dd hh:mm")
}

fn print_result(result: &HarmonicAnalysisResult) {
    println!("\n{}", result.method.label());
    println!(
        "  {} points over {:.1} days, MSL {:.3} m, R² {:.4}",
        result.data_point_count,
        result.time_span.days(),
        result.mean_sea_level,
        result.fit.r_squared
    );
    if let Some(sel) = &result.selection {
        println!(
            "  {} of {} constituents resolved (minres {:.6} cph)",
            sel.selected_count, sel.total_count, sel.min_resolution
        );
    }
    println!("  {:<6} {:>10} {:>10}  {}", "Name", "Amp (m)", "Phase (°)", "Description");
    for c in result.ranked().into_iter().take(TOP) {
        println!(
            "  {:<6} {:>10.4} {:>10.2}  {}",
            c.name, c.amplitude, c.phase, c.description
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let format: DateFormat = match args.get(1) {
        Some(id) => id.parse()?,
        None => DateFormat::default(),
    };

    let (session, warnings) = match args.first() {
        Some(path) => Session::new().load_file(Path::new(path), format)?,
        None => Session::new().load(&synthetic_record(), format),
    };
    println!("Loaded {} observations ({} lines skipped)", session.series().len(), warnings.len());

    let session = session.check_interval(Interval::minutes(10.0));
    if let Some(report) = session.interval_report() {
        println!("Interval check: {} of {} pairs off", report.issue_count(), report.total);
        for issue in report.issues.iter().take(3) {
            println!(
                "  lines {}-{}: {} -> {} ({} s, expected {} s)",
                issue.line1, issue.line2, issue.date1, issue.date2, issue.actual_sec, issue.expected_sec
            );
        }
    }

    let session = session.interpolate();
    println!("Interpolated {} points", session.interpolated_points().len());

    let down = session.downsample(Interval::minutes(30.0));
    println!(
        "Downsampled to {} points, undo restores {}",
        down.series().len(),
        down.undo().series().len()
    );

    let runner = AnalysisRunner::new();
    for method in Method::ALL {
        let handle = runner.submit(session.window_data().to_vec(), AnalysisConfig::new(method));
        match handle.wait() {
            Ok(result) => print_result(&result),
            Err(e) => println!("\n{}: {}", method.label(), e),
        }
    }

    Ok(())
}
