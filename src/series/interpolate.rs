//! Linear gap filling.
//!
//! For a pair `(prev, curr)` spaced `Δ` apart where the expected spacing is
//! `δ`, the interpolator inserts `round(Δ / δ) - 1` points at
//! `prev + j·δ` with values
//!
//! ```text
//! prev.value + (curr.value - prev.value) · j / (missing + 1)
//! ```
//!
//! All points inserted into one gap share `source_line = prev.source_line + 0.5`.

use chrono::Duration;
use tracing::{debug, info};

use super::validate::INTERVAL_TOLERANCE_MS;
use super::{IntervalReport, Observation, Series};

/// Fill the gaps flagged by an interval check.
///
/// Returns `None` when the report has no issues. The report must come from
/// a check of this same series; gaps are re-detected against the report's
/// expected interval while walking the series.
pub fn interpolate_gaps(series: &Series, report: &IntervalReport) -> Option<Series> {
    if report.is_clean() || series.len() < 2 {
        return None;
    }

    let expected_ms = report.expected_interval_ms;
    if expected_ms.is_nan() || expected_ms <= 0.0 {
        return None;
    }

    let obs = series.observations();
    let mut filled = Vec::with_capacity(obs.len());
    let mut inserted = 0usize;
    let mut gaps = 0usize;

    filled.push(obs[0].clone());
    for pair in obs.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let actual_ms = (curr.timestamp - prev.timestamp).num_milliseconds() as f64;

        if (actual_ms - expected_ms).abs() > INTERVAL_TOLERANCE_MS {
            let missing = (actual_ms / expected_ms).round() as i64 - 1;
            if missing > 0 {
                gaps += 1;
                for j in 1..=missing {
                    let offset = Duration::milliseconds((j as f64 * expected_ms).round() as i64);
                    let ratio = j as f64 / (missing + 1) as f64;
                    filled.push(Observation {
                        timestamp: prev.timestamp + offset,
                        value: prev.value + (curr.value - prev.value) * ratio,
                        source_line: prev.source_line + 0.5,
                        interpolated: true,
                    });
                }
                inserted += missing as usize;
            } else {
                debug!(
                    line1 = prev.source_line,
                    line2 = curr.source_line,
                    actual_sec = actual_ms / 1000.0,
                    "irregular spacing too short to fill"
                );
            }
        }

        filled.push(curr.clone());
    }

    info!(gaps, inserted, "interpolated gaps");
    Some(Series::from_sorted(filled))
}
