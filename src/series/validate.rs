//! Sampling interval validation.
//!
//! Walks consecutive observation pairs and flags every pair whose spacing
//! deviates from the expected interval by more than [`INTERVAL_TOLERANCE_MS`].

use tracing::debug;

use super::{Interval, Series};

/// Allowed deviation from the expected spacing (milliseconds).
pub const INTERVAL_TOLERANCE_MS: f64 = 1000.0;

/// A consecutive pair of observations with unexpected spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalIssue {
    /// Source line of the earlier observation
    pub line1: f64,
    /// Source line of the later observation
    pub line2: f64,
    /// Earlier timestamp, `dd/mm/yyyy hh:mm:ss`
    pub date1: String,
    /// Later timestamp, `dd/mm/yyyy hh:mm:ss`
    pub date2: String,
    /// Expected spacing in seconds
    pub expected_sec: f64,
    /// Actual spacing in seconds
    pub actual_sec: f64,
}

impl IntervalIssue {
    /// Signed deviation from the expected spacing in seconds.
    pub fn deviation_sec(&self) -> f64 {
        self.actual_sec - self.expected_sec
    }

    /// Whether the pair is further apart than expected (a gap).
    pub fn is_gap(&self) -> bool {
        self.deviation_sec() > 0.0
    }
}

/// Result of an interval check.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalReport {
    /// Expected spacing in milliseconds
    pub expected_interval_ms: f64,
    /// Number of consecutive pairs checked
    pub total: usize,
    /// Pairs outside the tolerance
    pub issues: Vec<IntervalIssue>,
}

impl IntervalReport {
    /// Check if every pair matched the expected spacing.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of pairs outside the tolerance.
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }
}

/// Check the spacing of consecutive observations against `expected`.
///
/// Returns `None` when the series has fewer than two observations.
pub fn check_interval(series: &Series, expected: Interval) -> Option<IntervalReport> {
    if series.len() < 2 {
        return None;
    }

    let expected_ms = expected.as_millis();
    let issues: Vec<IntervalIssue> = series
        .observations()
        .windows(2)
        .filter_map(|pair| {
            let (prev, curr) = (&pair[0], &pair[1]);
            let actual_ms = (curr.timestamp - prev.timestamp).num_milliseconds() as f64;
            ((actual_ms - expected_ms).abs() > INTERVAL_TOLERANCE_MS).then(|| IntervalIssue {
                line1: prev.source_line,
                line2: curr.source_line,
                date1: prev.formatted(),
                date2: curr.formatted(),
                expected_sec: expected_ms / 1000.0,
                actual_sec: actual_ms / 1000.0,
            })
        })
        .collect();

    debug!(
        expected = %expected,
        pairs = series.len() - 1,
        issues = issues.len(),
        "interval check"
    );

    Some(IntervalReport {
        expected_interval_ms: expected_ms,
        total: series.len() - 1,
        issues,
    })
}
