//! Observed sea-level series and the normalization pipeline.
//!
//! A [`Series`] is an ordered run of [`Observation`]s. Every pipeline stage
//! takes a series by reference and returns a new one:
//!
//! ```text
//! raw text ─▶ parse ─▶ Series ─┬─▶ check_interval ─▶ IntervalReport ─▶ interpolate_gaps ─▶ Series
//!                              └─▶ downsample (snapshot pushed to History) ─▶ Series
//! ```
//!
//! A [`Window`] selects a percentage range of a series for charting and
//! harmonic analysis.
//!
//! # Example
//!
//! ```ignore
//! use tide_rs::io::{DateFormat, parse_series};
//! use tide_rs::series::{Interval, check_interval, interpolate_gaps};
//!
//! let parsed = parse_series(text, DateFormat::default());
//! let report = check_interval(&parsed.series, Interval::minutes(10.0)).unwrap();
//! let filled = interpolate_gaps(&parsed.series, &report).unwrap_or(parsed.series);
//! ```

mod downsample;
mod interpolate;
mod validate;

pub use downsample::{History, downsample};
pub use interpolate::interpolate_gaps;
pub use validate::{INTERVAL_TOLERANCE_MS, IntervalIssue, IntervalReport, check_interval};

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};

use crate::io::format_display;

/// A single sea-level observation.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    /// Observation time (second resolution)
    pub timestamp: NaiveDateTime,
    /// Sea level
    pub value: f64,
    /// Line of the input text this observation came from.
    ///
    /// Gap-filled points carry `previous line + 0.5`.
    pub source_line: f64,
    /// Set only for points synthesized by the gap interpolator
    pub interpolated: bool,
}

impl Observation {
    /// Create an observed (not interpolated) point.
    pub fn new(timestamp: NaiveDateTime, value: f64, source_line: usize) -> Self {
        Self {
            timestamp,
            value,
            source_line: source_line as f64,
            interpolated: false,
        }
    }

    /// Timestamp in the `dd/mm/yyyy hh:mm:ss` diagnostic layout.
    pub fn formatted(&self) -> String {
        format_display(&self.timestamp)
    }
}

/// First/last timestamps of a run of observations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeSpan {
    /// Span covered by a slice of observations, or `None` if it is empty.
    pub fn of(observations: &[Observation]) -> Option<Self> {
        Some(Self {
            start: observations.first()?.timestamp,
            end: observations.last()?.timestamp,
        })
    }

    /// Length of the span in (fractional) days.
    pub fn days(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / 86_400_000.0
    }
}

/// Sea-level series, sorted ascending by timestamp (ties allowed).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Series {
    observations: Vec<Observation>,
}

impl Series {
    /// Create a series, sorting the observations by timestamp.
    ///
    /// The sort is stable, so observations sharing a timestamp keep their
    /// input order.
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.timestamp);
        Self { observations }
    }

    /// Wrap observations that are already in time order.
    pub(crate) fn from_sorted(observations: Vec<Observation>) -> Self {
        debug_assert!(
            observations
                .windows(2)
                .all(|w| w[0].timestamp <= w[1].timestamp)
        );
        Self { observations }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Access the observations.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Iterate over the observations.
    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    /// Observation at `index`.
    pub fn get(&self, index: usize) -> Option<&Observation> {
        self.observations.get(index)
    }

    /// Time span of the whole series.
    pub fn time_span(&self) -> Option<TimeSpan> {
        TimeSpan::of(&self.observations)
    }

    /// Arithmetic mean of the values (0 for an empty series).
    pub fn mean(&self) -> f64 {
        if self.observations.is_empty() {
            return 0.0;
        }
        self.observations.iter().map(|o| o.value).sum::<f64>() / self.observations.len() as f64
    }

    /// Number of gap-filled observations.
    pub fn interpolated_count(&self) -> usize {
        self.observations.iter().filter(|o| o.interpolated).count()
    }

    /// Interpolated observations with their positions in the series.
    pub fn interpolated_points(&self) -> Vec<(usize, &Observation)> {
        self.observations
            .iter()
            .enumerate()
            .filter(|(_, o)| o.interpolated)
            .collect()
    }

    /// Observations within `radius` of the observation at `index`.
    ///
    /// Returns an empty slice if `index` is out of range.
    pub fn context_around(&self, index: usize, radius: Duration) -> &[Observation] {
        let Some(center) = self.observations.get(index) else {
            return &[];
        };
        let lo = center.timestamp - radius;
        let hi = center.timestamp + radius;
        let start = self.observations.partition_point(|o| o.timestamp < lo);
        let end = self.observations.partition_point(|o| o.timestamp <= hi);
        &self.observations[start..end]
    }

    /// Project the series through a percentage window.
    pub fn window(&self, window: Window) -> &[Observation] {
        &self.observations[window.index_range(self.observations.len())]
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

/// Unit of a sampling interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntervalUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl IntervalUnit {
    fn millis(self) -> f64 {
        match self {
            IntervalUnit::Seconds => 1_000.0,
            IntervalUnit::Minutes => 60_000.0,
            IntervalUnit::Hours => 3_600_000.0,
            IntervalUnit::Days => 86_400_000.0,
        }
    }
}

impl FromStr for IntervalUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s" | "sec" | "second" | "seconds" => Ok(IntervalUnit::Seconds),
            "m" | "min" | "minute" | "minutes" => Ok(IntervalUnit::Minutes),
            "h" | "hour" | "hours" => Ok(IntervalUnit::Hours),
            "d" | "day" | "days" => Ok(IntervalUnit::Days),
            other => Err(format!("unknown interval unit '{}'", other)),
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntervalUnit::Seconds => "seconds",
            IntervalUnit::Minutes => "minutes",
            IntervalUnit::Hours => "hours",
            IntervalUnit::Days => "days",
        };
        f.write_str(name)
    }
}

/// A sampling interval (amount + unit).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    pub amount: f64,
    pub unit: IntervalUnit,
}

impl Interval {
    pub fn new(amount: f64, unit: IntervalUnit) -> Self {
        Self { amount, unit }
    }

    pub fn seconds(amount: f64) -> Self {
        Self::new(amount, IntervalUnit::Seconds)
    }

    pub fn minutes(amount: f64) -> Self {
        Self::new(amount, IntervalUnit::Minutes)
    }

    pub fn hours(amount: f64) -> Self {
        Self::new(amount, IntervalUnit::Hours)
    }

    pub fn days(amount: f64) -> Self {
        Self::new(amount, IntervalUnit::Days)
    }

    /// Interval length in milliseconds.
    pub fn as_millis(&self) -> f64 {
        self.amount * self.unit.millis()
    }

    /// Interval length in hours.
    pub fn as_hours(&self) -> f64 {
        self.as_millis() / 3_600_000.0
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.unit)
    }
}

/// Percentage range `[start, end]` over a series.
///
/// The projection over `n` observations is
/// `floor(start/100 * n) .. ceil(end/100 * n)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    start_pct: f64,
    end_pct: f64,
}

impl Default for Window {
    fn default() -> Self {
        Self::FULL
    }
}

impl Window {
    /// The whole series.
    pub const FULL: Window = Window {
        start_pct: 0.0,
        end_pct: 100.0,
    };

    /// Create a window, clamping both bounds to `[0, 100]`.
    pub fn new(start_pct: f64, end_pct: f64) -> Self {
        let clamp = |p: f64| if p.is_nan() { 0.0 } else { p.clamp(0.0, 100.0) };
        Self {
            start_pct: clamp(start_pct),
            end_pct: clamp(end_pct),
        }
    }

    /// Window between two timestamps.
    ///
    /// Starts at the first observation at or after `start` and ends before
    /// the first observation after `end`. A `start` after every observation
    /// gives an empty window.
    pub fn from_date_range(series: &Series, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let n = series.len();
        if n == 0 {
            return Self::FULL;
        }
        let obs = series.observations();
        let pct = |idx: usize| idx as f64 / n as f64 * 100.0;

        let start_pct = obs
            .iter()
            .position(|o| o.timestamp >= start)
            .map_or(100.0, pct);
        let end_pct = obs
            .iter()
            .position(|o| o.timestamp > end)
            .map_or(100.0, pct);

        Self::new(start_pct, end_pct)
    }

    pub fn start_pct(&self) -> f64 {
        self.start_pct
    }

    pub fn end_pct(&self) -> f64 {
        self.end_pct
    }

    /// Check if this is the full range.
    pub fn is_full(&self) -> bool {
        self.start_pct <= 0.0 && self.end_pct >= 100.0
    }

    /// Index range selected from a series of `len` observations.
    pub fn index_range(&self, len: usize) -> Range<usize> {
        // Snap values within rounding noise of an integer before floor/ceil
        let scale = |pct: f64| {
            let x = pct / 100.0 * len as f64;
            let r = x.round();
            if (x - r).abs() < 1e-9 { r } else { x }
        };
        let start = scale(self.start_pct).floor() as usize;
        let end = scale(self.end_pct).ceil() as usize;
        let end = end.min(len);
        let start = start.min(end);
        start..end
    }
}
