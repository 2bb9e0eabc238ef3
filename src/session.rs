//! Explicit session state for an interactive front end.
//!
//! A [`Session`] bundles everything a UI keeps between user actions: the
//! current series, the downsample history, the last interval report, the
//! analysis window and the last published analysis result. Every operation
//! borrows the session and returns the next one, so the caller owns the only
//! copy of the state and can keep older sessions around for free undo.
//!
//! Operations requested with insufficient data (an empty history, no flagged
//! issues, an empty window) return an unchanged session rather than an error.

use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::{AnalysisConfig, AnalysisError, HarmonicAnalysisResult, analyze};
use crate::io::{
    DateFormat, LineWarning, ParseReport, SeriesFileError, export_series, parse_series,
    read_series_file,
};
use crate::series::{
    History, Interval, IntervalReport, Observation, Series, TimeSpan, Window, check_interval,
    downsample, interpolate_gaps,
};

/// Radius of the context view around an interpolated point.
pub const CONTEXT_RADIUS_HOURS: i64 = 2;

/// Errors surfaced to the user by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid date format. Please use dd/mm/yyyy hh:mm:ss format ({0})")]
    InvalidDateRange(String),

    #[error("harmonic analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    File(#[from] SeriesFileError),
}

/// Caller-owned pipeline and analysis state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    series: Series,
    history: History,
    report: Option<IntervalReport>,
    window: Window,
    result: Option<HarmonicAnalysisResult>,
    analysed_window: Option<Window>,
}

impl Session {
    /// Empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current series.
    pub fn series(&self) -> &Series {
        &self.series
    }

    /// Downsample history.
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Report of the last interval check, cleared once the series changes.
    pub fn interval_report(&self) -> Option<&IntervalReport> {
        self.report.as_ref()
    }

    /// Active analysis window.
    pub fn window(&self) -> Window {
        self.window
    }

    /// Last published analysis result (may be stale).
    pub fn result(&self) -> Option<&HarmonicAnalysisResult> {
        self.result.as_ref()
    }

    /// Window the last published result was computed over.
    pub fn analysed_window(&self) -> Option<Window> {
        self.analysed_window
    }

    /// Replace the series with parsed text.
    ///
    /// Resets the history, the interval report and the window. Lines that
    /// fail to parse are returned alongside the new session.
    pub fn load(&self, text: &str, format: DateFormat) -> (Session, Vec<LineWarning>) {
        self.loaded(parse_series(text, format))
    }

    /// Replace the series with the contents of a file.
    pub fn load_file(
        &self,
        path: &Path,
        format: DateFormat,
    ) -> Result<(Session, Vec<LineWarning>), SessionError> {
        Ok(self.loaded(read_series_file(path, format)?))
    }

    fn loaded(&self, report: ParseReport) -> (Session, Vec<LineWarning>) {
        info!(
            observations = report.parsed_count(),
            skipped = report.warnings.len(),
            "loaded series"
        );
        let session = Session {
            series: report.series,
            history: History::new(),
            report: None,
            window: Window::FULL,
            result: self.result.clone(),
            analysed_window: self.analysed_window,
        };
        (session, report.warnings)
    }

    /// Check the series spacing against `expected`.
    ///
    /// Unchanged if the series has fewer than two observations.
    pub fn check_interval(&self, expected: Interval) -> Session {
        match check_interval(&self.series, expected) {
            Some(report) => Session {
                report: Some(report),
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    /// Fill the gaps flagged by the last interval check and clear the report.
    pub fn interpolate(&self) -> Session {
        let Some(report) = &self.report else {
            return self.clone();
        };
        match interpolate_gaps(&self.series, report) {
            Some(series) => Session {
                series,
                report: None,
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    /// Downsample to `target`, keeping the current series for undo.
    pub fn downsample(&self, target: Interval) -> Session {
        if self.series.is_empty() {
            return self.clone();
        }
        let mut history = self.history.clone();
        history.push(self.series.clone());
        Session {
            series: downsample(&self.series, target),
            history,
            report: None,
            ..self.clone()
        }
    }

    /// Restore the series from before the last downsample.
    pub fn undo(&self) -> Session {
        let mut history = self.history.clone();
        match history.pop() {
            Some(series) => {
                debug!(remaining = history.len(), "undo downsample");
                Session {
                    series,
                    history,
                    report: None,
                    ..self.clone()
                }
            }
            None => self.clone(),
        }
    }

    /// Set the analysis window.
    pub fn with_window(&self, window: Window) -> Session {
        Session {
            window,
            ..self.clone()
        }
    }

    /// Set the window from two `dd/mm/yyyy hh:mm:ss` strings.
    pub fn with_date_range(&self, start: &str, end: &str) -> Result<Session, SessionError> {
        let parse = |text: &str| {
            DateFormat::DISPLAY
                .parse(text)
                .map_err(|e| SessionError::InvalidDateRange(format!("'{}': {}", text.trim(), e)))
        };
        let start = parse(start)?;
        let end = parse(end)?;
        Ok(self.with_window(Window::from_date_range(&self.series, start, end)))
    }

    /// Observations inside the active window.
    pub fn window_data(&self) -> &[Observation] {
        self.series.window(self.window)
    }

    /// First and last timestamps selected by the active window.
    ///
    /// Indices are clamped into the series, so a window that projects to
    /// nothing still reports its nearest observation.
    pub fn window_bounds(&self) -> Option<TimeSpan> {
        let last = self.series.len().checked_sub(1)?;
        let range = self.window.index_range(self.series.len());
        let start = self.series.get(range.start.min(last))?;
        let end = self.series.get(range.end.saturating_sub(1).min(last))?;
        Some(TimeSpan {
            start: start.timestamp,
            end: end.timestamp,
        })
    }

    /// Analyse the active window on the calling thread.
    ///
    /// An empty window leaves the session (and any stale result) unchanged.
    /// Other failures are returned and the session is left as it was.
    pub fn analyze(&self, config: &AnalysisConfig) -> Result<Session, SessionError> {
        match analyze(self.window_data(), config) {
            Ok(result) => Ok(self.with_result(result)),
            Err(AnalysisError::EmptyWindow) => {
                debug!("analysis skipped for empty window");
                Ok(self.clone())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Publish a result computed elsewhere over the active window.
    pub fn with_result(&self, result: HarmonicAnalysisResult) -> Session {
        Session {
            result: Some(result),
            analysed_window: Some(self.window),
            ..self.clone()
        }
    }

    /// Render the current series in the export text format.
    pub fn export(&self, pattern: &str) -> String {
        export_series(&self.series, pattern)
    }

    /// Interpolated observations with their positions in the series.
    pub fn interpolated_points(&self) -> Vec<(usize, &Observation)> {
        self.series.interpolated_points()
    }

    /// Observations within two hours of the `nth` interpolated point.
    pub fn interpolated_context(&self, nth: usize) -> &[Observation] {
        match self.series.interpolated_points().get(nth) {
            Some(&(index, _)) => self
                .series
                .context_around(index, Duration::hours(CONTEXT_RADIUS_HOURS)),
            None => &[],
        }
    }

    /// Timestamp of the `nth` interpolated point.
    pub fn interpolated_timestamp(&self, nth: usize) -> Option<NaiveDateTime> {
        self.series
            .interpolated_points()
            .get(nth)
            .map(|(_, o)| o.timestamp)
    }
}
