//! Sea-level observation text reader.
//!
//! Each non-blank line holds one observation: the date/time tokens followed by
//! the value, separated by whitespace.
//!
//! ```text
//! # Bergen, 10 minute samples
//! 2025/08/22 06:40 -0.26
//! 2025/08/22 06:50 -0.31
//! 2025/08/22 07:10 -0.40
//! ```
//!
//! Lines starting with `#` are comments. A line that cannot be parsed is
//! skipped and recorded as a [`LineWarning`]; it never aborts the batch.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use super::date_format::{DateFormat, DateParseError};
use crate::series::{Observation, Series};

/// Minimum whitespace-separated fields on a data line (date, time, value).
const MIN_FIELDS: usize = 3;

/// Why a single line was skipped.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LineError {
    #[error("expected at least 3 fields, found {found}")]
    TooFewFields { found: usize },

    #[error("invalid value '{0}'")]
    InvalidValue(String),

    #[error("invalid date: {0}")]
    Date(#[from] DateParseError),
}

/// A skipped input line.
#[derive(Clone, Debug, PartialEq)]
pub struct LineWarning {
    /// 1-based line number in the input text
    pub line: usize,
    /// Trimmed line content
    pub content: String,
    pub error: LineError,
}

/// Outcome of parsing a block of text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseReport {
    /// Parsed observations, sorted by timestamp
    pub series: Series,
    /// Lines that were skipped
    pub warnings: Vec<LineWarning>,
    /// Non-blank, non-comment lines seen
    pub total_lines: usize,
}

impl ParseReport {
    /// Number of lines that produced an observation.
    pub fn parsed_count(&self) -> usize {
        self.series.len()
    }

    /// Check if every data line parsed.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Error type for series file operations.
#[derive(Debug, Error)]
pub enum SeriesFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no observations could be parsed ({skipped} lines skipped)")]
    Empty { skipped: usize },
}

/// Parse one data line into an observation.
fn parse_line(line: &str, line_number: usize, format: DateFormat) -> Result<Observation, LineError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS {
        return Err(LineError::TooFewFields {
            found: fields.len(),
        });
    }

    let (value_field, date_fields) = fields
        .split_last()
        .ok_or(LineError::TooFewFields { found: 0 })?;
    let value: f64 = value_field
        .parse()
        .map_err(|_| LineError::InvalidValue(value_field.to_string()))?;
    if !value.is_finite() {
        return Err(LineError::InvalidValue(value_field.to_string()));
    }

    let timestamp = format.parse(&date_fields.join(" "))?;
    Ok(Observation::new(timestamp, value, line_number))
}

/// Parse raw multi-line text into a sorted series.
pub fn parse_series(text: &str, format: DateFormat) -> ParseReport {
    let mut observations = Vec::new();
    let mut warnings = Vec::new();
    let mut total_lines = 0;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        total_lines += 1;

        match parse_line(line, idx + 1, format) {
            Ok(obs) => observations.push(obs),
            Err(error) => {
                warn!(line = idx + 1, content = line, %error, "skipping line");
                warnings.push(LineWarning {
                    line: idx + 1,
                    content: line.to_string(),
                    error,
                });
            }
        }
    }

    let series = Series::new(observations);
    info!(
        format = %format,
        parsed = series.len(),
        skipped = warnings.len(),
        "parsed series"
    );

    ParseReport {
        series,
        warnings,
        total_lines,
    }
}

/// Read a sea-level observation file.
///
/// Fails with [`SeriesFileError::Empty`] if no line could be parsed.
pub fn read_series_file(path: &Path, format: DateFormat) -> Result<ParseReport, SeriesFileError> {
    let text = fs::read_to_string(path)?;
    let report = parse_series(&text, format);
    if report.series.is_empty() {
        return Err(SeriesFileError::Empty {
            skipped: report.warnings.len(),
        });
    }
    Ok(report)
}
