//! I/O utilities for reading and writing sea-level records.
//!
//! This module provides:
//! - **Date layouts**: the twelve supported date/time layouts and the export
//!   pattern formatter
//! - **Series text**: whitespace-separated `<date> <time> <value>` records
//! - **Export text**: tab-separated records with an `(interpolated)` marker
//!
//! # File Formats
//!
//! ## Observation Files
//!
//! ```text
//! # Bergen, 10 minute samples
//! 2025/08/22 06:40 -0.26
//! 2025/08/22 06:50 -0.31
//! ```
//!
//! ## Export Files
//!
//! ```text
//! 22/08/2025 06:50	-0.31
//! 22/08/2025 07:00	-0.355	(interpolated)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use tide_rs::io::{DateFormat, read_series_file, write_series_file};
//!
//! let report = read_series_file(Path::new("bergen.txt"), DateFormat::default())?;
//! for w in &report.warnings {
//!     eprintln!("line {}: {}", w.line, w.error);
//! }
//! write_series_file(Path::new("out.txt"), &report.series, "dd/mm/yyyy hh:mm")?;
//! ```

mod date_format;
mod export;
mod series_reader;

pub use date_format::{
    DateFormat, DateOrder, DateParseError, YearWidth, format_display, format_with_pattern,
};
pub use export::{INTERPOLATED_SUFFIX, export_series, write_series_file};
pub use series_reader::{
    LineError, LineWarning, ParseReport, SeriesFileError, parse_series, read_series_file,
};
