//! # tide-rs
//!
//! Tide gauge time-series normalization and tidal harmonic analysis.
//!
//! This crate provides:
//! - Parsing of raw `<date> <time> <value>` text in 12 date layouts
//! - Interval validation, linear gap filling and greedy downsampling with undo
//! - A 146-entry tidal constituent database with Rayleigh-criterion selection
//! - Astronomical arguments and nodal corrections
//! - Harmonic analysis (Simplified, Admiralty, T_TIDE, joint least squares)
//! - A cancelable background runner where the newest request wins
//! - An explicit [`Session`] value for interactive front ends

pub mod analysis;
pub mod io;
pub mod series;
pub mod session;

// Re-export main types for convenience
pub use analysis::{
    AnalysisConfig, AnalysisError, AnalysisHandle, AnalysisRunner, CancelToken,
    ConstituentResult, HarmonicAnalysisResult, HarmonicEstimator, Method, TimeBase, analyze,
    analyze_with_cancel, estimator_for,
};
pub use io::{
    DateFormat, DateParseError, LineWarning, ParseReport, SeriesFileError, export_series,
    parse_series, read_series_file, write_series_file,
};
pub use series::{
    History, Interval, IntervalIssue, IntervalReport, IntervalUnit, Observation, Series,
    TimeSpan, Window, check_interval, downsample, interpolate_gaps,
};
pub use session::{Session, SessionError};
