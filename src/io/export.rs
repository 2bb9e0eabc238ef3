//! Tab-separated export of a series.
//!
//! ```text
//! 2025/08/22 06:50	-0.31
//! 2025/08/22 07:00	-0.355	(interpolated)
//! 2025/08/22 07:10	-0.4
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::info;

use super::date_format::format_with_pattern;
use super::series_reader::SeriesFileError;
use crate::series::Series;

/// Marker appended to synthesized observations.
pub const INTERPOLATED_SUFFIX: &str = "\t(interpolated)";

/// Render a series as export text, one observation per line.
///
/// Dates are formatted with `pattern` (see [`format_with_pattern`]).
pub fn export_series(series: &Series, pattern: &str) -> String {
    let mut out = String::with_capacity(series.len() * (pattern.len() + 24));
    for obs in series {
        // Writing to a String cannot fail
        let _ = write!(
            out,
            "{}\t{}",
            format_with_pattern(&obs.timestamp, pattern),
            obs.value
        );
        if obs.interpolated {
            out.push_str(INTERPOLATED_SUFFIX);
        }
        out.push('\n');
    }
    out
}

/// Write a series to a file in the export text format.
pub fn write_series_file(path: &Path, series: &Series, pattern: &str) -> Result<(), SeriesFileError> {
    fs::write(path, export_series(series, pattern))?;
    info!(path = %path.display(), count = series.len(), "wrote series");
    Ok(())
}
