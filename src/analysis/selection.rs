//! Rayleigh-criterion constituent selection.
//!
//! Two constituents can be separated only if their frequencies differ by at
//! least
//!
//! ```text
//! minres = rayleigh / (dt · n)      [cycles per hour]
//! ```
//!
//! where `dt · n` is the record length in hours. Each database constituent is
//! tested against its comparison constituent; the mean level `Z0` is never
//! selected.

use tracing::debug;

use super::constituents::{Constituent, MEAN_LEVEL, database, lookup};

/// Default Rayleigh factor.
pub const DEFAULT_RAYLEIGH: f64 = 1.0;

/// Minimum resolvable frequency separation in cycles per hour.
///
/// Infinite when the record has no length.
pub fn min_resolution(rayleigh: f64, dt_hours: f64, count: usize) -> f64 {
    let length = dt_hours * count as f64;
    if length > 0.0 {
        rayleigh / length
    } else {
        f64::INFINITY
    }
}

/// Check whether a constituent is resolvable from its comparison constituent.
///
/// A constituent with no comparison, a comparison of `Z0` or a comparison
/// missing from the database is always resolvable.
pub fn is_resolvable(constituent: &Constituent, min_resolution: f64) -> bool {
    match constituent.comparison {
        None | Some(MEAN_LEVEL) => true,
        Some(name) => match lookup(name) {
            Some(other) => (constituent.frequency - other.frequency).abs() >= min_resolution,
            None => true,
        },
    }
}

/// Outcome of a selection pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    /// Selected constituents in database order
    pub constituents: Vec<&'static Constituent>,
    pub rayleigh: f64,
    /// Minimum resolvable separation (cph)
    pub min_resolution: f64,
    /// Candidates considered (database size without `Z0`)
    pub total_count: usize,
}

impl Selection {
    pub fn selected_count(&self) -> usize {
        self.constituents.len()
    }

    /// Candidates rejected by the Rayleigh test.
    pub fn excluded_count(&self) -> usize {
        self.total_count - self.constituents.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constituents.iter().any(|c| c.name == name)
    }
}

/// Select the resolvable subset of the database for a record of `count`
/// samples spaced `dt_hours` apart.
pub fn select_constituents(rayleigh: f64, dt_hours: f64, count: usize) -> Selection {
    let minres = min_resolution(rayleigh, dt_hours, count);
    let candidates = database().iter().filter(|c| c.name != MEAN_LEVEL);
    let total_count = candidates.clone().count();
    let constituents: Vec<_> = candidates.filter(|c| is_resolvable(c, minres)).collect();

    debug!(
        rayleigh,
        dt_hours,
        count,
        minres,
        selected = constituents.len(),
        total = total_count,
        "rayleigh selection"
    );

    Selection {
        constituents,
        rayleigh,
        min_resolution: minres,
        total_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_resolution() {
        let minres = min_resolution(1.0, 1.0 / 6.0, 4320);
        assert!((minres - 1.0 / 720.0).abs() < 1e-15);
        assert!(min_resolution(1.0, 1.0, 0).is_infinite());
    }

    #[test]
    fn test_mean_level_is_never_selected() {
        let sel = select_constituents(1.0, 1.0, 100_000);
        assert!(!sel.contains(MEAN_LEVEL));
        assert_eq!(sel.total_count, 145);
        // A very long record resolves everything
        assert_eq!(sel.selected_count(), 145);
    }

    #[test]
    fn test_short_record_keeps_only_unconditional() {
        let sel = select_constituents(1.0, 1.0, 1);
        for c in &sel.constituents {
            assert!(
                c.comparison.is_none() || c.comparison == Some(MEAN_LEVEL),
                "{} should not pass with a one-hour record",
                c.name
            );
        }
        assert!(sel.contains("M2"));
        assert!(sel.contains("K1"));
        assert!(!sel.contains("S2"));
    }

    #[test]
    fn test_m2_s2_need_about_fifteen_days() {
        // |f(S2) - f(M2)| ≈ 0.002822 cph: 1 / 0.002822 ≈ 354.4 h
        let short = select_constituents(1.0, 1.0, 350);
        let long = select_constituents(1.0, 1.0, 360);
        assert!(!short.contains("S2"));
        assert!(long.contains("S2"));
    }

    #[test]
    fn test_longer_record_never_excludes_more() {
        let mut previous = usize::MAX;
        let mut previous_minres = f64::INFINITY;
        for days in [1, 2, 5, 10, 15, 30, 60, 183, 365] {
            let sel = select_constituents(DEFAULT_RAYLEIGH, 1.0 / 6.0, days * 144);
            assert!(sel.min_resolution <= previous_minres);
            assert!(
                sel.excluded_count() <= previous,
                "{} days excluded {} (previous {})",
                days,
                sel.excluded_count(),
                previous
            );
            previous = sel.excluded_count();
            previous_minres = sel.min_resolution;
        }
    }
}
