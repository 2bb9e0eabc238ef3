//! Greedy downsampling with an undo history.

use tracing::info;

use super::validate::INTERVAL_TOLERANCE_MS;
use super::{Interval, Series};

/// Thin a series to roughly `target` spacing.
///
/// The first observation is always kept; each later observation is kept
/// when it is at least `target - 1 s` after the last kept one. Single pass.
pub fn downsample(series: &Series, target: Interval) -> Series {
    let obs = series.observations();
    let Some(first) = obs.first() else {
        return Series::default();
    };

    let threshold_ms = target.as_millis() - INTERVAL_TOLERANCE_MS;
    let mut kept = vec![first.clone()];
    let mut last = first.timestamp;

    for o in &obs[1..] {
        if (o.timestamp - last).num_milliseconds() as f64 >= threshold_ms {
            kept.push(o.clone());
            last = o.timestamp;
        }
    }

    info!(
        target = %target,
        before = obs.len(),
        after = kept.len(),
        "downsampled series"
    );
    Series::from_sorted(kept)
}

/// Stack of series snapshots taken before each downsample.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct History {
    snapshots: Vec<Series>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a snapshot.
    pub fn push(&mut self, series: Series) {
        self.snapshots.push(series);
    }

    /// Pop the most recent snapshot.
    pub fn pop(&mut self) -> Option<Series> {
        self.snapshots.pop()
    }

    /// Most recent snapshot without removing it.
    pub fn peek(&self) -> Option<&Series> {
        self.snapshots.last()
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
