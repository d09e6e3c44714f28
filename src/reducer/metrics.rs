//! Reduction metrics.
//!
//! Counts and per-stage timings for one flag, filled in by
//! [`reduce_flag`](crate::reduce_flag) and surfaced by the `affixlint` report.
//! They describe the run; nothing downstream depends on them.

use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReductionMetrics {
    /// Rule instances collected from the dictionary.
    pub instances: usize,
    /// Provisional entries after grouping identical literals.
    pub grouped: usize,
    /// Entries after generalization (multi-add entries count once).
    pub compacted: usize,
    /// Rule lines in the rendered block, header excluded.
    pub lines: usize,
    /// Set when generalization came out larger than the literal entries and
    /// the literal entries were kept instead.
    pub minimality_guard: bool,
    /// Nodes where the generalizer kept literal conditions.
    pub fallbacks: usize,
    pub timings: StageTimings,
}

/// Wall-clock time per pipeline stage.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StageTimings {
    pub expand: Duration,
    pub collect: Duration,
    pub group: Duration,
    pub generalize: Duration,
    pub format: Duration,
    /// Zero when verification was skipped.
    pub verify: Duration,
    pub total: Duration,
}

impl ReductionMetrics {
    /// Lines saved compared with one literal line per provisional entry.
    pub fn saved(&self) -> isize {
        self.grouped as isize - self.lines as isize
    }
}
