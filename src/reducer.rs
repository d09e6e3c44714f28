//! Affix-rule compaction.
//!
//! The reducer turns the observed behavior of one flag into the smallest set
//! of `SFX`/`PFX` lines that reproduces it exactly. It is a pipeline of pure
//! stages, each handing ownership of its output to the next:
//!
//! ```text
//! Productions ──collect──▶ RuleInstance*            one per (word, application)
//!             ──group────▶ (strip, add) → LineEntry*  identical literals folded
//!             ──generalize▶ LineEntry*               most general safe conditions
//!             ──format───▶ Vec<String>               header + one line per add
//!             ──verify───▶ ()                        re-parse, re-apply, compare
//! ```
//!
//! ## Invariants
//!
//! - Two entries of one block sharing a strip never match the same word. The
//!   generalizer guarantees it by construction for data the original rules
//!   could have produced; the verifier catches any observable violation.
//! - Re-applying the rendered block to every dictionary word carrying the flag
//!   yields exactly the derivations the original rules produced.
//!
//! ## Responsibilities by module
//!
//! - `condition.rs`: the restricted condition language the reducer emits.
//! - `collect.rs`: `Production` → `RuleInstance`.
//! - `group.rs`: partition by operation, fold identical literals.
//! - `generalize.rs`: condition induction over sibling operations.
//! - `format.rs`: deterministic ordering and Hunspell rendering.
//! - `verify.rs`: round-trip check against the original rules.
//! - `metrics.rs`: per-stage counts and timings.

#[path = "reducer/collect.rs"]
mod collect;
#[path = "reducer/condition.rs"]
mod condition;
#[path = "reducer/format.rs"]
mod format;
#[path = "reducer/generalize.rs"]
mod generalize;
#[path = "reducer/group.rs"]
mod group;
#[path = "reducer/metrics.rs"]
mod metrics;
#[path = "reducer/verify.rs"]
mod verify;

#[cfg(test)]
#[path = "reducer/tests.rs"]
mod tests;

pub use collect::collect;
pub use condition::Condition;
pub use format::format;
pub use generalize::{Generalization, generalize};
pub(crate) use generalize::fewest_lines;
pub use group::{OperationKey, group};
pub use metrics::{ReductionMetrics, StageTimings};
pub use verify::verify;

use crate::{AffixKind, Flag};
use std::collections::BTreeSet;

/// One observed application of a rule to one dictionary word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleInstance {
    pub kind: AffixKind,
    pub strip: String,
    /// Opaque add token, continuation flags included (`h/Z0`).
    pub add: String,
    /// Morphological fields of the rule (`po:noun is:pl`).
    pub morph: Vec<String>,
    /// The part of `source` the original condition inspected, in reading order.
    pub matched: String,
    pub source: String,
    pub derived: String,
}

/// What an operation appends: the add token and the morphological fields
/// written after the condition. Two rules differing only in morphology are
/// different operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddToken {
    pub add: String,
    pub morph: Vec<String>,
}

impl AddToken {
    pub fn new(add: impl Into<String>, morph: Vec<String>) -> Self {
        AddToken { add: add.into(), morph }
    }
}

impl From<&str> for AddToken {
    fn from(add: &str) -> Self {
        AddToken::new(add, Vec::new())
    }
}

/// One (pre-expansion) rule line: a strip, one or more adds sharing a
/// condition, and the words that justify it.
#[derive(Debug, Clone)]
pub struct LineEntry {
    pub strip: String,
    pub adds: BTreeSet<AddToken>,
    pub condition: Condition,
    pub sources: BTreeSet<String>,
}

impl LineEntry {
    pub fn new(strip: impl Into<String>, add: impl Into<AddToken>, condition: Condition) -> Self {
        LineEntry { strip: strip.into(), adds: BTreeSet::from([add.into()]), condition, sources: BTreeSet::new() }
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources.extend(sources.into_iter().map(Into::into));
        self
    }

    /// Fold `other` into `self`. Both must share strip and condition.
    pub(crate) fn absorb(&mut self, other: LineEntry) {
        debug_assert_eq!(self.strip, other.strip);
        debug_assert_eq!(self.condition, other.condition);
        self.adds.extend(other.adds);
        self.sources.extend(other.sources);
    }
}

/// Equality ignores `sources`, which are informational.
impl PartialEq for LineEntry {
    fn eq(&self, other: &Self) -> bool {
        self.strip == other.strip && self.adds == other.adds && self.condition == other.condition
    }
}

impl Eq for LineEntry {}

/// The final artifact for one flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBlock {
    pub flag: Flag,
    pub kind: AffixKind,
    pub combinable: bool,
    pub entries: Vec<LineEntry>,
}

impl RuleBlock {
    /// Header plus one line per add, in Hunspell column order.
    pub fn lines(&self) -> Vec<String> {
        format(self.flag.as_str(), self.kind, self.combinable, &self.entries)
    }
}
