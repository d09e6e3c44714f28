//! Affix/dictionary engine.
//!
//! A compact Hunspell engine covering the subset the reducer needs: `FLAG`
//! spelling, `FULLSTRIP`, `COMPLEXPREFIXES`, `SFX`/`PFX` blocks with
//! continuation flags, and dictionary lines. It turns a dictionary entry into
//! `Production`s (derived word plus the chain of rules that produced it) and is
//! re-invoked on freshly rendered blocks by the round-trip verifier.
//!
//! - `condition.rs`: the full textual condition syntax.
//! - `parse.rs`: affix file reading (`AffixData::parse`, `parse_fragment`).
//! - `dictionary.rs`: `.dic` lines.
//! - `expand.rs`: rule application and full word expansion.

#[path = "aff/condition.rs"]
mod condition;
#[path = "aff/dictionary.rs"]
mod dictionary;
#[path = "aff/expand.rs"]
mod expand;
#[path = "aff/parse.rs"]
mod parse;

pub use condition::AffixCondition;
pub use dictionary::{DictionaryEntry, parse_dictionary};

use crate::{AffixKind, Flag, FlagType};
use std::collections::BTreeMap;

macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}
pub(crate) use regex;

bitflags::bitflags! {
    /// File-wide switches that change how entries apply.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AffixSwitches: u8 {
        /// Allow an entry to strip the whole word.
        const FULLSTRIP        = 1 << 0;
        /// Chain two prefixes instead of two suffixes.
        const COMPLEX_PREFIXES = 1 << 1;
    }
}

/// One `SFX`/`PFX` entry line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffixEntry {
    pub strip: String,
    pub append: String,
    /// Flags glued to the add column (`h/Z0`), applied to the derived word.
    pub continuation: Vec<Flag>,
    /// `continuation` exactly as spelled in the file.
    pub continuation_text: String,
    pub condition: AffixCondition,
    pub morph: Vec<String>,
}

impl AffixEntry {
    /// The add column as an opaque token: `append[/continuation]`.
    pub fn add_token(&self) -> String {
        add_token(&self.append, &self.continuation_text)
    }

    /// Apply the entry to `word`, or `None` if it does not fire.
    pub fn apply(&self, word: &str, kind: AffixKind, fullstrip: bool) -> Option<String> {
        let word_len = word.chars().count();
        let strip_len = self.strip.chars().count();
        if word_len < strip_len || (word_len == strip_len && !fullstrip) {
            return None;
        }
        if !self.condition.matches(word, kind) {
            return None;
        }
        match kind {
            AffixKind::Suffix => {
                let stem = word.strip_suffix(self.strip.as_str())?;
                Some(format!("{stem}{}", self.append))
            }
            AffixKind::Prefix => {
                let stem = word.strip_prefix(self.strip.as_str())?;
                Some(format!("{}{stem}", self.append))
            }
        }
    }
}

pub(crate) fn add_token(append: &str, continuation: &str) -> String {
    if continuation.is_empty() {
        append.to_string()
    } else if append.is_empty() {
        format!("0/{continuation}")
    } else {
        format!("{append}/{continuation}")
    }
}

/// All entries sharing one flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffixBlock {
    pub flag: Flag,
    pub kind: AffixKind,
    /// Cross-product column (`Y`): may combine with affixes of the other kind.
    pub combinable: bool,
    pub entries: Vec<AffixEntry>,
}

/// A parsed affix file.
#[derive(Debug, Clone, Default)]
pub struct AffixData {
    flag_type: FlagType,
    switches: AffixSwitches,
    blocks: BTreeMap<Flag, AffixBlock>,
}

impl AffixData {
    pub fn flag_type(&self) -> FlagType {
        self.flag_type
    }

    pub fn switches(&self) -> AffixSwitches {
        self.switches
    }

    pub fn block(&self, flag: &str) -> Option<&AffixBlock> {
        self.blocks.get(flag)
    }

    /// Blocks in flag order.
    pub fn blocks(&self) -> impl Iterator<Item = &AffixBlock> {
        self.blocks.values()
    }
}

/// The rule behind one step of a `Production`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRule {
    pub flag: Flag,
    pub kind: AffixKind,
    pub strip: String,
    pub append: String,
    pub continuation: Vec<Flag>,
    pub continuation_text: String,
    /// Character positions inspected by the entry's condition.
    pub condition_len: usize,
    /// Morphological fields written after the entry's condition.
    pub morph: Vec<String>,
}

impl AppliedRule {
    pub fn add(&self) -> String {
        add_token(&self.append, &self.continuation_text)
    }
}

/// One generated word form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub word: String,
    /// The dictionary word this form was generated from.
    pub base: String,
    /// Rules applied to `base`, innermost first. Empty for the bare word.
    pub applied: Vec<AppliedRule>,
    pub morph: Vec<String>,
}
