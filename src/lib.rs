//! Linting and compaction toolkit for Hunspell affix dictionaries.
//!
//! The centerpiece is the rules reducer: given an affix file whose `SFX`/`PFX`
//! blocks were written out naively (one narrow condition per observed case)
//! and a sample vocabulary, it induces the most general conditions that still
//! reproduce, word for word, the same inflections, and then proves it by
//! re-applying the rendered block.
//!
//! ```text
//! dictionary lines ──▶ AffixData::expand          (aff)
//!                           │
//!                           ▼
//!                 collect ─▶ group ─▶ generalize ─▶ format ─▶ verify   (reducer)
//! ```
//!
//! The library entry points live in `api.rs`:
//!
//! - [`reduce_flag`] compacts one flag.
//! - [`reduce_all`] compacts every flag in parallel.
//! - [`rewrite_affix_file`] splices reduced blocks back into the original text.

mod aff;
mod api;
mod error;
mod reducer;

pub use aff::{
    AffixBlock, AffixCondition, AffixData, AffixEntry, AffixSwitches, AppliedRule, DictionaryEntry, Production,
    parse_dictionary,
};
pub use api::{Reduction, ReduceOptions, reduce_all, reduce_flag, rewrite_affix_file};
pub use error::{AffixError, Derivation, Mismatch, ReduceError};
pub use reducer::{
    AddToken, Condition, Generalization, LineEntry, OperationKey, ReductionMetrics, RuleBlock, RuleInstance,
    StageTimings, collect, format, generalize, group, verify,
};

// --- Shared vocabulary ------------------------------------------------------

/// Which end of the word an affix rule is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

impl AffixKind {
    /// The directive used for this kind in an affix file.
    pub fn tag(self) -> &'static str {
        match self {
            AffixKind::Prefix => "PFX",
            AffixKind::Suffix => "SFX",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "PFX" => Some(AffixKind::Prefix),
            "SFX" => Some(AffixKind::Suffix),
            _ => None,
        }
    }

    /// Characters of `word` read outward from the anchor: last-to-first for
    /// suffixes, first-to-last for prefixes.
    pub(crate) fn anchored(self, word: &str) -> Vec<char> {
        match self {
            AffixKind::Prefix => word.chars().collect(),
            AffixKind::Suffix => word.chars().rev().collect(),
        }
    }

    /// Inverse of [`AffixKind::anchored`].
    pub(crate) fn unanchor(self, chars: &[char]) -> String {
        match self {
            AffixKind::Prefix => chars.iter().collect(),
            AffixKind::Suffix => chars.iter().rev().collect(),
        }
    }
}

impl std::fmt::Display for AffixKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// How flags are spelled in the affix and dictionary files (`FLAG` directive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagType {
    /// One character per flag (Hunspell's default).
    #[default]
    Short,
    /// Two characters per flag (`FLAG long`).
    Long,
    /// Comma-separated decimal numbers (`FLAG num`).
    Numeric,
    /// One Unicode scalar per flag (`FLAG UTF-8`).
    Utf8,
}

impl FlagType {
    pub fn from_directive(value: &str) -> Option<Self> {
        match value {
            "long" => Some(FlagType::Long),
            "num" => Some(FlagType::Numeric),
            "UTF-8" => Some(FlagType::Utf8),
            _ => None,
        }
    }

    /// Split a flag string (`"ʼ0Z0"`, `"12,7"`, `"AB"`) into individual flags.
    pub fn split(self, flags: &str) -> Result<Vec<Flag>, String> {
        match self {
            FlagType::Short | FlagType::Utf8 => Ok(flags.chars().map(|c| Flag(c.to_string())).collect()),
            FlagType::Long => {
                let chars: Vec<char> = flags.chars().collect();
                if chars.len() % 2 != 0 {
                    return Err(format!("long flags `{flags}` have an odd number of characters"));
                }
                Ok(chars.chunks(2).map(|pair| Flag(pair.iter().collect())).collect())
            }
            FlagType::Numeric => flags
                .split(',')
                .filter(|s| !s.is_empty())
                .map(|s| match s.parse::<u16>() {
                    Ok(_) => Ok(Flag(s.to_string())),
                    Err(_) => Err(format!("numeric flag `{s}` is not a number in 0..=65535")),
                })
                .collect(),
        }
    }
}

/// A single affix flag as written in the affix file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Flag(String);

impl Flag {
    pub fn new(flag: impl Into<String>) -> Self {
        Flag(flag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for Flag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
