//! Conditions the reducer is allowed to emit.
//!
//! A `Condition` is a run of literal characters read outward from the anchor,
//! optionally closed by one negated class at the far end, or the bare `.`
//! wildcard. This is a strict subset of what Hunspell reads, chosen so that
//! two sibling conditions can be proven disjoint by comparing a single
//! position.
//!
//! ```text
//! suffix, anchored order [a, [^rx]]  ──render──▶  "[^rx]a"
//! prefix, anchored order [s, [^e]]   ──render──▶  "s[^e]"
//! ```
//!
//! Breaking the shape (an empty class, a second class, a class that is not
//! the outermost segment) is a programming error and panics.

use crate::AffixKind;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum ConditionSegment {
    Literal(char),
    /// Any single character. Only ever the sole segment, paired with an empty strip.
    Wildcard,
    NegatedClass(BTreeSet<char>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Condition {
    kind: AffixKind,
    /// Anchor-outward order.
    segments: Vec<ConditionSegment>,
}

impl Condition {
    pub fn wildcard(kind: AffixKind) -> Self {
        Condition { kind, segments: vec![ConditionSegment::Wildcard] }
    }

    /// A purely literal condition from text in natural reading order. Empty
    /// text becomes the wildcard.
    pub fn literal(kind: AffixKind, text: &str) -> Self {
        Self::from_anchored(kind, &kind.anchored(text))
    }

    /// A purely literal condition from anchor-ordered characters.
    pub(crate) fn from_anchored(kind: AffixKind, chars: &[char]) -> Self {
        if chars.is_empty() {
            return Self::wildcard(kind);
        }
        Condition { kind, segments: chars.iter().map(|&c| ConditionSegment::Literal(c)).collect() }
    }

    pub fn kind(&self) -> AffixKind {
        self.kind
    }

    pub fn is_wildcard(&self) -> bool {
        self.segments == [ConditionSegment::Wildcard]
    }

    pub fn has_class(&self) -> bool {
        matches!(self.segments.last(), Some(ConditionSegment::NegatedClass(_)))
    }

    /// Number of character positions inspected; `.` inspects none.
    pub fn len(&self) -> usize {
        if self.is_wildcard() { 0 } else { self.segments.len() }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The literal run, anchor-outward.
    pub fn literal_chars(&self) -> Vec<char> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                ConditionSegment::Literal(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// Generalize: close the literal run with a negated class excluding `excluded`.
    pub fn with_class(&self, excluded: impl IntoIterator<Item = char>) -> Self {
        let excluded: BTreeSet<char> = excluded.into_iter().collect();
        assert!(!excluded.is_empty(), "negated class must exclude at least one character");
        assert!(!self.has_class(), "condition already ends in a negated class");

        let mut segments: Vec<ConditionSegment> =
            self.segments.iter().filter(|s| **s != ConditionSegment::Wildcard).cloned().collect();
        segments.push(ConditionSegment::NegatedClass(excluded));
        Condition { kind: self.kind, segments }
    }

    /// Specialize: replace the outer negated class with one literal character.
    ///
    /// `c` must be one of the excluded characters, so the result is disjoint
    /// from `self` and strictly narrower than the literal run it extends.
    pub fn specialize_by(&self, c: char) -> Self {
        let Some(ConditionSegment::NegatedClass(excluded)) = self.segments.last() else {
            panic!("specialize_by needs a condition ending in a negated class");
        };
        assert!(excluded.contains(&c), "`{c}` is not excluded by the class, specializing would overlap");

        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut() {
            *last = ConditionSegment::Literal(c);
        }
        Condition { kind: self.kind, segments }
    }

    /// Extend the literal run by one character.
    pub(crate) fn push_literal(&self, c: char) -> Self {
        assert!(!self.has_class(), "cannot extend past a negated class");
        let mut chars = self.literal_chars();
        chars.push(c);
        Self::from_anchored(self.kind, &chars)
    }

    /// Match `word` at the condition's anchor.
    pub fn matches(&self, word: &str) -> bool {
        let chars = self.kind.anchored(word);
        if self.is_wildcard() {
            return !chars.is_empty();
        }
        if chars.len() < self.segments.len() {
            return false;
        }
        self.segments.iter().zip(&chars).all(|(segment, c)| match segment {
            ConditionSegment::Literal(expected) => expected == c,
            ConditionSegment::Wildcard => true,
            ConditionSegment::NegatedClass(excluded) => !excluded.contains(c),
        })
    }

    /// Hunspell text for the condition column.
    pub fn render(&self) -> String {
        let parts: Vec<String> = self
            .segments
            .iter()
            .map(|segment| match segment {
                ConditionSegment::Literal(c) => c.to_string(),
                ConditionSegment::Wildcard => ".".to_string(),
                ConditionSegment::NegatedClass(excluded) => format!("[^{}]", excluded.iter().collect::<String>()),
            })
            .collect();
        match self.kind {
            AffixKind::Prefix => parts.concat(),
            AffixKind::Suffix => parts.iter().rev().map(String::as_str).collect(),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_class_renders_on_the_left() {
        let cond = Condition::literal(AffixKind::Suffix, "a").with_class(['x', 'r']);
        assert_eq!(cond.render(), "[^rx]a");
        assert!(cond.matches("senŧa"));
        assert!(cond.matches("na"));
        assert!(!cond.matches("bara"));
        assert!(!cond.matches("a"));
        assert!(!cond.matches("ne"));
    }

    #[test]
    fn prefix_class_renders_on_the_right() {
        let cond = Condition::literal(AffixKind::Prefix, "s").with_class(['e']);
        assert_eq!(cond.render(), "s[^e]");
        assert!(cond.matches("sa"));
        assert!(!cond.matches("se"));
        assert!(!cond.matches("Sa"));
    }

    #[test]
    fn empty_literal_is_the_wildcard() {
        let cond = Condition::literal(AffixKind::Suffix, "");
        assert!(cond.is_wildcard());
        assert_eq!(cond.render(), ".");
        assert_eq!(cond.len(), 0);
        assert!(cond.matches("x"));
        assert!(!cond.matches(""));

        let classed = cond.with_class(['s']);
        assert_eq!(classed.render(), "[^s]");
        assert!(!classed.matches("casas"));
    }

    #[test]
    fn specializing_narrows_to_one_excluded_character() {
        let general = Condition::literal(AffixKind::Suffix, "a").with_class(['r', 'x']);
        let narrow = general.specialize_by('r');
        assert_eq!(narrow.render(), "ra");
        assert!(narrow.matches("bara"));
        assert!(!general.matches("bara"));
        assert_eq!(narrow.push_literal('a').render(), "ara");
    }

    #[test]
    #[should_panic(expected = "at least one character")]
    fn empty_class_is_a_contract_violation() {
        Condition::literal(AffixKind::Suffix, "a").with_class(std::iter::empty::<char>());
    }

    #[test]
    #[should_panic(expected = "already ends in a negated class")]
    fn second_class_is_a_contract_violation() {
        Condition::literal(AffixKind::Suffix, "a").with_class(['r']).with_class(['x']);
    }

    #[test]
    #[should_panic(expected = "would overlap")]
    fn specializing_outside_the_class_is_a_contract_violation() {
        Condition::literal(AffixKind::Suffix, "a").with_class(['r']).specialize_by('n');
    }
}
