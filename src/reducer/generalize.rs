//! Condition induction.
//!
//! Operations sharing a strip are siblings: a word is only ever stripped once,
//! so their conditions must never overlap. Every other pair of operations is
//! independent. For each strip the generalizer therefore looks at all words
//! that end (or start) with it at once and walks outward from the anchor one
//! position at a time, like a trie:
//!
//! ```text
//! node: literal run `lit`, words W that start with it (anchor order)
//!   1. ops shared by every word in W        -> emit `lit`, drop them from W
//!   2. some word is exactly `lit` and still
//!      needs an op                           -> ambiguous: literal fallback
//!   3. split W by the character after `lit`
//!        one branch                          -> extend `lit`, recurse
//!        several branches                    -> one op set takes `lit[^others]`,
//!                                               every other branch recurses as
//!                                               `lit + c` (the class specialized)
//! ```
//!
//! Branches are disjoint by their character at the split position, and only
//! one op set per node receives the negated class, so sibling conditions can
//! never overlap. Words carrying the flag but none of the strip's operations
//! take part with an empty op set: they are the negative examples that keep a
//! class from swallowing them.
//!
//! The op set chosen for the class is the one owning the most branches (fewest
//! lines left for the others), then the most words, then the smallest set.

use super::{AddToken, Condition, LineEntry, OperationKey};
use crate::AffixKind;
use std::collections::{BTreeMap, BTreeSet};

/// Output of [`generalize`].
#[derive(Debug, Clone, Default)]
pub struct Generalization {
    pub entries: Vec<LineEntry>,
    /// Nodes where ambiguous source data forced literal conditions.
    pub fallbacks: usize,
}

type Ops<'a> = BTreeSet<&'a AddToken>;

/// A word under one strip, with the operations (adds) it still needs.
#[derive(Debug, Clone)]
struct Candidate<'a> {
    word: &'a str,
    anchored: Vec<char>,
    ops: Ops<'a>,
}

/// Induce the most general safe conditions for every operation.
///
/// `population` lists every dictionary word carrying the flag, whether or not
/// a rule fired on it. `fullstrip` mirrors the affix file switch of the same
/// name; `max_extension` caps how many characters past the strip a condition
/// may grow before the generalizer gives up and keeps the literal evidence.
pub fn generalize(
    grouped: &BTreeMap<OperationKey, Vec<LineEntry>>,
    kind: AffixKind,
    population: &[String],
    fullstrip: bool,
    max_extension: usize,
) -> Generalization {
    // strip -> word -> adds
    let mut by_strip: BTreeMap<&str, BTreeMap<&str, Ops>> = BTreeMap::new();
    // (strip, add, word) -> characters the original condition inspected
    let mut evidence: BTreeMap<(&str, &AddToken, &str), usize> = BTreeMap::new();
    for (key, entries) in grouped {
        for entry in entries {
            for source in &entry.sources {
                by_strip
                    .entry(key.strip.as_str())
                    .or_default()
                    .entry(source.as_str())
                    .or_default()
                    .insert(&key.add);
                let inspected = evidence.entry((key.strip.as_str(), &key.add, source.as_str())).or_default();
                *inspected = (*inspected).max(entry.condition.len());
            }
        }
    }

    let population: BTreeSet<&str> = population.iter().map(String::as_str).collect();
    let mut induction = Induction { kind, strip: "", max_extension, evidence: &evidence, out: Vec::new(), fallbacks: 0 };

    for (strip, words) in &by_strip {
        let strip_chars = kind.anchored(strip);
        let mut candidates: Vec<Candidate> = words
            .iter()
            .map(|(word, ops)| Candidate { word: *word, anchored: kind.anchored(word), ops: ops.clone() })
            .collect();

        for word in &population {
            if words.contains_key(word) {
                continue;
            }
            let anchored = kind.anchored(word);
            let reachable =
                anchored.len() > strip_chars.len() || (fullstrip && anchored.len() == strip_chars.len());
            if reachable && anchored.starts_with(&strip_chars) {
                candidates.push(Candidate { word: *word, anchored, ops: BTreeSet::new() });
            }
        }

        log::trace!(
            "strip `{strip}`: {} words, {} bystanders",
            words.len(),
            candidates.len() - words.len()
        );
        induction.strip = *strip;
        induction.descend(Condition::from_anchored(kind, &strip_chars), candidates);
    }

    let entries = merge_same_conditions(induction.out);
    log::debug!(
        "generalized {} provisional entries into {} ({} literal fallbacks)",
        grouped.values().map(Vec::len).sum::<usize>(),
        entries.len(),
        induction.fallbacks
    );
    Generalization { entries, fallbacks: induction.fallbacks }
}

/// The grouped literal entries, merged, without any generalization.
fn literal_entries(grouped: &BTreeMap<OperationKey, Vec<LineEntry>>) -> Vec<LineEntry> {
    merge_same_conditions(grouped.values().flatten().cloned().collect())
}

/// Keep `generalized` unless it renders more lines than the grouped literals,
/// in which case the literals are returned instead. The flag is `true` when
/// the literals won.
pub(crate) fn fewest_lines(
    grouped: &BTreeMap<OperationKey, Vec<LineEntry>>,
    generalized: Vec<LineEntry>,
) -> (Vec<LineEntry>, bool) {
    let literal: usize = grouped.values().map(Vec::len).sum();
    let rendered: usize = generalized.iter().map(|e| e.adds.len()).sum();
    if rendered > literal {
        log::debug!("generalized block needs {rendered} lines, keeping {literal} literal ones");
        return (literal_entries(grouped), true);
    }
    (generalized, false)
}

/// Merge entries that share strip and condition into multi-add entries,
/// keeping first-seen order.
fn merge_same_conditions(entries: Vec<LineEntry>) -> Vec<LineEntry> {
    let mut merged: Vec<LineEntry> = Vec::with_capacity(entries.len());
    let mut index: BTreeMap<(String, Condition), usize> = BTreeMap::new();
    for entry in entries {
        let key = (entry.strip.clone(), entry.condition.clone());
        match index.get(&key) {
            Some(&at) => merged[at].absorb(entry),
            None => {
                index.insert(key, merged.len());
                merged.push(entry);
            }
        }
    }
    merged
}

struct Induction<'a> {
    kind: AffixKind,
    strip: &'a str,
    max_extension: usize,
    evidence: &'a BTreeMap<(&'a str, &'a AddToken, &'a str), usize>,
    out: Vec<LineEntry>,
    fallbacks: usize,
}

impl<'a> Induction<'a> {
    fn descend(&mut self, condition: Condition, mut words: Vec<Candidate<'a>>) {
        if words.iter().all(|w| w.ops.is_empty()) {
            return;
        }

        // 1. Operations every word under this node takes.
        let mut universal = words[0].ops.clone();
        for w in &words[1..] {
            universal.retain(|op| w.ops.contains(op));
        }
        if !universal.is_empty() {
            for op in &universal {
                self.emit(op, condition.clone(), words.iter().map(|w| w.word));
            }
            for w in &mut words {
                w.ops.retain(|op| !universal.contains(op));
            }
            if words.iter().all(|w| w.ops.is_empty()) {
                return;
            }
        }

        let depth = condition.literal_chars().len();
        if depth - self.strip.chars().count() >= self.max_extension {
            log::warn!("strip `{}`: condition `{condition}` reached the extension cap", self.strip);
            self.fall_back(depth, &words);
            return;
        }

        // 2. A word equal to the literal run cannot be told apart from longer ones.
        let (exact, longer): (Vec<Candidate>, Vec<Candidate>) = words.into_iter().partition(|w| w.anchored.len() == depth);
        if exact.iter().any(|w| !w.ops.is_empty()) {
            log::warn!(
                "strip `{}`: `{}` needs its own rule but cannot be told apart from longer words; keeping literal conditions",
                self.strip,
                exact.iter().find(|w| !w.ops.is_empty()).map(|w| w.word).unwrap_or_default()
            );
            let all: Vec<Candidate> = exact.into_iter().chain(longer).collect();
            self.fall_back(depth, &all);
            return;
        }

        // 3. Split on the next character.
        let mut branches: BTreeMap<char, Vec<Candidate<'a>>> = BTreeMap::new();
        for w in longer {
            branches.entry(w.anchored[depth]).or_default().push(w);
        }

        if branches.len() == 1 {
            if let Some((c, branch)) = branches.into_iter().next() {
                self.descend(condition.push_literal(c), branch);
            }
            return;
        }

        let purity: BTreeMap<char, Option<Ops<'a>>> =
            branches.iter().map(|(c, branch)| (*c, pure_ops(branch))).collect();

        let Some(owner) = class_owner(&branches, &purity) else {
            for (c, branch) in branches {
                self.descend(condition.push_literal(c), branch);
            }
            return;
        };

        let excluded: BTreeSet<char> = purity
            .iter()
            .filter(|(_, ops)| !matches!(ops, Some(ops) if *ops == owner))
            .map(|(c, _)| *c)
            .collect();
        if excluded.is_empty() {
            // Every branch wants the same ops, but words equal to `condition`
            // must stay out, so no class can be used.
            for (c, branch) in branches {
                self.descend(condition.push_literal(c), branch);
            }
            return;
        }

        let general = condition.with_class(excluded.iter().copied());
        let owned: Vec<&str> = branches
            .iter()
            .filter(|(c, _)| !excluded.contains(c))
            .flat_map(|(_, branch)| branch.iter().map(|w| w.word))
            .collect();
        log::trace!("strip `{}`: {general} for {:?}", self.strip, owner);
        for op in &owner {
            self.emit(op, general.clone(), owned.iter().copied());
        }

        for (c, branch) in branches {
            if excluded.contains(&c) {
                self.descend(general.specialize_by(c), branch);
            }
        }
    }

    /// Give each remaining (word, op) a literal condition: the characters the
    /// original rule inspected, and never fewer than the run of this node.
    fn fall_back(&mut self, depth: usize, words: &[Candidate<'a>]) {
        self.fallbacks += 1;
        let evidence = self.evidence;
        for w in words {
            for op in &w.ops {
                let inspected = evidence.get(&(self.strip, *op, w.word)).copied().unwrap_or(0);
                let len = depth.max(inspected).min(w.anchored.len());
                self.emit(op, Condition::from_anchored(self.kind, &w.anchored[..len]), [w.word]);
            }
        }
    }

    fn emit<'w>(&mut self, op: &AddToken, condition: Condition, sources: impl IntoIterator<Item = &'w str>) {
        debug_assert_eq!(condition.kind(), self.kind);
        self.out.push(LineEntry::new(self.strip, op.clone(), condition).with_sources(sources));
    }
}

/// The op set shared by every word of a branch, if there is one.
fn pure_ops<'a>(branch: &[Candidate<'a>]) -> Option<Ops<'a>> {
    let first = &branch.first()?.ops;
    branch.iter().all(|w| &w.ops == first).then(|| first.clone())
}

/// Pick the non-empty op set that owns the most pure branches.
fn class_owner<'a>(
    branches: &BTreeMap<char, Vec<Candidate<'a>>>,
    purity: &BTreeMap<char, Option<Ops<'a>>>,
) -> Option<Ops<'a>> {
    let mut tally: BTreeMap<&Ops<'a>, (usize, usize)> = BTreeMap::new();
    for (c, ops) in purity {
        let Some(ops) = ops else { continue };
        if ops.is_empty() {
            continue;
        }
        let score = tally.entry(ops).or_default();
        score.0 += 1;
        score.1 += branches.get(c).map_or(0, Vec::len);
    }

    let mut best: Option<(&Ops<'a>, (usize, usize))> = None;
    for (ops, score) in tally {
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((ops, score));
        }
    }
    best.map(|(ops, _)| ops.clone())
}
