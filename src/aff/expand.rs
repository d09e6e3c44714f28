//! Rule application.
//!
//! ```text
//! entry ──┬─ bare word
//!         ├─ suffixes ──┬─ twofold suffixes (continuation flags)
//!         │             └─ × prefixes (both blocks combinable)
//!         └─ prefixes ──── twofold prefixes (COMPLEXPREFIXES only)
//! ```

use super::{AffixBlock, AffixData, AffixSwitches, AppliedRule, DictionaryEntry, Production};
use crate::AffixKind;

impl AffixData {
    /// Apply one flag to a dictionary entry, one step only.
    ///
    /// Returns nothing when the entry does not carry `flag` or the flag has no
    /// block.
    pub fn apply_flag(&self, entry: &DictionaryEntry, flag: &str) -> Vec<Production> {
        if !entry.has_flag(flag) {
            return Vec::new();
        }
        match self.block(flag) {
            Some(block) => self.apply_block(block, &bare(entry)),
            None => Vec::new(),
        }
    }

    /// Every word form the entry generates, the bare word first.
    pub fn expand(&self, entry: &DictionaryEntry) -> Vec<Production> {
        let root = bare(entry);
        let blocks: Vec<&AffixBlock> = entry.flags.iter().filter_map(|f| self.block(f.as_str())).collect();
        let complex_prefixes = self.switches.contains(AffixSwitches::COMPLEX_PREFIXES);

        let mut suffixed = Vec::new();
        let mut prefixed = Vec::new();
        for block in &blocks {
            let produced = self.apply_block(block, &root);
            match block.kind {
                AffixKind::Suffix => suffixed.extend(produced),
                AffixKind::Prefix => prefixed.extend(produced),
            }
        }

        // Twofold affixes hang off the continuation flags of the first step.
        let (chained_kind, first_step) =
            if complex_prefixes { (AffixKind::Prefix, &prefixed) } else { (AffixKind::Suffix, &suffixed) };
        let mut twofold = Vec::new();
        for production in first_step {
            let Some(last) = production.applied.last() else { continue };
            for flag in &last.continuation {
                if let Some(block) = self.block(flag.as_str()).filter(|b| b.kind == chained_kind) {
                    twofold.extend(self.apply_block(block, production));
                }
            }
        }

        let mut crossed = Vec::new();
        for prefix_block in blocks.iter().filter(|b| b.kind == AffixKind::Prefix && b.combinable) {
            for production in &suffixed {
                let suffix_combinable = production
                    .applied
                    .first()
                    .and_then(|rule| self.block(rule.flag.as_str()))
                    .is_some_and(|b| b.combinable);
                if suffix_combinable {
                    crossed.extend(self.apply_block(prefix_block, production));
                }
            }
        }

        log::trace!(
            "expanded {}: {} suffixed, {} prefixed, {} twofold, {} crossed",
            entry.word,
            suffixed.len(),
            prefixed.len(),
            twofold.len(),
            crossed.len()
        );

        let mut out = Vec::with_capacity(1 + suffixed.len() + prefixed.len() + twofold.len() + crossed.len());
        out.push(root);
        out.extend(suffixed);
        out.extend(prefixed);
        out.extend(twofold);
        out.extend(crossed);
        out
    }

    fn apply_block(&self, block: &AffixBlock, from: &Production) -> Vec<Production> {
        let fullstrip = self.switches.contains(AffixSwitches::FULLSTRIP);
        block
            .entries
            .iter()
            .filter_map(|entry| {
                let word = entry.apply(&from.word, block.kind, fullstrip)?;
                let mut applied = from.applied.clone();
                applied.push(AppliedRule {
                    flag: block.flag.clone(),
                    kind: block.kind,
                    strip: entry.strip.clone(),
                    append: entry.append.clone(),
                    continuation: entry.continuation.clone(),
                    continuation_text: entry.continuation_text.clone(),
                    condition_len: entry.condition.len(),
                    morph: entry.morph.clone(),
                });
                let mut morph = from.morph.clone();
                morph.extend(entry.morph.iter().cloned());
                Some(Production { word, base: from.base.clone(), applied, morph })
            })
            .collect()
    }
}

fn bare(entry: &DictionaryEntry) -> Production {
    Production { word: entry.word.clone(), base: entry.word.clone(), applied: Vec::new(), morph: entry.morph.clone() }
}
