use super::RuleInstance;
use crate::{AffixKind, Production};

/// Turn the productions of one flag into rule instances.
///
/// Only single-step productions of `flag` with the requested `kind` count;
/// chained and cross-product forms belong to the composition of two flags.
/// Identical instances are kept apart so their number matches the number of
/// observed applications.
pub fn collect(productions: &[Production], flag: &str, kind: AffixKind) -> Vec<RuleInstance> {
    productions
        .iter()
        .filter_map(|production| {
            let [rule] = production.applied.as_slice() else { return None };
            if rule.flag.as_str() != flag || rule.kind != kind {
                return None;
            }

            // The original condition saw at least the stripped characters.
            let inspected = rule.strip.chars().count().max(rule.condition_len);
            let anchored = kind.anchored(&production.base);
            let matched = kind.unanchor(&anchored[..inspected.min(anchored.len())]);

            Some(RuleInstance {
                kind,
                strip: rule.strip.clone(),
                add: rule.add(),
                morph: rule.morph.clone(),
                matched,
                source: production.base.clone(),
                derived: production.word.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AffixData, DictionaryEntry, FlagType};

    const AFF: &str = "\
FLAG long
SFX ʼ0 Y 3
SFX ʼ0 a ʼ [^rx]a
SFX ʼ0 e ʼ [dg]e
SFX ʼ0 0 h/Z0 .
PFX p0 Y 1
PFX p0 0 s .
SFX Z0 Y 1
SFX Z0 0 i .
";

    fn productions(line: &str) -> Vec<Production> {
        let data = AffixData::parse(AFF).unwrap();
        data.expand(&DictionaryEntry::parse(line, FlagType::Long).unwrap())
    }

    #[test]
    fn one_instance_per_single_step_application() {
        let instances = collect(&productions("senŧa/ʼ0p0"), "ʼ0", AffixKind::Suffix);
        let adds: Vec<(&str, &str, &str)> =
            instances.iter().map(|i| (i.strip.as_str(), i.add.as_str(), i.matched.as_str())).collect();
        assert_eq!(adds, vec![("a", "ʼ", "ŧa"), ("", "h/Z0", "")]);
        assert!(instances.iter().all(|i| i.source == "senŧa"));
        assert_eq!(instances[0].derived, "senŧʼ");
        assert_eq!(instances[1].derived, "senŧah");
    }

    #[test]
    fn other_flags_and_kinds_are_skipped() {
        let all = productions("ge/ʼ0p0");
        assert!(collect(&all, "ʼ0", AffixKind::Prefix).is_empty());

        let prefixes = collect(&all, "p0", AffixKind::Prefix);
        assert_eq!(prefixes.len(), 1);
        assert_eq!(prefixes[0].derived, "sge");

        // `geh` → `gehi` is a twofold form, not an application of Z0 to `ge`.
        assert!(collect(&all, "Z0", AffixKind::Suffix).is_empty());
    }

    #[test]
    fn duplicates_are_not_collapsed() {
        let mut all = productions("ge/ʼ0");
        all.extend(productions("ge/ʼ0"));
        assert_eq!(collect(&all, "ʼ0", AffixKind::Suffix).len(), 4);
    }
}
