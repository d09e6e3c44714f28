use super::collect;
use crate::error::{AffixError, Derivation, Mismatch, ReduceError};
use crate::{AffixData, AffixKind, DictionaryEntry};
use std::collections::BTreeSet;

/// Check that rendered `lines` for `flag` reproduce the original rules.
///
/// The lines are parsed as a fragment of `original` (same `FLAG` spelling and
/// switches), applied to every dictionary entry carrying the flag, and the
/// resulting single-step derivations compared with those of the original
/// block. A derivation includes the rule's morphological fields, so a block
/// that drops or alters them does not verify.
///
/// Derivations are compared as sets, not multisets: Hunspell's output is a set
/// of word forms, so two original lines yielding the same form count once.
pub fn verify(
    original: &AffixData,
    flag: &str,
    lines: &[String],
    dictionary: &[DictionaryEntry],
) -> Result<(), ReduceError> {
    let block = original.block(flag).ok_or_else(|| ReduceError::UnknownFlag(flag.to_string()))?;
    let kind = block.kind;

    let fragment = AffixData::parse_fragment(&lines.join("\n"), original)
        .map_err(|source| ReduceError::MalformedFragment { flag: flag.to_string(), source })?;
    match fragment.block(flag) {
        Some(reduced) if reduced.kind == kind => {}
        _ => {
            return Err(ReduceError::MalformedFragment {
                flag: flag.to_string(),
                source: AffixError::Syntax { line: 1, message: format!("no {} block for `{flag}`", kind.tag()) },
            });
        }
    }

    let expected = derivations(original, flag, kind, dictionary);
    let actual = derivations(&fragment, flag, kind, dictionary);
    if expected == actual {
        log::debug!("flag `{flag}`: {} derivations reproduced", expected.len());
        return Ok(());
    }

    Err(Mismatch {
        flag: flag.to_string(),
        missing: expected.difference(&actual).cloned().collect(),
        extra: actual.difference(&expected).cloned().collect(),
    }
    .into())
}

fn derivations(data: &AffixData, flag: &str, kind: AffixKind, dictionary: &[DictionaryEntry]) -> BTreeSet<Derivation> {
    dictionary
        .iter()
        .flat_map(|entry| collect(&data.apply_flag(entry, flag), flag, kind))
        .map(|instance| Derivation {
            word: instance.source,
            add: instance.add,
            morph: instance.morph,
            derived: instance.derived,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FlagType, parse_dictionary};

    const AFF: &str = "\
FLAG long
SFX ʼ0 Y 3
SFX ʼ0 a ʼ [^rx]a
SFX ʼ0 a ò [rx]a
SFX ʼ0 e ʼ [dg]e
";

    const DIC: &str = "4\nna/ʼ0\nbara/ʼ0\nde/ʼ0\nme/ʼ0\n";

    fn setup() -> (AffixData, Vec<DictionaryEntry>) {
        let data = AffixData::parse(AFF).unwrap();
        let dic = parse_dictionary(DIC, FlagType::Long).unwrap();
        (data, dic)
    }

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn equivalent_block_passes() {
        let (data, dic) = setup();
        let reduced = lines("SFX ʼ0 Y 3\nSFX ʼ0 a ʼ [^r]a\nSFX ʼ0 a ò ra\nSFX ʼ0 e ʼ de");
        assert!(verify(&data, "ʼ0", &reduced, &dic).is_ok());
    }

    #[test]
    fn overreaching_condition_is_reported_as_extra() {
        let (data, dic) = setup();
        let reduced = lines("SFX ʼ0 Y 3\nSFX ʼ0 a ʼ [^r]a\nSFX ʼ0 a ò ra\nSFX ʼ0 e ʼ e");
        let Err(ReduceError::Mismatch(m)) = verify(&data, "ʼ0", &reduced, &dic) else {
            panic!("expected a mismatch");
        };
        assert!(m.missing.is_empty());
        assert_eq!(
            m.extra,
            vec![Derivation { word: "me".into(), add: "ʼ".into(), morph: Vec::new(), derived: "mʼ".into() }]
        );
    }

    #[test]
    fn dropped_line_is_reported_as_missing() {
        let (data, dic) = setup();
        let reduced = lines("SFX ʼ0 Y 2\nSFX ʼ0 a ʼ [^r]a\nSFX ʼ0 e ʼ de");
        let Err(ReduceError::Mismatch(m)) = verify(&data, "ʼ0", &reduced, &dic) else {
            panic!("expected a mismatch");
        };
        assert_eq!(m.missing.len(), 1);
        assert_eq!(m.missing[0].derived, "barò");
    }

    #[test]
    fn unparsable_lines_are_malformed() {
        let (data, dic) = setup();
        let reduced = lines("SFX ʼ0 Y 2\nSFX ʼ0 a ʼ [^ra");
        assert!(matches!(verify(&data, "ʼ0", &reduced, &dic), Err(ReduceError::MalformedFragment { .. })));

        let other_flag = lines("SFX q0 Y 1\nSFX q0 a ʼ a");
        assert!(matches!(verify(&data, "ʼ0", &other_flag, &dic), Err(ReduceError::MalformedFragment { .. })));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let (data, dic) = setup();
        assert!(matches!(verify(&data, "zz", &[], &dic), Err(ReduceError::UnknownFlag(f)) if f == "zz"));
    }

    #[test]
    fn dropped_morphology_is_a_mismatch() {
        let data = AffixData::parse("SFX A Y 2\nSFX A 0 s a po:noun is:pl\nSFX A 0 s o po:noun is:pl\n").unwrap();
        let dic = parse_dictionary("2\ncasa/A\ngato/A\n", FlagType::Short).unwrap();

        assert!(verify(&data, "A", &lines("SFX A Y 1\nSFX A 0 s . po:noun is:pl"), &dic).is_ok());

        let Err(ReduceError::Mismatch(m)) = verify(&data, "A", &lines("SFX A Y 1\nSFX A 0 s ."), &dic) else {
            panic!("expected a mismatch");
        };
        assert_eq!(m.missing.len(), 2);
        assert_eq!(m.extra.len(), 2);
        assert_eq!(m.missing[0].morph, vec!["po:noun", "is:pl"]);
        assert!(m.extra.iter().all(|d| d.morph.is_empty()));
    }
}
