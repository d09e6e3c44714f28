use crate::{
    AffixData, AffixKind, FlagType, ReduceError, ReduceOptions, Reduction, parse_dictionary, reduce_flag,
    rewrite_affix_file,
};

const VENETIAN_AFF: &str = "\
SET UTF-8
FLAG long

SFX ʼ0 Y 13
SFX ʼ0 a ʼ ŧa
SFX ʼ0 a ʼ na
SFX ʼ0 a ʼ la
SFX ʼ0 a ʼ sa
SFX ʼ0 a ò ra
SFX ʼ0 a ò xa
SFX ʼ0 e ʼ de
SFX ʼ0 e ʼ ge
SFX ʼ0 e i me
SFX ʼ0 e o te
SFX ʼ0 e u ve
SFX ʼ0 u ʼ nu
SFX ʼ0 o ʼ so
";

const VENETIAN_DIC: &str = "\
13
senŧa/ʼ0
na/ʼ0
la/ʼ0
sensa/ʼ0
bara/ʼ0
caxa/ʼ0
de/ʼ0
ge/ʼ0
me/ʼ0
te/ʼ0
ve/ʼ0
nu/ʼ0
so/ʼ0
";

fn reduce(aff: &str, dic: &str, flag: &str) -> Result<Reduction, ReduceError> {
    let data = AffixData::parse(aff).unwrap();
    let words = parse_dictionary(dic, data.flag_type()).unwrap();
    reduce_flag(&data, &words, flag, &ReduceOptions::default())
}

#[test]
fn reduced_blocks_match_expected_lines() {
    // (name, affix file, dictionary, flag, expected block)
    let cases: Vec<(&str, &str, &str, &str, Vec<&str>)> = vec![
        (
            "venetian elision",
            VENETIAN_AFF,
            VENETIAN_DIC,
            "ʼ0",
            vec![
                "SFX ʼ0 Y 9",
                "SFX ʼ0 a ʼ [^rx]a",
                "SFX ʼ0 a ò ra",
                "SFX ʼ0 a ò xa",
                "SFX ʼ0 e ʼ [^mtv]e",
                "SFX ʼ0 e i me",
                "SFX ʼ0 e o te",
                "SFX ʼ0 e u ve",
                "SFX ʼ0 o ʼ o",
                "SFX ʼ0 u ʼ u",
            ],
        ),
        (
            "empty strip becomes the wildcard",
            "SFX A Y 2\nSFX A 0 s a\nSFX A 0 s o\n",
            "2\ncasa/A\ngato/A\n",
            "A",
            vec!["SFX A Y 1", "SFX A 0 s ."],
        ),
        (
            "case-sensitive prefixes stay apart",
            "FLAG long\nPFX S0 Y 4\nPFX S0 0 in sa\nPFX S0 0 in se\nPFX S0 0 In Sa\nPFX S0 0 In So\n",
            "4\nsal/S0\nsen/S0\nSara/S0\nSora/S0\n",
            "S0",
            vec!["PFX S0 Y 2", "PFX S0 0 In [^s]", "PFX S0 0 in s"],
        ),
        (
            "full strip keeps the whole-word rule",
            "FLAG long\nFULLSTRIP\nSFX v0 Y 2\nSFX v0 andare vado andare\nSFX v0 are o are\n",
            "3\nandare/v0\nparlare/v0\ncantare/v0\n",
            "v0",
            vec!["SFX v0 Y 2", "SFX v0 andare vado andare", "SFX v0 are o are"],
        ),
        (
            "continuation flags stay glued to the add",
            "SFX B Y 2\nSFX B o i/C to\nSFX B o i/C ro\nSFX C Y 1\nSFX C 0 s .\n",
            "2\ngato/B\ncaro/B\n",
            "B",
            vec!["SFX B Y 1", "SFX B o i/C o"],
        ),
        (
            "shared operations become one line per add",
            "SFX V N 4\nSFX V are o lare\nSFX V are o tare\nSFX V are iamo lare\nSFX V are iamo tare\n",
            "2\nparlare/V\ncantare/V\n",
            "V",
            vec!["SFX V N 2", "SFX V are iamo are", "SFX V are o are"],
        ),
    ];

    for (name, aff, dic, flag, expected) in cases {
        let reduction = reduce(aff, dic, flag).unwrap_or_else(|err| panic!("{name}: {err}"));
        assert_eq!(reduction.lines, expected, "{name}");
        assert!(reduction.metrics.lines <= reduction.metrics.grouped, "{name}: block grew");
    }
}

#[test]
fn venetian_sources_justify_each_line() {
    let reduction = reduce(VENETIAN_AFF, VENETIAN_DIC, "ʼ0").unwrap();
    assert_eq!(reduction.kind(), AffixKind::Suffix);

    let elided_a = reduction.block.entries.iter().find(|e| e.condition.render() == "[^rx]a").unwrap();
    assert_eq!(elided_a.sources.iter().map(String::as_str).collect::<Vec<_>>(), vec!["la", "na", "senŧa", "sensa"]);

    let elided_e = reduction.block.entries.iter().find(|e| e.condition.render() == "[^mtv]e").unwrap();
    assert_eq!(elided_e.sources.iter().map(String::as_str).collect::<Vec<_>>(), vec!["de", "ge"]);

    assert_eq!(reduction.metrics.instances, 13);
    assert_eq!(reduction.metrics.grouped, 13);
    assert_eq!(reduction.metrics.fallbacks, 0);
}

#[test]
fn sibling_conditions_never_overlap() {
    let reduction = reduce(VENETIAN_AFF, VENETIAN_DIC, "ʼ0").unwrap();
    let dic = parse_dictionary(VENETIAN_DIC, FlagType::Long).unwrap();
    for entry in &dic {
        let matching: Vec<_> = reduction
            .block
            .entries
            .iter()
            .filter(|e| entry.word.ends_with(e.strip.as_str()) && e.condition.matches(&entry.word))
            .collect();
        assert!(matching.len() <= 1, "{} matches {matching:?}", entry.word);
    }
}

#[test]
fn reducing_twice_changes_nothing() {
    let data = AffixData::parse(VENETIAN_AFF).unwrap();
    let words = parse_dictionary(VENETIAN_DIC, data.flag_type()).unwrap();
    let first = reduce_flag(&data, &words, "ʼ0", &ReduceOptions::default()).unwrap();

    let rewritten = rewrite_affix_file(VENETIAN_AFF, std::slice::from_ref(&first));
    let second = reduce(&rewritten, VENETIAN_DIC, "ʼ0").unwrap();
    assert_eq!(second.lines, first.lines);
}

#[test]
fn bystanders_block_overgeneration() {
    // `mar` carries the flag but never takes `s`; a bare `.` would give `mars`.
    let reduction = reduce("SFX A Y 2\nSFX A 0 s a\nSFX A 0 s o\n", "3\ncasa/A\ngato/A\nmar/A\n", "A").unwrap();
    assert_eq!(reduction.lines, vec!["SFX A Y 1", "SFX A 0 s [^r]"]);
}

#[test]
fn unverified_runs_skip_the_round_trip() {
    let data = AffixData::parse(VENETIAN_AFF).unwrap();
    let words = parse_dictionary(VENETIAN_DIC, data.flag_type()).unwrap();
    let options = ReduceOptions { verify: false, ..Default::default() };
    let reduction = reduce_flag(&data, &words, "ʼ0", &options).unwrap();
    assert_eq!(reduction.metrics.timings.verify, std::time::Duration::ZERO);
    assert_eq!(reduction.lines.len(), 10);
}
