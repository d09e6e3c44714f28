use crate::aff::regex;
use crate::error::ReduceError;
use crate::reducer::{self, RuleBlock, fewest_lines};
use crate::{AffixData, AffixKind, AffixSwitches, DictionaryEntry, Flag, ReductionMetrics};
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Options that affect reduction.
#[derive(Debug, Clone)]
pub struct ReduceOptions {
    /// Re-apply every rendered block and compare with the original rules.
    pub verify: bool,
    /// How many characters past the strip a condition may grow.
    pub max_extension: usize,
    /// Give up on a flag once this much time has passed.
    pub time_budget: Option<Duration>,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self { verify: true, max_extension: 32, time_budget: None }
    }
}

/// Result from [`reduce_flag`].
#[derive(Debug, Clone)]
pub struct Reduction {
    pub block: RuleBlock,
    /// Rendered block, header first.
    pub lines: Vec<String>,
    pub metrics: ReductionMetrics,
}

impl Reduction {
    pub fn flag(&self) -> &Flag {
        &self.block.flag
    }

    pub fn kind(&self) -> AffixKind {
        self.block.kind
    }
}

/// Compact the rules of `flag` against the words of `dictionary` carrying it.
///
/// # Example
/// ```
/// use affixlint::{AffixData, FlagType, ReduceOptions, parse_dictionary, reduce_flag};
///
/// let aff = AffixData::parse("SFX A Y 2\nSFX A o i to\nSFX A o i ro\n").unwrap();
/// let dic = parse_dictionary("2\ngato/A\ncaro/A\n", FlagType::Short).unwrap();
///
/// let out = reduce_flag(&aff, &dic, "A", &ReduceOptions::default()).unwrap();
/// assert_eq!(out.lines, vec!["SFX A Y 1", "SFX A o i o"]);
/// ```
pub fn reduce_flag(
    affixes: &AffixData,
    dictionary: &[DictionaryEntry],
    flag: &str,
    options: &ReduceOptions,
) -> Result<Reduction, ReduceError> {
    let started = Instant::now();
    let original = affixes.block(flag).ok_or_else(|| ReduceError::UnknownFlag(flag.to_string()))?;
    let kind = original.kind;
    let budget = Budget { flag, started, limit: options.time_budget };
    let mut metrics = ReductionMetrics::default();

    let stage = Instant::now();
    let carriers: Vec<&DictionaryEntry> = dictionary.iter().filter(|e| e.has_flag(flag)).collect();
    let productions: Vec<_> = carriers.iter().flat_map(|e| affixes.apply_flag(e, flag)).collect();
    metrics.timings.expand = stage.elapsed();
    budget.check()?;

    let stage = Instant::now();
    let instances = reducer::collect(&productions, flag, kind);
    metrics.instances = instances.len();
    metrics.timings.collect = stage.elapsed();

    let stage = Instant::now();
    let grouped = reducer::group(&instances);
    metrics.grouped = grouped.values().map(Vec::len).sum();
    metrics.timings.group = stage.elapsed();
    budget.check()?;

    let stage = Instant::now();
    let population: Vec<String> = carriers.iter().map(|e| e.word.clone()).collect();
    let fullstrip = affixes.switches().contains(AffixSwitches::FULLSTRIP);
    let generalized = reducer::generalize(&grouped, kind, &population, fullstrip, options.max_extension);
    metrics.fallbacks = generalized.fallbacks;

    let (entries, literal) = fewest_lines(&grouped, generalized.entries);
    if literal {
        log::debug!("flag `{flag}`: generalization did not pay off, literal conditions kept");
    }
    metrics.minimality_guard = literal;
    metrics.compacted = entries.len();
    metrics.timings.generalize = stage.elapsed();
    budget.check()?;

    let stage = Instant::now();
    let block = RuleBlock { flag: original.flag.clone(), kind, combinable: original.combinable, entries };
    let lines = block.lines();
    metrics.lines = lines.len() - 1;
    metrics.timings.format = stage.elapsed();

    if options.verify {
        let stage = Instant::now();
        reducer::verify(affixes, flag, &lines, dictionary)?;
        metrics.timings.verify = stage.elapsed();
        budget.check()?;
    }

    metrics.timings.total = started.elapsed();
    log::debug!(
        "flag `{flag}`: {} instances, {} provisional, {} lines in {:?}",
        metrics.instances,
        metrics.grouped,
        metrics.lines,
        metrics.timings.total
    );
    Ok(Reduction { block, lines, metrics })
}

/// Compact every flag carried by at least one dictionary word, in parallel.
///
/// Results come back in flag order. A flag that fails does not affect the
/// others.
pub fn reduce_all(
    affixes: &AffixData,
    dictionary: &[DictionaryEntry],
    options: &ReduceOptions,
) -> Vec<(Flag, Result<Reduction, ReduceError>)> {
    let flags: Vec<&Flag> = affixes
        .blocks()
        .map(|b| &b.flag)
        .filter(|flag| dictionary.iter().any(|e| e.has_flag(flag.as_str())))
        .collect();
    log::debug!("reducing {} of {} flags", flags.len(), affixes.blocks().count());

    flags
        .into_par_iter()
        .map(|flag| (flag.clone(), reduce_flag(affixes, dictionary, flag.as_str(), options)))
        .collect()
}

/// Splice reduced blocks into the affix file they came from.
///
/// Each reduced flag's header and entry lines are replaced in place by the
/// rendered block. Comments and blank lines inside a replaced block survive.
/// Everything else is kept verbatim, including the trailing newline.
pub fn rewrite_affix_file(original: &str, reductions: &[Reduction]) -> String {
    let header = regex!(r"^(PFX|SFX)\s+(\S+)\s+[YN]\s+(\d+)\s*(?:#.*)?$");
    let by_flag: HashMap<(&str, &str), &Reduction> =
        reductions.iter().map(|r| ((r.kind().tag(), r.flag().as_str()), r)).collect();

    let mut out: Vec<&str> = Vec::new();
    let mut written: Vec<(&str, &str)> = Vec::new();
    // (tag, flag, entries left, replaced)
    let mut open: Option<(&str, &str, usize, bool)> = None;

    for line in original.lines() {
        let trimmed = line.trim();

        if let Some((tag, flag, left, replaced)) = open.as_mut() {
            let mut tokens = trimmed.split_whitespace();
            if *left > 0 && tokens.next() == Some(*tag) && tokens.next() == Some(*flag) {
                *left -= 1;
                if !*replaced {
                    out.push(line);
                }
                continue;
            }
        }

        if let Some(caps) = header.captures(trimmed) {
            let (Some(tag), Some(flag), Some(count)) = (caps.get(1), caps.get(2), caps.get(3)) else {
                out.push(line);
                continue;
            };
            let key = (tag.as_str(), flag.as_str());
            let declared = count.as_str().parse().unwrap_or(0);
            let replaced = match by_flag.get(&key) {
                Some(reduction) => {
                    if !written.contains(&key) {
                        out.extend(reduction.lines.iter().map(String::as_str));
                        written.push(key);
                    }
                    true
                }
                None => {
                    out.push(line);
                    false
                }
            };
            open = Some((key.0, key.1, declared, replaced));
            continue;
        }

        out.push(line);
    }

    let mut text = out.join("\n");
    if original.ends_with('\n') {
        text.push('\n');
    }
    text
}

struct Budget<'a> {
    flag: &'a str,
    started: Instant,
    limit: Option<Duration>,
}

impl Budget<'_> {
    fn check(&self) -> Result<(), ReduceError> {
        let Some(budget) = self.limit else { return Ok(()) };
        let elapsed = self.started.elapsed();
        if elapsed >= budget {
            log::warn!("flag `{}`: abandoned after {elapsed:?}", self.flag);
            return Err(ReduceError::BudgetExceeded { flag: self.flag.to_string(), elapsed, budget });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FlagType, parse_dictionary};

    const AFF: &str = "\
# Venetian sample
SET UTF-8
FLAG long

SFX ʼ0 Y 4
SFX ʼ0 a ʼ na
SFX ʼ0 a ʼ la
SFX ʼ0 a ò ra
# feminine
SFX ʼ0 e ʼ de

PFX p0 Y 1
PFX p0 0 s .

SFX q0 N 1
SFX q0 o i o
";

    const DIC: &str = "5\nna/ʼ0\nla/ʼ0\nbara/ʼ0\nde/ʼ0p0\nme/ʼ0\n";

    fn setup() -> (AffixData, Vec<DictionaryEntry>) {
        (AffixData::parse(AFF).unwrap(), parse_dictionary(DIC, FlagType::Long).unwrap())
    }

    #[test]
    fn reduce_flag_generalizes_and_records_metrics() {
        let (aff, dic) = setup();
        let out = reduce_flag(&aff, &dic, "ʼ0", &ReduceOptions::default()).unwrap();
        assert_eq!(
            out.lines,
            vec!["SFX ʼ0 Y 3", "SFX ʼ0 a ʼ [^r]a", "SFX ʼ0 a ò ra", "SFX ʼ0 e ʼ [^m]e"]
        );
        assert_eq!(out.kind(), AffixKind::Suffix);
        assert_eq!(out.metrics.instances, 4);
        assert_eq!(out.metrics.grouped, 4);
        assert_eq!(out.metrics.lines, 3);
        assert!(!out.metrics.minimality_guard);
        assert!(out.metrics.timings.total >= out.metrics.timings.verify);
    }

    #[test]
    fn unknown_flag_is_an_error() {
        let (aff, dic) = setup();
        assert!(matches!(
            reduce_flag(&aff, &dic, "zz", &ReduceOptions::default()),
            Err(ReduceError::UnknownFlag(f)) if f == "zz"
        ));
    }

    #[test]
    fn zero_budget_is_exceeded() {
        let (aff, dic) = setup();
        let options = ReduceOptions { time_budget: Some(Duration::ZERO), ..Default::default() };
        let res = reduce_flag(&aff, &dic, "ʼ0", &options);
        assert!(matches!(res, Err(ReduceError::BudgetExceeded { .. })), "{res:?}");
    }

    #[test]
    fn reduce_all_skips_flags_nobody_carries() {
        let (aff, dic) = setup();
        let all = reduce_all(&aff, &dic, &ReduceOptions::default());
        let flags: Vec<&str> = all.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(flags, vec!["p0", "ʼ0"]);
        assert!(all.iter().all(|(_, r)| r.is_ok()));
    }

    #[test]
    fn rewrite_replaces_blocks_in_place() {
        let (aff, dic) = setup();
        let reductions: Vec<Reduction> =
            reduce_all(&aff, &dic, &ReduceOptions::default()).into_iter().map(|(_, r)| r.unwrap()).collect();
        let text = rewrite_affix_file(AFF, &reductions);
        assert_eq!(
            text,
            "\
# Venetian sample
SET UTF-8
FLAG long

SFX ʼ0 Y 3
SFX ʼ0 a ʼ [^r]a
SFX ʼ0 a ò ra
SFX ʼ0 e ʼ [^m]e
# feminine

PFX p0 Y 1
PFX p0 0 s .

SFX q0 N 1
SFX q0 o i o
"
        );

        let reparsed = AffixData::parse(&text).unwrap();
        assert_eq!(reparsed.block("ʼ0").unwrap().entries.len(), 3);
    }

    #[test]
    fn rewrite_keeps_morphological_fields() {
        let aff_text = "SFX A Y 2\nSFX A 0 s a po:noun is:pl\nSFX A 0 s o po:noun is:pl\n";
        let aff = AffixData::parse(aff_text).unwrap();
        let dic = parse_dictionary("2\ncasa/A\ngato/A\n", FlagType::Short).unwrap();
        let reductions: Vec<Reduction> =
            reduce_all(&aff, &dic, &ReduceOptions::default()).into_iter().map(|(_, r)| r.unwrap()).collect();

        let text = rewrite_affix_file(aff_text, &reductions);
        assert_eq!(text, "SFX A Y 1\nSFX A 0 s . po:noun is:pl\n");

        let reparsed = AffixData::parse(&text).unwrap();
        assert_eq!(reparsed.block("A").unwrap().entries[0].morph, vec!["po:noun", "is:pl"]);
    }

    #[test]
    fn rules_differing_in_morphology_stay_apart() {
        let aff_text = "SFX A Y 2\nSFX A 0 s a is:fem\nSFX A 0 s o is:masc\n";
        let aff = AffixData::parse(aff_text).unwrap();
        let dic = parse_dictionary("2\ncasa/A\ngato/A\n", FlagType::Short).unwrap();
        let out = reduce_flag(&aff, &dic, "A", &ReduceOptions::default()).unwrap();
        assert_eq!(out.lines, vec!["SFX A Y 2", "SFX A 0 s [^o] is:fem", "SFX A 0 s o is:masc"]);
    }

    #[test]
    fn rewrite_drops_repeated_blocks_of_a_reduced_flag() {
        let original = "SFX A Y 1\nSFX A o i to\nSFX A Y 1\nSFX A o i ro";
        let aff = AffixData::parse("SFX A Y 2\nSFX A o i to\nSFX A o i ro\n").unwrap();
        let dic = parse_dictionary("2\ngato/A\ncaro/A\n", FlagType::Short).unwrap();
        let reduction = reduce_flag(&aff, &dic, "A", &ReduceOptions::default()).unwrap();
        assert_eq!(rewrite_affix_file(original, &[reduction]), "SFX A Y 1\nSFX A o i o");
    }
}
