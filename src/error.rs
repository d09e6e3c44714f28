use std::time::Duration;

/// Errors raised while reading affix or dictionary text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AffixError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: {tag} {flag} declares {declared} entries but only {found} follow")]
    ShortBlock { line: usize, tag: &'static str, flag: String, declared: usize, found: usize },

    #[error("line {line}: {tag} {flag} entry appears before its header")]
    Headless { line: usize, tag: &'static str, flag: String },

    #[error("line {line}: invalid condition `{condition}`: {reason}")]
    Condition { line: usize, condition: String, reason: String },
}

/// One `source word → derived word` application, identified by its add token
/// and the morphological fields of the rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Derivation {
    pub word: String,
    pub add: String,
    pub morph: Vec<String>,
    pub derived: String,
}

impl std::fmt::Display for Derivation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {} (+{}", self.word, self.derived, self.add)?;
        for field in &self.morph {
            write!(f, " {field}")?;
        }
        f.write_str(")")
    }
}

/// The reduced block does not reproduce the original inflections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("flag `{flag}`: reduced rules diverge from the originals; {}", describe(.missing, .extra))]
pub struct Mismatch {
    pub flag: String,
    /// Derivations produced by the original rules but not by the reduced ones.
    pub missing: Vec<Derivation>,
    /// Derivations produced only by the reduced rules.
    pub extra: Vec<Derivation>,
}

fn describe(missing: &[Derivation], extra: &[Derivation]) -> String {
    const SHOWN: usize = 5;
    let list = |items: &[Derivation]| {
        let mut parts: Vec<String> = items.iter().take(SHOWN).map(|d| d.to_string()).collect();
        if items.len() > SHOWN {
            parts.push(format!("... +{} more", items.len() - SHOWN));
        }
        parts.join(", ")
    };
    match (missing.is_empty(), extra.is_empty()) {
        (false, true) => format!("missing [{}]", list(missing)),
        (true, false) => format!("extra [{}]", list(extra)),
        _ => format!("missing [{}]; extra [{}]", list(missing), list(extra)),
    }
}

/// Failure to compact a single flag. Other flags are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum ReduceError {
    #[error("flag `{0}` has no SFX/PFX block")]
    UnknownFlag(String),

    /// The formatter emitted text the affix parser rejects.
    #[error("reduced block for flag `{flag}` does not parse back")]
    MalformedFragment {
        flag: String,
        #[source]
        source: AffixError,
    },

    #[error(transparent)]
    Mismatch(#[from] Mismatch),

    #[error("reduction of flag `{flag}` took {elapsed:?}, over its {budget:?} budget")]
    BudgetExceeded { flag: String, elapsed: Duration, budget: Duration },
}
