//! Hunspell entry conditions as written in affix files.
//!
//! The engine accepts the whole textual syntax: literal characters, `.` at any
//! position, positive classes `[abc]` and negated classes `[^abc]`. The
//! reducer emits a narrower subset (see `reducer/condition.rs`), but it has to
//! be able to read whatever the original file used.

use crate::AffixKind;

#[derive(Debug, Clone, PartialEq, Eq)]
enum CharMatcher {
    Any,
    Char(char),
    OneOf(Vec<char>),
    NoneOf(Vec<char>),
}

impl CharMatcher {
    fn accepts(&self, c: char) -> bool {
        match self {
            CharMatcher::Any => true,
            CharMatcher::Char(expected) => *expected == c,
            CharMatcher::OneOf(set) => set.contains(&c),
            CharMatcher::NoneOf(set) => !set.contains(&c),
        }
    }
}

/// A parsed condition column. Matchers are kept in text (left-to-right) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffixCondition {
    text: String,
    matchers: Vec<CharMatcher>,
}

impl AffixCondition {
    /// The condition Hunspell uses when the column is `.` or missing.
    pub fn any() -> Self {
        AffixCondition { text: ".".to_string(), matchers: Vec::new() }
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        // A lone `.` means "no condition", not "one character".
        if text == "." {
            return Ok(Self::any());
        }

        let mut matchers = Vec::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            match c {
                '.' => matchers.push(CharMatcher::Any),
                '[' => {
                    let mut negated = false;
                    let mut set = Vec::new();
                    let mut closed = false;
                    for (i, inner) in chars.by_ref().enumerate() {
                        match inner {
                            '^' if i == 0 => negated = true,
                            ']' => {
                                closed = true;
                                break;
                            }
                            _ => set.push(inner),
                        }
                    }
                    if !closed {
                        return Err("unterminated character class".to_string());
                    }
                    if set.is_empty() {
                        return Err("empty character class".to_string());
                    }
                    matchers.push(if negated { CharMatcher::NoneOf(set) } else { CharMatcher::OneOf(set) });
                }
                ']' => return Err("unbalanced `]`".to_string()),
                _ => matchers.push(CharMatcher::Char(c)),
            }
        }

        Ok(AffixCondition { text: text.to_string(), matchers })
    }

    /// Number of character positions the condition inspects.
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Check the condition against the word end (suffix) or start (prefix).
    pub fn matches(&self, word: &str, kind: AffixKind) -> bool {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() < self.matchers.len() {
            return false;
        }
        let window = match kind {
            AffixKind::Suffix => &chars[chars.len() - self.matchers.len()..],
            AffixKind::Prefix => &chars[..self.matchers.len()],
        };
        self.matchers.iter().zip(window).all(|(m, &c)| m.accepts(c))
    }

    /// Whether the positions shared by the condition and `strip` agree.
    ///
    /// An entry whose condition rejects its own strip string can never fire;
    /// Hunspell reports it as a warning, here it is a parse error.
    pub fn agrees_with_strip(&self, strip: &str, kind: AffixKind) -> bool {
        let anchored_strip = kind.anchored(strip);
        let anchored_matchers: Vec<&CharMatcher> = match kind {
            AffixKind::Suffix => self.matchers.iter().rev().collect(),
            AffixKind::Prefix => self.matchers.iter().collect(),
        };
        anchored_matchers.iter().zip(&anchored_strip).all(|(m, &c)| m.accepts(c))
    }
}

impl std::fmt::Display for AffixCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
