use crate::error::AffixError;
use crate::{Flag, FlagType};

/// One `.dic` line: `word[/flags] [morph fields]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub word: String,
    pub flags: Vec<Flag>,
    pub morph: Vec<String>,
}

impl DictionaryEntry {
    pub fn parse(line: &str, flag_type: FlagType) -> Result<Self, String> {
        let mut fields = line.split_whitespace();
        let head = fields.next().ok_or_else(|| "empty dictionary line".to_string())?;
        let (word, flags) = head.split_once('/').unwrap_or((head, ""));
        if word.is_empty() {
            return Err(format!("dictionary line `{line}` has no word"));
        }
        Ok(DictionaryEntry {
            word: word.to_string(),
            flags: flag_type.split(flags)?,
            morph: fields.map(str::to_string).collect(),
        })
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f.as_str() == flag)
    }
}

/// Parse a whole `.dic` file.
///
/// The leading word-count line is optional; blank lines and tab-indented
/// comments are skipped.
pub fn parse_dictionary(text: &str, flag_type: FlagType) -> Result<Vec<DictionaryEntry>, AffixError> {
    let mut entries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.starts_with('\t') || line.trim().is_empty() {
            continue;
        }
        if idx == 0 && line.trim().chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let entry = DictionaryEntry::parse(line, flag_type)
            .map_err(|message| AffixError::Syntax { line: idx + 1, message })?;
        entries.push(entry);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_word_flags_and_morphology() {
        let entry = DictionaryEntry::parse("senŧa/ʼ0Z0 po:prep", FlagType::Long).unwrap();
        assert_eq!(entry.word, "senŧa");
        assert_eq!(entry.flags, vec![Flag::new("ʼ0"), Flag::new("Z0")]);
        assert_eq!(entry.morph, vec!["po:prep".to_string()]);
        assert!(entry.has_flag("Z0"));
        assert!(!entry.has_flag("ʼ"));
    }

    #[test]
    fn count_line_and_comments_are_skipped() {
        let dic = "3\nna/ʼ0\n\tcomment\n\nla/ʼ0\nso\n";
        let entries = parse_dictionary(dic, FlagType::Long).unwrap();
        let words: Vec<&str> = entries.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["na", "la", "so"]);
        assert!(entries[2].flags.is_empty());
    }

    #[test]
    fn bad_flags_report_the_line() {
        let err = parse_dictionary("1\nna/ʼ\n", FlagType::Long).unwrap_err();
        assert!(matches!(err, AffixError::Syntax { line: 2, .. }));
    }
}
