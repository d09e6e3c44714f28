//! Affix file reading.
//!
//! Only the directives that influence rule application are interpreted;
//! everything else (`SET`, `TRY`, `REP`, `KEY`, ...) is skipped. Blocks are read
//! statefully: after a header, the next `count` lines for that flag are its
//! entries, so an entry whose strip column happens to read `Y` is never taken
//! for a header.

use super::{AffixBlock, AffixCondition, AffixData, AffixEntry, AffixSwitches, regex};
use crate::error::AffixError;
use crate::{AffixKind, Flag, FlagType};

/// A header whose entries are still being read.
struct OpenBlock {
    kind: AffixKind,
    flag: Flag,
    header_line: usize,
    declared: usize,
    found: usize,
}

impl AffixData {
    /// Parse a complete affix file.
    pub fn parse(text: &str) -> Result<AffixData, AffixError> {
        let mut data = AffixData::default();
        data.read(text)?;
        log::debug!("parsed affix data: {} blocks, flag type {:?}", data.blocks.len(), data.flag_type);
        Ok(data)
    }

    /// Parse a standalone block fragment, inheriting the flag spelling and
    /// switches of `template`.
    pub fn parse_fragment(text: &str, template: &AffixData) -> Result<AffixData, AffixError> {
        let mut data =
            AffixData { flag_type: template.flag_type, switches: template.switches, blocks: Default::default() };
        data.read(text)?;
        Ok(data)
    }

    fn read(&mut self, text: &str) -> Result<(), AffixError> {
        let mut open: Option<OpenBlock> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let Some(directive) = tokens.next() else { continue };

            let Some(kind) = AffixKind::from_tag(directive) else {
                match directive {
                    "FLAG" => {
                        let value = tokens.next().unwrap_or("");
                        self.flag_type = FlagType::from_directive(value).ok_or_else(|| AffixError::Syntax {
                            line: line_no,
                            message: format!("unknown FLAG type `{value}`"),
                        })?;
                    }
                    "FULLSTRIP" => self.switches |= AffixSwitches::FULLSTRIP,
                    "COMPLEXPREFIXES" => self.switches |= AffixSwitches::COMPLEX_PREFIXES,
                    _ => {}
                }
                continue;
            };

            let flag = Flag::new(tokens.next().unwrap_or(""));
            if flag.as_str().is_empty() {
                return Err(AffixError::Syntax { line: line_no, message: format!("{directive} without a flag") });
            }

            if let Some(block) = open.as_mut() {
                if block.found < block.declared {
                    if block.kind != kind || block.flag != flag {
                        return Err(short_block(block));
                    }
                    let entry = parse_entry(line, line_no, kind, self.flag_type)?;
                    self.push_entry(&flag, entry);
                    block.found += 1;
                    continue;
                }
            }

            let Some(caps) = regex!(r"^(?:PFX|SFX)\s+\S+\s+([YN])\s+(\d+)\s*(?:#.*)?$").captures(line) else {
                if self.blocks.contains_key(flag.as_str()) {
                    return Err(AffixError::Syntax {
                        line: line_no,
                        message: format!("{directive} {flag} has more entries than its header declares"),
                    });
                }
                return Err(AffixError::Headless { line: line_no, tag: kind.tag(), flag: flag.to_string() });
            };

            let combinable = &caps[1] == "Y";
            let declared: usize = caps[2].parse().map_err(|_| AffixError::Syntax {
                line: line_no,
                message: format!("entry count `{}` is out of range", &caps[2]),
            })?;

            match self.blocks.get(flag.as_str()) {
                Some(existing) if existing.kind != kind => {
                    return Err(AffixError::Syntax {
                        line: line_no,
                        message: format!("flag {flag} is declared both as PFX and SFX"),
                    });
                }
                Some(_) => {}
                None => {
                    self.blocks.insert(
                        flag.clone(),
                        AffixBlock { flag: flag.clone(), kind, combinable, entries: Vec::new() },
                    );
                }
            }

            open = Some(OpenBlock { kind, flag, header_line: line_no, declared, found: 0 });
        }

        match open {
            Some(block) if block.found < block.declared => Err(short_block(&block)),
            _ => Ok(()),
        }
    }

    fn push_entry(&mut self, flag: &Flag, entry: AffixEntry) {
        if let Some(block) = self.blocks.get_mut(flag.as_str()) {
            block.entries.push(entry);
        }
    }
}

fn short_block(block: &OpenBlock) -> AffixError {
    AffixError::ShortBlock {
        line: block.header_line,
        tag: block.kind.tag(),
        flag: block.flag.to_string(),
        declared: block.declared,
        found: block.found,
    }
}

/// `SFX|PFX <flag> <strip> <add[/flags]> [<condition> [morph...]]`
fn parse_entry(line: &str, line_no: usize, kind: AffixKind, flag_type: FlagType) -> Result<AffixEntry, AffixError> {
    let tokens: Vec<&str> = line.split_whitespace().take_while(|t| !t.starts_with('#')).collect();
    if tokens.len() < 4 {
        return Err(AffixError::Syntax {
            line: line_no,
            message: format!("{} entry needs at least strip and add columns", kind.tag()),
        });
    }

    let strip = if tokens[2] == "0" { String::new() } else { tokens[2].to_string() };

    let (append, continuation_text) = tokens[3].split_once('/').unwrap_or((tokens[3], ""));
    let append = if append == "0" { String::new() } else { append.to_string() };
    let continuation = flag_type
        .split(continuation_text)
        .map_err(|message| AffixError::Syntax { line: line_no, message })?;

    let condition_text = tokens.get(4).copied().unwrap_or(".");
    let condition = AffixCondition::parse(condition_text).map_err(|reason| AffixError::Condition {
        line: line_no,
        condition: condition_text.to_string(),
        reason,
    })?;
    if !condition.agrees_with_strip(&strip, kind) {
        return Err(AffixError::Condition {
            line: line_no,
            condition: condition_text.to_string(),
            reason: format!("does not agree with strip `{strip}`"),
        });
    }

    let morph = tokens.iter().skip(5).map(|t| t.to_string()).collect();

    Ok(AffixEntry { strip, append, continuation, continuation_text: continuation_text.to_string(), condition, morph })
}
