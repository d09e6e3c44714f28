use super::LineEntry;
use crate::AffixKind;

/// Render a block: the header, then one line per add.
///
/// Entries are ordered by strip, then by condition length, with a negated
/// class ahead of the literals at the same length, then by condition text.
/// Adds of a multi-add entry follow in lexicographic order, each followed by
/// its morphological fields after the condition. The header count
/// is recomputed from what is rendered, never copied from the input.
pub fn format(flag: &str, kind: AffixKind, combinable: bool, entries: &[LineEntry]) -> Vec<String> {
    let tag = kind.tag();
    let mut ordered: Vec<&LineEntry> = entries.iter().collect();
    ordered.sort_by_cached_key(|e| (e.strip.clone(), e.condition.len(), !e.condition.has_class(), e.condition.render()));

    let body: Vec<String> = ordered
        .iter()
        .flat_map(|entry| {
            let strip = if entry.strip.is_empty() { "0" } else { entry.strip.as_str() };
            let condition = entry.condition.render();
            entry.adds.iter().map(move |token| {
                let add = if token.add.is_empty() { "0" } else { token.add.as_str() };
                let mut line = format!("{tag} {flag} {strip} {add} {condition}");
                for field in &token.morph {
                    line.push(' ');
                    line.push_str(field);
                }
                line
            })
        })
        .collect();

    let mut lines = Vec::with_capacity(body.len() + 1);
    lines.push(format!("{tag} {flag} {} {}", if combinable { 'Y' } else { 'N' }, body.len()));
    lines.extend(body);
    lines
}
