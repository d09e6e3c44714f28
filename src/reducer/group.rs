//! Partition by morphological operation.
//!
//! An operation is the pair `(strip, add)`, where the add carries the rule's
//! morphological fields along with its token. Grouping is a pure partition with
//! one free compaction: instances of the same operation whose literal
//! condition is identical collapse into a single provisional entry.

use super::{AddToken, Condition, LineEntry, RuleInstance};
use std::collections::BTreeMap;

/// Key identifying one morphological operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationKey {
    pub strip: String,
    pub add: AddToken,
}

pub fn group(instances: &[RuleInstance]) -> BTreeMap<OperationKey, Vec<LineEntry>> {
    let mut groups: BTreeMap<OperationKey, Vec<LineEntry>> = BTreeMap::new();

    for instance in instances {
        let add = AddToken::new(instance.add.as_str(), instance.morph.clone());
        let key = OperationKey { strip: instance.strip.clone(), add: add.clone() };
        let condition = Condition::literal(instance.kind, &instance.matched);
        let bucket = groups.entry(key).or_default();

        match bucket.iter_mut().find(|entry| entry.condition == condition) {
            Some(entry) => {
                entry.sources.insert(instance.source.clone());
            }
            None => bucket.push(
                LineEntry::new(&instance.strip, add, condition).with_sources([instance.source.as_str()]),
            ),
        }
    }

    log::debug!(
        "grouped {} instances into {} operations, {} provisional entries",
        instances.len(),
        groups.len(),
        groups.values().map(Vec::len).sum::<usize>()
    );
    groups
}
