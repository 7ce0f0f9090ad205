use std::collections::HashSet;

use crate::record::Record;

/// Canonical ordered result set: newest merged batch first, keys unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultCollection {
    records: Vec<Record>,
}

impl ResultCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn keys(&self) -> impl Iterator<Item = Option<&str>> {
        self.records.iter().map(Record::key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys().any(|existing| existing == Some(key))
    }
}

/// Prepends the records of `incoming` whose key is not yet present.
///
/// Returns the new collection and how many records were actually inserted.
/// Records without any identity field share the "no key" identity, so at most
/// one of them is ever kept. Duplicates inside `incoming` keep the first occurrence.
pub fn merge(existing: ResultCollection, incoming: Vec<Record>) -> (ResultCollection, usize) {
    let mut seen: HashSet<Option<String>> = existing
        .records
        .iter()
        .map(|record| record.key().map(ToOwned::to_owned))
        .collect();

    let fresh: Vec<Record> = incoming
        .into_iter()
        .filter(|record| seen.insert(record.key().map(ToOwned::to_owned)))
        .collect();

    let inserted = fresh.len();
    if inserted == 0 {
        return (existing, 0);
    }

    let mut records = fresh;
    records.extend(existing.records);
    (ResultCollection { records }, inserted)
}
