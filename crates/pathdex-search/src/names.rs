use std::collections::HashMap;
use std::ops::ControlFlow;

use pathdex_index::Indexer;
use pathdex_types::IndexedRecord;

/// Records grouped by lowercase base name.
///
/// Derived from a full traversal of the index, so it reflects the index
/// only as of the last [`NameIndex::build`].
#[derive(Clone, Debug, Default)]
pub struct NameIndex {
    by_name: HashMap<String, Vec<IndexedRecord>>,
    records: usize,
}

impl NameIndex {
    pub fn build(indexer: &Indexer) -> Self {
        let mut names = Self::default();
        let _ = indexer.for_each_record(|record| {
            names.insert(record.clone());
            ControlFlow::Continue(())
        });
        names
    }

    pub fn insert(&mut self, record: IndexedRecord) {
        self.by_name
            .entry(record.file_name().to_lowercase())
            .or_default()
            .push(record);
        self.records += 1;
    }

    /// Records whose base name is exactly `name`, ignoring case.
    pub fn get(&self, name: &str) -> &[IndexedRecord] {
        self.by_name
            .get(&name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate `(lowercase name, records)` groups in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[IndexedRecord])> {
        self.by_name
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Distinct names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Total records across all names.
    pub fn record_count(&self) -> usize {
        self.records
    }
}
