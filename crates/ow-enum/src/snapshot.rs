use std::sync::Arc;

use ow_types::Record;

/// Ordered, immutable records backing one enumeration session.
///
/// Cloning shares the underlying records. A provider replaces its snapshot
/// wholesale on every enumeration, so enumerators holding an older clone keep
/// seeing exactly what they were created with.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    records: Arc<[Record]>,
}

impl Snapshot {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// True when both handles share the same records.
    pub fn same_as(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}

impl FromIterator<Record> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
