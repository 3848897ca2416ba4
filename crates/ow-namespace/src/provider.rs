use std::cmp::Ordering;
use std::sync::Arc;

use ow_enum::{Snapshot, SnapshotEnumerator};
use ow_pidl::{is_owned, IdChain, IdList, ItemRef, TransferPackage};
use ow_types::{HeapAllocator, IdAllocator, Rank, Record, ShellError, ShellResult, WideString};
use tracing::{debug, trace, warn};

use crate::attributes::Attributes;
use crate::columns::{Column, ColumnInfo, ColumnState, ColumnValue, PropertyKey};
use crate::config::NamespaceConfig;
use crate::display::{DisplayMode, NameIntent, NameScope};
use crate::resolver::{FolderHandle, PathResolver};
use crate::source::{CallerContext, RecordSource};

/// Result of comparing two identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOutcome {
    Ordered(Ordering),
    /// At least one side has more than one segment; no order is defined.
    Unordered,
}

impl CompareOutcome {
    /// The signed 16-bit code a host expects, as its unsigned bit pattern.
    /// Unordered pairs report "greater" so hosts never treat them as equal.
    pub fn host_code(self) -> u16 {
        match self {
            Self::Ordered(Ordering::Less) => 0xFFFF,
            Self::Ordered(Ordering::Equal) => 0,
            Self::Ordered(Ordering::Greater) | Self::Unordered => 1,
        }
    }
}

/// The open-windows namespace as seen by a host.
///
/// Each [`enumerate`](Self::enumerate) replaces the provider's snapshot;
/// enumerators already handed out keep the snapshot they started with.
#[derive(Debug)]
pub struct NamespaceProvider {
    root: Option<IdList>,
    snapshot: Snapshot,
    source: Arc<dyn RecordSource>,
    resolver: Arc<dyn PathResolver>,
    alloc: Arc<dyn IdAllocator>,
    config: NamespaceConfig,
}

impl NamespaceProvider {
    pub fn new(
        source: Arc<dyn RecordSource>,
        resolver: Arc<dyn PathResolver>,
        alloc: Arc<dyn IdAllocator>,
        config: NamespaceConfig,
    ) -> Self {
        Self {
            root: None,
            snapshot: Snapshot::default(),
            source,
            resolver,
            alloc,
            config,
        }
    }

    /// Provider using the heap allocator and default configuration.
    pub fn with_defaults(source: Arc<dyn RecordSource>, resolver: Arc<dyn PathResolver>) -> Self {
        Self::new(
            source,
            resolver,
            Arc::new(HeapAllocator),
            NamespaceConfig::default(),
        )
    }

    pub fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    /// The snapshot from the most recent enumeration.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Record the absolute identifier the host mounted this namespace at.
    /// Calling again replaces it.
    pub fn initialize(&mut self, root: IdChain<'_>) -> ShellResult<()> {
        let copy = root.to_id_list(self.alloc.as_ref())?;
        if self.root.is_some() {
            warn!(root = %root, "re-initializing provider root");
        }
        debug!(root = %root, "initialized");
        self.root = Some(copy);
        Ok(())
    }

    /// A fresh copy of the root identifier.
    pub fn current_folder(&self) -> ShellResult<IdList> {
        let root = self.root.as_ref().ok_or(ShellError::NotReady)?;
        root.as_chain().to_id_list(self.alloc.as_ref())
    }

    /// Rebuild the snapshot from the record source and return an enumerator
    /// over it.
    ///
    /// Candidates with an empty path or at the placeholder path are dropped.
    /// Ranks count up from zero over the records that remain.
    pub fn enumerate(&mut self, caller: &CallerContext) -> ShellResult<SnapshotEnumerator> {
        let discovered = self.source.discover(caller)?;
        let placeholder = self.config.placeholder.resolve();
        let limit = self.config.record_limit();

        let mut records: Vec<Record> = Vec::with_capacity(discovered.len().min(limit));
        let mut skipped = 0usize;
        for candidate in discovered {
            if candidate.path.is_empty() || placeholder.as_ref() == Some(&candidate.path) {
                trace!(name = %candidate.name, "skipping candidate");
                skipped += 1;
                continue;
            }
            if records.len() == limit {
                warn!(limit, "record limit reached, dropping remaining candidates");
                break;
            }
            let rank = records.len() as Rank;
            records.push(Record {
                name: candidate.name,
                path: candidate.path,
                rank,
            });
        }

        debug!(count = records.len(), skipped, "enumerated");
        self.snapshot = Snapshot::new(records);
        Ok(SnapshotEnumerator::new(
            self.snapshot.clone(),
            Arc::clone(&self.alloc),
        ))
    }

    /// Order two identifiers by the column selected in `sort_key`.
    ///
    /// Both sides must be owned. Multi-segment identifiers are unordered.
    pub fn compare(
        &self,
        sort_key: u32,
        a: IdChain<'_>,
        b: IdChain<'_>,
    ) -> ShellResult<CompareOutcome> {
        let (
            ItemRef::Owned {
                record: ra,
                rest: a_rest,
            },
            ItemRef::Owned {
                record: rb,
                rest: b_rest,
            },
        ) = (ItemRef::classify(a)?, ItemRef::classify(b)?)
        else {
            return Err(ShellError::invalid("can only compare identifiers from this namespace"));
        };
        if !a_rest.is_empty() || !b_rest.is_empty() {
            return Ok(CompareOutcome::Unordered);
        }
        let ordering = match Column::from_sort_key(sort_key)? {
            Column::Name => ra.name.cmp(&rb.name),
            Column::Path => ra.path.cmp(&rb.path),
            Column::Rank => ra.rank.cmp(&rb.rank),
        };
        trace!(sort_key, a = %a, b = %b, ?ordering, "compare");
        Ok(CompareOutcome::Ordered(ordering))
    }

    /// Bind an owned identifier to a folder: its first segment's path is
    /// resolved, then any deeper segments are bound inside that folder.
    pub fn bind(&self, id: IdChain<'_>) -> ShellResult<Arc<dyn FolderHandle>> {
        let ItemRef::Owned { record, rest } = ItemRef::classify(id)? else {
            return Err(ShellError::invalid("can only bind items from this namespace"));
        };
        debug!(path = %record.path, depth = rest.segment_count(), "bind");
        let folder = self.resolver.resolve(&record.path)?;
        if rest.is_empty() {
            Ok(folder)
        } else {
            folder.bind(rest)
        }
    }

    /// Name for the root or an item, chosen by `mode`.
    pub fn display_name(&self, id: IdChain<'_>, mode: DisplayMode) -> ShellResult<WideString> {
        match ItemRef::classify(id)? {
            ItemRef::Root => {
                if mode != DisplayMode::NORMAL_PARSING {
                    return Err(ShellError::unsupported(format!(
                        "root display name for {mode:?}"
                    )));
                }
                self.config
                    .placeholder
                    .resolve()
                    .ok_or_else(|| ShellError::unsupported("root parsing name without placeholder"))
            }
            ItemRef::Foreign(_) => Err(ShellError::invalid(
                "display names are only available for items from this namespace",
            )),
            ItemRef::Owned { record, .. } => match (mode.scope, mode.intent) {
                (NameScope::Normal | NameScope::InFolder, NameIntent::Parsing) => Ok(record.path),
                (_, NameIntent::Editing) => Err(ShellError::unsupported("editing name")),
                _ => Ok(record.name),
            },
        }
    }

    /// Renaming is not offered.
    pub fn set_name_of(&self, _id: IdChain<'_>, _name: &WideString) -> ShellResult<IdList> {
        Err(ShellError::unsupported("rename"))
    }

    /// Headers for all details columns.
    pub fn columns(&self) -> Vec<ColumnInfo> {
        Column::ALL.iter().map(|c| c.info()).collect()
    }

    pub fn column_header(&self, index: u32) -> ShellResult<ColumnInfo> {
        Ok(Column::from_index(index)?.info())
    }

    /// Cell value for an owned item.
    pub fn column_value(&self, id: IdChain<'_>, index: u32) -> ShellResult<ColumnValue> {
        let column = Column::from_index(index)?;
        let item = ItemRef::classify(id)?;
        let record = item.record().ok_or_else(|| {
            ShellError::invalid("column values are only available for owned items")
        })?;
        Ok(column.value(record))
    }

    pub fn column_state(&self, index: u32) -> ShellResult<ColumnState> {
        Ok(Column::from_index(index)?.state())
    }

    /// Property key mirrored by a column. Rank maps to none.
    pub fn column_property(&self, index: u32) -> ShellResult<PropertyKey> {
        let column = Column::from_index(index)?;
        column
            .property()
            .ok_or_else(|| ShellError::unsupported(format!("property for column {index}")))
    }

    /// Property value for an owned item.
    pub fn property_value(&self, id: IdChain<'_>, key: PropertyKey) -> ShellResult<WideString> {
        let item = ItemRef::classify(id)?;
        let record = item.record().ok_or_else(|| {
            ShellError::invalid("properties are only available for owned items")
        })?;
        trace!(id = %id, property = key.canonical_name(), "property");
        Ok(WideString::from(key.value(record)))
    }

    /// `(sort, display)` defaults.
    pub fn default_columns(&self) -> (Column, Column) {
        (Column::Rank, Column::Name)
    }

    /// Narrow `requested` to what the root (no items) or items support.
    pub fn attributes_of(&self, items: &[IdChain<'_>], requested: Attributes) -> Attributes {
        let root_only = items.is_empty() || items.iter().all(IdChain::is_empty);
        let granted = if root_only {
            Attributes::ROOT
        } else {
            Attributes::ITEM
        };
        requested & granted
    }

    /// Transfer package for exactly one owned item, parented at the root.
    pub fn data_object(&self, items: &[IdChain<'_>]) -> ShellResult<TransferPackage> {
        let [item] = items else {
            return Err(ShellError::invalid(format!(
                "transfer needs exactly one item, got {}",
                items.len()
            )));
        };
        if !is_owned(item) {
            return Err(ShellError::invalid("can only transfer items from this namespace"));
        }
        let root = self.root.as_ref().ok_or(ShellError::NotReady)?;
        TransferPackage::build(root.as_chain(), *item, self.alloc.as_ref())
    }
}
