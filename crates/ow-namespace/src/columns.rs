//! The fixed three-column details schema.

use ow_types::{Record, ShellError, ShellResult};
use serde::Serialize;

/// Low word of a host sort key selects the column; high bits carry host
/// modifiers this namespace ignores.
pub const COLUMN_MASK: u32 = 0x0000_FFFF;

/// Details columns, in host index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Column {
    Name = 0,
    Path = 1,
    Rank = 2,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Name, Column::Path, Column::Rank];

    /// Column at a zero-based host index.
    pub fn from_index(index: u32) -> ShellResult<Self> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| ShellError::invalid(format!("no column {index}")))
    }

    /// Column selected by a host sort key, modifiers masked off.
    pub fn from_sort_key(key: u32) -> ShellResult<Self> {
        Self::from_index(key & COLUMN_MASK)
            .map_err(|_| ShellError::invalid(format!("unknown sort key {key:#x}")))
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn title(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Path => "Path",
            Column::Rank => "Rank",
        }
    }

    pub fn align(self) -> Align {
        match self {
            Column::Rank => Align::Right,
            _ => Align::Left,
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::Rank => ColumnKind::Integer,
            _ => ColumnKind::Text,
        }
    }

    /// Header definition for this column.
    pub fn info(self) -> ColumnInfo {
        ColumnInfo {
            column: self,
            title: self.title(),
            align: self.align(),
            width_chars: match self {
                Column::Rank => 6,
                _ => 32,
            },
        }
    }

    /// Default presentation state.
    pub fn state(self) -> ColumnState {
        ColumnState {
            kind: self.kind(),
            on_by_default: true,
        }
    }

    /// Well-known property this column mirrors. Rank has none.
    pub fn property(self) -> Option<PropertyKey> {
        match self {
            Column::Name => Some(PropertyKey::ItemNameDisplay),
            Column::Path => Some(PropertyKey::ItemPathDisplay),
            Column::Rank => None,
        }
    }

    /// Render `record`'s value for this column.
    pub fn value(self, record: &Record) -> ColumnValue {
        let text = match self {
            Column::Name => record.name.to_string_lossy(),
            Column::Path => record.path.to_string_lossy(),
            Column::Rank => record.rank.to_string(),
        };
        let width_chars = match self {
            Column::Name => record.name.len(),
            Column::Path => record.path.len(),
            Column::Rank => 6,
        };
        ColumnValue {
            text,
            align: self.align(),
            width_chars,
        }
    }
}

/// Host property keys answered for items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PropertyKey {
    ItemNameDisplay,
    ItemPathDisplay,
    ItemType,
    /// Property lists that drive tile and preview layouts.
    TileInfo,
    ExtendedTileInfo,
    PreviewDetails,
    FullDetails,
}

impl PropertyKey {
    /// Canonical property name.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::ItemNameDisplay => "System.ItemNameDisplay",
            Self::ItemPathDisplay => "System.ItemPathDisplay",
            Self::ItemType => "System.ItemType",
            Self::TileInfo => "System.PropList.TileInfo",
            Self::ExtendedTileInfo => "System.PropList.ExtendedTileInfo",
            Self::PreviewDetails => "System.PropList.PreviewDetails",
            Self::FullDetails => "System.PropList.FullDetails",
        }
    }

    /// Value of this property for `record`.
    pub fn value(self, record: &Record) -> String {
        match self {
            Self::ItemNameDisplay => record.name.to_string_lossy(),
            Self::ItemPathDisplay => record.path.to_string_lossy(),
            Self::ItemType => "Directory".to_string(),
            Self::TileInfo | Self::ExtendedTileInfo | Self::PreviewDetails => {
                "prop:System.ItemPathDisplay".to_string()
            }
            Self::FullDetails => "prop:System.ItemNameDisplay;System.ItemPathDisplay".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Align {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Text,
    Integer,
}

/// Column header: title, alignment, and suggested width in characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub column: Column,
    pub title: &'static str,
    pub align: Align,
    pub width_chars: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnState {
    pub kind: ColumnKind,
    pub on_by_default: bool,
}

/// One rendered cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnValue {
    pub text: String,
    pub align: Align,
    pub width_chars: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_name_path_rank() {
        let titles: Vec<_> = Column::ALL.iter().map(|c| c.title()).collect();
        assert_eq!(titles, ["Name", "Path", "Rank"]);
        assert_eq!(Column::Rank.align(), Align::Right);
        assert_eq!(Column::Name.align(), Align::Left);
        assert_eq!(Column::Path.info().width_chars, 32);
    }

    #[test]
    fn index_out_of_range() {
        assert_eq!(Column::from_index(2).unwrap(), Column::Rank);
        assert!(Column::from_index(3).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn sort_key_masks_modifiers() {
        assert_eq!(Column::from_sort_key(0x1000_0001).unwrap(), Column::Path);
        assert!(Column::from_sort_key(7).is_err());
    }

    #[test]
    fn rank_renders_as_text() {
        let record = Record::new("Beta", "C:\\B", 1);
        let value = Column::Rank.value(&record);
        assert_eq!(value.text, "1");
        assert_eq!(value.align, Align::Right);
        assert_eq!(Column::Path.value(&record).text, "C:\\B");
    }

    #[test]
    fn columns_map_to_properties() {
        assert_eq!(Column::Name.property(), Some(PropertyKey::ItemNameDisplay));
        assert_eq!(Column::Path.property(), Some(PropertyKey::ItemPathDisplay));
        assert_eq!(Column::Rank.property(), None);

        let record = Record::new("Beta", "C:\\B", 1);
        assert_eq!(PropertyKey::ItemType.value(&record), "Directory");
        assert_eq!(PropertyKey::ItemPathDisplay.value(&record), "C:\\B");
        assert_eq!(
            PropertyKey::FullDetails.value(&record),
            "prop:System.ItemNameDisplay;System.ItemPathDisplay"
        );
        assert_eq!(PropertyKey::TileInfo.canonical_name(), "System.PropList.TileInfo");
    }

    #[test]
    fn states_match_kinds() {
        assert_eq!(Column::Rank.state().kind, ColumnKind::Integer);
        assert_eq!(Column::Name.state().kind, ColumnKind::Text);
        assert!(Column::ALL.iter().all(|c| c.state().on_by_default));
    }
}
