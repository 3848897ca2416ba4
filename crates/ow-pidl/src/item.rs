use std::fmt;

use ow_types::{Record, ShellResult};

use crate::chain::{IdChain, Segment};
use crate::codec;

/// A chain classified once at the host boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemRef<'a> {
    /// Terminator-only chain: the provider's own root.
    Root,
    /// First segment belongs to another namespace.
    Foreign(Segment<'a>),
    /// First segment is ours; `rest` holds any deeper segments unexamined.
    Owned { record: Record, rest: IdChain<'a> },
}

impl<'a> ItemRef<'a> {
    /// Classify `chain` by inspecting only its first segment.
    ///
    /// A tagged segment whose strings are not terminated inside it is an
    /// error rather than a foreign item.
    pub fn classify(chain: IdChain<'a>) -> ShellResult<Self> {
        let Some(head) = chain.first() else {
            return Ok(Self::Root);
        };
        if !codec::is_owned_segment(&head) {
            return Ok(Self::Foreign(head));
        }
        let record = codec::decode(&head)?;
        let rest = chain.next_chain().unwrap_or_else(IdChain::root);
        Ok(Self::Owned { record, rest })
    }

    /// Owned and nothing after the first segment.
    pub fn is_single_owned(&self) -> bool {
        matches!(self, Self::Owned { rest, .. } if rest.is_empty())
    }

    pub fn record(&self) -> Option<&Record> {
        match self {
            Self::Owned { record, .. } => Some(record),
            _ => None,
        }
    }
}

/// Trace rendering: owned segments by name, foreign ones by size.
impl fmt::Display for IdChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("<root>");
        }
        for (i, seg) in self.segments().enumerate() {
            if i > 0 {
                f.write_str("::")?;
            }
            match codec::decode(&seg) {
                Ok(record) => write!(f, "{}", record.name)?,
                Err(_) => write!(f, "<foreign:{}>", seg.size())?,
            }
        }
        Ok(())
    }
}
