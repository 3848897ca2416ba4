use ow_types::ShellError;
use thiserror::Error;

/// Wire-level defects found while reading identifier buffers.
///
/// Every variant surfaces to the host as [`ShellError::InvalidArgument`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("null identifier chain")]
    NullChain,

    #[error("missing chain terminator at offset {offset}")]
    MissingTerminator { offset: usize },

    #[error("segment at offset {offset} declares {len} bytes, no room past its length prefix")]
    SegmentTooShort { offset: usize, len: usize },

    #[error("segment at offset {offset} declares {len} bytes but only {available} remain")]
    SegmentOverrun {
        offset: usize,
        len: usize,
        available: usize,
    },

    #[error("identifier does not belong to this namespace")]
    Foreign,

    #[error("{field} is not terminated inside its segment")]
    Unterminated { field: &'static str },

    #[error("record needs {size} bytes, more than one segment can hold")]
    TooLarge { size: usize },

    #[error("corrupt transfer package: {0}")]
    CorruptPackage(String),
}

impl From<IdError> for ShellError {
    fn from(err: IdError) -> Self {
        ShellError::invalid(err.to_string())
    }
}

pub type IdResult<T> = Result<T, IdError>;
