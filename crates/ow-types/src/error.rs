use thiserror::Error;

/// Failure signals reported to the host.
///
/// A short read (fewer items than requested because a snapshot ran out) is
/// not an error and is reported through the enumerator's fetch status instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShellError {
    /// Malformed or foreign identifier, missing required input, or an
    /// unsupported mode or column index.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// An identifier, copy, or transfer buffer could not be allocated.
    #[error("out of memory allocating {requested} bytes")]
    OutOfMemory { requested: usize },

    /// The operation requires initialization that has not happened yet.
    #[error("object not ready")]
    NotReady,

    /// The namespace is read-only; the operation is structurally unsupported.
    #[error("operation not supported: {operation}")]
    Unsupported { operation: String },

    /// The path resolver could not turn a path into a folder.
    #[error("failed to resolve {path}: {reason}")]
    Resolve { path: String, reason: String },
}

impl ShellError {
    /// Shorthand for [`ShellError::InvalidArgument`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ShellError::Unsupported`].
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// True for argument-validation failures.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// Convenience type alias used across the OpenWin crates.
pub type ShellResult<T> = Result<T, ShellError>;
