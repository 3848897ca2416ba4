//! Foundation types for the OpenWin namespace.
//!
//! This crate provides the value types shared by every other OpenWin crate:
//! the [`Record`] backing one namespace entry, the UTF-16 [`WideString`] used
//! on the identifier wire format, the [`ShellError`] taxonomy reported to
//! hosts, and the [`IdAllocator`] seam through which every identifier buffer
//! is allocated.
//!
//! # Key Types
//!
//! - [`Record`]: One discovered entry with its display name, target path, and rank
//! - [`WideString`]: Owned UTF-16 code-unit string, ordered like `wcscmp`
//! - [`ShellError`]: `InvalidArgument`, `OutOfMemory`, `NotReady`, `Unsupported`, `Resolve`
//! - [`IdAllocator`]: Injected allocation for identifier buffers

pub mod alloc;
pub mod error;
pub mod record;

pub use alloc::{HeapAllocator, IdAllocator};
pub use error::{ShellError, ShellResult};
pub use record::{Rank, Record, WideString};
