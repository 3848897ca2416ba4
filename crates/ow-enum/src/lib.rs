//! Snapshot enumeration for the OpenWin namespace.
//!
//! A [`Snapshot`] is the immutable, shared set of records taken for one
//! enumeration session. A [`SnapshotEnumerator`] walks it with a private
//! cursor, encoding identifiers only when the host asks for them.

pub mod enumerator;
pub mod snapshot;

pub use enumerator::{FetchStatus, Fetched, SnapshotEnumerator};
pub use snapshot::Snapshot;
