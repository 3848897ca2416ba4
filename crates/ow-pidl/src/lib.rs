//! Identifier codec for the OpenWin namespace.
//!
//! Hosts address namespace entries through opaque, length-prefixed byte
//! chains. This crate owns that wire format end to end.
//!
//! # Architecture
//!
//! - **Codec** ([`codec`]): packs a [`Record`](ow_types::Record) into one
//!   tagged segment and reads the fields back, refusing foreign segments
//! - **Chain** ([`chain`]): validation and navigation over concatenated
//!   segments ending in a zero-length terminator, plus the owned [`IdList`]
//! - **Item view** ([`item`]): a chain classified once as root, foreign, or
//!   owned-with-rest
//! - **Transfer** ([`transfer`]): the parent-plus-child handoff buffer

pub mod chain;
pub mod codec;
pub mod error;
pub mod item;
pub mod transfer;

pub use chain::{IdChain, IdList, Segment, Segments, LENGTH_PREFIX, TERMINATOR_SIZE};
pub use codec::{encode, is_owned, HEADER_SIZE, MAGIC};
pub use error::{IdError, IdResult};
pub use item::ItemRef;
pub use transfer::TransferPackage;
