//! One-shot handoff buffer carrying a parent chain and its child items.
//!
//! Layout, little-endian:
//!
//! - `u32` item count `n`
//! - `u32` offsets, `n + 1` of them: the parent chain first, then each item
//! - the parent chain bytes, then each item chain, back to back
//!
//! Offsets are measured from the start of the buffer.

use ow_types::{IdAllocator, ShellResult};
use tracing::trace;

use crate::chain::IdChain;
use crate::error::{IdError, IdResult};

const WORD: usize = 4;

/// Contiguous parent-plus-child package for drag-and-drop or open actions.
#[derive(Clone, PartialEq, Eq)]
pub struct TransferPackage {
    bytes: Vec<u8>,
}

impl TransferPackage {
    /// Package `parent` followed by `child`.
    ///
    /// Neither chain is checked for ownership.
    pub fn build(
        parent: IdChain<'_>,
        child: IdChain<'_>,
        alloc: &dyn IdAllocator,
    ) -> ShellResult<Self> {
        let chains = [parent, child];
        let header = WORD * (1 + chains.len());
        let body: usize = chains.iter().map(IdChain::total_size).sum();

        let mut bytes = alloc.allocate(header + body)?;
        put_u32(&mut bytes, 0, (chains.len() - 1) as u32);

        let mut pos = header;
        for (i, chain) in chains.iter().enumerate() {
            put_u32(&mut bytes, WORD * (1 + i), pos as u32);
            bytes[pos..pos + chain.total_size()].copy_from_slice(chain.as_bytes());
            pos += chain.total_size();
        }
        trace!(size = bytes.len(), parent = %parent, child = %child, "built transfer package");
        Ok(Self { bytes })
    }

    /// Validate a package received from elsewhere.
    pub fn from_bytes(bytes: Vec<u8>) -> ShellResult<Self> {
        let package = Self { bytes };
        let count = package.count()?;
        package.chain_at(0)?;
        for i in 0..count {
            package.chain_at(i + 1)?;
        }
        Ok(package)
    }

    /// Number of child items (always 1 for packages built here).
    pub fn item_count(&self) -> usize {
        self.count().unwrap_or(0)
    }

    pub fn parent(&self) -> ShellResult<IdChain<'_>> {
        Ok(self.chain_at(0)?)
    }

    pub fn item(&self, index: usize) -> ShellResult<IdChain<'_>> {
        if index >= self.item_count() {
            return Err(IdError::CorruptPackage(format!("no item {index}")).into());
        }
        Ok(self.chain_at(index + 1)?)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn count(&self) -> IdResult<usize> {
        get_u32(&self.bytes, 0).map(|n| n as usize)
    }

    fn chain_at(&self, slot: usize) -> IdResult<IdChain<'_>> {
        let offset = get_u32(&self.bytes, WORD * (1 + slot))? as usize;
        let tail = self
            .bytes
            .get(offset..)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| IdError::CorruptPackage(format!("offset {offset} out of range")))?;
        IdChain::parse(tail)
            .map_err(|e| IdError::CorruptPackage(format!("chain at offset {offset}: {e}")))
    }
}

impl std::fmt::Debug for TransferPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferPackage")
            .field("size", &self.bytes.len())
            .field("items", &self.item_count())
            .finish()
    }
}

fn put_u32(buf: &mut [u8], at: usize, value: u32) {
    buf[at..at + WORD].copy_from_slice(&value.to_le_bytes());
}

fn get_u32(buf: &[u8], at: usize) -> IdResult<u32> {
    buf.get(at..at + WORD)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| IdError::CorruptPackage(format!("header truncated at {at}")))
}
