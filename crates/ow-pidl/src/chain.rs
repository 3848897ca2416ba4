//! Length-prefixed identifier chains.
//!
//! A chain is a run of segments, each starting with a little-endian `u16`
//! byte count that includes the count itself, terminated by a segment whose
//! count is zero. The terminator-only chain addresses the provider's root.

use ow_types::{IdAllocator, ShellResult};

use crate::error::{IdError, IdResult};

/// Size of the `u16` length prefix at the start of every segment.
pub const LENGTH_PREFIX: usize = 2;

/// Size of the zero-length segment closing every chain.
pub const TERMINATOR_SIZE: usize = 2;

const ROOT_BYTES: [u8; TERMINATOR_SIZE] = [0, 0];

fn read_len(bytes: &[u8], offset: usize) -> usize {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]]) as usize
}

/// One non-terminator segment, length prefix included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment<'a> {
    bytes: &'a [u8],
}

impl<'a> Segment<'a> {
    /// The segment's own declared length.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Bytes following the length prefix.
    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[LENGTH_PREFIX..]
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Borrowed view over a validated chain.
///
/// The view covers exactly [`IdChain::total_size`] bytes: every segment plus
/// the terminator. Bytes past the terminator in the source buffer are not
/// part of the chain and are never read again.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct IdChain<'a> {
    bytes: &'a [u8],
}

impl<'a> IdChain<'a> {
    /// Validate a raw host buffer.
    ///
    /// An empty buffer stands in for a null chain. Length prefixes must
    /// partition the buffer up to a terminator without overrunning it.
    pub fn parse(buf: &'a [u8]) -> ShellResult<Self> {
        Ok(Self::walk(buf)?)
    }

    fn walk(buf: &'a [u8]) -> IdResult<Self> {
        if buf.is_empty() {
            return Err(IdError::NullChain);
        }
        let mut offset = 0;
        loop {
            if buf.len() - offset < LENGTH_PREFIX {
                return Err(IdError::MissingTerminator { offset });
            }
            let len = read_len(buf, offset);
            if len == 0 {
                return Ok(Self {
                    bytes: &buf[..offset + TERMINATOR_SIZE],
                });
            }
            if len <= LENGTH_PREFIX {
                return Err(IdError::SegmentTooShort { offset, len });
            }
            let available = buf.len() - offset;
            if len > available {
                return Err(IdError::SegmentOverrun {
                    offset,
                    len,
                    available,
                });
            }
            offset += len;
        }
    }

    /// Wrap bytes already known to form exactly one terminated chain.
    pub(crate) fn from_validated(bytes: &'a [u8]) -> Self {
        debug_assert_eq!(Self::walk(bytes).map(|c| c.bytes.len()), Ok(bytes.len()));
        Self { bytes }
    }

    /// The terminator-only chain, usable at any lifetime.
    pub fn root() -> Self {
        IdChain { bytes: &ROOT_BYTES }
    }

    /// Sum of all segment lengths plus the terminator.
    pub fn total_size(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// True for the terminator-only chain.
    pub fn is_empty(&self) -> bool {
        read_len(self.bytes, 0) == 0
    }

    /// The first real segment, if any.
    pub fn first(&self) -> Option<Segment<'a>> {
        let len = read_len(self.bytes, 0);
        (len != 0).then(|| Segment {
            bytes: &self.bytes[..len],
        })
    }

    /// The chain starting right after the first segment.
    pub fn next_chain(&self) -> Option<IdChain<'a>> {
        self.first().map(|seg| IdChain {
            bytes: &self.bytes[seg.size()..],
        })
    }

    /// True iff exactly one real segment precedes the terminator.
    pub fn is_single(&self) -> bool {
        self.next_chain().is_some_and(|rest| rest.is_empty())
    }

    /// Iterate over the real segments in order.
    pub fn segments(&self) -> Segments<'a> {
        Segments { chain: *self }
    }

    pub fn segment_count(&self) -> usize {
        self.segments().count()
    }

    /// The last non-terminator segment, or `None` for the root chain.
    pub fn last_real_segment(&self) -> Option<Segment<'a>> {
        self.segments().last()
    }

    /// Byte-exact, caller-owned copy allocated through `alloc`.
    pub fn to_id_list(&self, alloc: &dyn IdAllocator) -> ShellResult<IdList> {
        let mut buf = alloc.allocate(self.total_size())?;
        buf.copy_from_slice(self.bytes);
        Ok(IdList { bytes: buf })
    }
}

/// Iterator over the real segments of a chain.
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    chain: IdChain<'a>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let seg = self.chain.first()?;
        self.chain = IdChain {
            bytes: &self.chain.bytes[seg.size()..],
        };
        Some(seg)
    }
}

/// An owned, terminated identifier chain.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IdList {
    bytes: Vec<u8>,
}

impl IdList {
    /// The terminator-only chain addressing a provider's root.
    pub fn root() -> Self {
        Self {
            bytes: ROOT_BYTES.to_vec(),
        }
    }

    /// Take ownership of a raw buffer, dropping anything past the terminator.
    pub fn from_bytes(mut bytes: Vec<u8>) -> ShellResult<Self> {
        let total = IdChain::parse(&bytes)?.total_size();
        bytes.truncate(total);
        Ok(Self { bytes })
    }

    pub(crate) fn from_validated(bytes: Vec<u8>) -> Self {
        debug_assert!(IdChain::walk(&bytes).is_ok());
        Self { bytes }
    }

    /// Build the absolute chain `parent` followed by `child`.
    pub fn concat(
        parent: IdChain<'_>,
        child: IdChain<'_>,
        alloc: &dyn IdAllocator,
    ) -> ShellResult<Self> {
        let head = parent.total_size() - TERMINATOR_SIZE;
        let mut buf = alloc.allocate(head + child.total_size())?;
        buf[..head].copy_from_slice(&parent.as_bytes()[..head]);
        buf[head..].copy_from_slice(child.as_bytes());
        Ok(Self::from_validated(buf))
    }

    pub fn as_chain(&self) -> IdChain<'_> {
        IdChain::from_validated(&self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn total_size(&self) -> usize {
        self.bytes.len()
    }
}

impl std::fmt::Debug for IdList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IdList({})", self.as_chain())
    }
}

impl std::fmt::Debug for IdChain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IdChain({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ow_types::{HeapAllocator, ShellError};

    /// Build a chain from raw payloads.
    fn chain_of(payloads: &[&[u8]]) -> Vec<u8> {
        let mut buf = Vec::new();
        for p in payloads {
            let len = (p.len() + LENGTH_PREFIX) as u16;
            buf.extend_from_slice(&len.to_le_bytes());
            buf.extend_from_slice(p);
        }
        buf.extend_from_slice(&[0, 0]);
        buf
    }

    #[test]
    fn root_chain_is_empty() {
        let root = IdChain::root();
        assert!(root.is_empty());
        assert!(!root.is_single());
        assert_eq!(root.total_size(), TERMINATOR_SIZE);
        assert!(root.first().is_none());
        assert!(root.next_chain().is_none());
        assert!(root.last_real_segment().is_none());
    }

    #[test]
    fn parse_null_chain_rejected() {
        let err = IdChain::parse(&[]).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn parse_single_segment() {
        let bytes = chain_of(&[b"abcd"]);
        let chain = IdChain::parse(&bytes).unwrap();
        assert_eq!(chain.total_size(), 6 + TERMINATOR_SIZE);
        assert!(chain.is_single());
        let seg = chain.first().unwrap();
        assert_eq!(seg.size(), 6);
        assert_eq!(seg.payload(), b"abcd");
    }

    #[test]
    fn parse_ignores_trailing_bytes() {
        let mut bytes = chain_of(&[b"xy"]);
        bytes.extend_from_slice(&[0xFF; 7]);
        let chain = IdChain::parse(&bytes).unwrap();
        assert_eq!(chain.total_size(), 4 + TERMINATOR_SIZE);
    }

    #[test]
    fn parse_rejects_overrun() {
        let mut bytes = chain_of(&[b"abcd"]);
        bytes[0] = 40;
        let err = IdChain::walk(&bytes).unwrap_err();
        assert!(matches!(err, IdError::SegmentOverrun { offset: 0, len: 40, .. }));
    }

    #[test]
    fn parse_rejects_missing_terminator() {
        let mut bytes = chain_of(&[b"abcd"]);
        bytes.truncate(6);
        let err = IdChain::walk(&bytes).unwrap_err();
        assert_eq!(err, IdError::MissingTerminator { offset: 6 });
    }

    #[test]
    fn parse_rejects_degenerate_segment() {
        let bytes = [2u8, 0, 0, 0];
        let err = IdChain::walk(&bytes).unwrap_err();
        assert_eq!(err, IdError::SegmentTooShort { offset: 0, len: 2 });
    }

    #[test]
    fn multi_segment_navigation() {
        let bytes = chain_of(&[b"one", b"second", b"3"]);
        let chain = IdChain::parse(&bytes).unwrap();
        assert!(!chain.is_single());
        assert_eq!(chain.segment_count(), 3);
        assert_eq!(chain.total_size(), 5 + 8 + 3 + TERMINATOR_SIZE);

        let rest = chain.next_chain().unwrap();
        assert_eq!(rest.first().unwrap().payload(), b"second");
        assert_eq!(rest.total_size(), 8 + 3 + TERMINATOR_SIZE);

        let last = chain.last_real_segment().unwrap();
        assert_eq!(last.payload(), b"3");
    }

    #[test]
    fn copy_is_byte_exact_and_independent() {
        let bytes = chain_of(&[b"one", b"two"]);
        let chain = IdChain::parse(&bytes).unwrap();
        let copy = chain.to_id_list(&HeapAllocator).unwrap();
        assert_eq!(copy.as_bytes(), chain.as_bytes());
        drop(bytes);
        assert_eq!(copy.as_chain().segment_count(), 2);
    }

    #[test]
    fn from_bytes_truncates_to_chain() {
        let mut bytes = chain_of(&[b"abc"]);
        bytes.extend_from_slice(&[9, 9, 9]);
        let list = IdList::from_bytes(bytes).unwrap();
        assert_eq!(list.total_size(), 5 + TERMINATOR_SIZE);
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        let err = IdList::from_bytes(vec![7]).unwrap_err();
        assert!(matches!(err, ShellError::InvalidArgument { .. }));
    }

    #[test]
    fn concat_joins_parent_and_child() {
        let parent = IdList::from_bytes(chain_of(&[b"pp"])).unwrap();
        let child = IdList::from_bytes(chain_of(&[b"cc", b"dd"])).unwrap();
        let joined = IdList::concat(parent.as_chain(), child.as_chain(), &HeapAllocator).unwrap();
        assert_eq!(joined.as_bytes(), chain_of(&[b"pp", b"cc", b"dd"]).as_slice());

        let from_root =
            IdList::concat(IdChain::root(), child.as_chain(), &HeapAllocator).unwrap();
        assert_eq!(from_root, child);
    }
}
