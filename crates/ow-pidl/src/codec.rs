//! Packing a [`Record`] into one owned identifier segment.
//!
//! Segment layout, little-endian throughout:
//!
//! | offset | size | field                           |
//! |--------|------|---------------------------------|
//! | 0      | 2    | segment length (counts itself)  |
//! | 2      | 4    | magic tag `0xAA4F5755`          |
//! | 6      | 2    | padding, always zero            |
//! | 8      | 2    | rank                            |
//! | 10     | var  | path, UTF-16, NUL-terminated    |
//! | ..     | var  | name, UTF-16, NUL-terminated    |
//!
//! The segment is followed by the 2-byte chain terminator.

use ow_types::{IdAllocator, Rank, Record, ShellResult, WideString};

use crate::chain::{IdChain, IdList, Segment, LENGTH_PREFIX, TERMINATOR_SIZE};
use crate::error::{IdError, IdResult};

/// Ownership tag written at the start of every segment this namespace emits.
pub const MAGIC: u32 = 0xAA00_0055 | (0x4F57 << 8);

const MAGIC_OFFSET: usize = LENGTH_PREFIX;
const PADDING_OFFSET: usize = MAGIC_OFFSET + 4;
const RANK_OFFSET: usize = PADDING_OFFSET + 2;

/// Length prefix, magic, padding, and rank.
pub const HEADER_SIZE: usize = RANK_OFFSET + 2;

/// Exact segment length `encode` produces for `record`, terminator excluded.
pub fn segment_size(record: &Record) -> usize {
    HEADER_SIZE + record.path.encoded_len() + record.name.encoded_len()
}

/// Encode `record` as a single-segment chain.
///
/// The buffer comes from `alloc` in one piece and is fully written before it
/// is returned; allocation failure surfaces as `OutOfMemory`.
pub fn encode(record: &Record, alloc: &dyn IdAllocator) -> ShellResult<IdList> {
    let size = segment_size(record);
    let len = u16::try_from(size).map_err(|_| IdError::TooLarge { size })?;

    let mut buf = alloc.allocate(size + TERMINATOR_SIZE)?;
    buf[..LENGTH_PREFIX].copy_from_slice(&len.to_le_bytes());
    buf[MAGIC_OFFSET..PADDING_OFFSET].copy_from_slice(&MAGIC.to_le_bytes());
    buf[PADDING_OFFSET..RANK_OFFSET].copy_from_slice(&0u16.to_le_bytes());
    buf[RANK_OFFSET..HEADER_SIZE].copy_from_slice(&record.rank.to_le_bytes());

    let mut pos = HEADER_SIZE;
    for field in [&record.path, &record.name] {
        pos = write_wide(&mut buf, pos, field);
    }
    debug_assert_eq!(pos, size);
    buf[size..].fill(0);

    Ok(IdList::from_validated(buf))
}

fn write_wide(buf: &mut [u8], mut pos: usize, s: &WideString) -> usize {
    for unit in s.as_units().iter().chain(std::iter::once(&0u16)) {
        buf[pos..pos + 2].copy_from_slice(&unit.to_le_bytes());
        pos += 2;
    }
    pos
}

/// True when the chain's first segment carries this namespace's tag.
pub fn is_owned(chain: &IdChain<'_>) -> bool {
    chain.first().is_some_and(|seg| is_owned_segment(&seg))
}

/// True when `seg` is long enough for the header and carries the tag.
pub fn is_owned_segment(seg: &Segment<'_>) -> bool {
    let bytes = seg.as_bytes();
    bytes.len() >= HEADER_SIZE
        && u32::from_le_bytes([
            bytes[MAGIC_OFFSET],
            bytes[MAGIC_OFFSET + 1],
            bytes[MAGIC_OFFSET + 2],
            bytes[MAGIC_OFFSET + 3],
        ]) == MAGIC
}

fn owned_head<'a>(chain: &IdChain<'a>) -> IdResult<Segment<'a>> {
    chain
        .first()
        .filter(is_owned_segment)
        .ok_or(IdError::Foreign)
}

/// Rank stored in the chain's first segment.
pub fn rank(chain: &IdChain<'_>) -> ShellResult<Rank> {
    let seg = owned_head(chain)?;
    Ok(read_rank(&seg))
}

/// Path stored in the chain's first segment.
pub fn path(chain: &IdChain<'_>) -> ShellResult<WideString> {
    let seg = owned_head(chain)?;
    let (path, _) = read_wide(seg.as_bytes(), HEADER_SIZE, "path")?;
    Ok(path)
}

/// Name stored in the chain's first segment.
pub fn name(chain: &IdChain<'_>) -> ShellResult<WideString> {
    let seg = owned_head(chain)?;
    let (_, name_at) = read_wide(seg.as_bytes(), HEADER_SIZE, "path")?;
    let (name, _) = read_wide(seg.as_bytes(), name_at, "name")?;
    Ok(name)
}

/// Decode every field of an owned segment.
pub fn decode(seg: &Segment<'_>) -> ShellResult<Record> {
    if !is_owned_segment(seg) {
        return Err(IdError::Foreign.into());
    }
    let bytes = seg.as_bytes();
    let (path, name_at) = read_wide(bytes, HEADER_SIZE, "path")?;
    let (name, _) = read_wide(bytes, name_at, "name")?;
    Ok(Record {
        name,
        path,
        rank: read_rank(seg),
    })
}

fn read_rank(seg: &Segment<'_>) -> Rank {
    let bytes = seg.as_bytes();
    u16::from_le_bytes([bytes[RANK_OFFSET], bytes[RANK_OFFSET + 1]])
}

/// Read a NUL-terminated UTF-16 string starting at `start`, never past the
/// end of `bytes`. Returns the string and the offset after its terminator.
fn read_wide(bytes: &[u8], start: usize, field: &'static str) -> IdResult<(WideString, usize)> {
    let tail = bytes.get(start..).unwrap_or_default();
    let mut units = Vec::new();
    for (i, pair) in tail.chunks_exact(2).enumerate() {
        let unit = u16::from_le_bytes([pair[0], pair[1]]);
        if unit == 0 {
            return Ok((WideString::from_units(&units), start + (i + 1) * 2));
        }
        units.push(unit);
    }
    Err(IdError::Unterminated { field })
}
