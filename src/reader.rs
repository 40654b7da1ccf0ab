//! Streaming TLV tree reader
//!
//! [`DerReader`] is a cursor over a DER-encoded buffer. It decodes one
//! header at a time and never copies payload bytes; accessors hand out
//! slices borrowed from the backing buffer. Visited positions are recorded
//! in an offset map that allows jumping back to any known node and tracks
//! the byte bounds of each sibling chain.

use crate::error::{DerError, DerResult};
use crate::tlv::{header_at, tag_name, Class, Tag, RESTRICTED_TAGS};
use std::collections::BTreeMap;

/// Byte bounds of one sibling chain in the backing buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    /// Offset of the first element of the chain
    pub start: usize,
    /// Offset one past the last element of the chain
    pub end: usize,
}

/// Immutable description of the TLV element under the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvNode {
    /// Start of this element within the backing buffer
    pub offset: usize,
    /// The raw tag octet
    pub raw_tag: u8,
    /// Object class decoded from the tag octet
    pub class: Class,
    /// Tag number (bits 4-0)
    pub tag: Tag,
    /// Octets from the tag octet to the start of the payload
    pub header_len: usize,
    /// Offset of the first payload octet
    pub payload_offset: usize,
    /// Number of payload octets
    pub payload_len: usize,
    /// `header_len + payload_len`
    pub full_len: usize,
    /// Constructed flag, structural or detected (see [`DerReader`])
    pub constructed: bool,
    /// Next element in tree-walk order; 0 at end of input
    pub next_offset: usize,
    /// Next element of the same sibling chain; 0 at end of level
    pub next_sibling_offset: usize,
}

impl TlvNode {
    /// Human-readable label for this element's tag.
    pub fn tag_name(&self) -> String {
        tag_name(self.raw_tag)
    }
}

/// Stateful cursor over a DER-encoded byte buffer.
///
/// The reader borrows its backing buffer and is constructed positioned on
/// the root element. Construction fails on buffers shorter than two octets,
/// on a zero tag octet, and on a root element running past the end of the
/// buffer; a buffer longer than the root element is truncated to it.
///
/// A primitive universal element whose tag is not in [`RESTRICTED_TAGS`]
/// and whose payload parses as exactly one well-formed TLV is reported as
/// constructed, so `move_next` descends into encapsulated content (the
/// common OCTET STRING / BIT STRING wrapping).
pub struct DerReader<'a> {
    data: &'a [u8],
    node: TlvNode,
    offsets: BTreeMap<usize, Level>,
}

impl<'a> DerReader<'a> {
    /// Build a reader over `buffer`, positioned on the root element.
    pub fn new(buffer: &'a [u8]) -> DerResult<Self> {
        if buffer.is_empty() {
            return Err(DerError::EmptyInput);
        }
        if buffer.len() < 2 {
            return Err(DerError::InvalidData);
        }
        let hdr = header_at(buffer)?;
        if hdr.full_len() > buffer.len() {
            return Err(DerError::InvalidData);
        }
        // extra trailing bytes are not part of the root element
        let data = &buffer[..hdr.full_len()];
        let root = Level {
            start: 0,
            end: data.len(),
        };
        let mut offsets = BTreeMap::new();
        offsets.insert(0, root);
        let node = decode_at(data, &mut offsets, 0, root)?;
        Ok(DerReader {
            data,
            node,
            offsets,
        })
    }

    /// The element currently under the cursor.
    #[inline]
    pub fn node(&self) -> &TlvNode {
        &self.node
    }

    /// The backing buffer, truncated to the root element.
    #[inline]
    pub fn buffer(&self) -> &'a [u8] {
        self.data
    }

    /// The offset map of all positions discovered so far.
    #[inline]
    pub fn offset_map(&self) -> &BTreeMap<usize, Level> {
        &self.offsets
    }

    /// Advance in tree-walk order: descend into a constructed element,
    /// step past a primitive one. Returns `false` at end of input.
    pub fn move_next(&mut self) -> DerResult<bool> {
        let target = self.node.next_offset;
        if target == 0 {
            return Ok(false);
        }
        self.move_to(target)?;
        Ok(true)
    }

    /// Advance to the next element of the same sibling chain. Returns
    /// `false` at end of level.
    pub fn move_next_same_level(&mut self) -> DerResult<bool> {
        let target = self.node.next_sibling_offset;
        if target == 0 {
            return Ok(false);
        }
        self.move_to(target)?;
        Ok(true)
    }

    /// Jump to an offset already present in the offset map.
    pub fn move_to(&mut self, offset: usize) -> DerResult<()> {
        let level = *self.offsets.get(&offset).ok_or(DerError::InvalidData)?;
        self.node = decode_at(self.data, &mut self.offsets, offset, level)?;
        Ok(())
    }

    /// Seek back to the root element.
    pub fn reset(&mut self) -> DerResult<()> {
        self.move_to(0)
    }

    /// Walk the whole tree, filling the offset map, and return the total
    /// number of elements. Leaves the cursor on the root element.
    pub fn build_offset_map(&mut self) -> DerResult<usize> {
        self.reset()?;
        let mut count = 1;
        while self.move_next()? {
            count += 1;
        }
        self.reset()?;
        Ok(count)
    }

    /// Check that the current tag octet is one of `expected`.
    pub fn expect_tag(&self, expected: &[u8]) -> DerResult<()> {
        if expected.is_empty() {
            return Err(DerError::EmptyInput);
        }
        if expected.contains(&self.node.raw_tag) {
            Ok(())
        } else {
            Err(DerError::InvalidTag)
        }
    }

    /// Header octets of the current element (tag and length octets).
    #[inline]
    pub fn get_header(&self) -> &'a [u8] {
        &self.data[self.node.offset..self.node.offset + self.node.header_len]
    }

    /// Payload octets of the current element.
    #[inline]
    pub fn get_payload(&self) -> &'a [u8] {
        &self.data[self.node.payload_offset..self.node.payload_offset + self.node.payload_len]
    }

    /// The raw tag octet of the current element, as a one-byte slice.
    #[inline]
    pub fn get_tag_raw(&self) -> &'a [u8] {
        &self.data[self.node.offset..self.node.offset + 1]
    }

    /// The complete encoding of the current element.
    #[inline]
    pub fn get_tlv(&self) -> &'a [u8] {
        &self.data[self.node.offset..self.node.offset + self.node.full_len]
    }
}

impl core::fmt::Debug for DerReader<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DerReader")
            .field("len", &self.data.len())
            .field("node", &self.node)
            .finish()
    }
}

/// Decode the header at `offset` and compute the traversal attributes of
/// the element, updating the offset map with the positions it reveals.
fn decode_at(
    data: &[u8],
    offsets: &mut BTreeMap<usize, Level>,
    offset: usize,
    level: Level,
) -> DerResult<TlvNode> {
    let hdr = header_at(&data[offset..])?;
    let payload_offset = offset + hdr.header_len;
    let end = payload_offset + hdr.payload_len;
    if end > data.len() || end > level.end {
        return Err(DerError::InvalidData);
    }

    // first payload octet of a BIT STRING is the unused-bits count
    let skip = usize::from(hdr.class == Class::Universal && hdr.tag == Tag::BitString);

    let mut constructed = hdr.constructed;
    let mut child_start = 0usize;
    if hdr.payload_len > skip {
        let cs = payload_offset + skip;
        if constructed {
            child_start = cs;
        } else if hdr.class == Class::Universal
            && !RESTRICTED_TAGS.contains(&hdr.tag)
            && predict_chain(data, cs, end) == Some(1)
        {
            constructed = true;
            child_start = cs;
        }
        if child_start != 0 {
            offsets.insert(cs, Level { start: cs, end });
        }
    }

    let step_past = offset + hdr.full_len();
    let next_offset = if child_start != 0 {
        child_start
    } else if step_past < data.len() {
        step_past
    } else {
        0
    };
    let next_sibling_offset = if step_past < level.end { step_past } else { 0 };
    if next_sibling_offset != 0 {
        offsets.insert(next_sibling_offset, level);
    }
    offsets.insert(offset, level);

    Ok(TlvNode {
        offset,
        raw_tag: hdr.raw_tag,
        class: hdr.class,
        tag: hdr.tag,
        header_len: hdr.header_len,
        payload_offset,
        payload_len: hdr.payload_len,
        full_len: hdr.full_len(),
        constructed,
        next_offset,
        next_sibling_offset,
    })
}

/// Probe `[start, end)` for a chain of well-formed TLV elements.
///
/// Each candidate must start with a non-zero tag octet and use at most four
/// length octets. Returns the number of elements when the chain exactly
/// covers the range, `None` otherwise.
fn predict_chain(data: &[u8], start: usize, end: usize) -> Option<usize> {
    let mut pos = start;
    let mut count = 0usize;
    while pos < end {
        if data[pos] == 0 {
            return None;
        }
        let hdr = header_at(&data[pos..end]).ok()?;
        if hdr.full_len() > end - pos {
            return None;
        }
        pos += hdr.full_len();
        count += 1;
    }
    Some(count)
}
