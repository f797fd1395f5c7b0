//! JBitPack decoder — one segment at a time, forward only.
//!
//! Reading a segment:
//!   (a) read the tag octet; 0 and anything past the last tag are invalid
//!   (b) variable classes: read the u16be / u64be size field
//!   (c) fixed classes: the width is implied by the tag
//!   (d) read exactly that many payload bytes; fewer is a short read
//!
//! Containers are read as an index segment followed by exactly the number
//! of members it declares.  Members must be non-container segments and map
//! keys must be plain string segments.

use std::io::{self, Read};

use tracing::trace;

use crate::config::DecodeLimits;
use crate::constants::{HUGE_SIZE_FIELD, READ_CHUNK, REGULAR_SIZE_FIELD};
use crate::container::{SegmentList, SegmentMap};
use crate::errors::{CodecError, Result};
use crate::segment::Segment;
use crate::tag::Tag;
use crate::value::Field;

/// Stateful reader over an octet stream.
///
/// A decode error leaves the stream at an unknown position; callers must
/// discard it rather than try to resume.
#[derive(Debug)]
pub struct Decoder<R> {
    reader: R,
    limits: DecodeLimits,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Decoder::with_limits(reader, DecodeLimits::default())
    }

    pub fn with_limits(reader: R, limits: DecodeLimits) -> Self {
        Decoder { reader, limits }
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Decode exactly one segment.
    pub fn read_segment(&mut self) -> Result<Segment> {
        let [code] = self.read_array::<1>()?;
        let tag = Tag::try_from(code)?;

        let len = match tag.size_field_width() {
            REGULAR_SIZE_FIELD => u64::from(u16::from_be_bytes(self.read_array()?)),
            HUGE_SIZE_FIELD => u64::from_be_bytes(self.read_array()?),
            _ => tag.fixed_width().unwrap_or_default() as u64,
        };
        if tag.is_variable() && len > self.limits.max_payload_len {
            return Err(CodecError::LimitExceeded(format!(
                "{} payload of {} bytes exceeds {}",
                tag, len, self.limits.max_payload_len
            )));
        }

        let value = self.read_payload(len)?;
        trace!(tag = %tag, len, "decoded segment");
        Segment::from_parts(tag, value)
    }

    /// Decode one segment that may live inside a container.
    pub fn read_field(&mut self) -> Result<Field> {
        Field::new(self.read_segment()?)
    }

    /// Decode a list: its index segment, then that many items.
    pub fn read_list(&mut self) -> Result<SegmentList> {
        let index = self.read_segment()?;
        let count = index.get_list_count()?;
        self.check_container_len(count)?;

        let mut list = SegmentList::with_capacity(bounded_capacity(count));
        for _ in 0..count {
            list.push(self.read_field()?);
        }
        Ok(list)
    }

    /// Decode a map: its index segment, then that many key/value pairs.
    pub fn read_map(&mut self) -> Result<SegmentMap> {
        let index = self.read_segment()?;
        let count = index.get_map_count()?;
        self.check_container_len(count)?;

        let mut map = SegmentMap::with_capacity(bounded_capacity(count));
        for _ in 0..count {
            let key = self.read_segment()?;
            if key.tag() != Tag::String {
                return Err(CodecError::InvalidKey(format!(
                    "map key must be a String segment, found {}",
                    key.tag()
                )));
            }
            let key = String::from_utf8(key.into_value()).map_err(|_| CodecError::Utf8(Tag::String))?;
            let value = self.read_field()?;
            if map.contains_key(&key) {
                return Err(CodecError::DuplicateKey(key));
            }
            map.insert(key, value);
        }
        Ok(map)
    }

    fn check_container_len(&self, count: u64) -> Result<()> {
        if count > self.limits.max_container_len {
            return Err(CodecError::LimitExceeded(format!(
                "container of {} members exceeds {}",
                count, self.limits.max_container_len
            )));
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        let mut filled = 0;
        while filled < N {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(CodecError::ShortRead {
                        needed: N as u64,
                        got: filled as u64,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(CodecError::ShortRead {
                        needed: N as u64,
                        got: filled as u64,
                    })
                }
                Err(e) => return Err(CodecError::Io(e)),
            }
        }
        Ok(buf)
    }

    // The buffer grows as bytes arrive rather than trusting the declared
    // length up front.
    fn read_payload(&mut self, len: u64) -> Result<Vec<u8>> {
        let mut value = Vec::with_capacity(bounded_capacity(len));
        match (&mut self.reader).take(len).read_to_end(&mut value) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {}
            Err(e) => return Err(CodecError::Io(e)),
        }
        if (value.len() as u64) < len {
            return Err(CodecError::ShortRead {
                needed: len,
                got: value.len() as u64,
            });
        }
        Ok(value)
    }
}

fn bounded_capacity(len: u64) -> usize {
    usize::try_from(len).map_or(READ_CHUNK, |len| len.min(READ_CHUNK))
}

/// Decode the segment at the start of `bytes`.
pub fn unflatten_segment(bytes: &[u8]) -> Result<Segment> {
    Decoder::new(bytes).read_segment()
}

// ── Linear scan ─────────────────────────────────────────────────

fn read_be(buf: &[u8], off: usize, width: usize) -> Result<(u64, usize)> {
    let end = off.checked_add(width).filter(|&end| end <= buf.len());
    let Some(end) = end else {
        return Err(CodecError::InvalidSegment("truncated size field".into()));
    };
    let val = buf[off..end]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    Ok((val, end))
}

/// Count the segments in `buf` by walking headers and skipping payloads.
///
/// The scan knows nothing about containers: an encoded map of N entries
/// counts as `1 + 2N` segments (the index plus every key and value).
/// Every segment must carry at least one payload byte.
pub fn count_segments(buf: &[u8]) -> Result<usize> {
    let mut count = 0;
    let mut off = 0;
    while off < buf.len() {
        let tag = Tag::try_from(buf[off])?;
        off += 1;

        let len = match tag.size_field_width() {
            0 => tag.fixed_width().unwrap_or_default() as u64,
            width => {
                let (len, new_off) = read_be(buf, off, width)?;
                off = new_off;
                len
            }
        };
        if len == 0 {
            return Err(CodecError::InvalidSegment(format!(
                "{} segment with empty payload",
                tag
            )));
        }

        let remaining = (buf.len() - off) as u64;
        if len > remaining {
            return Err(CodecError::ShortRead {
                needed: len,
                got: remaining,
            });
        }
        off += len as usize;
        count += 1;
    }
    Ok(count)
}
