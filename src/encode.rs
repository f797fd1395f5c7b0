//! JBitPack encoder — segment headers and container layout.
//!
//! Encoding format per class:
//!   fixed scalar / marker / index : tag || payload
//!   string, binary                : tag || u16be(len) || payload
//!   huge-string, huge-binary      : tag || u64be(len) || payload
//!   list                          : index(count) || item_1 || ... || item_n
//!   map                           : index(count) || (key_1 || val_1) || ... || (key_n || val_n)
//!
//! Map keys are always plain (regular) string segments.

use std::io::Write;

use crate::constants::{HUGE_SIZE_FIELD, MAX_REGULAR_LEN, REGULAR_SIZE_FIELD};
use crate::errors::{CodecError, Result};
use crate::segment::Segment;
use crate::tag::Tag;
use crate::value::Field;

/// Number of bytes a segment with this tag and payload length occupies.
pub fn encoded_len(tag: Tag, payload_len: u64) -> u64 {
    match tag.fixed_width() {
        Some(width) => 1 + width as u64,
        None => 1 + tag.size_field_width() as u64 + payload_len,
    }
}

/// Write one segment without needing a `Segment` instance.
///
/// Empty variable payloads are allowed here (an empty string is a real
/// value); fixed-width tags must be given exactly their width.
pub fn write_segment<W: Write + ?Sized>(w: &mut W, tag: Tag, payload: &[u8]) -> Result<()> {
    let len = payload.len() as u64;
    match tag.size_field_width() {
        REGULAR_SIZE_FIELD => {
            if len > MAX_REGULAR_LEN {
                return Err(CodecError::size(MAX_REGULAR_LEN, len));
            }
            w.write_all(&[tag.code()])?;
            w.write_all(&(len as u16).to_be_bytes())?;
        }
        HUGE_SIZE_FIELD => {
            w.write_all(&[tag.code()])?;
            w.write_all(&len.to_be_bytes())?;
        }
        _ => {
            let width = tag.fixed_width().unwrap_or_default();
            if payload.len() != width {
                return Err(CodecError::size(width, payload.len()));
            }
            w.write_all(&[tag.code()])?;
        }
    }
    w.write_all(payload)?;
    Ok(())
}

/// Flatten one segment into a fresh, exactly sized buffer.
///
/// Unlike [`write_segment`], an empty payload is rejected: this is the
/// entry point for callers holding raw bytes, and zero bytes there is
/// always a caller bug.
pub fn flatten_segment(tag: Tag, payload: &[u8]) -> Result<Vec<u8>> {
    if payload.is_empty() {
        return Err(CodecError::EmptyPayload(tag));
    }
    let mut buf = Vec::with_capacity(encoded_len(tag, payload.len() as u64) as usize);
    write_segment(&mut buf, tag, payload)?;
    Ok(buf)
}

/// Encoded length of a map key (always a regular string segment).
pub(crate) fn key_len(key: &str) -> u64 {
    encoded_len(Tag::String, key.len() as u64)
}

/// Write a list: index segment, then every item in order.
pub(crate) fn write_list<W: Write + ?Sized>(w: &mut W, items: &[Field]) -> Result<()> {
    Segment::list_index(items.len() as u64).write(w)?;
    for item in items {
        item.write(w)?;
    }
    Ok(())
}

/// Write a map: index segment, then key/value pairs, key first.
///
/// Every key is checked before anything is written, so an unencodable key
/// leaves the writer untouched.
pub(crate) fn write_map<W: Write + ?Sized>(w: &mut W, entries: &[(String, Field)]) -> Result<()> {
    if let Some((key, _)) = entries.iter().find(|(key, _)| key.len() as u64 > MAX_REGULAR_LEN) {
        return Err(CodecError::InvalidKey(format!(
            "key of {} bytes does not fit a string segment",
            key.len()
        )));
    }
    Segment::map_index(entries.len() as u64).write(w)?;
    for (key, value) in entries {
        write_segment(w, Tag::String, key.as_bytes())?;
        value.write(w)?;
    }
    Ok(())
}
