//! The segment — JBitPack's atomic unit.
//!
//! A segment is a type tag plus a payload that is already in final wire
//! byte order (big-endian for every multi-byte scalar).  The payload length
//! always matches what the tag implies: the fixed width for scalars,
//! markers and container indices, the explicit size for strings and
//! binaries.
//!
//! Each segment owns its payload buffer exclusively.  Setters overwrite that
//! buffer in place when the new value has the same length and allocate a
//! fresh one otherwise; since no two segments ever share storage, the
//! in-place path cannot be observed through another segment.

use std::fmt;
use std::io::{Read, Write};

use crate::constants::{DISPLAY_PREVIEW, MAX_REGULAR_LEN};
use crate::decode::Decoder;
use crate::encode::write_segment;
use crate::errors::{CodecError, Result};
use crate::tag::Tag;

/// One type-tagged, length-determined unit of the format.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    tag: Tag,
    value: Vec<u8>,
}

macro_rules! scalar_accessors {
    ($($tag:ident => $ty:ty, $get:ident, $set:ident;)*) => {$(
        #[doc = concat!("Read the value of a `", stringify!($tag), "` segment.")]
        pub fn $get(&self) -> Result<$ty> {
            Ok(<$ty>::from_be_bytes(self.fixed_payload(Tag::$tag)?))
        }

        #[doc = concat!("Turn this segment into a `", stringify!($tag), "` segment.")]
        pub fn $set(&mut self, value: $ty) {
            self.store(Tag::$tag, &value.to_be_bytes());
        }
    )*};
}

impl Segment {
    /// Build a segment from a tag and an already-encoded payload.
    ///
    /// Fixed-width tags require exactly their width; regular strings and
    /// binaries are limited to 65 535 bytes.
    pub fn from_parts(tag: Tag, value: Vec<u8>) -> Result<Segment> {
        match tag.fixed_width() {
            Some(width) if value.len() != width => {
                return Err(CodecError::size(width, value.len()));
            }
            Some(_) => {}
            None => {
                if tag.size_field_width() == 2 && value.len() as u64 > MAX_REGULAR_LEN {
                    return Err(CodecError::size(MAX_REGULAR_LEN, value.len()));
                }
            }
        }
        Ok(Segment { tag, value })
    }

    /// Start marker carrying `version`.
    pub fn doc_start(version: u8) -> Segment {
        Segment {
            tag: Tag::DocumentStart,
            value: vec![version],
        }
    }

    /// End marker carrying an integrity count.
    pub fn doc_end(count: u64) -> Segment {
        Segment {
            tag: Tag::DocumentEnd,
            value: count.to_be_bytes().to_vec(),
        }
    }

    /// Index segment for a list of `count` items.
    pub fn list_index(count: u64) -> Segment {
        let mut seg = Segment::blank();
        seg.set_list_index(count);
        seg
    }

    /// Index segment for a map of `count` pairs.
    pub fn map_index(count: u64) -> Segment {
        let mut seg = Segment::blank();
        seg.set_map_index(count);
        seg
    }

    // Only ever handed straight to a setter.
    fn blank() -> Segment {
        Segment {
            tag: Tag::UInt8,
            value: Vec::new(),
        }
    }

    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Raw payload bytes, in wire order.
    #[inline]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn into_value(self) -> Vec<u8> {
        self.value
    }

    /// Exact number of bytes this segment occupies when written.
    pub fn size(&self) -> u64 {
        match self.tag.fixed_width() {
            Some(width) => 1 + width as u64,
            None => 1 + self.tag.size_field_width() as u64 + self.value.len() as u64,
        }
    }

    // ── Accessors ───────────────────────────────────────────────

    fn expect_tag(&self, expected: Tag) -> Result<()> {
        if self.tag != expected {
            return Err(CodecError::TypeMismatch {
                expected: expected.name(),
                found: self.tag,
            });
        }
        Ok(())
    }

    fn fixed_payload<const N: usize>(&self, expected: Tag) -> Result<[u8; N]> {
        self.expect_tag(expected)?;
        self.value
            .as_slice()
            .try_into()
            .map_err(|_| CodecError::size(N, self.value.len()))
    }

    scalar_accessors! {
        Int8 => i8, get_i8, set_i8;
        UInt8 => u8, get_u8, set_u8;
        Int16 => i16, get_i16, set_i16;
        UInt16 => u16, get_u16, set_u16;
        Int32 => i32, get_i32, set_i32;
        UInt32 => u32, get_u32, set_u32;
        Int64 => i64, get_i64, set_i64;
        UInt64 => u64, get_u64, set_u64;
        Float32 => f32, get_f32, set_f32;
        Float64 => f64, get_f64, set_f64;
    }

    /// Any nonzero payload octet reads as `true`.
    pub fn get_bool(&self) -> Result<bool> {
        let [b] = self.fixed_payload::<1>(Tag::Bool)?;
        Ok(b != 0)
    }

    pub fn set_bool(&mut self, value: bool) {
        self.store(Tag::Bool, &[u8::from(value)]);
    }

    /// Version octet of a start marker.
    pub fn get_doc_start(&self) -> Result<u8> {
        let [version] = self.fixed_payload::<1>(Tag::DocumentStart)?;
        Ok(version)
    }

    pub fn set_doc_start(&mut self, version: u8) {
        self.store(Tag::DocumentStart, &[version]);
    }

    /// Integrity count of an end marker.
    pub fn get_doc_end(&self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.fixed_payload(Tag::DocumentEnd)?))
    }

    pub fn set_doc_end(&mut self, count: u64) {
        self.store(Tag::DocumentEnd, &count.to_be_bytes());
    }

    /// Text of a string or huge-string segment; invalid UTF-8 is `Utf8`.
    pub fn get_string(&self) -> Result<&str> {
        if !self.tag.is_string() {
            return Err(CodecError::TypeMismatch {
                expected: Tag::String.name(),
                found: self.tag,
            });
        }
        std::str::from_utf8(&self.value).map_err(|_| CodecError::Utf8(self.tag))
    }

    /// Store `value`, promoting to huge-string past 65 535 bytes.
    pub fn set_string(&mut self, value: &str) {
        let tag = if value.len() as u64 > MAX_REGULAR_LEN {
            Tag::HugeString
        } else {
            Tag::String
        };
        self.store(tag, value.as_bytes());
    }

    /// Bytes of a binary or huge-binary segment.
    pub fn get_binary(&self) -> Result<&[u8]> {
        if !self.tag.is_binary() {
            return Err(CodecError::TypeMismatch {
                expected: Tag::Binary.name(),
                found: self.tag,
            });
        }
        Ok(&self.value)
    }

    /// Store `value`, promoting to huge-binary past 65 535 bytes.
    pub fn set_binary(&mut self, value: &[u8]) {
        let tag = if value.len() as u64 > MAX_REGULAR_LEN {
            Tag::HugeBinary
        } else {
            Tag::Binary
        };
        self.store(tag, value);
    }

    /// Pair count of a map or large-map index.
    pub fn get_map_count(&self) -> Result<u64> {
        match self.tag {
            Tag::Map => Ok(u64::from(u16::from_be_bytes(self.fixed_payload(Tag::Map)?))),
            Tag::LargeMap => Ok(u64::from_be_bytes(self.fixed_payload(Tag::LargeMap)?)),
            found => Err(CodecError::TypeMismatch {
                expected: Tag::Map.name(),
                found,
            }),
        }
    }

    /// Item count of a list or large-list index.
    pub fn get_list_count(&self) -> Result<u64> {
        match self.tag {
            Tag::List => Ok(u64::from(u16::from_be_bytes(self.fixed_payload(Tag::List)?))),
            Tag::LargeList => Ok(u64::from_be_bytes(self.fixed_payload(Tag::LargeList)?)),
            found => Err(CodecError::TypeMismatch {
                expected: Tag::List.name(),
                found,
            }),
        }
    }

    /// Make this a map index for `count` pairs.  Counts past 65 535 use
    /// the large variant with a u64 count.
    pub fn set_map_index(&mut self, count: u64) {
        match u16::try_from(count) {
            Ok(small) => self.store(Tag::Map, &small.to_be_bytes()),
            Err(_) => self.store(Tag::LargeMap, &count.to_be_bytes()),
        }
    }

    /// Make this a list index for `count` items.
    pub fn set_list_index(&mut self, count: u64) {
        match u16::try_from(count) {
            Ok(small) => self.store(Tag::List, &small.to_be_bytes()),
            Err(_) => self.store(Tag::LargeList, &count.to_be_bytes()),
        }
    }

    fn store(&mut self, tag: Tag, bytes: &[u8]) {
        self.tag = tag;
        if self.value.len() == bytes.len() {
            self.value.copy_from_slice(bytes);
        } else {
            self.value = bytes.to_vec();
        }
    }

    // ── I/O ─────────────────────────────────────────────────────

    /// Write tag, size field (variable classes only) and payload.
    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        write_segment(w, self.tag, &self.value)
    }

    /// Decode exactly one segment from `r` with default limits.
    pub fn read<R: Read>(r: R) -> Result<Segment> {
        Decoder::new(r).read_segment()
    }

    pub fn flatten(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.size() as usize);
        self.write(&mut out)?;
        Ok(out)
    }

    /// Decode the segment at the start of `bytes`.  Trailing bytes are
    /// left unread.
    pub fn unflatten(bytes: &[u8]) -> Result<Segment> {
        Segment::read(bytes)
    }
}

macro_rules! segment_from_scalar {
    ($($ty:ty => $set:ident),* $(,)?) => {$(
        impl From<$ty> for Segment {
            fn from(value: $ty) -> Segment {
                let mut seg = Segment::blank();
                seg.$set(value);
                seg
            }
        }
    )*};
}

segment_from_scalar! {
    i8 => set_i8,
    u8 => set_u8,
    i16 => set_i16,
    u16 => set_u16,
    i32 => set_i32,
    u32 => set_u32,
    i64 => set_i64,
    u64 => set_u64,
    f32 => set_f32,
    f64 => set_f64,
    bool => set_bool,
}

impl From<&str> for Segment {
    fn from(value: &str) -> Segment {
        let mut seg = Segment::blank();
        seg.set_string(value);
        seg
    }
}

impl From<String> for Segment {
    fn from(value: String) -> Segment {
        let tag = if value.len() as u64 > MAX_REGULAR_LEN {
            Tag::HugeString
        } else {
            Tag::String
        };
        Segment {
            tag,
            value: value.into_bytes(),
        }
    }
}

impl From<&[u8]> for Segment {
    fn from(value: &[u8]) -> Segment {
        let mut seg = Segment::blank();
        seg.set_binary(value);
        seg
    }
}

impl From<Vec<u8>> for Segment {
    fn from(value: Vec<u8>) -> Segment {
        let tag = if value.len() as u64 > MAX_REGULAR_LEN {
            Tag::HugeBinary
        } else {
            Tag::Binary
        };
        Segment { tag, value }
    }
}

/// Render `Result`-returning accessors as `Name=value` or `Name=<error>`.
fn render<T: fmt::Display>(f: &mut fmt::Formatter<'_>, tag: Tag, v: Result<T>) -> fmt::Result {
    match v {
        Ok(v) => write!(f, "{}={}", tag, v),
        Err(e) => write!(f, "{}=<{}>", tag, e),
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag;
        match tag {
            Tag::DocumentStart => render(f, tag, self.get_doc_start()),
            Tag::DocumentEnd => render(f, tag, self.get_doc_end()),
            Tag::Int8 => render(f, tag, self.get_i8()),
            Tag::UInt8 => render(f, tag, self.get_u8()),
            Tag::Int16 => render(f, tag, self.get_i16()),
            Tag::UInt16 => render(f, tag, self.get_u16()),
            Tag::Int32 => render(f, tag, self.get_i32()),
            Tag::UInt32 => render(f, tag, self.get_u32()),
            Tag::Int64 => render(f, tag, self.get_i64()),
            Tag::UInt64 => render(f, tag, self.get_u64()),
            Tag::Bool => render(f, tag, self.get_bool()),
            Tag::Float32 => render(f, tag, self.get_f32()),
            Tag::Float64 => render(f, tag, self.get_f64()),
            Tag::Map | Tag::LargeMap => render(f, tag, self.get_map_count()),
            Tag::List | Tag::LargeList => render(f, tag, self.get_list_count()),
            Tag::String | Tag::HugeString => {
                let shown = &self.value[..self.value.len().min(DISPLAY_PREVIEW)];
                write!(f, "{}=\"{}\"", tag, String::from_utf8_lossy(shown))
            }
            Tag::Binary | Tag::HugeBinary => {
                let shown = &self.value[..self.value.len().min(DISPLAY_PREVIEW)];
                write!(f, "{}={:?}", tag, shown)
            }
        }
    }
}
