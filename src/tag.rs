//! Segment type tags.
//!
//! Every segment starts with a single tag octet.  The tag alone decides how
//! the rest of the segment is laid out:
//!
//!   markers / fixed scalars : tag || payload(fixed width)
//!   string, binary          : tag || u16be(len) || payload
//!   huge-string, huge-binary: tag || u64be(len) || payload
//!   list, map               : tag || u16be(count)
//!   large-list, large-map   : tag || u64be(count)
//!
//! Tag 0 is reserved and never valid on the wire.

use std::fmt;

use crate::constants::{HUGE_SIZE_FIELD, REGULAR_SIZE_FIELD};
use crate::errors::CodecError;

/// One-octet discriminator identifying a segment's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Tag {
    /// Envelope start marker, payload is the version octet.
    DocumentStart = 1,
    /// Envelope end marker, payload is the u64be integrity count.
    DocumentEnd = 2,
    Int8 = 3,
    UInt8 = 4,
    Int16 = 5,
    UInt16 = 6,
    Int32 = 7,
    UInt32 = 8,
    Int64 = 9,
    UInt64 = 10,
    Bool = 11,
    Float32 = 12,
    Float64 = 13,
    /// UTF-8 text up to 65 535 bytes.
    String = 14,
    /// Opaque bytes up to 65 535 bytes.
    Binary = 15,
    HugeString = 16,
    HugeBinary = 17,
    /// Map index with a u16 pair count.
    Map = 18,
    /// List index with a u16 item count.
    List = 19,
    /// Map index with a u64 pair count.
    LargeMap = 20,
    /// List index with a u64 item count.
    LargeList = 21,
}

impl Tag {
    /// First code past the last valid tag.
    pub const UPPER_BOUND: u8 = 22;

    /// Map a raw octet onto a tag.  Returns `None` for 0 and anything at or
    /// beyond [`Tag::UPPER_BOUND`].
    pub fn from_u8(code: u8) -> Option<Tag> {
        let tag = match code {
            1 => Tag::DocumentStart,
            2 => Tag::DocumentEnd,
            3 => Tag::Int8,
            4 => Tag::UInt8,
            5 => Tag::Int16,
            6 => Tag::UInt16,
            7 => Tag::Int32,
            8 => Tag::UInt32,
            9 => Tag::Int64,
            10 => Tag::UInt64,
            11 => Tag::Bool,
            12 => Tag::Float32,
            13 => Tag::Float64,
            14 => Tag::String,
            15 => Tag::Binary,
            16 => Tag::HugeString,
            17 => Tag::HugeBinary,
            18 => Tag::Map,
            19 => Tag::List,
            20 => Tag::LargeMap,
            21 => Tag::LargeList,
            _ => return None,
        };
        Some(tag)
    }

    /// The wire octet for this tag.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Payload width implied by the tag, or `None` for variable classes.
    ///
    /// Container indices count as fixed: their payload is the member count,
    /// not a size field followed by data.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            Tag::DocumentStart | Tag::Int8 | Tag::UInt8 | Tag::Bool => Some(1),
            Tag::Int16 | Tag::UInt16 | Tag::Map | Tag::List => Some(2),
            Tag::Int32 | Tag::UInt32 | Tag::Float32 => Some(4),
            Tag::DocumentEnd
            | Tag::Int64
            | Tag::UInt64
            | Tag::Float64
            | Tag::LargeMap
            | Tag::LargeList => Some(8),
            Tag::String | Tag::Binary | Tag::HugeString | Tag::HugeBinary => None,
        }
    }

    /// Width of the explicit size field; 0 for fixed-width tags.
    pub fn size_field_width(self) -> usize {
        match self {
            Tag::String | Tag::Binary => REGULAR_SIZE_FIELD,
            Tag::HugeString | Tag::HugeBinary => HUGE_SIZE_FIELD,
            _ => 0,
        }
    }

    #[inline]
    pub fn is_variable(self) -> bool {
        self.fixed_width().is_none()
    }

    /// True for the four container index tags.
    pub fn is_container(self) -> bool {
        matches!(self, Tag::Map | Tag::List | Tag::LargeMap | Tag::LargeList)
    }

    pub fn is_marker(self) -> bool {
        matches!(self, Tag::DocumentStart | Tag::DocumentEnd)
    }

    pub fn is_string(self) -> bool {
        matches!(self, Tag::String | Tag::HugeString)
    }

    pub fn is_binary(self) -> bool {
        matches!(self, Tag::Binary | Tag::HugeBinary)
    }

    /// Name used in error messages and `Display` output.
    pub fn name(self) -> &'static str {
        match self {
            Tag::DocumentStart => "DocumentStart",
            Tag::DocumentEnd => "DocumentEnd",
            Tag::Int8 => "Int8",
            Tag::UInt8 => "UInt8",
            Tag::Int16 => "Int16",
            Tag::UInt16 => "UInt16",
            Tag::Int32 => "Int32",
            Tag::UInt32 => "UInt32",
            Tag::Int64 => "Int64",
            Tag::UInt64 => "UInt64",
            Tag::Bool => "Bool",
            Tag::Float32 => "Float32",
            Tag::Float64 => "Float64",
            Tag::String => "String",
            Tag::Binary => "Binary",
            Tag::HugeString => "HugeString",
            Tag::HugeBinary => "HugeBinary",
            Tag::Map => "Map",
            Tag::List => "List",
            Tag::LargeMap => "LargeMap",
            Tag::LargeList => "LargeList",
        }
    }
}

impl TryFrom<u8> for Tag {
    type Error = CodecError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Tag::from_u8(code)
            .ok_or_else(|| CodecError::InvalidSegment(format!("unknown tag 0x{:02x}", code)))
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> u8 {
        tag.code()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
