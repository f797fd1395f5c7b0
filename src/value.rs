//! Container members.
//!
//! Lists and maps are flat: their members may be any segment except a
//! container index.  `Field` is a segment that has been checked once, at
//! construction, to hold a non-container tag, so a `SegmentList` or
//! `SegmentMap` can never be built (or decoded) with a nested container.

use std::fmt;
use std::ops::Deref;

use crate::errors::{CodecError, Result};
use crate::segment::Segment;

/// A segment that is allowed inside a list or map.
#[derive(Debug, Clone, PartialEq)]
pub struct Field(Segment);

impl Field {
    /// Wrap `segment`, rejecting container index tags.
    pub fn new(segment: Segment) -> Result<Field> {
        if segment.tag().is_container() {
            return Err(CodecError::InvalidContainer(segment.tag()));
        }
        Ok(Field(segment))
    }

    pub fn segment(&self) -> &Segment {
        &self.0
    }

    pub fn into_segment(self) -> Segment {
        self.0
    }
}

// Read-only: a `&mut Segment` could be re-tagged as a container.
impl Deref for Field {
    type Target = Segment;

    fn deref(&self) -> &Segment {
        &self.0
    }
}

impl TryFrom<Segment> for Field {
    type Error = CodecError;

    fn try_from(segment: Segment) -> Result<Field> {
        Field::new(segment)
    }
}

impl From<Field> for Segment {
    fn from(field: Field) -> Segment {
        field.0
    }
}

macro_rules! field_from {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for Field {
            fn from(value: $ty) -> Field {
                Field(Segment::from(value))
            }
        }
    )*};
}

// None of these conversions can produce a container tag.
field_from!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64, bool, &str, String, &[u8], Vec<u8>);

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
