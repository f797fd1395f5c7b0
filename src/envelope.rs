//! Envelope framing shared by documents and command messages.
//!
//!   envelope      := start-segment body end-segment
//!   start-segment := 0x01 || version(1)
//!   end-segment   := 0x02 || u64be(count)
//!
//! The end marker's count is redundant structural information: readers
//! recompute it from what they actually parsed and reject the envelope on
//! disagreement.  It is the format's only integrity check.

use std::io::{Read, Write};

use tracing::warn;

use crate::constants::FORMAT_VERSION;
use crate::decode::Decoder;
use crate::encode::write_segment;
use crate::errors::{CodecError, Result};
use crate::segment::Segment;
use crate::tag::Tag;

pub(crate) fn write_start<W: Write + ?Sized>(w: &mut W) -> Result<()> {
    write_segment(w, Tag::DocumentStart, &[FORMAT_VERSION])
}

pub(crate) fn write_end<W: Write + ?Sized>(w: &mut W, count: u64) -> Result<()> {
    write_segment(w, Tag::DocumentEnd, &count.to_be_bytes())
}

/// Consume the start marker and check its version.
pub(crate) fn read_start<R: Read>(decoder: &mut Decoder<R>) -> Result<()> {
    let start = decoder.read_segment()?;
    if start.tag() != Tag::DocumentStart {
        return Err(CodecError::InvalidMessage(format!(
            "expected DocumentStart, found {}",
            start.tag()
        )));
    }
    let version = start.get_doc_start()?;
    if version != FORMAT_VERSION {
        return Err(CodecError::InvalidMessage(format!(
            "unsupported envelope version {}",
            version
        )));
    }
    Ok(())
}

/// Compare an end marker's count with the count of what was parsed.
pub(crate) fn check_end(end: &Segment, parsed: u64) -> Result<()> {
    if end.tag() != Tag::DocumentEnd {
        return Err(CodecError::InvalidMessage(format!(
            "expected DocumentEnd, found {}",
            end.tag()
        )));
    }
    let declared = end.get_doc_end()?;
    if declared != parsed {
        warn!(declared, parsed, "envelope integrity count mismatch");
        return Err(CodecError::SizeMismatch {
            expected: declared,
            actual: parsed,
        });
    }
    Ok(())
}
