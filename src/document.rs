//! Generic documents — an envelope around an ordered run of segments.
//!
//!   document := start(version) || segment_1 || ... || segment_n || end(n)
//!
//! Members may be of any type, containers' index segments included; a
//! document does not group them.  The end marker counts member segments.

use std::io::{Read, Write};

use tracing::debug;

use crate::config::DecodeLimits;
use crate::constants::{END_SEGMENT_LEN, START_SEGMENT_LEN};
use crate::decode::Decoder;
use crate::digest::fingerprint;
use crate::envelope::{check_end, read_start, write_end, write_start};
use crate::errors::{CodecError, Result};
use crate::segment::Segment;
use crate::tag::Tag;

/// An ordered sequence of segments framed by start and end markers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    segments: Vec<Segment>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    /// Append a member.  An end marker cannot be a member, since a reader
    /// would take it as the end of the body.
    pub fn push(&mut self, segment: impl Into<Segment>) -> Result<()> {
        let segment = segment.into();
        if segment.tag() == Tag::DocumentEnd {
            return Err(CodecError::InvalidMessage(
                "DocumentEnd cannot be a document member".into(),
            ));
        }
        self.segments.push(segment);
        Ok(())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Value carried by the end marker: the number of members.
    pub fn integrity_count(&self) -> u64 {
        self.segments.len() as u64
    }

    /// Flattened size, markers included.  An empty document is 11 bytes.
    pub fn size(&self) -> u64 {
        START_SEGMENT_LEN + self.segments.iter().map(Segment::size).sum::<u64>() + END_SEGMENT_LEN
    }

    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        write_start(w)?;
        for seg in &self.segments {
            seg.write(w)?;
        }
        write_end(w, self.integrity_count())?;
        debug!(segments = self.segments.len(), "wrote document");
        Ok(())
    }

    pub fn flatten(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.size() as usize);
        self.write(&mut out)?;
        Ok(out)
    }

    pub fn read<R: Read>(r: R) -> Result<Document> {
        Document::read_from(&mut Decoder::new(r))
    }

    pub fn read_with_limits<R: Read>(r: R, limits: DecodeLimits) -> Result<Document> {
        Document::read_from(&mut Decoder::with_limits(r, limits))
    }

    /// Read start marker, members up to the end marker, then validate the
    /// end marker's count.  The end marker itself is not a member.
    pub fn read_from<R: Read>(decoder: &mut Decoder<R>) -> Result<Document> {
        read_start(decoder)?;

        let max_segments = decoder.limits().max_document_segments;
        let mut segments = Vec::new();
        let end = loop {
            let seg = decoder.read_segment()?;
            if seg.tag() == Tag::DocumentEnd {
                break seg;
            }
            if segments.len() as u64 >= max_segments {
                return Err(CodecError::LimitExceeded(format!(
                    "document exceeds {} segments",
                    max_segments
                )));
            }
            segments.push(seg);
        };

        check_end(&end, segments.len() as u64)?;
        debug!(segments = segments.len(), "read document");
        Ok(Document { segments })
    }

    pub fn unflatten(bytes: &[u8]) -> Result<Document> {
        Document::read(bytes)
    }

    /// `sha256:<hex>` of the flattened document.
    pub fn fingerprint(&self) -> Result<String> {
        Ok(fingerprint(&self.flatten()?))
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
