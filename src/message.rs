//! Command messages — a command code plus named attachments.
//!
//!   message := start(version) || string(code) || map(attachments) || end(count)
//!   count   := 2 + 2 * attachment_count
//!
//! The 2 covers the command-code segment and the map index segment; every
//! attachment adds one unit for its key and one for its value.

use std::io::{Read, Write};

use tracing::debug;

use crate::config::DecodeLimits;
use crate::constants::{END_SEGMENT_LEN, MAX_REGULAR_LEN, MESSAGE_BASE_COUNT, START_SEGMENT_LEN};
use crate::container::SegmentMap;
use crate::decode::Decoder;
use crate::digest::fingerprint;
use crate::encode::{encoded_len, write_segment};
use crate::envelope::{check_end, read_start, write_end, write_start};
use crate::errors::{CodecError, Result};
use crate::segment::Segment;
use crate::tag::Tag;
use crate::value::Field;

macro_rules! typed_lookups {
    ($($get:ident => $ty:ty;)*) => {$(
        #[doc = concat!("Look up `name` and read it with [`Segment::", stringify!($get), "`].")]
        pub fn $get(&self, name: &str) -> Result<$ty> {
            self.get(name)?.$get()
        }
    )*};
}

/// A command code with a map of attachments, framed as an envelope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    command: String,
    attachments: SegmentMap,
}

impl Message {
    pub fn new(command: impl Into<String>) -> Self {
        Message {
            command: command.into(),
            attachments: SegmentMap::new(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn set_command(&mut self, command: impl Into<String>) {
        self.command = command.into();
    }

    pub fn attachments(&self) -> &SegmentMap {
        &self.attachments
    }

    /// Attach `value` under `name`, replacing any existing attachment.
    pub fn attach(&mut self, name: impl Into<String>, value: impl Into<Field>) -> Option<Field> {
        self.attachments.insert(name, value)
    }

    /// Attach a raw segment; container index segments are rejected.
    pub fn attach_segment(&mut self, name: impl Into<String>, segment: Segment) -> Result<()> {
        self.attachments.insert(name, Field::new(segment)?);
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.attachments.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&Field> {
        self.attachments
            .get(name)
            .ok_or_else(|| CodecError::NotFound(name.to_string()))
    }

    typed_lookups! {
        get_i8 => i8;
        get_u8 => u8;
        get_i16 => i16;
        get_u16 => u16;
        get_i32 => i32;
        get_u32 => u32;
        get_i64 => i64;
        get_u64 => u64;
        get_bool => bool;
        get_f32 => f32;
        get_f64 => f64;
    }

    pub fn get_string(&self, name: &str) -> Result<&str> {
        self.get(name)?.get_string()
    }

    pub fn get_binary(&self, name: &str) -> Result<&[u8]> {
        self.get(name)?.get_binary()
    }

    pub fn remove(&mut self, name: &str) -> Option<Field> {
        self.attachments.remove(name)
    }

    /// Value carried by the end marker.
    pub fn integrity_count(&self) -> u64 {
        MESSAGE_BASE_COUNT + 2 * self.attachments.len() as u64
    }

    fn command_tag(&self) -> Tag {
        if self.command.len() as u64 > MAX_REGULAR_LEN {
            Tag::HugeString
        } else {
            Tag::String
        }
    }

    /// Flattened size, markers included.
    pub fn size(&self) -> u64 {
        START_SEGMENT_LEN
            + encoded_len(self.command_tag(), self.command.len() as u64)
            + self.attachments.size()
            + END_SEGMENT_LEN
    }

    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        write_start(w)?;
        write_segment(w, self.command_tag(), self.command.as_bytes())?;
        self.attachments.write(w)?;
        write_end(w, self.integrity_count())?;
        debug!(command = %self.command, attachments = self.attachments.len(), "wrote message");
        Ok(())
    }

    pub fn flatten(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.size() as usize);
        self.write(&mut out)?;
        Ok(out)
    }

    pub fn read<R: Read>(r: R) -> Result<Message> {
        Message::read_from(&mut Decoder::new(r))
    }

    pub fn read_with_limits<R: Read>(r: R, limits: DecodeLimits) -> Result<Message> {
        Message::read_from(&mut Decoder::with_limits(r, limits))
    }

    /// Read start marker, command code, attachment map and end marker, then
    /// validate the end marker's count against the parsed attachments.
    pub fn read_from<R: Read>(decoder: &mut Decoder<R>) -> Result<Message> {
        read_start(decoder)?;

        let code = decoder.read_segment()?;
        if !code.tag().is_string() {
            return Err(CodecError::InvalidMessage(format!(
                "command code must be a String segment, found {}",
                code.tag()
            )));
        }
        let max_command = decoder.limits().max_command_len;
        if code.value().len() as u64 > max_command {
            return Err(CodecError::LimitExceeded(format!(
                "command code of {} bytes exceeds {}",
                code.value().len(),
                max_command
            )));
        }
        let command = code.get_string()?.to_string();

        let attachments = decoder.read_map()?;
        let message = Message {
            command,
            attachments,
        };

        let end = decoder.read_segment()?;
        check_end(&end, message.integrity_count())?;
        debug!(
            command = %message.command,
            attachments = message.attachments.len(),
            "read message"
        );
        Ok(message)
    }

    pub fn unflatten(bytes: &[u8]) -> Result<Message> {
        Message::read(bytes)
    }

    /// `sha256:<hex>` of the flattened message.
    pub fn fingerprint(&self) -> Result<String> {
        Ok(fingerprint(&self.flatten()?))
    }
}
