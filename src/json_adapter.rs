//! Typed JSON view of segments, documents and messages.
//!
//! Every segment renders as `{"type": <kind>, "value": <value>}`:
//!   i8 .. u64, f32, f64, bool → JSON number / boolean
//!   string                    → JSON string (huge variant chosen by length)
//!   binary                    → standard base64 string
//!   list_index, map_index     → member count (size class chosen by count)
//!   doc_start, doc_end        → version / integrity count
//!
//! The width of every number is carried by `type`, so the mapping is
//! lossless in both directions.  NaN and infinities have no JSON number
//! form; rendering such a float segment fails with `Json`.  Messages keep attachment order by using a
//! JSON array of `{"name", "field"}` entries rather than an object.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::errors::{CodecError, Result};
use crate::message::Message;
use crate::segment::Segment;
use crate::tag::Tag;
use crate::value::Field;

/// One segment in typed JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum JsonSegment {
    DocStart(u8),
    DocEnd(u64),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    Bool(bool),
    F32(f32),
    F64(f64),
    String(String),
    /// Standard base64 with padding.
    Binary(String),
    ListIndex(u64),
    MapIndex(u64),
}

impl TryFrom<&Segment> for JsonSegment {
    type Error = CodecError;

    fn try_from(seg: &Segment) -> Result<JsonSegment> {
        let json = match seg.tag() {
            Tag::DocumentStart => JsonSegment::DocStart(seg.get_doc_start()?),
            Tag::DocumentEnd => JsonSegment::DocEnd(seg.get_doc_end()?),
            Tag::Int8 => JsonSegment::I8(seg.get_i8()?),
            Tag::UInt8 => JsonSegment::U8(seg.get_u8()?),
            Tag::Int16 => JsonSegment::I16(seg.get_i16()?),
            Tag::UInt16 => JsonSegment::U16(seg.get_u16()?),
            Tag::Int32 => JsonSegment::I32(seg.get_i32()?),
            Tag::UInt32 => JsonSegment::U32(seg.get_u32()?),
            Tag::Int64 => JsonSegment::I64(seg.get_i64()?),
            Tag::UInt64 => JsonSegment::U64(seg.get_u64()?),
            Tag::Bool => JsonSegment::Bool(seg.get_bool()?),
            Tag::Float32 => JsonSegment::F32(finite(seg.tag(), seg.get_f32()?)?),
            Tag::Float64 => JsonSegment::F64(finite(seg.tag(), seg.get_f64()?)?),
            Tag::String | Tag::HugeString => JsonSegment::String(seg.get_string()?.to_string()),
            Tag::Binary | Tag::HugeBinary => JsonSegment::Binary(STANDARD.encode(seg.get_binary()?)),
            Tag::List | Tag::LargeList => JsonSegment::ListIndex(seg.get_list_count()?),
            Tag::Map | Tag::LargeMap => JsonSegment::MapIndex(seg.get_map_count()?),
        };
        Ok(json)
    }
}

// JSON numbers cannot carry NaN or infinities; serde_json would write null.
fn finite<F: Into<f64> + Copy>(tag: Tag, v: F) -> Result<F> {
    if !v.into().is_finite() {
        return Err(CodecError::Json(format!(
            "{} value {} has no JSON number form",
            tag,
            v.into()
        )));
    }
    Ok(v)
}

impl TryFrom<JsonSegment> for Segment {
    type Error = CodecError;

    fn try_from(json: JsonSegment) -> Result<Segment> {
        let seg = match json {
            JsonSegment::DocStart(v) => Segment::doc_start(v),
            JsonSegment::DocEnd(v) => Segment::doc_end(v),
            JsonSegment::I8(v) => Segment::from(v),
            JsonSegment::U8(v) => Segment::from(v),
            JsonSegment::I16(v) => Segment::from(v),
            JsonSegment::U16(v) => Segment::from(v),
            JsonSegment::I32(v) => Segment::from(v),
            JsonSegment::U32(v) => Segment::from(v),
            JsonSegment::I64(v) => Segment::from(v),
            JsonSegment::U64(v) => Segment::from(v),
            JsonSegment::Bool(v) => Segment::from(v),
            JsonSegment::F32(v) => Segment::from(v),
            JsonSegment::F64(v) => Segment::from(v),
            JsonSegment::String(v) => Segment::from(v),
            JsonSegment::Binary(v) => {
                let bytes = STANDARD
                    .decode(v.as_bytes())
                    .map_err(|e| CodecError::Json(format!("bad base64 payload: {}", e)))?;
                Segment::from(bytes)
            }
            JsonSegment::ListIndex(n) => Segment::list_index(n),
            JsonSegment::MapIndex(n) => Segment::map_index(n),
        };
        Ok(seg)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonAttachment {
    name: String,
    field: JsonSegment,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonMessage {
    command: String,
    #[serde(default)]
    attachments: Vec<JsonAttachment>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonDocument {
    segments: Vec<JsonSegment>,
}

pub fn segment_to_json(seg: &Segment) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(JsonSegment::try_from(seg)?)?)
}

pub fn segment_from_json(value: &serde_json::Value) -> Result<Segment> {
    let json: JsonSegment = serde_json::from_value(value.clone())?;
    Segment::try_from(json)
}

/// Parse a container member; container indices are rejected.
pub fn field_from_json(value: &serde_json::Value) -> Result<Field> {
    Field::new(segment_from_json(value)?)
}

pub fn message_to_json(msg: &Message) -> Result<serde_json::Value> {
    let attachments = msg
        .attachments()
        .iter()
        .map(|(name, field)| {
            Ok(JsonAttachment {
                name: name.to_string(),
                field: JsonSegment::try_from(field.segment())?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(serde_json::to_value(JsonMessage {
        command: msg.command().to_string(),
        attachments,
    })?)
}

/// Build a message from its JSON form.  A repeated attachment name is an
/// error rather than a silent overwrite.
pub fn message_from_json(value: &serde_json::Value) -> Result<Message> {
    let json: JsonMessage = serde_json::from_value(value.clone())?;
    let mut msg = Message::new(json.command);
    for attachment in json.attachments {
        if msg.has(&attachment.name) {
            return Err(CodecError::DuplicateKey(attachment.name));
        }
        msg.attach_segment(attachment.name, Segment::try_from(attachment.field)?)?;
    }
    Ok(msg)
}

pub fn message_to_json_string(msg: &Message) -> Result<String> {
    Ok(serde_json::to_string_pretty(&message_to_json(msg)?)?)
}

pub fn message_from_json_str(raw: &str) -> Result<Message> {
    message_from_json(&serde_json::from_str(raw)?)
}

pub fn document_to_json(doc: &Document) -> Result<serde_json::Value> {
    let segments = doc
        .iter()
        .map(JsonSegment::try_from)
        .collect::<Result<Vec<_>>>()?;
    Ok(serde_json::to_value(JsonDocument { segments })?)
}

pub fn document_from_json(value: &serde_json::Value) -> Result<Document> {
    let json: JsonDocument = serde_json::from_value(value.clone())?;
    let mut doc = Document::new();
    for seg in json.segments {
        doc.push(Segment::try_from(seg)?)?;
    }
    Ok(doc)
}
