//! # jbitpack — self-describing binary segments
//!
//! A linear, forward-only binary format built from type-tagged segments:
//! big-endian scalars, UTF-8 strings, binary blobs, and two flat container
//! kinds (lists and string-keyed maps).  Segments compose into envelopes
//! framed by a start marker and an end marker carrying a redundant count.
//!
//! ```
//! use jbitpack::Message;
//!
//! let mut msg = Message::new("TestMsg");
//! msg.attach("testString", "abcdef");
//! msg.attach("testInt", 42i64);
//!
//! let bytes = msg.flatten().unwrap();
//! assert_eq!(bytes.len(), 65);
//!
//! let back = Message::unflatten(&bytes).unwrap();
//! assert_eq!(back.get_i64("testInt").unwrap(), 42);
//! ```
//!
//! Containers never nest: their members are [`Field`]s, segments that
//! cannot hold a container index.

pub mod config;
pub mod constants;
pub mod container;
pub mod decode;
pub mod digest;
pub mod document;
pub mod encode;
mod envelope;
pub mod errors;
pub mod json_adapter;
pub mod message;
pub mod segment;
pub mod tag;
pub mod value;

pub use config::DecodeLimits;
pub use constants::FORMAT_VERSION;
pub use container::{SegmentList, SegmentMap};
pub use decode::{count_segments, unflatten_segment, Decoder};
pub use document::Document;
pub use encode::{encoded_len, flatten_segment, write_segment};
pub use errors::{
    CodecError, Result, ERR_DUP_KEY, ERR_EMPTY_PAYLOAD, ERR_INVALID_CONTAINER, ERR_INVALID_KEY,
    ERR_INVALID_MESSAGE, ERR_INVALID_SEGMENT, ERR_IO, ERR_JSON, ERR_LIMIT, ERR_NOT_FOUND,
    ERR_SHORT_READ, ERR_SIZE_MISMATCH, ERR_TYPE_MISMATCH, ERR_UTF8,
};
pub use message::Message;
pub use segment::Segment;
pub use tag::Tag;
pub use value::Field;
