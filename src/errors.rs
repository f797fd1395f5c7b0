//! JBitPack error codes and error type.
//!
//! Every failure is returned to the immediate caller; nothing is retried or
//! coerced.  Each variant carries a stable `ERR_*` code so callers (and the
//! conformance vectors) can match on the kind without parsing messages.

use std::io;

use thiserror::Error;

use crate::tag::Tag;

pub const ERR_INVALID_SEGMENT: &str = "ERR_INVALID_SEGMENT";
pub const ERR_SIZE_MISMATCH: &str = "ERR_SIZE_MISMATCH";
pub const ERR_TYPE_MISMATCH: &str = "ERR_TYPE_MISMATCH";
pub const ERR_SHORT_READ: &str = "ERR_SHORT_READ";
pub const ERR_IO: &str = "ERR_IO";
pub const ERR_INVALID_KEY: &str = "ERR_INVALID_KEY";
pub const ERR_DUP_KEY: &str = "ERR_DUP_KEY";
pub const ERR_INVALID_CONTAINER: &str = "ERR_INVALID_CONTAINER";
pub const ERR_INVALID_MESSAGE: &str = "ERR_INVALID_MESSAGE";
pub const ERR_EMPTY_PAYLOAD: &str = "ERR_EMPTY_PAYLOAD";
pub const ERR_NOT_FOUND: &str = "ERR_NOT_FOUND";
pub const ERR_UTF8: &str = "ERR_UTF8";
pub const ERR_LIMIT: &str = "ERR_LIMIT";
pub const ERR_JSON: &str = "ERR_JSON";

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Everything that can go wrong while encoding or decoding.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Unknown or out-of-range tag, or a malformed segment header.
    #[error("invalid segment: {0}")]
    InvalidSegment(String),

    /// A payload had the wrong width, or an envelope's integrity count
    /// disagreed with the parsed body.
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    /// A typed accessor was called on a segment of another type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: Tag },

    /// The stream ended before the declared number of bytes arrived.
    #[error("short read: needed {needed} bytes, got {got}")]
    ShortRead { needed: u64, got: u64 },

    /// The underlying stream failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// A map key was not a plain string segment, or cannot be encoded as one.
    #[error("invalid map key: {0}")]
    InvalidKey(String),

    #[error("duplicate map key {0:?}")]
    DuplicateKey(String),

    /// A container index appeared where only non-container segments may go.
    #[error("container segment {0} cannot be nested in a container")]
    InvalidContainer(Tag),

    /// Start/end marker missing, out of position, or of an unknown version.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The free-standing encoder was given no payload bytes.
    #[error("empty payload for {0} segment")]
    EmptyPayload(Tag),

    /// Attachment lookup by name failed.
    #[error("attachment {0:?} not found")]
    NotFound(String),

    #[error("payload of {0} segment is not valid UTF-8")]
    Utf8(Tag),

    /// A configured decode limit was exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("json: {0}")]
    Json(String),
}

impl CodecError {
    /// Stable code identifying the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            CodecError::InvalidSegment(_) => ERR_INVALID_SEGMENT,
            CodecError::SizeMismatch { .. } => ERR_SIZE_MISMATCH,
            CodecError::TypeMismatch { .. } => ERR_TYPE_MISMATCH,
            CodecError::ShortRead { .. } => ERR_SHORT_READ,
            CodecError::Io(_) => ERR_IO,
            CodecError::InvalidKey(_) => ERR_INVALID_KEY,
            CodecError::DuplicateKey(_) => ERR_DUP_KEY,
            CodecError::InvalidContainer(_) => ERR_INVALID_CONTAINER,
            CodecError::InvalidMessage(_) => ERR_INVALID_MESSAGE,
            CodecError::EmptyPayload(_) => ERR_EMPTY_PAYLOAD,
            CodecError::NotFound(_) => ERR_NOT_FOUND,
            CodecError::Utf8(_) => ERR_UTF8,
            CodecError::LimitExceeded(_) => ERR_LIMIT,
            CodecError::Json(_) => ERR_JSON,
        }
    }

    pub(crate) fn size(expected: impl TryInto<u64>, actual: impl TryInto<u64>) -> Self {
        CodecError::SizeMismatch {
            expected: expected.try_into().unwrap_or(u64::MAX),
            actual: actual.try_into().unwrap_or(u64::MAX),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Json(e.to_string())
    }
}
