//! Decode limits.
//!
//! The format itself allows payloads and containers up to 2^64 - 1, so the
//! defaults accept everything.  Services reading from untrusted peers pass
//! tighter limits to their [`Decoder`](crate::decode::Decoder); there is no
//! process-wide setting.

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Upper bounds enforced while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeLimits {
    /// Largest string/binary payload accepted, in bytes.
    pub max_payload_len: u64,
    /// Largest list item count or map pair count accepted.
    pub max_container_len: u64,
    /// Largest number of member segments in a generic document.
    pub max_document_segments: u64,
    /// Largest command code accepted in a command message, in bytes.
    pub max_command_len: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        DecodeLimits::unbounded()
    }
}

impl DecodeLimits {
    /// Accept the full range of the format.
    pub const fn unbounded() -> Self {
        DecodeLimits {
            max_payload_len: u64::MAX,
            max_container_len: u64::MAX,
            max_document_segments: u64::MAX,
            max_command_len: u64::MAX,
        }
    }

    /// Parse limits from JSON.  Missing fields keep their defaults.
    ///
    /// ```
    /// use jbitpack::DecodeLimits;
    ///
    /// let limits = DecodeLimits::from_json(r#"{"max_command_len": 16384}"#).unwrap();
    /// assert_eq!(limits.max_command_len, 16384);
    /// assert_eq!(limits.max_payload_len, u64::MAX);
    /// ```
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
