//! JBitPack constants — envelope version, size classes and fixed framing sizes.

/// Version octet carried by every document-start marker.
pub const FORMAT_VERSION: u8 = 1;

/// Largest payload (or member count) representable by the regular size
/// class.  Anything larger is promoted to the huge / large variant.
pub const MAX_REGULAR_LEN: u64 = u16::MAX as u64;

/// Width of the size field of regular string/binary segments.
pub const REGULAR_SIZE_FIELD: usize = 2;

/// Width of the size field of huge string/binary segments.
pub const HUGE_SIZE_FIELD: usize = 8;

/// Serialized length of a document-start marker: tag + version.
pub const START_SEGMENT_LEN: u64 = 2;

/// Serialized length of a document-end marker: tag + u64be count.
pub const END_SEGMENT_LEN: u64 = 9;

/// Units contributed by the command-code segment and the attachment map
/// index to a message's integrity count.
pub const MESSAGE_BASE_COUNT: u64 = 2;

/// Upper bound on the buffer reserved up front for one payload read.
/// Larger payloads grow as bytes actually arrive.
pub const READ_CHUNK: usize = 64 * 1024;

/// Number of payload bytes shown by `Display` for strings and binaries.
pub const DISPLAY_PREVIEW: usize = 32;
