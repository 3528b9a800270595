//! Container format constants.
//!
//! The header is six little-endian u32 fields; their byte offsets are listed
//! below in file order.

// =============================================================================
// Identification
// =============================================================================

/// First header field, the bytes `G M C Q` read as a little-endian u32.
pub const CONTAINER_MAGIC: u32 = 0x5143_4D47;

/// Latest container version this crate writes and the newest it reads.
pub const CONTAINER_VERSION: u32 = 1;

// =============================================================================
// Header layout
// =============================================================================

/// Size of the fixed header in bytes; the JSON region starts right after it.
pub const HEADER_LENGTH: usize = 24;

pub const MAGIC_OFFSET: usize = 0;
pub const VERSION_OFFSET: usize = 4;
pub const JSON_OFFSET_OFFSET: usize = 8;
pub const JSON_LENGTH_OFFSET: usize = 12;
pub const BIN_BLOB_OFFSET_OFFSET: usize = 16;
pub const BIN_BLOB_LENGTH_OFFSET: usize = 20;

/// Alignment of the binary blob region.
pub const BLOB_ALIGNMENT: usize = 4;

/// Padding written between the JSON text and the blob region.
///
/// JSON lengths are always even (UTF-16), so this is 0 or 2 and leaves the
/// blob region 4-byte aligned.
pub const fn json_padding(json_length: usize) -> usize {
    (HEADER_LENGTH + json_length) % BLOB_ALIGNMENT
}
