/// Sliding window size: back-references reach at most this many bytes back
pub const WINDOW_SIZE: usize = 1 << 13; // 8192

/// Maximum data bytes in one literal block (5-bit length field)
pub const MAX_LITERAL_LEN: usize = 32;

/// Shortest usable back-reference
pub const MIN_MATCH: usize = 3;

/// Longest back-reference: 9 + a full extension byte
pub const MAX_MATCH: usize = LONG_MATCH_BASE + 0xFF; // 264

/// Shortest length that needs the extension byte
pub const LONG_MATCH_BASE: usize = 9;

/// Length field value that signals an extension byte follows the header
pub const LENGTH_FIELD_EXTENDED: u8 = 7;

/// Encoded size of a reference block without the extension byte
pub const SHORT_REFERENCE_SIZE: usize = 2;

/// Encoded size of a reference block with the extension byte
pub const LONG_REFERENCE_SIZE: usize = 3;
