//! Constants and limits for the fragment code and its record format

/// Maximum number of source fragments (bits per parity row)
pub const MAX_FRAGMENTS: usize = 4096;

/// Maximum packed row size in bytes
pub const MAX_ROW_BYTES: usize = MAX_FRAGMENTS / 8;

/// Multiplier used to derive a distinct generator seed per sequence index
pub const PRBS_SEED_MULTIPLIER: u64 = 1001;

/// Position of the feedback bit in the 23-bit PRBS state
pub const PRBS_FEEDBACK_SHIFT: u32 = 22;

/// Tap XORed with bit 0 to produce the feedback bit
pub const PRBS_TAP: u32 = 5;

/// Record marker - 4 bytes for synchronization
pub const RECORD_MARKER: &[u8; 4] = b"FRAG";

/// Current record format version
pub const RECORD_VERSION: u8 = 1;

/// Header size: marker (4) + version (1) + m (2) + frag_size (4) + index (4) = 15 bytes
pub const RECORD_HEADER_SIZE: usize = 15;

/// Size of the CRC32C trailer in bytes
pub const CRC32C_SIZE: usize = 4;

/// Largest fragment payload a record may carry (16 MB)
pub const MAX_RECORD_PAYLOAD: usize = 16 * 1024 * 1024;
