//! Error types for Fragcode operations

/// Errors that can occur while encoding, decoding or framing fragments
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodingError {
    /// Fragment count must be at least one
    #[cfg_attr(feature = "std", error("Invalid fragment count: {0}"))]
    InvalidFragmentCount(usize),

    /// Fragment count exceeds the supported row width
    #[cfg_attr(feature = "std", error("Fragment count {0} exceeds maximum {1}"))]
    TooManyFragments(usize, usize),

    /// Fragment size must be at least one byte
    #[cfg_attr(feature = "std", error("Invalid fragment size: {0}"))]
    InvalidFragmentSize(usize),

    /// A payload did not match the session fragment size
    #[cfg_attr(
        feature = "std",
        error("Payload size mismatch: expected {expected} bytes, got {actual}")
    )]
    PayloadSizeMismatch {
        /// The fragment size of the session.
        expected: usize,
        /// The length of the supplied payload.
        actual: usize,
    },

    /// A caller-supplied fragment set had the wrong number of entries
    #[cfg_attr(
        feature = "std",
        error("Fragment count mismatch: expected {expected}, got {actual}")
    )]
    FragmentCountMismatch {
        /// The number of fragments expected.
        expected: usize,
        /// The number of fragments supplied.
        actual: usize,
    },

    /// Recovered data was requested before enough fragments arrived
    #[cfg_attr(feature = "std", error("Decoding incomplete: {missing} pivots missing"))]
    Incomplete {
        /// Rows of the elimination matrix still without a pivot.
        missing: usize,
    },

    /// Invalid record marker detected
    #[cfg_attr(feature = "std", error("Invalid record marker: expected FRAG, got {0:?}"))]
    BadMarker([u8; 4]),

    /// Unsupported record version
    #[cfg_attr(feature = "std", error("Unsupported record version: {0}"))]
    UnsupportedVersion(u8),

    /// Incomplete record - not enough data
    #[cfg_attr(
        feature = "std",
        error("Incomplete record: expected {expected} bytes, got {actual}")
    )]
    IncompleteRecord {
        /// The number of bytes expected.
        expected: usize,
        /// The number of bytes actually found.
        actual: usize,
    },

    /// Checksum mismatch
    #[cfg_attr(
        feature = "std",
        error("Checksum mismatch: expected {expected:x}, got {actual:x}")
    )]
    ChecksumMismatch {
        /// The checksum carried by the record.
        expected: u32,
        /// The checksum calculated over the record.
        actual: u32,
    },
}
