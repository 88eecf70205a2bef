//! Batch-level Forward Error Correction traits
//!
//! These traits work on whole batches of fragments at once, for callers that
//! hold everything in memory. Streaming receivers should drive a
//! [`FragmentDecoder`] directly.

use crate::decoder::FragmentDecoder;
use crate::encoder::FragmentEncoder;
use crate::error::CodingError;
use crate::types::{CodeParams, CodedFragment, SubmitOutcome};
use alloc::vec::Vec;
use bytes::Bytes;

/// Trait for encoding source fragments into coded fragments
pub trait RedundancyEncoder {
    /// Encode a batch of source fragments
    ///
    /// # Arguments
    /// * `fragments` - The M source fragments
    /// * `redundancy` - Number of additional coded fragments to generate
    ///
    /// # Returns
    /// The M source fragments as coded fragments 0..M, followed by
    /// `redundancy` coded fragments M..M+redundancy.
    fn encode_batch(
        &self,
        fragments: &[Bytes],
        redundancy: usize,
    ) -> Result<Vec<CodedFragment>, CodingError>;
}

/// Trait for decoding source fragments from coded fragments
pub trait RedundancyDecoder {
    /// Reconstruct the source fragments from whatever coded fragments arrived
    ///
    /// # Arguments
    /// * `fragments` - Available coded fragments, in any order
    /// * `total_fragments` - Number of source fragments (M)
    ///
    /// # Returns
    /// The M source fragments, or an error if the batch does not span them
    fn decode_batch(
        &self,
        fragments: &[CodedFragment],
        total_fragments: usize,
    ) -> Result<Vec<Bytes>, CodingError>;

    /// Check if we might have enough fragments to reconstruct the source
    ///
    /// Necessary, not sufficient: redundancy fragments may be dependent.
    fn can_reconstruct(&self, available_fragments: usize, total_fragments: usize) -> bool;
}

/// The fragment code with a fixed fragment size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentCodec {
    /// Size of every fragment in bytes
    pub frag_size: usize,
}

impl FragmentCodec {
    /// Create a codec for `frag_size` byte fragments
    pub const fn new(frag_size: usize) -> Self {
        Self { frag_size }
    }
}

impl RedundancyEncoder for FragmentCodec {
    fn encode_batch(
        &self,
        fragments: &[Bytes],
        redundancy: usize,
    ) -> Result<Vec<CodedFragment>, CodingError> {
        let params = CodeParams::new(fragments.len(), self.frag_size)?;
        let encoder = FragmentEncoder::new(params, fragments)?;

        let total = params.m + redundancy;
        Ok((0..total as u32).map(|n| encoder.encode(n)).collect())
    }
}

impl RedundancyDecoder for FragmentCodec {
    fn decode_batch(
        &self,
        fragments: &[CodedFragment],
        total_fragments: usize,
    ) -> Result<Vec<Bytes>, CodingError> {
        let mut decoder = FragmentDecoder::with_size(total_fragments, self.frag_size)?;

        for fragment in fragments {
            if decoder.submit_fragment(fragment)? == SubmitOutcome::Complete {
                break;
            }
        }

        decoder.into_fragments()
    }

    fn can_reconstruct(&self, available_fragments: usize, total_fragments: usize) -> bool {
        total_fragments > 0 && available_fragments >= total_fragments
    }
}
