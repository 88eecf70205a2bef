//! Core types for the fragment code

use crate::bitvec;
use crate::constants::MAX_FRAGMENTS;
use crate::error::CodingError;
use alloc::vec::Vec;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Parameters of one encode/decode session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeParams {
    /// Number of source fragments (M)
    pub m: usize,

    /// Size of every fragment in bytes
    pub frag_size: usize,
}

impl CodeParams {
    /// Create validated code parameters
    pub fn new(m: usize, frag_size: usize) -> Result<Self, CodingError> {
        let params = Self { m, frag_size };
        params.validate()?;
        Ok(params)
    }

    /// Validate the parameters
    pub fn validate(&self) -> Result<(), CodingError> {
        validate_fragment_count(self.m)?;

        if self.frag_size == 0 {
            return Err(CodingError::InvalidFragmentSize(self.frag_size));
        }

        Ok(())
    }

    /// Bytes in one packed parity row
    pub const fn row_len(&self) -> usize {
        bitvec::row_len(self.m)
    }

    /// Total bytes of source data (M fragments)
    pub const fn block_len(&self) -> usize {
        self.m * self.frag_size
    }
}

/// Check that `m` fits the supported row width
pub(crate) fn validate_fragment_count(m: usize) -> Result<(), CodingError> {
    if m == 0 {
        return Err(CodingError::InvalidFragmentCount(m));
    }
    if m > MAX_FRAGMENTS {
        return Err(CodingError::TooManyFragments(m, MAX_FRAGMENTS));
    }
    Ok(())
}

/// One row of the generator matrix, packed MSB-first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParityRow {
    index: u32,
    width: usize,
    bits: Vec<u8>,
}

impl ParityRow {
    pub(crate) fn from_parts(index: u32, width: usize, bits: Vec<u8>) -> Self {
        debug_assert_eq!(bits.len(), bitvec::row_len(width));
        Self { index, width, bits }
    }

    /// Sequence index this row belongs to
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Number of meaningful bits (M)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Packed row bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Coefficient of source fragment `column`
    pub fn get(&self, column: usize) -> bool {
        column < self.width && bitvec::get_bit(&self.bits, column)
    }

    /// Number of source fragments combined by this row
    pub fn weight(&self) -> usize {
        bitvec::count_ones(&self.bits, self.width)
    }

    /// Columns set in this row, ascending
    pub fn columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.width).filter(move |&i| bitvec::get_bit(&self.bits, i))
    }

    /// True for the first M rows, which carry a source fragment verbatim
    pub fn is_systematic(&self) -> bool {
        (self.index as usize) < self.width
    }
}

/// A coded fragment together with its sequence index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodedFragment {
    /// Sequence index (0..M are the source fragments)
    pub index: u32,

    /// Coded payload, exactly `frag_size` bytes
    pub payload: Bytes,
}

impl CodedFragment {
    /// Create a new coded fragment
    pub fn new(index: u32, payload: Bytes) -> Self {
        Self { index, payload }
    }
}

/// Result of feeding one fragment to a decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    /// The fragment added a new pivot; more are needed
    Accepted,

    /// The fragment carried no new information and was discarded
    Redundant,

    /// The fragment completed the matrix; the store holds the source fragments
    Complete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_validation() {
        assert!(CodeParams::new(1, 1).is_ok());
        assert!(CodeParams::new(MAX_FRAGMENTS, 64).is_ok());
        assert_eq!(
            CodeParams::new(0, 8),
            Err(CodingError::InvalidFragmentCount(0))
        );
        assert_eq!(
            CodeParams::new(MAX_FRAGMENTS + 1, 8),
            Err(CodingError::TooManyFragments(MAX_FRAGMENTS + 1, MAX_FRAGMENTS))
        );
        assert_eq!(
            CodeParams::new(4, 0),
            Err(CodingError::InvalidFragmentSize(0))
        );
    }

    #[test]
    fn test_params_sizes() {
        let params = CodeParams::new(10, 16).unwrap();
        assert_eq!(params.row_len(), 2);
        assert_eq!(params.block_len(), 160);
    }
}
