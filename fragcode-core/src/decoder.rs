//! Online fragment decoding
//!
//! The decoder runs Gaussian elimination over GF(2) one fragment at a time.
//! It keeps an M×M elimination matrix `A` and an M-slot fragment store `S`:
//!
//! - row `i` of `A` is either all zero or has its lowest set bit at column `i`
//!   (it is the pivot for column `i`);
//! - slot `i` of `S` holds the XOR of the source fragments selected by row `i`.
//!
//! Every arriving fragment is reduced against the pivots already known. What
//! is left either is zero (the fragment is redundant) or lands as a new pivot.
//! Once all M pivots exist, `A` is upper triangular with a unit diagonal and a
//! single back-substitution pass turns `S` into the source fragments.
//!
//! Memory is bounded to the two arenas no matter how many fragments arrive.

use crate::bitvec::{copy_into, get_bit, leading_one, xor_into};
use crate::error::CodingError;
use crate::matrix::fill_parity_row;
use crate::types::{CodeParams, CodedFragment, SubmitOutcome};
use alloc::vec;
use alloc::vec::Vec;
use bytes::Bytes;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Counters describing what a decoder has seen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Fragments passed to `submit`
    pub submitted: usize,

    /// Fragments that produced a new pivot
    pub accepted: usize,

    /// Fragments discarded as linear combinations of known ones
    pub redundant: usize,
}

impl DecodeStats {
    /// Share of submitted fragments that were redundant, as a percentage
    pub fn overhead(&self) -> f64 {
        if self.submitted == 0 {
            0.0
        } else {
            (self.redundant as f64 / self.submitted as f64) * 100.0
        }
    }
}

/// Receiver side of a session
#[derive(Debug, Clone)]
pub struct FragmentDecoder {
    params: CodeParams,
    row_len: usize,

    /// Elimination matrix, `m` rows of `row_len` bytes
    matrix: Vec<u8>,

    /// Fragment store, `m` slots of `frag_size` bytes
    store: Vec<u8>,

    pivots: usize,
    stats: DecodeStats,

    row_scratch: Vec<u8>,
    payload_scratch: Vec<u8>,
}

impl FragmentDecoder {
    /// Create an empty decoder session
    pub fn new(params: CodeParams) -> Result<Self, CodingError> {
        params.validate()?;
        let row_len = params.row_len();

        Ok(Self {
            params,
            row_len,
            matrix: vec![0u8; params.m * row_len],
            store: vec![0u8; params.block_len()],
            pivots: 0,
            stats: DecodeStats::default(),
            row_scratch: vec![0u8; row_len],
            payload_scratch: vec![0u8; params.frag_size],
        })
    }

    /// Create a session for `m` fragments of `frag_size` bytes
    pub fn with_size(m: usize, frag_size: usize) -> Result<Self, CodingError> {
        Self::new(CodeParams::new(m, frag_size)?)
    }

    /// Feed coded fragment `index` into the session
    ///
    /// Returns `Accepted` when the fragment added a pivot, `Redundant` when it
    /// carried nothing new and `Complete` when it was the last pivot needed.
    /// Once complete, every further fragment is `Redundant` and the recovered
    /// fragments are never touched again.
    ///
    /// A payload of the wrong size is rejected before any state changes.
    pub fn submit(&mut self, payload: &[u8], index: u32) -> Result<SubmitOutcome, CodingError> {
        if payload.len() != self.params.frag_size {
            return Err(CodingError::PayloadSizeMismatch {
                expected: self.params.frag_size,
                actual: payload.len(),
            });
        }

        self.stats.submitted += 1;

        if self.is_complete() {
            self.stats.redundant += 1;
            return Ok(SubmitOutcome::Redundant);
        }

        let m = self.params.m;
        fill_parity_row(&mut self.row_scratch, index, m);
        copy_into(&mut self.payload_scratch, payload);

        // Ascending order: a pivot at column i has no bits below i, so
        // cancelling it never reintroduces an already cleared column.
        for i in 0..m {
            if get_bit(&self.row_scratch, i) && self.has_pivot(i) {
                xor_into(&mut self.row_scratch, row(&self.matrix, self.row_len, i));
                xor_into(
                    &mut self.payload_scratch,
                    row(&self.store, self.params.frag_size, i),
                );
            }
        }

        let Some(lead) = leading_one(&self.row_scratch, m) else {
            #[cfg(feature = "logging")]
            trace!("Fragment {} is redundant", index);

            self.stats.redundant += 1;
            return Ok(SubmitOutcome::Redundant);
        };

        copy_into(
            row_mut(&mut self.matrix, self.row_len, lead),
            &self.row_scratch,
        );
        copy_into(
            row_mut(&mut self.store, self.params.frag_size, lead),
            &self.payload_scratch,
        );
        self.pivots += 1;
        self.stats.accepted += 1;

        #[cfg(feature = "logging")]
        debug!(
            "Fragment {} filled pivot {} ({} of {} pivots)",
            index, lead, self.pivots, m
        );

        if self.pivots < m {
            return Ok(SubmitOutcome::Accepted);
        }

        self.back_substitute();

        #[cfg(feature = "logging")]
        debug!(
            "Decoding complete after {} fragments ({} redundant)",
            self.stats.submitted, self.stats.redundant
        );

        Ok(SubmitOutcome::Complete)
    }

    /// Feed a [`CodedFragment`] into the session
    pub fn submit_fragment(
        &mut self,
        fragment: &CodedFragment,
    ) -> Result<SubmitOutcome, CodingError> {
        self.submit(&fragment.payload, fragment.index)
    }

    /// Resolve the triangular system in place
    ///
    /// Rows are processed bottom-up so every slot folded into `S[i]` has
    /// already been reduced to its source fragment.
    fn back_substitute(&mut self) {
        let m = self.params.m;
        let size = self.params.frag_size;

        for i in (0..m).rev() {
            for j in (i + 1..m).rev() {
                if get_bit(row(&self.matrix, self.row_len, i), j) {
                    let (head, tail) = self.store.split_at_mut(j * size);
                    xor_into(&mut head[i * size..(i + 1) * size], &tail[..size]);
                }
            }
        }
    }

    fn has_pivot(&self, i: usize) -> bool {
        get_bit(row(&self.matrix, self.row_len, i), i)
    }

    /// Rows of the elimination matrix still without a pivot
    ///
    /// A lower bound on the fragments still needed: redundancy fragments can
    /// turn out to be dependent, so more may have to arrive.
    pub fn missing_count(&self) -> usize {
        debug_assert_eq!(
            self.params.m - self.pivots,
            (0..self.params.m).filter(|&i| !self.has_pivot(i)).count()
        );
        self.params.m - self.pivots
    }

    /// Whether every source fragment has been recovered
    pub fn is_complete(&self) -> bool {
        self.pivots == self.params.m
    }

    /// Code parameters of this session
    pub fn params(&self) -> CodeParams {
        self.params
    }

    /// Counters for progress reporting
    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    /// Recovered source fragment `i`
    ///
    /// `None` until the session is complete, or if `i` is out of range.
    pub fn fragment(&self, i: usize) -> Option<&[u8]> {
        if !self.is_complete() || i >= self.params.m {
            return None;
        }
        Some(row(&self.store, self.params.frag_size, i))
    }

    /// All recovered source fragments, in order
    pub fn fragments(&self) -> Option<impl Iterator<Item = &[u8]> + '_> {
        self.is_complete()
            .then(|| self.store.chunks_exact(self.params.frag_size))
    }

    /// The whole recovered block (M × frag_size bytes)
    pub fn recovered(&self) -> Option<&[u8]> {
        self.is_complete().then_some(self.store.as_slice())
    }

    /// Take the recovered fragments out of the session
    pub fn into_fragments(self) -> Result<Vec<Bytes>, CodingError> {
        let size = self.params.frag_size;
        let block = self.into_block()?;
        Ok((0..block.len() / size)
            .map(|i| block.slice(i * size..(i + 1) * size))
            .collect())
    }

    /// Take the recovered message out of the session, truncated to `len` bytes
    pub fn into_message(self, len: usize) -> Result<Bytes, CodingError> {
        let mut block = self.into_block()?;
        block.truncate(len);
        Ok(block)
    }

    fn into_block(self) -> Result<Bytes, CodingError> {
        if !self.is_complete() {
            return Err(CodingError::Incomplete {
                missing: self.missing_count(),
            });
        }
        Ok(Bytes::from(self.store))
    }
}

#[inline]
fn row(arena: &[u8], width: usize, i: usize) -> &[u8] {
    &arena[i * width..(i + 1) * width]
}

#[inline]
fn row_mut(arena: &mut [u8], width: usize, i: usize) -> &mut [u8] {
    &mut arena[i * width..(i + 1) * width]
}
