//! Deterministic parity-row generator
//!
//! Row `n` of the (conceptually infinite) generator matrix tells which source
//! fragments are XORed together to produce coded fragment `n`. Sender and
//! receiver derive it from `(n, m)` alone, so no matrix content is ever
//! transmitted.
//!
//! The first `m` rows form the identity matrix. Every later row is drawn from
//! a 23-bit PRBS seeded with the sequence index, aiming at `m / 2` set bits.
//! Column draws are not de-duplicated: when the generator picks the same
//! column twice the row ends up with fewer bits set. Receivers rely on
//! reproducing this bit for bit, so it must stay that way.

use crate::bitvec::{self, set_bit};
use crate::constants::{PRBS_FEEDBACK_SHIFT, PRBS_SEED_MULTIPLIER, PRBS_TAP};
use crate::error::CodingError;
use crate::types::{validate_fragment_count, ParityRow};
use alloc::vec;

/// Generate row `index` of the parity matrix for `m` source fragments
pub fn parity_row(index: u32, m: usize) -> Result<ParityRow, CodingError> {
    validate_fragment_count(m)?;

    let mut bits = vec![0u8; bitvec::row_len(m)];
    fill_parity_row(&mut bits, index, m);
    Ok(ParityRow::from_parts(index, m, bits))
}

/// Write row `index` into `row`, which must be exactly `row_len(m)` bytes
///
/// `m` is assumed to be validated already.
pub(crate) fn fill_parity_row(row: &mut [u8], index: u32, m: usize) {
    debug_assert_eq!(row.len(), bitvec::row_len(m));
    row.fill(0);

    let n = index as usize;
    if n < m {
        set_bit(row, n);
        return;
    }

    // Powers of two make the low bits of the PRBS cycle quickly; drawing
    // modulo m + 1 breaks the pattern.
    let extra = u64::from(m.is_power_of_two());
    let modulus = m as u64 + extra;

    let mut x = 1 + PRBS_SEED_MULTIPLIER * (u64::from(index) + 1);
    for _ in 0..m / 2 {
        let column = loop {
            x = prbs23(x);
            let r = x % modulus;
            if r < m as u64 {
                break r as usize;
            }
        };
        set_bit(row, column);
    }
}

/// One step of the 23-bit pseudo-random binary sequence
#[inline]
fn prbs23(x: u64) -> u64 {
    (x >> 1) + (((x & 1) ^ ((x >> PRBS_TAP) & 1)) << PRBS_FEEDBACK_SHIFT)
}
