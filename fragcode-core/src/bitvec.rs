//! Packed bit-vector primitives
//!
//! Bits are numbered from the most significant bit of byte 0 upwards: bit 0
//! is `0x80` of `v[0]`, bit 7 is `0x01` of `v[0]`, bit 8 is `0x80` of `v[1]`.
//! The same XOR primitive is used for parity rows and for fragment payloads,
//! since combining payloads is bytewise XOR as well.

/// Number of bytes needed to hold `width` bits
pub const fn row_len(width: usize) -> usize {
    width.div_ceil(8)
}

/// Read bit `bit` of `v`
#[inline]
pub fn get_bit(v: &[u8], bit: usize) -> bool {
    (v[bit / 8] >> (7 - bit % 8)) & 1 == 1
}

/// Set bit `bit` of `v` to 1
#[inline]
pub fn set_bit(v: &mut [u8], bit: usize) {
    v[bit / 8] |= 1 << (7 - bit % 8);
}

/// `dst ^= src`, byte by byte
#[inline]
pub fn xor_into(dst: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// `dst = src`, byte by byte
#[inline]
pub fn copy_into(dst: &mut [u8], src: &[u8]) {
    dst.copy_from_slice(src);
}

/// Position of the lowest-numbered set bit among the first `width` bits
pub fn leading_one(v: &[u8], width: usize) -> Option<usize> {
    // Whole zero bytes can be skipped; the MSB-first numbering makes
    // leading_zeros the in-byte offset.
    for (i, &byte) in v.iter().enumerate().take(row_len(width)) {
        if byte != 0 {
            let bit = i * 8 + byte.leading_zeros() as usize;
            return (bit < width).then_some(bit);
        }
    }
    None
}

/// Number of set bits among the first `width` bits
pub fn count_ones(v: &[u8], width: usize) -> usize {
    (0..width).filter(|&i| get_bit(v, i)).count()
}
