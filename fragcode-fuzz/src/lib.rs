//! Fuzzing entry points for fragcode-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_decoder

use fragcode_core::{record::decode_record, scanner::scan_records, FragmentDecoder};

pub fn fuzz_record(data: &[u8]) {
    // Try to decode - should never panic
    let _ = decode_record(data);
}

pub fn fuzz_scan(data: &[u8]) {
    // Try to scan - should never panic
    let _ = scan_records(data);
}

/// Feed arbitrary bytes to a decoder as a sequence of fragments
///
/// Byte 0 picks M (1..=64), byte 1 the fragment size (1..=16); the rest is
/// consumed as (index u16, payload) pairs.
pub fn fuzz_decoder(data: &[u8]) {
    if data.len() < 2 {
        return;
    }
    let m = (data[0] % 64) as usize + 1;
    let size = (data[1] % 16) as usize + 1;
    let Ok(mut decoder) = FragmentDecoder::with_size(m, size) else {
        return;
    };

    for chunk in data[2..].chunks(2 + size) {
        let index = u16::from_be_bytes([chunk[0], *chunk.get(1).unwrap_or(&0)]) as u32;
        let payload = chunk.get(2..).unwrap_or(&[][..]);

        // Short tails exercise the size check
        let _ = decoder.submit(payload, index);
        assert!(decoder.missing_count() <= m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzz_record_empty() {
        fuzz_record(&[]);
    }

    #[test]
    fn test_fuzz_record_random() {
        fuzz_record(b"FRAG\x01\xff\xff\xff\xff\xff\xff\x00\x00\x00\x00");
    }

    #[test]
    fn test_fuzz_scan_empty() {
        fuzz_scan(&[]);
    }

    #[test]
    fn test_fuzz_scan_random() {
        fuzz_scan(&[0xFF; 1024]);
    }

    #[test]
    fn test_fuzz_decoder_inputs() {
        fuzz_decoder(&[]);
        fuzz_decoder(&[3, 0, 0, 1, 0xAA]);
        let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        fuzz_decoder(&data);
    }
}
