//! Record scanner for damaged or noisy input

use crate::constants::RECORD_MARKER;
use crate::error::CodingError;
use crate::record::{decode_record_zero_copy, parse_header, record_len, FragmentRecord};
use alloc::vec::Vec;
use bytes::Bytes;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// A record found at a specific offset in the stream
#[derive(Debug, Clone)]
pub struct LocatedRecord {
    /// Byte offset where the record marker was found
    pub offset: usize,

    /// The decoded record
    pub record: FragmentRecord,

    /// Total size of the record in bytes
    pub size: usize,
}

/// Scan statistics
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Total bytes scanned
    pub bytes_scanned: usize,

    /// Number of valid records found
    pub records_found: usize,

    /// Number of potential markers found
    pub markers_found: usize,

    /// Number of decode failures
    pub decode_failures: usize,

    /// Total bytes recovered (sum of all valid record sizes)
    pub bytes_recovered: usize,
}

impl ScanStats {
    /// Calculate recovery rate as a percentage
    pub fn recovery_rate(&self) -> f64 {
        if self.bytes_scanned == 0 {
            0.0
        } else {
            (self.bytes_recovered as f64 / self.bytes_scanned as f64) * 100.0
        }
    }
}

/// Scan a byte stream for intact records, even if the stream is damaged
///
/// Every marker hit is decoded in place. A good record is kept and the scan
/// jumps past it; a damaged one is dropped and the scan resumes right after
/// its marker. Dropped records are plain erasures to the decoder.
pub fn scan_records(data: &[u8]) -> Vec<LocatedRecord> {
    scan_records_with_stats(data).0
}

/// Scan a byte stream and report statistics alongside the records
pub fn scan_records_with_stats(data: &[u8]) -> (Vec<LocatedRecord>, ScanStats) {
    scan_buffer(Bytes::copy_from_slice(data))
}

/// Scan a byte buffer; payloads of the returned records slice into `buf`
pub fn scan_records_zero_copy(buf: Bytes) -> Vec<LocatedRecord> {
    scan_buffer(buf).0
}

fn scan_buffer(buf: Bytes) -> (Vec<LocatedRecord>, ScanStats) {
    let mut stats = ScanStats {
        bytes_scanned: buf.len(),
        ..Default::default()
    };
    let mut results = Vec::new();
    let mut pos = 0;

    #[cfg(feature = "logging")]
    debug!("Starting record scan of {} bytes", buf.len());

    while pos < buf.len() {
        let Some(rel) = find_marker(&buf[pos..]) else {
            break;
        };
        let at = pos + rel;
        stats.markers_found += 1;

        match try_decode_at_offset(&buf, at) {
            Ok(located) => {
                stats.bytes_recovered += located.size;
                pos = at + located.size;
                results.push(located);
            }
            Err(_e) => {
                #[cfg(feature = "logging")]
                warn!("Failed to decode record at offset {}: {}", at, _e);

                stats.decode_failures += 1;
                pos = at + RECORD_MARKER.len();
            }
        }
    }

    stats.records_found = results.len();

    #[cfg(feature = "logging")]
    debug!(
        "Scan complete: found {} valid records out of {} bytes scanned",
        stats.records_found, stats.bytes_scanned
    );

    (results, stats)
}

/// Find the next occurrence of the record marker
fn find_marker(data: &[u8]) -> Option<usize> {
    memchr::memmem::find(data, RECORD_MARKER)
}

/// Try to decode a record at a specific offset
fn try_decode_at_offset(buf: &Bytes, offset: usize) -> Result<LocatedRecord, CodingError> {
    let header = parse_header(&buf[offset..])?;
    let size = record_len(header.frag_size);

    if offset + size > buf.len() {
        return Err(CodingError::IncompleteRecord {
            expected: size,
            actual: buf.len() - offset,
        });
    }

    let record = decode_record_zero_copy(buf.slice(offset..offset + size))?;
    Ok(LocatedRecord {
        offset,
        record,
        size,
    })
}
