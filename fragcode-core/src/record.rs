//! Fragment records
//!
//! A record carries one coded fragment with everything a receiver needs to
//! place it, so a stream of records can be decoded without side information:
//!
//! 1. Marker (4 bytes): "FRAG"
//! 2. Header:
//!    - Version (1 byte)
//!    - Fragment count M (2 bytes, big-endian)
//!    - Fragment size (4 bytes, big-endian)
//!    - Sequence index (4 bytes, big-endian)
//! 3. Payload (fragment size bytes)
//! 4. Trailer: CRC32C over marker, header and payload (4 bytes, big-endian)
//!
//! A record whose checksum fails is an erasure: the code recovers from it the
//! same way it recovers from a fragment that never arrived.

use crate::constants::{
    CRC32C_SIZE, MAX_RECORD_PAYLOAD, RECORD_HEADER_SIZE, RECORD_MARKER, RECORD_VERSION,
};
use crate::error::CodingError;
use crate::types::{CodeParams, CodedFragment};
use bytes::{BufMut, Bytes, BytesMut};

/// A decoded record: the fragment plus the session it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentRecord {
    /// Code parameters of the session
    pub params: CodeParams,

    /// The coded fragment
    pub fragment: CodedFragment,
}

impl FragmentRecord {
    /// Create a new record
    pub fn new(params: CodeParams, fragment: CodedFragment) -> Self {
        Self { params, fragment }
    }

    /// Encoded size of this record in bytes
    pub fn encoded_len(&self) -> usize {
        record_len(self.params.frag_size)
    }
}

/// Total record size for a given fragment size
pub const fn record_len(frag_size: usize) -> usize {
    RECORD_HEADER_SIZE + frag_size + CRC32C_SIZE
}

/// Encode one coded fragment as a record
pub fn encode_record(params: CodeParams, fragment: &CodedFragment) -> Result<Bytes, CodingError> {
    params.validate()?;
    check_payload_limit(params.frag_size)?;

    if fragment.payload.len() != params.frag_size {
        return Err(CodingError::PayloadSizeMismatch {
            expected: params.frag_size,
            actual: fragment.payload.len(),
        });
    }

    let mut buf = BytesMut::with_capacity(record_len(params.frag_size));

    // Write marker
    buf.put_slice(RECORD_MARKER);

    // Write header
    buf.put_u8(RECORD_VERSION);
    buf.put_u16(params.m as u16);
    buf.put_u32(params.frag_size as u32);
    buf.put_u32(fragment.index);

    // Write payload
    buf.put_slice(&fragment.payload);

    // Write trailer
    let checksum = crc32c::crc32c(&buf);
    buf.put_u32(checksum);

    Ok(buf.freeze())
}

/// Encode a complete [`FragmentRecord`]
pub fn encode_record_struct(record: &FragmentRecord) -> Result<Bytes, CodingError> {
    encode_record(record.params, &record.fragment)
}

/// Header fields, read without validating the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecordHeader {
    pub m: usize,
    pub frag_size: usize,
    pub index: u32,
}

/// Parse the marker and header at the start of `data`
pub(crate) fn parse_header(data: &[u8]) -> Result<RecordHeader, CodingError> {
    if data.len() < RECORD_HEADER_SIZE {
        return Err(CodingError::IncompleteRecord {
            expected: RECORD_HEADER_SIZE,
            actual: data.len(),
        });
    }

    if &data[0..4] != RECORD_MARKER {
        let mut bad = [0u8; 4];
        bad.copy_from_slice(&data[0..4]);
        return Err(CodingError::BadMarker(bad));
    }

    let version = data[4];
    if version != RECORD_VERSION {
        return Err(CodingError::UnsupportedVersion(version));
    }

    let m = u16::from_be_bytes([data[5], data[6]]) as usize;
    let frag_size = u32::from_be_bytes([data[7], data[8], data[9], data[10]]) as usize;
    let index = u32::from_be_bytes([data[11], data[12], data[13], data[14]]);

    Ok(RecordHeader {
        m,
        frag_size,
        index,
    })
}

/// Decode one record from a byte slice
///
/// The slice must start with a record; trailing bytes are ignored. Use
/// [`record_len`] on the returned params to find where the next one starts.
pub fn decode_record(data: &[u8]) -> Result<FragmentRecord, CodingError> {
    decode_record_zero_copy(Bytes::copy_from_slice(data))
}

/// Decode one record from a byte buffer without copying the payload
pub fn decode_record_zero_copy(buf: Bytes) -> Result<FragmentRecord, CodingError> {
    let header = parse_header(&buf)?;
    let params = CodeParams::new(header.m, header.frag_size)?;
    check_payload_limit(params.frag_size)?;

    let total = record_len(params.frag_size);
    if buf.len() < total {
        return Err(CodingError::IncompleteRecord {
            expected: total,
            actual: buf.len(),
        });
    }

    let payload_end = RECORD_HEADER_SIZE + params.frag_size;
    let expected = u32::from_be_bytes([
        buf[payload_end],
        buf[payload_end + 1],
        buf[payload_end + 2],
        buf[payload_end + 3],
    ]);
    let actual = crc32c::crc32c(&buf[..payload_end]);
    if actual != expected {
        return Err(CodingError::ChecksumMismatch { expected, actual });
    }

    let payload = buf.slice(RECORD_HEADER_SIZE..payload_end);
    Ok(FragmentRecord::new(
        params,
        CodedFragment::new(header.index, payload),
    ))
}

fn check_payload_limit(frag_size: usize) -> Result<(), CodingError> {
    if frag_size > MAX_RECORD_PAYLOAD {
        return Err(CodingError::PayloadSizeMismatch {
            expected: MAX_RECORD_PAYLOAD,
            actual: frag_size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FragmentRecord {
        FragmentRecord::new(
            CodeParams::new(10, 5).unwrap(),
            CodedFragment::new(42, Bytes::from_static(b"hello")),
        )
    }

    #[test]
    fn test_encode_layout() {
        let encoded = encode_record_struct(&sample()).unwrap();

        assert_eq!(encoded.len(), RECORD_HEADER_SIZE + 5 + CRC32C_SIZE);
        assert_eq!(&encoded[0..4], b"FRAG");
        assert_eq!(encoded[4], RECORD_VERSION);
        assert_eq!(&encoded[5..7], &10u16.to_be_bytes());
        assert_eq!(&encoded[7..11], &5u32.to_be_bytes());
        assert_eq!(&encoded[11..15], &42u32.to_be_bytes());
        assert_eq!(&encoded[15..20], b"hello");
    }

    #[test]
    fn test_decode_encoded_record() {
        let record = sample();
        let encoded = encode_record_struct(&record).unwrap();
        let decoded = decode_record(&encoded).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.encoded_len(), encoded.len());
    }

    #[test]
    fn test_decode_bad_marker() {
        let bad = b"NOPE\x01\x00\x01\x00\x00\x00\x01\x00\x00\x00\x00\x00\x00\x00\x00\x00";
        assert!(matches!(
            decode_record(bad),
            Err(CodingError::BadMarker(_))
        ));
    }

    #[test]
    fn test_decode_flipped_bit() {
        let mut encoded = encode_record_struct(&sample()).unwrap().to_vec();
        encoded[16] ^= 0x04;
        assert!(matches!(
            decode_record(&encoded),
            Err(CodingError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_truncated() {
        let encoded = encode_record_struct(&sample()).unwrap();
        assert_eq!(
            decode_record(&encoded[..encoded.len() - 1]),
            Err(CodingError::IncompleteRecord {
                expected: encoded.len(),
                actual: encoded.len() - 1
            })
        );
    }

    #[test]
    fn test_encode_rejects_wrong_payload() {
        let params = CodeParams::new(4, 8).unwrap();
        let fragment = CodedFragment::new(0, Bytes::from_static(b"short"));
        assert!(matches!(
            encode_record(params, &fragment),
            Err(CodingError::PayloadSizeMismatch { .. })
        ));
    }
}
