//! Coded fragment encoding

use crate::bitvec::{self, xor_into};
use crate::constants::MAX_ROW_BYTES;
use crate::error::CodingError;
use crate::fragment::split_message;
use crate::matrix::fill_parity_row;
use crate::types::{validate_fragment_count, CodeParams, CodedFragment};
use alloc::vec;
use alloc::vec::Vec;
use bytes::{BufMut, Bytes, BytesMut};

/// Encode coded fragment `index` from the M source fragments
///
/// The source fragments selected by parity row `index` are XORed together.
/// For `index < M` this is `sources[index]` unchanged.
pub fn encode_fragment<S: AsRef<[u8]>>(
    sources: &[S],
    index: u32,
    frag_size: usize,
) -> Result<Bytes, CodingError> {
    let params = CodeParams::new(sources.len(), frag_size)?;

    for source in sources {
        let len = source.as_ref().len();
        if len != frag_size {
            return Err(CodingError::PayloadSizeMismatch {
                expected: frag_size,
                actual: len,
            });
        }
    }

    let mut out = vec![0u8; frag_size];
    combine(&mut out, params, index, |i| sources[i].as_ref());
    Ok(Bytes::from(out))
}

/// XOR the sources selected by row `index` into `out`
fn combine<'a>(
    out: &mut [u8],
    params: CodeParams,
    index: u32,
    source: impl Fn(usize) -> &'a [u8],
) {
    let mut row = [0u8; MAX_ROW_BYTES];
    let row = &mut row[..params.row_len()];
    fill_parity_row(row, index, params.m);

    for i in 0..params.m {
        if bitvec::get_bit(row, i) {
            xor_into(out, source(i));
        }
    }
}

/// Sender side of a session: owns the M source fragments
///
/// The fragments are kept in one contiguous buffer so every coded fragment
/// can be produced on demand, for any sequence index.
#[derive(Debug, Clone)]
pub struct FragmentEncoder {
    params: CodeParams,
    source: Bytes,
}

impl FragmentEncoder {
    /// Create an encoder for `params` over exactly `params.m` source fragments
    pub fn new<S: AsRef<[u8]>>(
        params: CodeParams,
        fragments: &[S],
    ) -> Result<Self, CodingError> {
        params.validate()?;
        if fragments.len() != params.m {
            return Err(CodingError::FragmentCountMismatch {
                expected: params.m,
                actual: fragments.len(),
            });
        }

        let mut buf = BytesMut::with_capacity(params.block_len());
        for fragment in fragments {
            let fragment = fragment.as_ref();
            if fragment.len() != params.frag_size {
                return Err(CodingError::PayloadSizeMismatch {
                    expected: params.frag_size,
                    actual: fragment.len(),
                });
            }
            buf.put_slice(fragment);
        }

        Ok(Self {
            params,
            source: buf.freeze(),
        })
    }

    /// Create an encoder over equally sized source fragments
    ///
    /// The fragment size is taken from the first fragment.
    pub fn from_fragments<S: AsRef<[u8]>>(fragments: &[S]) -> Result<Self, CodingError> {
        validate_fragment_count(fragments.len())?;
        let params = CodeParams::new(fragments.len(), fragments[0].as_ref().len())?;
        Self::new(params, fragments)
    }

    /// Split `message` into `frag_size` fragments (zero padding the last one)
    pub fn from_message(message: &[u8], frag_size: usize) -> Result<Self, CodingError> {
        let fragments = split_message(message, frag_size)?;
        Self::from_fragments(&fragments)
    }

    /// Code parameters of this session
    pub fn params(&self) -> CodeParams {
        self.params
    }

    /// Source fragment `i`, or `None` if out of range
    pub fn source_fragment(&self, i: usize) -> Option<Bytes> {
        (i < self.params.m).then(|| self.slot(i))
    }

    /// Produce coded fragment `index`
    pub fn encode(&self, index: u32) -> CodedFragment {
        if (index as usize) < self.params.m {
            return CodedFragment::new(index, self.slot(index as usize));
        }

        let mut out = vec![0u8; self.params.frag_size];
        let size = self.params.frag_size;
        combine(&mut out, self.params, index, |i| {
            &self.source[i * size..(i + 1) * size]
        });
        CodedFragment::new(index, Bytes::from(out))
    }

    /// The M systematic fragments, in order
    pub fn systematic(&self) -> Vec<CodedFragment> {
        (0..self.params.m as u32).map(|n| self.encode(n)).collect()
    }

    /// Unbounded stream of coded fragments starting at `start`
    pub fn stream(&self, start: u32) -> impl Iterator<Item = CodedFragment> + '_ {
        (start..=u32::MAX).map(move |n| self.encode(n))
    }

    fn slot(&self, i: usize) -> Bytes {
        let size = self.params.frag_size;
        self.source.slice(i * size..(i + 1) * size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_systematic_fragments_pass_through() {
        let sources = [[1u8, 2], [3, 4], [5, 6]];
        for (n, source) in sources.iter().enumerate() {
            let coded = encode_fragment(&sources, n as u32, 2).unwrap();
            assert_eq!(coded.as_ref(), source);
        }
    }

    #[test]
    fn test_redundancy_fragment_is_xor_of_row() {
        // Row 4 of m = 4 selects columns 0 and 3
        let sources = [[0x01u8], [0x02], [0x03], [0x04]];
        let coded = encode_fragment(&sources, 4, 1).unwrap();
        assert_eq!(coded.as_ref(), &[0x05]);
    }

    #[test]
    fn test_size_mismatch() {
        let sources: [&[u8]; 2] = [&[1, 2], &[3]];
        assert_eq!(
            encode_fragment(&sources, 0, 2),
            Err(CodingError::PayloadSizeMismatch {
                expected: 2,
                actual: 1
            })
        );
        let empty: [&[u8]; 0] = [];
        assert_eq!(
            encode_fragment(&empty, 0, 2),
            Err(CodingError::InvalidFragmentCount(0))
        );
    }

    #[test]
    fn test_encoder_matches_free_function() {
        let sources: Vec<Vec<u8>> = (0..10u8).map(|i| vec![i; 8]).collect();
        let encoder = FragmentEncoder::from_fragments(&sources).unwrap();
        for n in 0..40 {
            let coded = encoder.encode(n);
            assert_eq!(coded.index, n);
            assert_eq!(coded.payload, encode_fragment(&sources, n, 8).unwrap());
        }
    }

    #[test]
    fn test_new_checks_fragment_count() {
        let params = CodeParams::new(3, 2).unwrap();
        let sources = [[1u8, 2], [3, 4]];
        assert_eq!(
            FragmentEncoder::new(params, &sources).unwrap_err(),
            CodingError::FragmentCountMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_from_message_pads() {
        let encoder = FragmentEncoder::from_message(b"hello world", 4).unwrap();
        assert_eq!(encoder.params(), CodeParams { m: 3, frag_size: 4 });
        assert_eq!(encoder.source_fragment(2).unwrap().as_ref(), b"rld\0");
        assert!(encoder.source_fragment(3).is_none());
    }

    #[test]
    fn test_stream_starts_where_asked() {
        let encoder = FragmentEncoder::from_message(&[7u8; 32], 4).unwrap();
        let indices: Vec<u32> = encoder.stream(8).take(3).map(|f| f.index).collect();
        assert_eq!(indices, vec![8, 9, 10]);
        assert_eq!(encoder.systematic().len(), 8);
    }
}
