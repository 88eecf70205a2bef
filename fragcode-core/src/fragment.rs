//! Message splitting and reassembly.
//!
//! A message is cut into M fragments of `frag_size` bytes, the last one zero
//! padded. The original length is not part of the code, so applications must
//! carry it in their own metadata (the CLI writes it into a manifest) and pass
//! it back to [`join_fragments`] to strip the padding.

use crate::error::CodingError;
use crate::types::validate_fragment_count;
use alloc::vec::Vec;
use bytes::{BufMut, Bytes, BytesMut};

/// Number of fragments needed for `len` bytes (at least one)
pub fn fragment_count(len: usize, frag_size: usize) -> usize {
    if frag_size == 0 {
        return 0;
    }
    len.div_ceil(frag_size).max(1)
}

/// Split `message` into equally sized fragments
///
/// An empty message yields a single all-zero fragment.
pub fn split_message(message: &[u8], frag_size: usize) -> Result<Vec<Bytes>, CodingError> {
    if frag_size == 0 {
        return Err(CodingError::InvalidFragmentSize(frag_size));
    }
    let m = fragment_count(message.len(), frag_size);
    validate_fragment_count(m)?;

    let mut out = Vec::with_capacity(m);
    for i in 0..m {
        let start = core::cmp::min(i * frag_size, message.len());
        let end = core::cmp::min(start + frag_size, message.len());

        let mut buf = BytesMut::with_capacity(frag_size);
        buf.put_slice(&message[start..end]);
        buf.put_bytes(0, frag_size - (end - start));
        out.push(buf.freeze());
    }
    Ok(out)
}

/// Concatenate fragments and truncate the result to `len` bytes
pub fn join_fragments<S: AsRef<[u8]>>(fragments: &[S], len: usize) -> Bytes {
    let total: usize = fragments.iter().map(|f| f.as_ref().len()).sum();
    let mut out = BytesMut::with_capacity(total);
    for fragment in fragments {
        out.put_slice(fragment.as_ref());
    }
    out.truncate(len);
    out.freeze()
}
