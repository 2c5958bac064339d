//! Directive for length-prefixed strings.
//!
//! `buffer_size` plays the role of a fixed-capacity text buffer that must also
//! hold a terminator, so a string may hold at most `buffer_size - 1` bytes.
//! The terminator itself is never transmitted.

use crate::{error::precondition, types::primitives::serialize_int, Error, Stream};
use std::mem;

/// Bytes read per step when decoding a string.
const READ_CHUNK: usize = 256;

/// Serializes a string of at most `buffer_size - 1` bytes.
///
/// The length is encoded as an integer in `[0, buffer_size - 1]`, followed by
/// the raw bytes of the string. Readers fail if the claimed length is too
/// large, the buffer is truncated, or the bytes are not valid UTF-8.
pub fn serialize_string<S: Stream>(
    stream: &mut S,
    value: &mut String,
    buffer_size: usize,
) -> Result<(), Error> {
    let max_len = i32::try_from(buffer_size.saturating_sub(1)).unwrap_or(0);
    precondition!(max_len > 0, "string buffer size must be in [2, 2^31]");

    let mut length = 0i32;
    if !S::IS_READING {
        precondition!(value.len() <= max_len as usize, "string does not fit in buffer");
        length = value.len() as i32;
    }
    serialize_int(stream, &mut length, 0, max_len)?;

    if S::IS_READING {
        let bytes = read_chunked(stream, length as usize)?;
        *value = String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;
        return Ok(());
    }

    // Reuse the string's allocation for the byte run.
    let mut bytes = mem::take(value).into_bytes();
    let result = stream.serialize_bytes(&mut bytes);
    *value = String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;
    result
}

/// Reads `length` bytes, growing the output only as bytes arrive.
///
/// The claimed length is untrusted, so it is never allocated up front. After
/// the first chunk the stream is aligned, so chunking does not change the
/// layout of a single byte run.
fn read_chunked<S: Stream>(stream: &mut S, length: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];
    let mut remaining = length;
    loop {
        let n = remaining.min(READ_CHUNK);
        stream.serialize_bytes(&mut chunk[..n])?;
        bytes.extend_from_slice(&chunk[..n]);
        remaining -= n;
        if remaining == 0 {
            return Ok(bytes);
        }
    }
}
