//! Bit-level packing of values into bytes.
//!
//! Values are packed starting at the least significant bit of each byte.
//! Whole bytes are appended in order, so the layout is identical to packing
//! into little-endian 32-bit words.

use crate::Error;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Mask selecting the low `bits` bits of a `u64`.
#[inline]
fn mask(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

/// Number of padding bits needed to reach the next byte boundary.
#[inline]
pub fn align_bits(position: usize) -> u32 {
    ((8 - position % 8) % 8) as u32
}

/// Packs bit runs into a growable buffer.
#[derive(Debug, Default)]
pub struct BitWriter {
    buffer: BytesMut,
    scratch: u64,
    scratch_bits: u32,
    bits_written: usize,
}

impl BitWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty writer with room for `bytes` bytes.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Appends the low `bits` bits of `value`, with `bits` in `[1, 32]`.
    pub fn write_bits(&mut self, value: u32, bits: u32) {
        debug_assert!((1..=32).contains(&bits));
        self.scratch |= (value as u64 & mask(bits)) << self.scratch_bits;
        self.scratch_bits += bits;
        self.bits_written += bits as usize;
        while self.scratch_bits >= 8 {
            self.buffer.put_u8(self.scratch as u8);
            self.scratch >>= 8;
            self.scratch_bits -= 8;
        }
    }

    /// Zero-pads to the next byte boundary.
    pub fn write_align(&mut self) {
        let bits = align_bits(self.bits_written);
        if bits > 0 {
            self.write_bits(0, bits);
        }
    }

    /// Appends raw bytes.
    pub fn write_bytes(&mut self, data: &[u8]) {
        if self.scratch_bits == 0 {
            self.buffer.put_slice(data);
            self.bits_written += data.len() * 8;
            return;
        }
        for byte in data {
            self.write_bits(*byte as u32, 8);
        }
    }

    /// Number of bits written so far.
    pub fn bits_written(&self) -> usize {
        self.bits_written
    }

    /// Number of bytes the output occupies (including a partial final byte).
    pub fn bytes_written(&self) -> usize {
        self.bits_written.div_ceil(8)
    }

    /// Flushes any partial byte (zero padded) and returns the packed output.
    pub fn finish(mut self) -> Bytes {
        self.write_align();
        self.buffer.freeze()
    }
}

/// Unpacks bit runs from a byte slice.
#[derive(Debug)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    scratch: u64,
    scratch_bits: u32,
    bits_read: usize,
    total_bits: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a reader over `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            scratch: 0,
            scratch_bits: 0,
            bits_read: 0,
            total_bits: buffer.len() * 8,
        }
    }

    /// Returns true if reading `bits` more bits would go past the end.
    pub fn would_read_past_end(&self, bits: usize) -> bool {
        self.bits_read + bits > self.total_bits
    }

    /// Reads `bits` bits, with `bits` in `[1, 32]`.
    pub fn read_bits(&mut self, bits: u32) -> Result<u32, Error> {
        debug_assert!((1..=32).contains(&bits));
        if self.would_read_past_end(bits as usize) {
            return Err(Error::EndOfBuffer);
        }

        // The bounds check guarantees enough whole bytes remain.
        while self.scratch_bits < bits {
            self.scratch |= (self.buffer.get_u8() as u64) << self.scratch_bits;
            self.scratch_bits += 8;
        }
        let value = (self.scratch & mask(bits)) as u32;
        self.scratch >>= bits;
        self.scratch_bits -= bits;
        self.bits_read += bits as usize;
        Ok(value)
    }

    /// Skips to the next byte boundary, failing if any skipped bit is set.
    pub fn read_align(&mut self) -> Result<(), Error> {
        let bits = align_bits(self.bits_read);
        if bits > 0 && self.read_bits(bits)? != 0 {
            return Err(Error::InvalidPadding);
        }
        Ok(())
    }

    /// Fills `out` with raw bytes.
    pub fn read_bytes(&mut self, out: &mut [u8]) -> Result<(), Error> {
        if self.would_read_past_end(out.len() * 8) {
            return Err(Error::EndOfBuffer);
        }
        if self.scratch_bits == 0 {
            self.buffer.copy_to_slice(out);
            self.bits_read += out.len() * 8;
            return Ok(());
        }
        for byte in out.iter_mut() {
            *byte = self.read_bits(8)? as u8;
        }
        Ok(())
    }

    /// Number of bits read so far.
    pub fn bits_read(&self) -> usize {
        self.bits_read
    }

    /// Number of bits left to read.
    pub fn bits_remaining(&self) -> usize {
        self.total_bits - self.bits_read
    }
}
