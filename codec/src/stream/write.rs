use super::{bits::BitWriter, Mode, Stream};
use crate::{config::CHECK_SENTINEL, error::precondition, serialize::Serializable, Error, RangeCfg};
use bytes::Bytes;

/// A [`Stream`] that encodes values into a growable buffer.
#[derive(Debug, Default)]
pub struct WriteStream {
    writer: BitWriter,
}

impl WriteStream {
    /// Creates an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty stream with room for `bytes` bytes.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            writer: BitWriter::with_capacity(bytes),
        }
    }

    /// Number of bits written so far.
    pub fn bits_written(&self) -> usize {
        self.writer.bits_written()
    }

    /// Number of bytes the output occupies (including a partial final byte).
    pub fn bytes_written(&self) -> usize {
        self.writer.bytes_written()
    }

    /// Pads the final byte with zeros and returns the encoded buffer.
    pub fn finish(self) -> Bytes {
        self.writer.finish()
    }
}

impl Stream for WriteStream {
    const MODE: Mode = Mode::Write;

    fn serialize_integer(&mut self, value: &mut i32, min: i32, max: i32) -> Result<(), Error> {
        let range = RangeCfg::new(min, max)?;
        precondition!(range.contains(*value as i64), "integer outside of range");
        self.writer.write_bits(range.offset(*value), range.bits());
        Ok(())
    }

    fn serialize_bits(&mut self, value: &mut u32, bits: u32) -> Result<(), Error> {
        precondition!((1..=32).contains(&bits), "bit count must be in [1, 32]");
        self.writer.write_bits(*value, bits);
        Ok(())
    }

    fn serialize_bytes(&mut self, data: &mut [u8]) -> Result<(), Error> {
        self.writer.write_align();
        self.writer.write_bytes(data);
        Ok(())
    }

    fn serialize_align(&mut self) -> Result<(), Error> {
        self.writer.write_align();
        Ok(())
    }

    fn serialize_check(&mut self) -> Result<(), Error> {
        if cfg!(feature = "checks") {
            self.writer.write_align();
            self.writer.write_bits(CHECK_SENTINEL, 32);
        }
        Ok(())
    }

    fn serialize_object(&mut self, object: &mut dyn Serializable) -> Result<(), Error> {
        object.serialize_write(self)
    }

    fn bits_processed(&self) -> usize {
        self.writer.bits_written()
    }
}
