use super::{bits::align_bits, Mode, Stream};
use crate::{error::precondition, serialize::Serializable, Error, RangeCfg};

/// A [`Stream`] that counts the bits a [`super::WriteStream`] would produce.
///
/// Alignment is measured exactly for the current position, so measuring an
/// object from a fresh stream gives the same count as writing it to one.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeasureStream {
    bits: usize,
}

impl MeasureStream {
    /// Creates a stream positioned at bit zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits measured so far.
    pub fn bits_measured(&self) -> usize {
        self.bits
    }

    /// Number of bytes the measured output would occupy once padded.
    pub fn bytes_measured(&self) -> usize {
        self.bits.div_ceil(8)
    }

    fn align(&mut self) {
        self.bits += align_bits(self.bits) as usize;
    }
}

impl Stream for MeasureStream {
    const MODE: Mode = Mode::Measure;

    fn serialize_integer(&mut self, value: &mut i32, min: i32, max: i32) -> Result<(), Error> {
        let range = RangeCfg::new(min, max)?;
        precondition!(range.contains(*value as i64), "integer outside of range");
        self.bits += range.bits() as usize;
        Ok(())
    }

    fn serialize_bits(&mut self, _: &mut u32, bits: u32) -> Result<(), Error> {
        precondition!((1..=32).contains(&bits), "bit count must be in [1, 32]");
        self.bits += bits as usize;
        Ok(())
    }

    fn serialize_bytes(&mut self, data: &mut [u8]) -> Result<(), Error> {
        self.align();
        self.bits += data.len() * 8;
        Ok(())
    }

    fn serialize_align(&mut self) -> Result<(), Error> {
        self.align();
        Ok(())
    }

    fn serialize_check(&mut self) -> Result<(), Error> {
        if cfg!(feature = "checks") {
            self.align();
            self.bits += 32;
        }
        Ok(())
    }

    fn serialize_object(&mut self, object: &mut dyn Serializable) -> Result<(), Error> {
        object.serialize_measure(self)
    }

    fn bits_processed(&self) -> usize {
        self.bits
    }
}
