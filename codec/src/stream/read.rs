use super::{bits::BitReader, Mode, Stream};
use crate::{config::CHECK_SENTINEL, error::precondition, serialize::Serializable, Error, RangeCfg};
use tracing::trace;

/// A [`Stream`] that decodes values from an untrusted buffer.
///
/// Every inconsistency in the input is reported as an [`Error`]; nothing read
/// from the buffer can cause a panic.
#[derive(Debug)]
pub struct ReadStream<'a> {
    reader: BitReader<'a>,
}

impl<'a> ReadStream<'a> {
    /// Creates a stream reading from `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            reader: BitReader::new(buffer),
        }
    }

    /// Number of bits read so far.
    pub fn bits_read(&self) -> usize {
        self.reader.bits_read()
    }

    /// Number of bits left in the buffer.
    pub fn bits_remaining(&self) -> usize {
        self.reader.bits_remaining()
    }

    /// Verifies the buffer has been fully consumed.
    ///
    /// Padding in the final byte must be zero and no whole bytes may remain.
    pub fn finish(mut self) -> Result<(), Error> {
        let result = self.reader.read_align();
        self.traced(result)?;
        let remaining = self.reader.bits_remaining() / 8;
        if remaining > 0 {
            return self.traced(Err(Error::ExtraData(remaining)));
        }
        Ok(())
    }

    fn traced<T>(&self, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(err) = &result {
            trace!(
                bits_read = self.reader.bits_read(),
                bits_remaining = self.reader.bits_remaining(),
                ?err,
                "rejected stream input"
            );
        }
        result
    }
}

impl Stream for ReadStream<'_> {
    const MODE: Mode = Mode::Read;

    fn serialize_integer(&mut self, value: &mut i32, min: i32, max: i32) -> Result<(), Error> {
        let range = RangeCfg::new(min, max)?;
        let result = self
            .reader
            .read_bits(range.bits())
            .and_then(|offset| range.from_offset(offset));
        *value = self.traced(result)?;
        Ok(())
    }

    fn serialize_bits(&mut self, value: &mut u32, bits: u32) -> Result<(), Error> {
        precondition!((1..=32).contains(&bits), "bit count must be in [1, 32]");
        let result = self.reader.read_bits(bits);
        *value = self.traced(result)?;
        Ok(())
    }

    fn serialize_bytes(&mut self, data: &mut [u8]) -> Result<(), Error> {
        let result = self.reader.read_align().and_then(|_| self.reader.read_bytes(data));
        self.traced(result)
    }

    fn serialize_align(&mut self) -> Result<(), Error> {
        let result = self.reader.read_align();
        self.traced(result)
    }

    fn serialize_check(&mut self) -> Result<(), Error> {
        if !cfg!(feature = "checks") {
            return Ok(());
        }
        let result = self.reader.read_align().and_then(|_| {
            let found = self.reader.read_bits(32)?;
            if found != CHECK_SENTINEL {
                return Err(Error::CheckFailed(CHECK_SENTINEL, found));
            }
            Ok(())
        });
        self.traced(result)
    }

    fn serialize_object(&mut self, object: &mut dyn Serializable) -> Result<(), Error> {
        object.serialize_read(self)
    }

    fn bits_processed(&self) -> usize {
        self.reader.bits_read()
    }
}
