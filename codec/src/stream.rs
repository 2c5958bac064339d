//! The bit-stream contract and its write, read and measure implementations.
//!
//! Every directive in this crate is written once against [`Stream`]. Which of
//! encode, decode or bit counting happens is decided by the stream type the
//! directive is instantiated with, so writers, readers and measurers always
//! agree on field order and layout.

use crate::{
    relative::{serialize_ack_relative, serialize_int_relative, serialize_sequence_relative},
    serialize::Serializable,
    types::primitives::{
        serialize_bits, serialize_bool, serialize_double, serialize_float, serialize_int,
        serialize_u32, serialize_u64,
    },
    Error,
};
use paste::paste;

pub mod bits;
mod measure;
mod read;
mod write;

pub use measure::MeasureStream;
pub use read::ReadStream;
pub use write::WriteStream;

/// Which operation a [`Stream`] performs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Mode {
    /// Encode values into a buffer.
    Write,
    /// Decode (and validate) values from a buffer.
    Read,
    /// Count the bits a write would produce, without producing them.
    Measure,
}

/// A bit stream that directives can serialize values through.
///
/// Values are always passed by mutable reference: writers and measurers only
/// read them, readers overwrite them.
pub trait Stream {
    /// The mode of this stream.
    const MODE: Mode;

    /// True only for streams that encode.
    const IS_WRITING: bool = matches!(Self::MODE, Mode::Write);

    /// True only for streams that decode.
    const IS_READING: bool = matches!(Self::MODE, Mode::Read);

    /// Serializes a signed integer constrained to `[min, max]` using the
    /// minimum number of bits that can represent the range.
    fn serialize_integer(&mut self, value: &mut i32, min: i32, max: i32) -> Result<(), Error>;

    /// Serializes the low `bits` bits of `value`, with `bits` in `[1, 32]`.
    fn serialize_bits(&mut self, value: &mut u32, bits: u32) -> Result<(), Error>;

    /// Aligns to a byte boundary, then serializes `data` verbatim.
    fn serialize_bytes(&mut self, data: &mut [u8]) -> Result<(), Error>;

    /// Pads (or skips padding) to the next byte boundary.
    fn serialize_align(&mut self) -> Result<(), Error>;

    /// Writes (or verifies) the integrity-check sentinel.
    fn serialize_check(&mut self) -> Result<(), Error>;

    /// Dispatches a type-erased object to the entry point matching this mode.
    fn serialize_object(&mut self, object: &mut dyn Serializable) -> Result<(), Error>;

    /// Number of bits written, read or measured so far.
    fn bits_processed(&self) -> usize;
}

// Generates `read_*` and `write_*` shortcuts for code that keeps separate
// read and write paths. They go through the same directives, so the wire
// format is identical to the unified form.
macro_rules! impl_shortcuts {
    ($($name:ident: $type:ty => $directive:path;)*) => {
        paste! {
            impl ReadStream<'_> {
                $(
                    #[doc = "Reads a single value (see the matching `serialize_*` directive)."]
                    pub fn [<read_ $name>](&mut self) -> Result<$type, Error> {
                        let mut value = <$type>::default();
                        $directive(self, &mut value)?;
                        Ok(value)
                    }
                )*
            }

            impl WriteStream {
                $(
                    #[doc = "Writes a single value (see the matching `serialize_*` directive)."]
                    pub fn [<write_ $name>](&mut self, value: $type) -> Result<(), Error> {
                        let mut value = value;
                        $directive(self, &mut value)
                    }
                )*
            }
        }
    };
}

impl_shortcuts! {
    bool: bool => serialize_bool;
    float: f32 => serialize_float;
    double: f64 => serialize_double;
    u32: u32 => serialize_u32;
    u64: u64 => serialize_u64;
}

impl ReadStream<'_> {
    /// Reads `bits` raw bits.
    pub fn read_bits(&mut self, bits: u32) -> Result<u32, Error> {
        let mut value = 0u32;
        serialize_bits(self, &mut value, bits)?;
        Ok(value)
    }

    /// Reads an integer constrained to `[min, max]`.
    pub fn read_int(&mut self, min: i32, max: i32) -> Result<i32, Error> {
        let mut value = 0i32;
        serialize_int(self, &mut value, min, max)?;
        Ok(value)
    }

    /// Reads an integer encoded relative to `previous`.
    pub fn read_int_relative(&mut self, previous: u32) -> Result<u32, Error> {
        let mut current = 0u32;
        serialize_int_relative(self, previous, &mut current)?;
        Ok(current)
    }

    /// Reads an ack encoded relative to `sequence`.
    pub fn read_ack_relative(&mut self, sequence: u16) -> Result<u16, Error> {
        let mut ack = 0u16;
        serialize_ack_relative(self, sequence, &mut ack)?;
        Ok(ack)
    }

    /// Reads a sequence number encoded relative to `sequence1`.
    pub fn read_sequence_relative(&mut self, sequence1: u16) -> Result<u16, Error> {
        let mut sequence2 = 0u16;
        serialize_sequence_relative(self, sequence1, &mut sequence2)?;
        Ok(sequence2)
    }
}

impl WriteStream {
    /// Writes the low `bits` bits of `value`.
    pub fn write_bits(&mut self, value: u32, bits: u32) -> Result<(), Error> {
        let mut value = value;
        serialize_bits(self, &mut value, bits)
    }

    /// Writes an integer constrained to `[min, max]`.
    pub fn write_int(&mut self, value: i32, min: i32, max: i32) -> Result<(), Error> {
        let mut value = value;
        serialize_int(self, &mut value, min, max)
    }

    /// Writes `current` relative to `previous` (which must be smaller).
    pub fn write_int_relative(&mut self, previous: u32, current: u32) -> Result<(), Error> {
        let mut current = current;
        serialize_int_relative(self, previous, &mut current)
    }

    /// Writes `ack` relative to `sequence`.
    pub fn write_ack_relative(&mut self, sequence: u16, ack: u16) -> Result<(), Error> {
        let mut ack = ack;
        serialize_ack_relative(self, sequence, &mut ack)
    }

    /// Writes `sequence2` relative to `sequence1`.
    pub fn write_sequence_relative(&mut self, sequence1: u16, sequence2: u16) -> Result<(), Error> {
        let mut sequence2 = sequence2;
        serialize_sequence_relative(self, sequence1, &mut sequence2)
    }
}
