//! Core serialization traits.
//!
//! A type describes its wire layout once, in [`Serialize::serialize`]. The
//! same routine then reads, writes and measures the type, so the three can
//! never disagree on field order or encoding.

use crate::{Error, MeasureStream, ReadStream, Stream, WriteStream};
use bytes::Bytes;

/// Trait for types that can be serialized through any [`Stream`].
pub trait Serialize {
    /// Serializes every field of `self`, in a fixed order, through `stream`.
    ///
    /// Must return the first error encountered by any directive.
    fn serialize<S: Stream>(&mut self, stream: &mut S) -> Result<(), Error>;
}

/// Object-safe entry points for types implementing [`Serialize`].
///
/// Implemented for every [`Serialize`] type, so heterogeneous collections of
/// messages can be stored as `Box<dyn Serializable>` and still be read,
/// written and measured.
pub trait Serializable {
    /// Writes the object to `stream`.
    fn serialize_write(&mut self, stream: &mut WriteStream) -> Result<(), Error>;

    /// Reads the object from `stream`, overwriting its fields.
    fn serialize_read(&mut self, stream: &mut ReadStream<'_>) -> Result<(), Error>;

    /// Measures the bits the object would occupy in `stream`.
    fn serialize_measure(&mut self, stream: &mut MeasureStream) -> Result<(), Error>;
}

impl<T: Serialize> Serializable for T {
    fn serialize_write(&mut self, stream: &mut WriteStream) -> Result<(), Error> {
        self.serialize(stream)
    }

    fn serialize_read(&mut self, stream: &mut ReadStream<'_>) -> Result<(), Error> {
        self.serialize(stream)
    }

    fn serialize_measure(&mut self, stream: &mut MeasureStream) -> Result<(), Error> {
        self.serialize(stream)
    }
}

/// Extension trait providing whole-buffer helpers for [`Serializable`] types.
pub trait SerializableExt: Serializable {
    /// Returns the number of bits [`SerializableExt::encode`] would write
    /// (before padding the final byte).
    ///
    /// (Provided method).
    fn measure(&mut self) -> Result<usize, Error> {
        let mut stream = MeasureStream::new();
        self.serialize_measure(&mut stream)?;
        Ok(stream.bits_measured())
    }

    /// Encodes the object into a new buffer, padding the final byte with zeros.
    ///
    /// Panics if the bits written differ from the bits measured.
    ///
    /// (Provided method).
    fn encode(&mut self) -> Result<Bytes, Error> {
        let bits = self.measure()?;
        let mut stream = WriteStream::with_capacity(bits.div_ceil(8));
        self.serialize_write(&mut stream)?;
        assert_eq!(
            stream.bits_written(),
            bits,
            "serialize() wrote a different number of bits than it measured"
        );
        Ok(stream.finish())
    }

    /// Decodes the object from `buf`, ensuring the buffer is fully consumed.
    ///
    /// On error the object's fields are unspecified and must not be used.
    ///
    /// (Provided method).
    fn decode_from(&mut self, buf: &[u8]) -> Result<(), Error> {
        let mut stream = ReadStream::new(buf);
        self.serialize_read(&mut stream)?;
        stream.finish()
    }

    /// Decodes a new value from `buf`, ensuring the buffer is fully consumed.
    ///
    /// (Provided method).
    fn decode(buf: &[u8]) -> Result<Self, Error>
    where
        Self: Default + Sized,
    {
        let mut value = Self::default();
        value.decode_from(buf)?;
        Ok(value)
    }
}

// Automatically implement `SerializableExt` for every `Serializable`, including trait objects.
impl<T: Serializable + ?Sized> SerializableExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::primitives::{serialize_bool, serialize_int, serialize_object};

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Flags {
        a: bool,
        b: bool,
        level: u8,
    }

    impl Serialize for Flags {
        fn serialize<S: Stream>(&mut self, stream: &mut S) -> Result<(), Error> {
            serialize_bool(stream, &mut self.a)?;
            serialize_bool(stream, &mut self.b)?;
            serialize_int(stream, &mut self.level, 0, 7)
        }
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Outer {
        first: Flags,
        second: Flags,
    }

    impl Serialize for Outer {
        fn serialize<S: Stream>(&mut self, stream: &mut S) -> Result<(), Error> {
            serialize_object(stream, &mut self.first)?;
            serialize_object(stream, &mut self.second)
        }
    }

    #[test]
    fn test_encode_decode() {
        let mut flags = Flags {
            a: true,
            b: false,
            level: 5,
        };
        assert_eq!(flags.measure().unwrap(), 5);
        let encoded = flags.encode().unwrap();
        assert_eq!(&encoded[..], &[0b10101]);
        assert_eq!(Flags::decode(&encoded).unwrap(), flags);
    }

    #[test]
    fn test_nested() {
        let mut outer = Outer {
            first: Flags {
                a: true,
                b: true,
                level: 7,
            },
            second: Flags {
                a: false,
                b: true,
                level: 0,
            },
        };
        assert_eq!(outer.measure().unwrap(), 10);
        let encoded = outer.encode().unwrap();
        assert_eq!(Outer::decode(&encoded).unwrap(), outer);
    }

    #[test]
    fn test_trait_object() {
        let mut objects: Vec<Box<dyn Serializable>> = vec![
            Box::new(Flags {
                a: true,
                b: false,
                level: 3,
            }),
            Box::new(Outer::default()),
        ];
        let sizes: Vec<usize> = objects.iter_mut().map(|o| o.measure().unwrap()).collect();
        assert_eq!(sizes, vec![5, 10]);

        let encoded = objects[0].encode().unwrap();
        let mut decoded: Box<dyn Serializable> = Box::new(Flags::default());
        decoded.decode_from(&encoded).unwrap();
        assert_eq!(decoded.encode().unwrap(), encoded);
    }

    #[test]
    fn test_decode_extra_data() {
        let encoded = [0b10101, 0x00];
        assert_eq!(Flags::decode(&encoded), Err(Error::ExtraData(1)));
    }

    #[test]
    fn test_decode_truncated() {
        assert_eq!(Outer::decode(&[0xFF]), Err(Error::EndOfBuffer));
    }
}
