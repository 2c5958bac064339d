//! Directive for raw byte runs.

use crate::{Error, Stream};

/// Serializes `data.len()` raw bytes, starting at the next byte boundary.
///
/// On read, `data` is filled with the decoded bytes.
#[inline]
pub fn serialize_bytes<S: Stream>(stream: &mut S, data: &mut [u8]) -> Result<(), Error> {
    stream.serialize_bytes(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{types::primitives::serialize_bool, MeasureStream, ReadStream, WriteStream};

    #[test]
    fn test_bytes() {
        let values: [&[u8]; 3] = [&[], &[1, 2, 3], &[0xAB; 300]];
        for value in values {
            let mut writer = WriteStream::new();
            let mut flag = true;
            serialize_bool(&mut writer, &mut flag).unwrap();
            let mut data = value.to_vec();
            serialize_bytes(&mut writer, &mut data).unwrap();
            assert_eq!(writer.bits_written(), 8 + value.len() * 8);
            let buffer = writer.finish();

            let mut measure = MeasureStream::new();
            serialize_bool(&mut measure, &mut flag).unwrap();
            serialize_bytes(&mut measure, &mut data).unwrap();
            assert_eq!(measure.bits_measured(), 8 + value.len() * 8);

            let mut reader = ReadStream::new(&buffer);
            let mut decoded = vec![0u8; value.len()];
            serialize_bool(&mut reader, &mut flag).unwrap();
            serialize_bytes(&mut reader, &mut decoded).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn test_bytes_truncated() {
        let buffer = [1, 2, 3];
        let mut reader = ReadStream::new(&buffer);
        let mut decoded = [0u8; 4];
        assert_eq!(
            serialize_bytes(&mut reader, &mut decoded),
            Err(Error::EndOfBuffer)
        );
    }
}
