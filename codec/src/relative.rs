//! Relative integer encoding.
//!
//! Sequence numbers, acks and other monotonically increasing values are
//! usually close to a value the reader already knows. Encoding the difference
//! instead of the value saves most of the bits in the common case.
//!
//! The difference `D = current - previous` (always positive) is sent as a run
//! of flags, one per bucket, terminated by the first flag that is set:
//!
//! | D              | Flags | Payload bits |
//! |----------------|-------|--------------|
//! | 1              | 1     | 0            |
//! | [2, 6]         | 2     | 3            |
//! | [7, 23]        | 3     | 5            |
//! | [24, 280]      | 4     | 9            |
//! | [281, 4377]    | 5     | 13           |
//! | [4378, 69914]  | 6     | 17           |
//! | larger         | 6     | 32 (raw)     |
//!
//! When no flag is set, `current` itself follows as a raw 32-bit value.

use crate::{
    error::precondition,
    types::primitives::{serialize_bits, serialize_bool, serialize_int, serialize_u32},
    Error, Stream,
};

/// Inclusive difference ranges of the buckets after `D == 1`, in the order they are tried.
const BUCKETS: [(i32, i32); 5] = [(2, 6), (7, 23), (24, 280), (281, 4377), (4378, 69914)];

/// Largest difference that is encoded relative to the previous value.
pub const MAX_RELATIVE_DIFFERENCE: u32 = BUCKETS[BUCKETS.len() - 1].1 as u32;

/// Largest ack distance (behind the sequence number) that is encoded relatively.
pub const MAX_ACK_DELTA: i32 = 64;

/// Serializes `current` relative to `previous`.
///
/// Writers must pass `previous < current`. Readers fail if the decoded value
/// overflows or a raw fallback value could have been encoded relatively.
pub fn serialize_int_relative<S: Stream>(
    stream: &mut S,
    previous: u32,
    current: &mut u32,
) -> Result<(), Error> {
    let mut difference = 0u32;
    if !S::IS_READING {
        precondition!(previous < *current, "previous must be less than current");
        difference = *current - previous;
    }

    let mut one = difference == 1;
    serialize_bool(stream, &mut one)?;
    if one {
        if S::IS_READING {
            *current = offset(previous, 1)?;
        }
        return Ok(());
    }

    for (min, max) in BUCKETS {
        let mut in_bucket = difference <= max as u32;
        serialize_bool(stream, &mut in_bucket)?;
        if in_bucket {
            serialize_int(stream, &mut difference, min, max)?;
            if S::IS_READING {
                *current = offset(previous, difference)?;
            }
            return Ok(());
        }
    }

    let mut value = *current;
    serialize_u32(stream, &mut value)?;
    if S::IS_READING {
        let canonical = value
            .checked_sub(previous)
            .is_some_and(|difference| difference > MAX_RELATIVE_DIFFERENCE);
        if !canonical {
            return Err(Error::InvalidData(
                "relative integer",
                "raw value within relative range",
            ));
        }
        *current = value;
    }
    Ok(())
}

fn offset(previous: u32, difference: u32) -> Result<u32, Error> {
    previous
        .checked_add(difference)
        .ok_or(Error::InvalidData("relative integer", "value overflows"))
}

/// Serializes an ack relative to the current sequence number.
///
/// The ack is taken to be at or before `sequence`, modulo 2^16. Acks at most
/// [`MAX_ACK_DELTA`] behind are sent as a small delta, all others as raw 16 bits.
pub fn serialize_ack_relative<S: Stream>(
    stream: &mut S,
    sequence: u16,
    ack: &mut u16,
) -> Result<(), Error> {
    let mut delta = 0i32;
    let mut in_range = false;
    if !S::IS_READING {
        delta = if *ack < sequence {
            sequence as i32 - *ack as i32
        } else {
            sequence as i32 + 65536 - *ack as i32
        };
        in_range = delta <= MAX_ACK_DELTA;
    }

    serialize_bool(stream, &mut in_range)?;
    if in_range {
        serialize_int(stream, &mut delta, 1, MAX_ACK_DELTA)?;
        if S::IS_READING {
            *ack = sequence.wrapping_sub(delta as u16);
        }
    } else {
        serialize_bits(stream, ack, 16)?;
    }
    Ok(())
}

/// Serializes `sequence2` relative to `sequence1`, with wraparound.
///
/// `sequence2` is taken to be after `sequence1`, modulo 2^16. Writers must
/// not pass equal sequence numbers. Readers fail if the decoded distance is
/// a full lap (2^16) or more, since no writer can produce it.
pub fn serialize_sequence_relative<S: Stream>(
    stream: &mut S,
    sequence1: u16,
    sequence2: &mut u16,
) -> Result<(), Error> {
    let previous = sequence1 as u32;
    let mut current = 0u32;
    if !S::IS_READING {
        current = *sequence2 as u32;
        if sequence1 > *sequence2 {
            current += 65536;
        }
    }

    serialize_int_relative(stream, previous, &mut current)?;
    if S::IS_READING {
        // A writer never unwraps by a full lap or more
        if current - previous > u16::MAX as u32 {
            return Err(Error::InvalidData("sequence number", "value out of range"));
        }
        *sequence2 = (current % 65536) as u16;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MeasureStream, ReadStream, WriteStream};
    use test_case::test_case;

    /// Writes `current` relative to `previous`, checks the measured size matches,
    /// and returns the encoded buffer along with the number of bits written.
    fn encode_relative(previous: u32, current: u32) -> (bytes::Bytes, usize) {
        let mut writer = WriteStream::new();
        let mut value = current;
        serialize_int_relative(&mut writer, previous, &mut value).unwrap();
        let bits = writer.bits_written();

        let mut measure = MeasureStream::new();
        serialize_int_relative(&mut measure, previous, &mut value).unwrap();
        assert_eq!(measure.bits_measured(), bits);

        (writer.finish(), bits)
    }

    fn decode_relative(previous: u32, buffer: &[u8]) -> Result<u32, Error> {
        let mut reader = ReadStream::new(buffer);
        let mut value = 0;
        serialize_int_relative(&mut reader, previous, &mut value)?;
        Ok(value)
    }

    #[test_case(1, 1, 0; "one")]
    #[test_case(2, 2, 3; "bucket two low")]
    #[test_case(6, 2, 3; "bucket two high")]
    #[test_case(7, 3, 5; "bucket three low")]
    #[test_case(23, 3, 5; "bucket three high")]
    #[test_case(24, 4, 9; "bucket four low")]
    #[test_case(280, 4, 9; "bucket four high")]
    #[test_case(281, 5, 13; "bucket five low")]
    #[test_case(4377, 5, 13; "bucket five high")]
    #[test_case(4378, 6, 17; "bucket six low")]
    #[test_case(69914, 6, 17; "bucket six high")]
    #[test_case(69915, 6, 32; "raw fallback")]
    fn test_bucket_boundaries(difference: u32, flags: usize, payload: usize) {
        for previous in [0u32, 1000, u32::MAX - 70000] {
            let current = previous + difference;
            let (buffer, bits) = encode_relative(previous, current);
            assert_eq!(bits, flags + payload);
            assert_eq!(decode_relative(previous, &buffer), Ok(current));
        }
    }

    #[test]
    fn test_flag_layout() {
        // D = 7: flags 0, 0, 1 then 7 - 7 = 0 in 5 bits
        let (buffer, _) = encode_relative(100, 107);
        assert_eq!(&buffer[..], &[0b0000_0100]);

        // D = 1: a single set flag
        let (buffer, _) = encode_relative(100, 101);
        assert_eq!(&buffer[..], &[0b1]);
    }

    #[test]
    fn test_large_jump_sends_current() {
        let (buffer, _) = encode_relative(5, 0xDEAD_BEEF);
        let mut reader = ReadStream::new(&buffer);
        for _ in 0..6 {
            assert!(!reader.read_bool().unwrap());
        }
        assert_eq!(reader.read_u32().unwrap(), 0xDEAD_BEEF);
    }

    #[test]
    fn test_reject_overflow() {
        // D = 6 from u32::MAX - 2 cannot be represented
        let (buffer, _) = encode_relative(0, 6);
        assert_eq!(
            decode_relative(u32::MAX - 2, &buffer),
            Err(Error::InvalidData("relative integer", "value overflows"))
        );
    }

    #[test]
    fn test_reject_non_canonical_fallback() {
        let mut writer = WriteStream::new();
        for _ in 0..6 {
            writer.write_bool(false).unwrap();
        }
        writer.write_u32(1000).unwrap();
        let buffer = writer.finish();

        let expected = Err(Error::InvalidData(
            "relative integer",
            "raw value within relative range",
        ));
        assert_eq!(decode_relative(10, &buffer), expected);
        assert_eq!(decode_relative(2000, &buffer), expected);
    }

    #[test]
    fn test_reject_truncated() {
        let (buffer, _) = encode_relative(0, 5000);
        assert_eq!(decode_relative(0, &buffer[..1]), Err(Error::EndOfBuffer));
        assert_eq!(decode_relative(0, &[]), Err(Error::EndOfBuffer));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "contract violation: previous must be less than current")]
    fn test_write_not_increasing() {
        let _ = encode_relative(10, 10);
    }

    fn round_trip_ack(sequence: u16, ack: u16) -> usize {
        let mut writer = WriteStream::new();
        let mut value = ack;
        serialize_ack_relative(&mut writer, sequence, &mut value).unwrap();
        let bits = writer.bits_written();

        let mut measure = MeasureStream::new();
        serialize_ack_relative(&mut measure, sequence, &mut value).unwrap();
        assert_eq!(measure.bits_measured(), bits);

        let buffer = writer.finish();
        let mut reader = ReadStream::new(&buffer);
        let mut decoded = 0;
        serialize_ack_relative(&mut reader, sequence, &mut decoded).unwrap();
        assert_eq!(decoded, ack);
        bits
    }

    #[test]
    fn test_ack_wraparound() {
        // 10 - 65530 wraps to a delta of 16
        assert_eq!(round_trip_ack(10, 65530), 1 + 6);

        let mut writer = WriteStream::new();
        writer.write_ack_relative(10, 65530).unwrap();
        let buffer = writer.finish();
        let mut reader = ReadStream::new(&buffer);
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.read_int(1, 64).unwrap(), 16);
    }

    #[test]
    fn test_ack_raw() {
        assert_eq!(round_trip_ack(100, 0), 1 + 16);

        let mut writer = WriteStream::new();
        writer.write_ack_relative(100, 0).unwrap();
        let buffer = writer.finish();
        let mut reader = ReadStream::new(&buffer);
        assert!(!reader.read_bool().unwrap());
        assert_eq!(reader.read_bits(16).unwrap(), 0);
    }

    #[test]
    fn test_ack_boundaries() {
        assert_eq!(round_trip_ack(100, 99), 7);
        assert_eq!(round_trip_ack(100, 36), 7);
        assert_eq!(round_trip_ack(100, 35), 17);
        assert_eq!(round_trip_ack(0, 65535), 7);
        // An ack equal to the sequence is a full lap behind
        assert_eq!(round_trip_ack(100, 100), 17);
    }

    fn round_trip_sequence(sequence1: u16, sequence2: u16) {
        let mut writer = WriteStream::new();
        let mut value = sequence2;
        serialize_sequence_relative(&mut writer, sequence1, &mut value).unwrap();
        let bits = writer.bits_written();

        let mut measure = MeasureStream::new();
        serialize_sequence_relative(&mut measure, sequence1, &mut value).unwrap();
        assert_eq!(measure.bits_measured(), bits);

        let buffer = writer.finish();
        let mut reader = ReadStream::new(&buffer);
        let mut decoded = 0;
        serialize_sequence_relative(&mut reader, sequence1, &mut decoded).unwrap();
        assert_eq!(decoded, sequence2);
    }

    #[test]
    fn test_sequence_wraparound() {
        round_trip_sequence(65530, 10);
        round_trip_sequence(65535, 0);
        round_trip_sequence(0, 1);
        round_trip_sequence(100, 65535);
        round_trip_sequence(65535, 65534);
    }

    #[test]
    fn test_sequence_rejects_out_of_range() {
        // A jump that unwraps past two laps cannot be a 16-bit sequence number
        let mut writer = WriteStream::new();
        writer.write_int_relative(10, 200_000).unwrap();
        let buffer = writer.finish();

        let mut reader = ReadStream::new(&buffer);
        let mut decoded = 0;
        assert_eq!(
            serialize_sequence_relative(&mut reader, 10, &mut decoded),
            Err(Error::InvalidData("sequence number", "value out of range"))
        );
    }

    #[test]
    fn test_sequence_rejects_full_lap() {
        // Distances of 2^16 and above would alias shorter ones (or sequence1 itself)
        for difference in [65536, 65541, 69914] {
            let mut writer = WriteStream::new();
            writer.write_int_relative(10, 10 + difference).unwrap();
            let buffer = writer.finish();

            let mut reader = ReadStream::new(&buffer);
            assert_eq!(
                reader.read_sequence_relative(10),
                Err(Error::InvalidData("sequence number", "value out of range"))
            );
        }
    }

    #[test]
    fn test_sequence_largest_distance() {
        // One step short of a full lap: 10 -> 9
        round_trip_sequence(10, 9);

        let mut writer = WriteStream::new();
        writer.write_int_relative(10, 10 + 65535).unwrap();
        let buffer = writer.finish();
        let mut reader = ReadStream::new(&buffer);
        assert_eq!(reader.read_sequence_relative(10), Ok(9));
    }
}
