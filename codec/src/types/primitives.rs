//! Directives for integers, bit runs, booleans and floating point values.
//!
//! Floating point values travel as their exact IEEE-754 bit pattern, so NaN
//! payloads and signed zero survive a round trip.

use crate::{
    error::precondition,
    serialize::{Serializable, Serialize},
    Error, RangeCfg, Stream,
};

/// Serializes an integer constrained to `[min, max]`.
///
/// Writers must pass a value inside the range. Readers fail if the decoded
/// value is outside the range or does not fit in `T`.
pub fn serialize_int<S, T>(stream: &mut S, value: &mut T, min: i32, max: i32) -> Result<(), Error>
where
    S: Stream,
    T: Copy + Into<i64> + TryFrom<i64>,
{
    let range = RangeCfg::new(min, max)?;
    let mut raw = 0i32;
    if !S::IS_READING {
        let wide: i64 = (*value).into();
        precondition!(range.contains(wide), "integer outside of range");
        raw = wide as i32;
    }
    stream.serialize_integer(&mut raw, min, max)?;
    if S::IS_READING {
        let wide = raw as i64;
        let out_of_range = || Error::OutOfRange(wide, min as i64, max as i64);
        if !range.contains(wide) {
            return Err(out_of_range());
        }
        *value = T::try_from(wide).map_err(|_| out_of_range())?;
    }
    Ok(())
}

/// Serializes the low `bits` bits of an unsigned value, with `bits` in `[1, 32]`.
///
/// Higher bits are dropped on write. Readers fail if the decoded value does
/// not fit in `T`.
pub fn serialize_bits<S, T>(stream: &mut S, value: &mut T, bits: u32) -> Result<(), Error>
where
    S: Stream,
    T: Copy + Into<u32> + TryFrom<u32>,
{
    precondition!((1..=32).contains(&bits), "bit count must be in [1, 32]");
    let mut raw = 0u32;
    if !S::IS_READING {
        let wide: u32 = (*value).into();
        raw = wide & (u32::MAX >> (32 - bits));
    }
    stream.serialize_bits(&mut raw, bits)?;
    if S::IS_READING {
        *value = T::try_from(raw)
            .map_err(|_| Error::InvalidData("bits", "value does not fit target type"))?;
    }
    Ok(())
}

/// Serializes a boolean as a single bit.
pub fn serialize_bool<S: Stream>(stream: &mut S, value: &mut bool) -> Result<(), Error> {
    let mut raw = u32::from(*value);
    stream.serialize_bits(&mut raw, 1)?;
    if S::IS_READING {
        *value = raw != 0;
    }
    Ok(())
}

/// Serializes an unsigned 32-bit integer verbatim.
pub fn serialize_u32<S: Stream>(stream: &mut S, value: &mut u32) -> Result<(), Error> {
    stream.serialize_bits(value, 32)
}

/// Serializes an unsigned 64-bit integer as its low half followed by its high half.
pub fn serialize_u64<S: Stream>(stream: &mut S, value: &mut u64) -> Result<(), Error> {
    let mut lo = *value as u32;
    let mut hi = (*value >> 32) as u32;
    stream.serialize_bits(&mut lo, 32)?;
    stream.serialize_bits(&mut hi, 32)?;
    if S::IS_READING {
        *value = ((hi as u64) << 32) | lo as u64;
    }
    Ok(())
}

/// Serializes a 32-bit float as its raw bit pattern.
pub fn serialize_float<S: Stream>(stream: &mut S, value: &mut f32) -> Result<(), Error> {
    let mut raw = value.to_bits();
    serialize_u32(stream, &mut raw)?;
    if S::IS_READING {
        *value = f32::from_bits(raw);
    }
    Ok(())
}

/// Serializes a 64-bit float as its raw bit pattern.
pub fn serialize_double<S: Stream>(stream: &mut S, value: &mut f64) -> Result<(), Error> {
    let mut raw = value.to_bits();
    serialize_u64(stream, &mut raw)?;
    if S::IS_READING {
        *value = f64::from_bits(raw);
    }
    Ok(())
}

/// Pads (or skips padding) to the next byte boundary.
pub fn serialize_align<S: Stream>(stream: &mut S) -> Result<(), Error> {
    stream.serialize_align()
}

/// Writes (or verifies) an integrity-check sentinel.
///
/// Placing checks between groups of fields catches a writer and reader that
/// have fallen out of step close to where it happened.
pub fn serialize_check<S: Stream>(stream: &mut S) -> Result<(), Error> {
    stream.serialize_check()
}

/// Serializes a nested object through its own [`Serialize`] routine.
pub fn serialize_object<S: Stream, T: Serialize>(stream: &mut S, object: &mut T) -> Result<(), Error> {
    object.serialize(stream)
}

/// Serializes a type-erased nested object.
pub fn serialize_dyn_object<S: Stream>(
    stream: &mut S,
    object: &mut dyn Serializable,
) -> Result<(), Error> {
    stream.serialize_object(object)
}
