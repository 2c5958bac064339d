//! Configuration shared by writers and readers.

use crate::{error::precondition, Error};

/// Magic value written (and verified) by an integrity check.
pub const CHECK_SENTINEL: u32 = 0x12345678;

/// Maximum length of the textual form of a network address, including the
/// terminator slot. Writers and readers must agree on this value.
pub const MAX_ADDRESS_LENGTH: usize = 256;

/// Returns the number of bits needed to encode any value in `[min, max]`.
///
/// # Examples
///
/// ```
/// use bitstream_codec::config::bits_required;
///
/// assert_eq!(bits_required(0, 1), 1);
/// assert_eq!(bits_required(2, 6), 3);
/// assert_eq!(bits_required(1, 64), 6);
/// assert_eq!(bits_required(i32::MIN, i32::MAX), 32);
/// ```
pub const fn bits_required(min: i32, max: i32) -> u32 {
    if min >= max {
        return 0;
    }
    let span = (max as i64 - min as i64) as u32;
    u32::BITS - span.leading_zeros()
}

/// An inclusive range `[min, max]` constraining a bounded integer.
///
/// Values are encoded as an offset from `min` using [`RangeCfg::bits`] bits.
///
/// # Examples
///
/// ```
/// use bitstream_codec::RangeCfg;
///
/// let cfg = RangeCfg::new(7, 23).unwrap();
/// assert!(cfg.contains(7));
/// assert!(cfg.contains(23));
/// assert!(!cfg.contains(24));
/// assert_eq!(cfg.bits(), 5);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RangeCfg {
    min: i32,
    max: i32,
}

impl RangeCfg {
    /// Creates a new `RangeCfg`. `min` must be strictly less than `max`.
    pub fn new(min: i32, max: i32) -> Result<Self, Error> {
        precondition!(min < max, "range minimum must be less than maximum");
        Ok(Self { min, max })
    }

    /// The smallest value in the range.
    pub fn min(&self) -> i32 {
        self.min
    }

    /// The largest value in the range.
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Returns true if the value is within this range.
    pub fn contains(&self, value: i64) -> bool {
        value >= self.min as i64 && value <= self.max as i64
    }

    /// Number of bits used to encode a value in this range.
    pub fn bits(&self) -> u32 {
        bits_required(self.min, self.max)
    }

    /// Maps a value in the range to its unsigned offset from `min`.
    pub(crate) fn offset(&self, value: i32) -> u32 {
        (value as i64 - self.min as i64) as u32
    }

    /// Maps an unsigned offset back into the range, failing if it lands above `max`.
    pub(crate) fn from_offset(&self, offset: u32) -> Result<i32, Error> {
        let value = self.min as i64 + offset as i64;
        if value > self.max as i64 {
            return Err(Error::OutOfRange(value, self.min as i64, self.max as i64));
        }
        Ok(value as i32)
    }
}
