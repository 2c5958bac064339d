//! Error types for codec operations

use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error("value {0} outside of range [{1}, {2}]")]
    OutOfRange(i64, i64, i64), // found, min, max
    #[error("integrity check failed: expected {0:#010x}, found {1:#010x}")]
    CheckFailed(u32, u32), // expected, found
    #[error("non-zero padding bits")]
    InvalidPadding,
    #[error("invalid utf-8 string")]
    InvalidUtf8,
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("invalid data in {0}: {1}")]
    InvalidData(&'static str, &'static str), // context, message
    #[error("contract violation: {0}")]
    ContractViolation(&'static str),
}

impl Error {
    /// Returns true if the error was caused by the input being decoded (and so
    /// may be attacker-controlled), rather than by the caller breaking a
    /// precondition.
    pub fn is_decode_failure(&self) -> bool {
        !matches!(self, Self::ContractViolation(_))
    }
}

/// Checks a caller-side precondition.
///
/// Panics when `debug_assertions` are enabled. Otherwise returns
/// [`Error::ContractViolation`] from the enclosing function.
macro_rules! precondition {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            if cfg!(debug_assertions) {
                panic!(concat!("contract violation: ", $msg));
            }
            return Err($crate::Error::ContractViolation($msg));
        }
    };
}
pub(crate) use precondition;

#[cfg(test)]
mod tests {
    use super::*;

    fn guarded(value: u32) -> Result<u32, Error> {
        precondition!(value < 10, "value must be less than 10");
        Ok(value)
    }

    #[test]
    fn test_precondition_holds() {
        assert_eq!(guarded(3), Ok(3));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "contract violation: value must be less than 10")]
    fn test_precondition_panics_in_debug() {
        let _ = guarded(10);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_precondition_errors_in_release() {
        assert_eq!(
            guarded(10),
            Err(Error::ContractViolation("value must be less than 10"))
        );
    }

    #[test]
    fn test_classification() {
        assert!(Error::EndOfBuffer.is_decode_failure());
        assert!(Error::CheckFailed(1, 2).is_decode_failure());
        assert!(!Error::ContractViolation("x").is_decode_failure());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Error::CheckFailed(0x12345678, 0).to_string(),
            "integrity check failed: expected 0x12345678, found 0x00000000"
        );
        assert_eq!(
            Error::OutOfRange(7, 0, 5).to_string(),
            "value 7 outside of range [0, 5]"
        );
    }
}
