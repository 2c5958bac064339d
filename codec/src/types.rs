//! Directives for common types.
//!
//! Each directive is a function generic over [`crate::Stream`] and behaves
//! according to the stream's mode:
//! - write: encodes the value (and panics in debug builds if the value breaks
//!   the directive's contract)
//! - read: decodes and validates the value, returning an error on bad input
//! - measure: counts the bits the write would produce

pub mod bytes;
pub mod net;
pub mod primitives;
pub mod string;
