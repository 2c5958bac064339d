//! Serialize structured data into bit-packed streams.
//!
//! # Overview
//!
//! A bit-level serialization library for real-time network protocols, designed to:
//! - Describe an object's wire layout exactly once
//! - Use that description to write, read and measure the object
//! - Deserialize untrusted input without panicking
//!
//! A type implements [`Serialize`] with a single routine that is generic over
//! [`Stream`]. Inside, every field is passed to a directive (such as
//! [`serialize_int`] or [`serialize_string`]) in a fixed order. The routine is
//! then instantiated for a [`WriteStream`], a [`ReadStream`] and a
//! [`MeasureStream`], so encoding, decoding and size estimation share one
//! description and cannot drift apart.
//!
//! # Supported Directives
//!
//! - Primitives: bounded integers, bit runs, `bool`, `u32`, `u64`, `f32`, `f64`
//! - Byte runs and length-prefixed strings
//! - Network addresses (any [`Address`], including [`std::net::SocketAddr`])
//! - Relative encodings for increasing integers, acks and sequence numbers
//! - Alignment and integrity checks
//! - Nested objects, statically or as `dyn` [`Serializable`]
//!
//! # Errors
//!
//! Data read from a stream is never trusted: any inconsistency is reported as
//! an [`Error`] and the first error aborts the whole routine. Passing an
//! invalid value to a writer (for example, an integer outside its declared
//! range) is a bug in the caller, and panics when debug assertions are
//! enabled (otherwise it returns [`Error::ContractViolation`]).
//!
//! # Example
//!
//! ```
//! use bitstream_codec::{
//!     serialize_ack_relative, serialize_bool, serialize_check, serialize_float, serialize_int,
//!     serialize_string, Error, Serialize, SerializableExt, Stream,
//! };
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct Update {
//!     sequence: u16,
//!     ack: u16,
//!     health: u8,
//!     alive: bool,
//!     heading: f32,
//!     name: String,
//! }
//!
//! impl Serialize for Update {
//!     fn serialize<S: Stream>(&mut self, stream: &mut S) -> Result<(), Error> {
//!         serialize_int(stream, &mut self.sequence, 0, 65535)?;
//!         serialize_ack_relative(stream, self.sequence, &mut self.ack)?;
//!         serialize_int(stream, &mut self.health, 0, 100)?;
//!         serialize_bool(stream, &mut self.alive)?;
//!         serialize_float(stream, &mut self.heading)?;
//!         serialize_string(stream, &mut self.name, 32)?;
//!         serialize_check(stream)
//!     }
//! }
//!
//! let mut update = Update {
//!     sequence: 7,
//!     ack: 5,
//!     health: 93,
//!     alive: true,
//!     heading: 0.25,
//!     name: "scout".into(),
//! };
//! let bits = update.measure()?;
//! let encoded = update.encode()?;
//! assert_eq!(encoded.len(), bits.div_ceil(8));
//! assert_eq!(Update::decode(&encoded)?, update);
//! # Ok::<(), Error>(())
//! ```

pub mod config;
pub mod error;
pub mod relative;
pub mod serialize;
pub mod stream;
pub mod types;

// Re-export main types and traits
pub use config::RangeCfg;
pub use error::Error;
pub use relative::{serialize_ack_relative, serialize_int_relative, serialize_sequence_relative};
pub use serialize::{Serializable, SerializableExt, Serialize};
pub use stream::{MeasureStream, Mode, ReadStream, Stream, WriteStream};
pub use types::{
    bytes::serialize_bytes,
    net::{serialize_address, Address},
    primitives::{
        serialize_align, serialize_bits, serialize_bool, serialize_check, serialize_double,
        serialize_dyn_object, serialize_float, serialize_int, serialize_object, serialize_u32,
        serialize_u64,
    },
    string::serialize_string,
};
