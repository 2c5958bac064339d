//! Directive for network addresses.
//!
//! Addresses are sent in their textual form through the string directive,
//! using [`MAX_ADDRESS_LENGTH`] as the buffer size on both sides.

use crate::{
    config::MAX_ADDRESS_LENGTH, error::precondition, types::string::serialize_string, Error,
    Stream,
};
use std::net::{IpAddr, SocketAddr};

/// A network address with a textual form that can be parsed back.
pub trait Address: Sized {
    /// Formats the address as text.
    fn to_text(&self) -> String;

    /// Parses an address from text, returning `None` if the text is malformed.
    fn parse(text: &str) -> Option<Self>;

    /// Returns true if the address may be sent.
    fn is_valid(&self) -> bool {
        true
    }
}

impl Address for SocketAddr {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn parse(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl Address for IpAddr {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn parse(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

/// Serializes a network address.
///
/// Writers must pass a valid address. Readers fail if the text cannot be
/// parsed or parses to an invalid address.
pub fn serialize_address<S: Stream, A: Address>(stream: &mut S, address: &mut A) -> Result<(), Error> {
    let mut text = String::new();
    if !S::IS_READING {
        precondition!(address.is_valid(), "address must be valid");
        text = address.to_text();
    }
    serialize_string(stream, &mut text, MAX_ADDRESS_LENGTH)?;
    if S::IS_READING {
        match A::parse(&text) {
            Some(parsed) if parsed.is_valid() => *address = parsed,
            _ => return Err(Error::InvalidAddress(text)),
        }
    }
    Ok(())
}
