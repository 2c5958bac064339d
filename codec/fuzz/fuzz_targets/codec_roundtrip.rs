#![no_main]

use arbitrary::Arbitrary;
use bitstream_codec::{
    serialize_ack_relative, serialize_address, serialize_bits, serialize_bool, serialize_bytes,
    serialize_check, serialize_double, serialize_float, serialize_int, serialize_int_relative,
    serialize_sequence_relative, serialize_string, serialize_u64, Error, MeasureStream,
    SerializableExt, Serialize, Stream, WriteStream,
};
use libfuzzer_sys::fuzz_target;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const MAX_NAME: usize = 48;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    value: i32,
    min: i32,
    span: u16,
    bits: u8,
    raw: u32,
    flag: bool,
    single: f32,
    double: f64,
    wide: u64,
    previous: u32,
    step: u32,
    sequence: u16,
    ack: u16,
    later: u16,
    payload: [u8; 5],
    name: String,
    socket: SocketAddr,
    ip: IpAddr,
}

/// Every directive at once, with the field ranges carried on the wire.
#[derive(Debug, Clone, PartialEq)]
struct Message {
    min: i32,
    span: u32,
    value: i32,
    bits: u32,
    raw: u32,
    flag: bool,
    single: f32,
    double: f64,
    wide: u64,
    previous: u32,
    current: u32,
    sequence: u16,
    ack: u16,
    later: u16,
    payload: [u8; 5],
    name: String,
    socket: SocketAddr,
    ip: IpAddr,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            min: 0,
            span: 1,
            value: 0,
            bits: 1,
            raw: 0,
            flag: false,
            single: 0.0,
            double: 0.0,
            wide: 0,
            previous: 0,
            current: 1,
            sequence: 0,
            ack: 0,
            later: 1,
            payload: [0; 5],
            name: String::new(),
            socket: SocketAddr::from(([0, 0, 0, 0], 0)),
            ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        }
    }
}

impl From<FuzzInput> for Message {
    fn from(input: FuzzInput) -> Self {
        // Clamp everything into the ranges the directives accept on write
        let min = input.min.min(i32::MAX - u16::MAX as i32);
        let span = input.span.max(1) as u32;
        let value = input.value.clamp(min, min + span as i32);
        let bits = (input.bits % 32) as u32 + 1;
        let raw = input.raw & (u32::MAX >> (32 - bits));
        let previous = input.previous.min(u32::MAX - 1);
        let current = previous.saturating_add(input.step.max(1));
        let later = if input.later == input.sequence {
            input.sequence.wrapping_add(1)
        } else {
            input.later
        };
        // Only the ip and port of a socket address are sent as text
        let mut socket = input.socket;
        if let SocketAddr::V6(v6) = &mut socket {
            v6.set_flowinfo(0);
            v6.set_scope_id(0);
        }
        let mut name = input.name;
        while name.len() >= MAX_NAME {
            name.pop();
        }
        Self {
            min,
            span,
            value,
            bits,
            raw,
            flag: input.flag,
            single: input.single,
            double: input.double,
            wide: input.wide,
            previous,
            current,
            sequence: input.sequence,
            ack: input.ack,
            later,
            payload: input.payload,
            name,
            socket,
            ip: input.ip,
        }
    }
}

impl Serialize for Message {
    fn serialize<S: Stream>(&mut self, stream: &mut S) -> Result<(), Error> {
        serialize_int(stream, &mut self.min, i32::MIN, i32::MAX - u16::MAX as i32)?;
        serialize_int(stream, &mut self.span, 1, u16::MAX as i32)?;
        serialize_int(stream, &mut self.value, self.min, self.min + self.span as i32)?;
        serialize_int(stream, &mut self.bits, 1, 32)?;
        serialize_bits(stream, &mut self.raw, self.bits)?;
        serialize_bool(stream, &mut self.flag)?;
        serialize_float(stream, &mut self.single)?;
        serialize_double(stream, &mut self.double)?;
        serialize_u64(stream, &mut self.wide)?;
        serialize_bits(stream, &mut self.previous, 32)?;
        serialize_int_relative(stream, self.previous, &mut self.current)?;
        serialize_bits(stream, &mut self.sequence, 16)?;
        serialize_ack_relative(stream, self.sequence, &mut self.ack)?;
        serialize_sequence_relative(stream, self.sequence, &mut self.later)?;
        serialize_check(stream)?;
        serialize_bytes(stream, &mut self.payload)?;
        serialize_string(stream, &mut self.name, MAX_NAME)?;
        serialize_address(stream, &mut self.socket)?;
        serialize_address(stream, &mut self.ip)?;
        serialize_check(stream)
    }
}

fn fuzz(input: FuzzInput) {
    let mut message = Message::from(input);

    let mut measure = MeasureStream::new();
    message.serialize(&mut measure).expect("Failed to measure a valid message!");
    let mut writer = WriteStream::new();
    message.serialize(&mut writer).expect("Failed to write a valid message!");
    assert_eq!(measure.bits_measured(), writer.bits_written());

    let encoded = writer.finish();
    let mut decoded =
        Message::decode(&encoded).expect("Failed to decode a successfully encoded input!");

    // Floats are compared by bits so NaN payloads must survive too
    assert_eq!(decoded.single.to_bits(), message.single.to_bits());
    assert_eq!(decoded.double.to_bits(), message.double.to_bits());
    (decoded.single, decoded.double) = (0.0, 0.0);
    (message.single, message.double) = (0.0, 0.0);
    assert_eq!(decoded, message);
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
