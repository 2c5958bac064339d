#![no_main]

use bitstream_codec::{
    serialize_ack_relative, serialize_address, serialize_bits, serialize_check, serialize_double,
    serialize_int, serialize_int_relative, serialize_sequence_relative, serialize_string, Error,
    ReadStream, SerializableExt, Serialize, Stream,
};
use libfuzzer_sys::fuzz_target;
use std::net::SocketAddr;

const BASE_ID: u32 = 1000;
const MAX_NAME: usize = 64;

#[derive(Debug)]
struct Message {
    sequence: u16,
    ack: u16,
    later: u16,
    id: u32,
    level: i32,
    tag: u8,
    ratio: f64,
    name: String,
    origin: SocketAddr,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            sequence: 0,
            ack: 0,
            later: 1,
            id: BASE_ID + 1,
            level: 0,
            tag: 0,
            ratio: 0.0,
            name: String::new(),
            origin: SocketAddr::from(([0, 0, 0, 0], 0)),
        }
    }
}

impl Serialize for Message {
    fn serialize<S: Stream>(&mut self, stream: &mut S) -> Result<(), Error> {
        serialize_bits(stream, &mut self.sequence, 16)?;
        serialize_ack_relative(stream, self.sequence, &mut self.ack)?;
        serialize_sequence_relative(stream, self.sequence, &mut self.later)?;
        serialize_int_relative(stream, BASE_ID, &mut self.id)?;
        serialize_int(stream, &mut self.level, -100, 100)?;
        serialize_bits(stream, &mut self.tag, 7)?;
        serialize_check(stream)?;
        serialize_double(stream, &mut self.ratio)?;
        serialize_string(stream, &mut self.name, MAX_NAME)?;
        serialize_address(stream, &mut self.origin)
    }
}

fn fuzz(data: &[u8]) {
    // Reading a raw stream must either fail cleanly or yield in-range values
    let mut message = Message::default();
    let mut reader = ReadStream::new(data);
    if message.serialize(&mut reader).is_ok() {
        assert!(message.id > BASE_ID);
        assert_ne!(message.later, message.sequence);
        assert!((-100..=100).contains(&message.level));
        assert!(message.tag < 128);
        assert!(message.name.len() < MAX_NAME);
        assert!(reader.bits_read() <= data.len() * 8);
    }

    // Anything accepted as a whole buffer must be writable again
    if let Ok(mut decoded) = Message::decode(data) {
        decoded.encode().expect("Failed to encode a decoded message!");
    }
}

fuzz_target!(|data: &[u8]| {
    fuzz(data);
});
