//! Fuzz target for LinkMessage::decode
//!
//! Feeds arbitrary datagrams to the link decoder, as a hostile or noisy
//! network would.
//!
//! # Invariants
//!
//! - NEVER panic; malformed datagrams return an error
//! - A decoded message re-encodes to exactly `encoded_len` bytes and decodes
//!   back to itself

#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use lockstep_proto::LinkMessage;

fuzz_target!(|data: &[u8]| {
    let Ok(message) = LinkMessage::decode(data) else {
        return;
    };

    let mut buf = BytesMut::new();
    message.encode(&mut buf).expect("decoded message must re-encode");
    assert_eq!(buf.len(), message.encoded_len());
    assert_eq!(LinkMessage::decode(&buf).expect("re-encoded message must decode"), message);
});
