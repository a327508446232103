//! Fuzz target for GamePacket::decode
//!
//! # Invariants
//!
//! - NEVER panic; sizes outside the negotiable range return an error
//! - A decoded packet survives another trip at the same size unchanged

#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use lockstep_proto::GamePacket;

fuzz_target!(|data: &[u8]| {
    let Ok(packet) = GamePacket::decode(data) else {
        return;
    };

    let mut buf = BytesMut::new();
    packet.encode(data.len(), &mut buf).expect("decoded size must encode");
    assert_eq!(buf.len(), data.len());
    assert_eq!(GamePacket::decode(&buf).expect("re-encoded packet must decode"), packet);
    assert_eq!(packet.truncated(data.len()).expect("decoded size must truncate"), packet);
});
