//! Fuzz target for `relay_proto::decode`
//!
//! Arbitrary byte sequences, including invalid UTF-8 and truncated JSON.
//!
//! The fuzzer should NEVER panic. Every input yields a message or an error,
//! and the same input always yields the same outcome.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let first = relay_proto::decode(data);
    let second = relay_proto::decode(data);

    match (first, second) {
        (Ok(a), Ok(b)) => assert_eq!(a, b),
        (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
        _ => panic!("decode is not deterministic"),
    }
});
