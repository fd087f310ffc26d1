// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Blackhole Project

//! Anti-replay nonce generation.
//!
//! Format: `{timestamp}-{random}-{random}`, each component base-36. No
//! uniqueness registry is kept; uniqueness is probabilistic from the
//! millisecond timestamp plus two independently drawn random components.
//! The server is the consumer of uniqueness, nothing is verified or stored
//! client-side.

use chrono::Utc;
use rand::Rng;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of each random component (13 base-36 characters, ~67 bits each).
const RANDOM_COMPONENT_LEN: usize = 13;

/// Generate a fresh nonce.
///
/// Callable at arbitrarily high frequency from any thread; there is no
/// shared state beyond the thread-local RNG.
pub fn generate_nonce() -> String {
    let timestamp = Utc::now().timestamp_millis();
    format!(
        "{}-{}-{}",
        to_base36(timestamp.max(0) as u64),
        random_base36(RANDOM_COMPONENT_LEN),
        random_base36(RANDOM_COMPONENT_LEN)
    )
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).expect("base36 digits are ASCII")
}

fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36_ALPHABET[rng.gen_range(0..36)] as char)
        .collect()
}
