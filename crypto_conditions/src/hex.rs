//! Helpers for working with hexadecimal strings.

use alloc::{string::String, vec::Vec};

/// Decode a hexadecimal string (either case) into a vector of bytes.
///
/// Returns `None` for an odd number of digits or any non-hex character.
#[must_use]
pub fn decode_hex(s: &str) -> Option<Vec<u8>> {
    let bytes = s.as_bytes();
    if bytes.len() % 2 != 0 {
        return None;
    }

    bytes
        .chunks_exact(2)
        .map(|pair| match *pair {
            [hi, lo] => Some((decode_hex_nibble(hi)? << 4) | decode_hex_nibble(lo)?),
            _ => None,
        })
        .collect()
}

/// Encode bytes as lowercase hexadecimal.
#[must_use]
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(encode_hex_nibble(b >> 4));
        out.push(encode_hex_nibble(b & 0x0f));
    }
    out
}

#[inline]
const fn encode_hex_nibble(n: u8) -> char {
    match n {
        0..=9 => (b'0' + n) as char,
        _ => (b'a' + n - 10) as char,
    }
}

#[inline]
const fn decode_hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
