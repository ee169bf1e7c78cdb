//! The 32-byte SHA-256 commitment inside a condition.

use crate::{hex::decode_hex, primitives::sha256};

/// A SHA-256 fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Length of a fingerprint in bytes.
    pub const LEN: usize = 32;

    /// Wrap raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The fingerprint of `data`.
    #[must_use]
    pub fn digest(data: &[u8]) -> Self {
        Self(sha256(data))
    }

    /// Get the raw bytes by reference.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Consume the fingerprint and return the raw bytes.
    #[must_use]
    pub const fn into_bytes(self) -> [u8; 32] {
        self.0
    }
}

impl core::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

impl core::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl core::str::FromStr for Fingerprint {
    type Err = InvalidFingerprint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_hex(s).ok_or(InvalidFingerprint::InvalidHex)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| InvalidFingerprint::WrongLength)?;
        Ok(Self(arr))
    }
}

/// Error parsing a fingerprint from a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidFingerprint {
    /// The hex string was invalid.
    #[error("invalid hex string")]
    InvalidHex,

    /// The fingerprint was not 32 bytes.
    #[error("fingerprint must be exactly 32 bytes")]
    WrongLength,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn digest_of_empty_input() {
        assert_eq!(format!("{}", Fingerprint::digest(b"")), EMPTY_SHA256);
    }

    #[test]
    fn parses_what_it_displays() {
        let fp: Result<Fingerprint, _> = EMPTY_SHA256.parse();
        assert_eq!(fp, Ok(Fingerprint::digest(b"")));
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            "abcd".parse::<Fingerprint>(),
            Err(InvalidFingerprint::WrongLength)
        );
        assert_eq!(
            "not hex".parse::<Fingerprint>(),
            Err(InvalidFingerprint::InvalidHex)
        );
    }

    #[test]
    fn debug_wraps_hex() {
        let fp = Fingerprint::from_bytes([0xAB; 32]);
        assert!(format!("{fp:?}").starts_with("Fingerprint(abab"));
    }
}
