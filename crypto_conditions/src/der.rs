//! The subset of ASN.1 DER that conditions and fulfillments use.
//!
//! Only what the five condition types need is supported: context-specific
//! tags, definite lengths, octet strings, unsigned integers up to 32 bits,
//! a five-bit named bit list, `SEQUENCE`, and `SET OF`. Everything else is
//! rejected.
//!
//! Decoding is strict. The [`Reader`] accepts only the unique minimal
//! encoding of each value, so any accepted input re-encodes byte-for-byte
//! through the [`Writer`]. That property is what makes a fingerprint a
//! binding commitment: two byte strings for the same value would let one
//! fulfillment answer for two conditions.

use alloc::vec::Vec;

use crate::{error::DecodeError, limits::Limits};

pub mod reader;
pub mod tag;
pub mod writer;

pub use reader::Reader;
pub use tag::{Class, Tag};
pub use writer::Writer;

/// Types that can be written as a single DER value.
pub trait Encode {
    /// Append this value's complete TLV to `writer`.
    fn encode(&self, writer: &mut Writer);

    /// Encode to a fresh buffer.
    #[must_use]
    fn to_der(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        self.encode(&mut writer);
        writer.into_bytes()
    }
}

/// Types that can be read from a single DER value.
pub trait Decode: Sized {
    /// Read one complete TLV from `reader`.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the value is malformed, non-canonical,
    /// of an unsupported type, or exceeds the reader's limits.
    fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodeError>;

    /// Decode exactly one value occupying all of `bytes`, under `limits`.
    ///
    /// # Errors
    ///
    /// As [`decode`](Self::decode), plus [`DecodeError::TrailingBytes`] if
    /// anything follows the value.
    fn from_der_with_limits(bytes: &[u8], limits: &Limits) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(bytes, limits)?;
        let value = Self::decode(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}
