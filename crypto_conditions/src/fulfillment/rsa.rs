//! RSA-PSS signature fulfillment.

use alloc::vec::Vec;

use super::{fingerprint_of, saturating_cost, Body, Fulfill};
use crate::{
    condition::Condition,
    condition_type::ConditionType,
    error::DecodeError,
    primitives,
    schema::{self, FieldReader, FieldWriter, TypeSchema},
    subtypes::SubtypeSet,
};

/// An RSA-PSS (SHA-256, 32-byte salt) signature under a public modulus.
///
/// The exponent is always 65537, so the modulus alone identifies the key and
/// is all the fingerprint covers. Cost grows with the square of the modulus
/// length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RsaSha256 {
    modulus: Vec<u8>,
    signature: Vec<u8>,
}

impl RsaSha256 {
    /// A signature under the big-endian `modulus`.
    ///
    /// Neither value is checked here; an unusable modulus or a signature of
    /// the wrong length simply fails validation.
    #[must_use]
    pub fn new(modulus: impl Into<Vec<u8>>, signature: impl Into<Vec<u8>>) -> Self {
        Self {
            modulus: modulus.into(),
            signature: signature.into(),
        }
    }

    /// Big-endian public modulus.
    #[must_use]
    pub fn modulus(&self) -> &[u8] {
        &self.modulus
    }

    /// Big-endian signature.
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

impl Fulfill for RsaSha256 {
    fn condition_type(&self) -> ConditionType {
        ConditionType::RsaSha256
    }

    fn condition(&self) -> Condition {
        let fingerprint = fingerprint_of(&schema::RSA, |f| {
            f.octet_string(&self.modulus);
        });
        let len = self.modulus.len() as u64;

        Condition::from_parts(
            ConditionType::RsaSha256,
            fingerprint,
            saturating_cost(len.saturating_mul(len)),
            SubtypeSet::EMPTY,
        )
    }

    fn validate(&self, message: &[u8]) -> bool {
        primitives::rsa_verify(&self.modulus, &self.signature, message)
    }

    fn validation_depends_on_message(&self) -> bool {
        true
    }
}

impl Body for RsaSha256 {
    const SCHEMA: &'static TypeSchema = &schema::RSA;

    fn read_fields(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        let modulus = fields.octet_string()?;
        let signature = fields.octet_string()?;
        Ok(Self::new(modulus, signature))
    }

    fn write_fields(&self, fields: &mut FieldWriter<'_>) {
        fields
            .octet_string(&self.modulus)
            .octet_string(&self.signature);
    }
}
