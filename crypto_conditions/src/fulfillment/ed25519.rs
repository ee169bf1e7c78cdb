//! Ed25519 signature fulfillment.

use super::{fingerprint_of, Body, Fulfill};
use crate::{
    condition::Condition,
    condition_type::ConditionType,
    error::DecodeError,
    primitives::{self, ED25519_PUBLIC_KEY_LEN, ED25519_SIGNATURE_LEN},
    schema::{self, FieldReader, FieldWriter, TypeSchema},
    subtypes::SubtypeSet,
};

/// Fixed cost of an Ed25519 fulfillment.
pub const ED25519_COST: u32 = 131_072;

/// An Ed25519 signature over the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Sha256 {
    public_key: [u8; ED25519_PUBLIC_KEY_LEN],
    signature: [u8; ED25519_SIGNATURE_LEN],
}

impl Ed25519Sha256 {
    /// A signature under `public_key`.
    #[must_use]
    pub const fn new(
        public_key: [u8; ED25519_PUBLIC_KEY_LEN],
        signature: [u8; ED25519_SIGNATURE_LEN],
    ) -> Self {
        Self {
            public_key,
            signature,
        }
    }

    /// The signer's public key.
    #[must_use]
    pub const fn public_key(&self) -> &[u8; ED25519_PUBLIC_KEY_LEN] {
        &self.public_key
    }

    /// The signature.
    #[must_use]
    pub const fn signature(&self) -> &[u8; ED25519_SIGNATURE_LEN] {
        &self.signature
    }
}

impl Fulfill for Ed25519Sha256 {
    fn condition_type(&self) -> ConditionType {
        ConditionType::Ed25519Sha256
    }

    fn condition(&self) -> Condition {
        let fingerprint = fingerprint_of(&schema::ED25519, |f| {
            f.octet_string(&self.public_key);
        });
        Condition::from_parts(
            ConditionType::Ed25519Sha256,
            fingerprint,
            ED25519_COST,
            SubtypeSet::EMPTY,
        )
    }

    fn validate(&self, message: &[u8]) -> bool {
        primitives::ed25519_verify(&self.public_key, &self.signature, message)
    }

    fn validation_depends_on_message(&self) -> bool {
        true
    }
}

impl Body for Ed25519Sha256 {
    const SCHEMA: &'static TypeSchema = &schema::ED25519;

    fn read_fields(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        let public_key = fields.fixed_octet_string()?;
        let signature = fields.fixed_octet_string()?;
        Ok(Self::new(public_key, signature))
    }

    fn write_fields(&self, fields: &mut FieldWriter<'_>) {
        fields
            .octet_string(&self.public_key)
            .octet_string(&self.signature);
    }
}
