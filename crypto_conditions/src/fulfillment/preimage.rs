//! SHA-256 hashlock fulfillment.

use alloc::vec::Vec;

use super::{saturating_cost, Body, Fulfill};
use crate::{
    condition::Condition,
    condition_type::ConditionType,
    error::DecodeError,
    fingerprint::Fingerprint,
    schema::{self, FieldReader, FieldWriter, TypeSchema},
    subtypes::SubtypeSet,
};

/// Reveals a secret whose SHA-256 is the condition's fingerprint.
///
/// Validation ignores the message: anyone holding the preimage can release
/// the payment, whatever it says.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreimageSha256 {
    preimage: Vec<u8>,
}

impl PreimageSha256 {
    /// Wrap a preimage.
    #[must_use]
    pub fn new(preimage: impl Into<Vec<u8>>) -> Self {
        Self {
            preimage: preimage.into(),
        }
    }

    /// The revealed secret.
    #[must_use]
    pub fn preimage(&self) -> &[u8] {
        &self.preimage
    }
}

impl Fulfill for PreimageSha256 {
    fn condition_type(&self) -> ConditionType {
        ConditionType::PreimageSha256
    }

    fn condition(&self) -> Condition {
        Condition::from_parts(
            ConditionType::PreimageSha256,
            Fingerprint::digest(&self.preimage),
            saturating_cost(self.preimage.len() as u64),
            SubtypeSet::EMPTY,
        )
    }

    fn validate(&self, _message: &[u8]) -> bool {
        true
    }

    fn validation_depends_on_message(&self) -> bool {
        false
    }
}

impl Body for PreimageSha256 {
    const SCHEMA: &'static TypeSchema = &schema::PREIMAGE;

    fn read_fields(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        let preimage = fields.octet_string()?;
        let max = fields.limits().max_preimage_len();
        if preimage.len() > max {
            return Err(DecodeError::PreimageTooLong {
                len: preimage.len(),
                max,
            });
        }
        Ok(Self::new(preimage))
    }

    fn write_fields(&self, fields: &mut FieldWriter<'_>) {
        fields.octet_string(&self.preimage);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, fulfillment::Fulfillment, hex::decode_hex, limits::Limits};
    use alloc::vec;

    #[test]
    fn empty_preimage_costs_nothing_and_accepts_anything() {
        let f = PreimageSha256::new(Vec::new());
        let c = f.condition();
        assert_eq!(c.cost(), 0);
        assert_eq!(c.fingerprint(), &Fingerprint::digest(b""));
        assert!(f.validate(b""));
        assert!(f.validate(b"any message at all"));
        assert!(!f.validation_depends_on_message());
    }

    #[test]
    fn empty_preimage_vector() {
        let f = Fulfillment::from(PreimageSha256::new(Vec::new()));
        assert_eq!(f.to_der(), [0xA0, 0x02, 0x80, 0x00]);
        assert_eq!(
            f.condition().to_der(),
            decode_hex("a0258020e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855810100")
                .unwrap()
        );
    }

    #[test]
    fn cost_is_length() {
        let f = PreimageSha256::new(b"open sesame".to_vec());
        assert_eq!(f.condition().cost(), 11);
    }

    #[test]
    fn decode_rejects_long_preimage() {
        let f = Fulfillment::from(PreimageSha256::new(vec![7; 129]));
        let err = Fulfillment::from_der(&f.to_der()).unwrap_err();
        assert_eq!(err, DecodeError::PreimageTooLong { len: 129, max: 128 });
        assert_eq!(err.kind(), ErrorKind::SizeLimitExceeded);

        let relaxed = Limits::default().with_max_preimage_len(129);
        assert_eq!(Fulfillment::from_der_with_limits(&f.to_der(), &relaxed), Ok(f));
    }

    #[test]
    fn primitive_preimage_tag_is_required() {
        // Constructed [0] where the preimage octet string belongs.
        let err = Fulfillment::from_der(&[0xA0, 0x02, 0xA0, 0x00]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DerMalformed);
    }
}
