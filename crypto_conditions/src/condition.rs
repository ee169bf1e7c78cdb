//! The [`Condition`] value type.

use alloc::vec::Vec;

use crate::{
    condition_type::ConditionType,
    der::{Decode, Encode, Reader, Writer},
    error::DecodeError,
    fingerprint::Fingerprint,
    limits::Limits,
    schema::{self, FieldReader, FieldWriter},
    subtypes::SubtypeSet,
};

/// A commitment to a fulfillment: type, fingerprint, cost and subtypes.
///
/// Two conditions are equal iff all four parts are equal. They are ordered
/// by type, then cost, then fingerprint, with subtypes as the final
/// tie-break so the order agrees with equality.
///
/// ```text
/// ┌──────────────┬───────────────┬──────────┬────────────────────────────┐
/// │ type (tag)   │ fingerprint   │ cost     │ subtypes (compound only)   │
/// │ 0..=4        │ SHA-256, 32 B │ u32      │ bit n = type n             │
/// └──────────────┴───────────────┴──────────┴────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Condition {
    // Field order is the derived ordering.
    condition_type: ConditionType,
    cost: u32,
    fingerprint: Fingerprint,
    subtypes: SubtypeSet,
}

impl Condition {
    /// Assemble a condition from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedSubtypes`] if a simple type
    /// (preimage, RSA, Ed25519) is given a non-empty subtypes set.
    pub const fn new(
        condition_type: ConditionType,
        fingerprint: Fingerprint,
        cost: u32,
        subtypes: SubtypeSet,
    ) -> Result<Self, DecodeError> {
        if !condition_type.is_compound() && !subtypes.is_empty() {
            return Err(DecodeError::UnexpectedSubtypes { condition_type });
        }
        Ok(Self::from_parts(condition_type, fingerprint, cost, subtypes))
    }

    pub(crate) const fn from_parts(
        condition_type: ConditionType,
        fingerprint: Fingerprint,
        cost: u32,
        subtypes: SubtypeSet,
    ) -> Self {
        Self {
            condition_type,
            cost,
            fingerprint,
            subtypes,
        }
    }

    /// The condition's type.
    #[must_use]
    pub const fn condition_type(&self) -> ConditionType {
        self.condition_type
    }

    /// The SHA-256 fingerprint.
    #[must_use]
    pub const fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Upper bound on the cost of verifying a matching fulfillment.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Types a matching fulfillment may contain below this one.
    #[must_use]
    pub const fn subtypes(&self) -> SubtypeSet {
        self.subtypes
    }

    /// Whether this condition's type is compound (prefix or threshold).
    #[must_use]
    pub const fn is_compound(&self) -> bool {
        self.condition_type.is_compound()
    }

    /// This condition's own type together with its subtypes.
    #[must_use]
    pub const fn self_and_subtypes(&self) -> SubtypeSet {
        self.subtypes.with(self.condition_type)
    }

    /// Decode a condition under the default [`Limits`].
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if `bytes` is not exactly one canonical
    /// condition within the limits.
    pub fn from_der(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_der_with_limits(bytes, &Limits::default())
    }

    /// Decode a condition under `limits`.
    ///
    /// # Errors
    ///
    /// As [`from_der`](Self::from_der).
    pub fn from_der_with_limits(bytes: &[u8], limits: &Limits) -> Result<Self, DecodeError> {
        let condition = <Self as Decode>::from_der_with_limits(bytes, limits)?;
        tracing::trace!(
            condition_type = %condition.condition_type,
            cost = condition.cost,
            "decoded condition"
        );
        Ok(condition)
    }

    /// The canonical DER encoding.
    #[must_use]
    pub fn to_der(&self) -> Vec<u8> {
        Encode::to_der(self)
    }
}

impl Encode for Condition {
    fn encode(&self, writer: &mut Writer) {
        let layout = schema::schema(self.condition_type).condition;
        writer.write_constructed(schema::choice_tag(self.condition_type), |w| {
            let mut fields = FieldWriter::new(w, layout);
            fields
                .octet_string(self.fingerprint.as_bytes())
                .integer(self.cost);
            if self.is_compound() {
                fields.bit_string(self.subtypes.bits());
            }
        });
    }
}

impl Decode for Condition {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let (schema, body) = schema::read_choice(reader)?;
        let condition_type = schema.condition_type;
        let mut fields = FieldReader::new(body, schema.condition);

        let fingerprint = Fingerprint::from_bytes(fields.fixed_octet_string()?);
        let cost = fields.integer()?;
        let subtypes = if condition_type.is_compound() {
            SubtypeSet::from_bits_truncate(fields.bit_string()?)
        } else {
            SubtypeSet::EMPTY
        };
        fields.finish()?;

        let max_preimage_len = reader.limits().max_preimage_len();
        if condition_type == ConditionType::PreimageSha256 && cost as usize > max_preimage_len {
            return Err(DecodeError::PreimageTooLong {
                len: cost as usize,
                max: max_preimage_len,
            });
        }

        Self::new(condition_type, fingerprint, cost, subtypes)
    }
}

impl core::fmt::Display for Condition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}(fingerprint={}, cost={}",
            self.condition_type, self.fingerprint, self.cost
        )?;
        if self.is_compound() {
            write!(f, ", subtypes=[{}]", self.subtypes)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, hex::decode_hex};
    use alloc::vec;
    use testresult::TestResult;

    const EMPTY_PREIMAGE: &str =
        "a0258020e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855810100";

    fn bytes(hex: &str) -> Vec<u8> {
        decode_hex(hex).unwrap()
    }

    fn condition(ty: ConditionType, fp: u8, cost: u32) -> Condition {
        let subtypes = if ty.is_compound() {
            SubtypeSet::EMPTY.with(ConditionType::Ed25519Sha256)
        } else {
            SubtypeSet::EMPTY
        };
        Condition::new(ty, Fingerprint::from_bytes([fp; 32]), cost, subtypes).unwrap()
    }

    mod codec {
        use super::*;

        #[test]
        fn empty_preimage_vector() -> TestResult {
            let condition = Condition::from_der(&bytes(EMPTY_PREIMAGE))?;
            assert_eq!(condition.condition_type(), ConditionType::PreimageSha256);
            assert_eq!(condition.cost(), 0);
            assert_eq!(condition.fingerprint(), &Fingerprint::digest(b""));
            assert!(condition.subtypes().is_empty());
            assert_eq!(condition.to_der(), bytes(EMPTY_PREIMAGE));
            Ok(())
        }

        #[test]
        fn compound_round_trip() -> TestResult {
            let original = condition(ConditionType::ThresholdSha256, 0x11, 265_216);
            let encoded = original.to_der();
            assert_eq!(encoded[0], 0xA2);
            assert_eq!(&encoded[encoded.len() - 4..], &[0x82, 0x02, 0x03, 0x08]);
            assert_eq!(Condition::from_der(&encoded)?, original);
            Ok(())
        }

        #[test]
        fn simple_type_with_subtypes_field_is_malformed() {
            // Ed25519 condition followed by a subtypes field it must not have.
            let mut body = vec![0x80, 0x20];
            body.extend([0u8; 32]);
            body.extend([0x81, 0x03, 0x02, 0x00, 0x00, 0x82, 0x02, 0x07, 0x00]);
            let mut input = vec![0xA4, u8::try_from(body.len()).unwrap()];
            input.extend(body);

            let err = Condition::from_der(&input).unwrap_err();
            assert!(matches!(err, DecodeError::TrailingBytes { .. }));
            assert_eq!(err.kind(), ErrorKind::DerMalformed);
        }

        #[test]
        fn compound_type_without_subtypes_is_malformed() {
            let mut input = vec![0xA1, 0x25, 0x80, 0x20];
            input.extend([0u8; 32]);
            input.extend([0x81, 0x01, 0x00]);
            let err = Condition::from_der(&input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DerMalformed);
        }

        #[test]
        fn short_fingerprint_is_malformed() {
            let input = bytes("a00980040000000081017f");
            let err = Condition::from_der(&input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DerMalformed);
        }

        #[test]
        fn wrong_fingerprint_length_is_reported() {
            let input = bytes("a008800300000081017f");
            assert_eq!(
                Condition::from_der(&input),
                Err(DecodeError::WrongLength {
                    field: "fingerprint",
                    expected: 32,
                    actual: 3
                })
            );
        }

        #[test]
        fn unknown_type_tag_is_unsupported() {
            let mut input = bytes(EMPTY_PREIMAGE);
            input[0] = 0xA5;
            assert_eq!(
                Condition::from_der(&input),
                Err(DecodeError::UnsupportedType { tag: 5 })
            );
        }

        #[test]
        fn trailing_bytes_after_condition() {
            let mut input = bytes(EMPTY_PREIMAGE);
            input.push(0x00);
            let err = Condition::from_der(&input).unwrap_err();
            assert_eq!(err, DecodeError::TrailingBytes { offset: 39, count: 1 });
        }

        #[test]
        fn non_minimal_outer_length_is_not_canonical() {
            let mut input = vec![0xA0, 0x81, 0x25];
            input.extend(&bytes(EMPTY_PREIMAGE)[2..]);
            let err = Condition::from_der(&input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotCanonical);
        }

        #[test]
        fn preimage_cost_above_limit() {
            let original = condition(ConditionType::PreimageSha256, 0x22, 129);
            let err = Condition::from_der(&original.to_der()).unwrap_err();
            assert_eq!(err, DecodeError::PreimageTooLong { len: 129, max: 128 });
            assert_eq!(err.kind(), ErrorKind::SizeLimitExceeded);

            let relaxed = Limits::default().with_max_preimage_len(256);
            assert_eq!(
                Condition::from_der_with_limits(&original.to_der(), &relaxed),
                Ok(original)
            );
        }
    }

    mod construction {
        use super::*;

        #[test]
        fn simple_types_reject_subtypes() {
            let subtypes = SubtypeSet::EMPTY.with(ConditionType::PreimageSha256);
            for ty in [
                ConditionType::PreimageSha256,
                ConditionType::RsaSha256,
                ConditionType::Ed25519Sha256,
            ] {
                let result = Condition::new(ty, Fingerprint::from_bytes([0; 32]), 1, subtypes);
                assert_eq!(
                    result,
                    Err(DecodeError::UnexpectedSubtypes { condition_type: ty })
                );
            }
        }

        #[test]
        fn self_and_subtypes_adds_own_type() {
            let c = condition(ConditionType::PrefixSha256, 0, 0);
            let expected = SubtypeSet::EMPTY
                .with(ConditionType::PrefixSha256)
                .with(ConditionType::Ed25519Sha256);
            assert_eq!(c.self_and_subtypes(), expected);
        }

        #[test]
        fn display_includes_subtypes_for_compound() {
            let c = condition(ConditionType::PrefixSha256, 0xAB, 7);
            let shown = alloc::format!("{c}");
            assert!(shown.starts_with("prefix-sha-256(fingerprint=abab"));
            assert!(shown.ends_with("cost=7, subtypes=[ed25519-sha-256])"));
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn type_dominates_cost() {
            let a = condition(ConditionType::PreimageSha256, 0xFF, 100);
            let b = condition(ConditionType::Ed25519Sha256, 0x00, 0);
            assert!(a < b);
        }

        #[test]
        fn cost_dominates_fingerprint() {
            let a = condition(ConditionType::RsaSha256, 0xFF, 1);
            let b = condition(ConditionType::RsaSha256, 0x00, 2);
            assert!(a < b);
        }

        #[test]
        fn fingerprint_breaks_ties() {
            let a = condition(ConditionType::RsaSha256, 0x01, 5);
            let b = condition(ConditionType::RsaSha256, 0x02, 5);
            assert!(a < b);
            assert_eq!(a.cmp(&a), core::cmp::Ordering::Equal);
        }

        #[test]
        fn subtypes_keep_order_consistent_with_equality() {
            let fp = Fingerprint::from_bytes([9; 32]);
            let a = Condition::new(
                ConditionType::ThresholdSha256,
                fp,
                10,
                SubtypeSet::EMPTY.with(ConditionType::PreimageSha256),
            )
            .unwrap();
            let b = Condition::new(
                ConditionType::ThresholdSha256,
                fp,
                10,
                SubtypeSet::EMPTY.with(ConditionType::RsaSha256),
            )
            .unwrap();
            assert_ne!(a, b);
            assert_ne!(a.cmp(&b), core::cmp::Ordering::Equal);
        }
    }

    mod proptests {
        use super::*;

        fn generated(ty: u8, cost: u8, fp: u8, subtypes: u8) -> Condition {
            let ty = ConditionType::ALL[usize::from(ty % 5)];
            let subtypes = if ty.is_compound() {
                SubtypeSet::from_bits_truncate(subtypes)
            } else {
                SubtypeSet::EMPTY
            };
            // Small domains so that ties on each key are common.
            let mut fingerprint = [0; 32];
            fingerprint[31] = fp % 3;
            Condition::new(ty, Fingerprint::from_bytes(fingerprint), u32::from(cost % 4), subtypes)
                .unwrap()
        }

        #[test]
        fn ordering_is_a_strict_total_order() {
            bolero::check!()
                .with_arbitrary::<([u8; 4], [u8; 4], [u8; 4])>()
                .for_each(|(a, b, c)| {
                    let a = generated(a[0], a[1], a[2], a[3]);
                    let b = generated(b[0], b[1], b[2], b[3]);
                    let c = generated(c[0], c[1], c[2], c[3]);

                    // Exactly one of <, ==, > holds, and == agrees with Eq.
                    let lt = a < b;
                    let gt = a > b;
                    let eq = a == b;
                    assert_eq!(u8::from(lt) + u8::from(gt) + u8::from(eq), 1);
                    assert_eq!(a.cmp(&b), b.cmp(&a).reverse());

                    if a < b && b < c {
                        assert!(a < c);
                    }

                    let key = |x: &Condition| (x.condition_type(), x.cost(), *x.fingerprint());
                    if key(&a) < key(&b) {
                        assert!(a < b);
                    }
                });
        }

        #[test]
        fn decoding_arbitrary_bytes_never_panics() {
            bolero::check!()
                .with_arbitrary::<Vec<u8>>()
                .for_each(|buf| {
                    let _ = Condition::from_der(buf);
                });
        }

        #[test]
        fn accepted_input_reencodes_identically() {
            bolero::check!()
                .with_arbitrary::<Vec<u8>>()
                .for_each(|buf| {
                    if let Ok(condition) = Condition::from_der(buf) {
                        assert_eq!(&condition.to_der(), buf);
                    }
                });
        }

        #[test]
        fn generated_conditions_round_trip() {
            bolero::check!()
                .with_arbitrary::<([u8; 32], u32, u8, u8)>()
                .for_each(|(fp, cost, ty, subtypes)| {
                    let ty = ConditionType::ALL[usize::from(ty % 5)];
                    let subtypes = if ty.is_compound() {
                        SubtypeSet::from_bits_truncate(*subtypes)
                    } else {
                        SubtypeSet::EMPTY
                    };
                    let cost = if ty == ConditionType::PreimageSha256 {
                        cost % 129
                    } else {
                        *cost
                    };
                    let original =
                        Condition::new(ty, Fingerprint::from_bytes(*fp), cost, subtypes).unwrap();
                    let encoded = original.to_der();
                    assert_eq!(Condition::from_der(&encoded), Ok(original));
                });
        }
    }
}
