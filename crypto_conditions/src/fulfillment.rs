//! Fulfillments: evidence that satisfies a condition.
//!
//! [`Fulfillment`] is a closed sum over the five supported types. Every type
//! implements [`Fulfill`]: it derives the [`Condition`] it satisfies and
//! validates a message. The compound types ([`PrefixSha256`] and
//! [`ThresholdSha256`]) own their nested fulfillments and recurse through the
//! same interface.
//!
//! [`PrefixSha256`]: prefix::PrefixSha256
//! [`ThresholdSha256`]: threshold::ThresholdSha256

use alloc::vec::Vec;

use crate::{
    condition::Condition,
    condition_type::ConditionType,
    der::{Decode, Encode, Reader, Tag, Writer},
    error::DecodeError,
    fingerprint::Fingerprint,
    limits::Limits,
    schema::{self, FieldReader, FieldWriter, TypeSchema},
    subtypes::SubtypeSet,
};

pub mod ed25519;
pub mod prefix;
pub mod preimage;
pub mod rsa;
pub mod threshold;

use ed25519::Ed25519Sha256;
use prefix::PrefixSha256;
use preimage::PreimageSha256;
use rsa::RsaSha256;
use threshold::ThresholdSha256;

/// The capability every fulfillment type provides.
pub trait Fulfill {
    /// The type of condition this fulfills.
    fn condition_type(&self) -> ConditionType;

    /// Derive the condition this fulfillment satisfies.
    ///
    /// Deterministic: every verifier derives the same fingerprint and cost.
    fn condition(&self) -> Condition;

    /// Whether this fulfillment accepts `message`.
    fn validate(&self, message: &[u8]) -> bool;

    /// Whether the outcome of [`validate`](Self::validate) can vary with the message.
    fn validation_depends_on_message(&self) -> bool;
}

/// Per-type body codec, driven by the type's [`TypeSchema`].
pub(crate) trait Body: Sized {
    /// Layouts of this type.
    const SCHEMA: &'static TypeSchema;

    /// Read the fulfillment body fields.
    fn read_fields(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError>;

    /// Write the fulfillment body fields.
    fn write_fields(&self, fields: &mut FieldWriter<'_>);
}

fn decode_body<B: Body>(body: Reader<'_>) -> Result<B, DecodeError> {
    let mut fields = FieldReader::new(body, B::SCHEMA.fulfillment);
    let value = B::read_fields(&mut fields)?;
    fields.finish()?;
    Ok(value)
}

fn encode_body<B: Body>(value: &B, writer: &mut Writer) {
    writer.write_constructed(schema::choice_tag(B::SCHEMA.condition_type), |w| {
        value.write_fields(&mut FieldWriter::new(w, B::SCHEMA.fulfillment));
    });
}

/// SHA-256 over the DER `SEQUENCE` of `schema`'s fingerprint fields.
pub(crate) fn fingerprint_of(
    schema: &'static TypeSchema,
    write: impl FnOnce(&mut FieldWriter<'_>),
) -> Fingerprint {
    let mut writer = Writer::new();
    writer.write_constructed(Tag::SEQUENCE, |w| {
        write(&mut FieldWriter::new(w, schema.fingerprint));
    });
    Fingerprint::digest(writer.as_bytes())
}

/// Clamp a 64-bit cost sum to `u32`.
pub(crate) fn saturating_cost(cost: u64) -> u32 {
    u32::try_from(cost).unwrap_or(u32::MAX)
}

/// A fulfillment of any supported type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fulfillment {
    /// SHA-256 hashlock.
    Preimage(PreimageSha256),
    /// Prefix-wrapped sub-fulfillment.
    Prefix(PrefixSha256),
    /// M-of-N threshold.
    Threshold(ThresholdSha256),
    /// RSA-PSS signature.
    Rsa(RsaSha256),
    /// Ed25519 signature.
    Ed25519(Ed25519Sha256),
}

impl Fulfillment {
    /// Decode a fulfillment under the default [`Limits`].
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if `bytes` is not exactly one canonical
    /// fulfillment within the limits.
    pub fn from_der(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_der_with_limits(bytes, &Limits::default())
    }

    /// Decode a fulfillment under `limits`.
    ///
    /// # Errors
    ///
    /// As [`from_der`](Self::from_der).
    pub fn from_der_with_limits(bytes: &[u8], limits: &Limits) -> Result<Self, DecodeError> {
        let fulfillment = <Self as Decode>::from_der_with_limits(bytes, limits)?;
        tracing::trace!(
            condition_type = %fulfillment.condition_type(),
            len = bytes.len(),
            "decoded fulfillment"
        );
        Ok(fulfillment)
    }

    /// The canonical DER encoding.
    #[must_use]
    pub fn to_der(&self) -> Vec<u8> {
        Encode::to_der(self)
    }

    /// Fingerprint of the derived condition.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        *self.condition().fingerprint()
    }

    /// Cost of the derived condition.
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.condition().cost()
    }

    /// Subtypes of the derived condition.
    #[must_use]
    pub fn subtypes(&self) -> SubtypeSet {
        self.condition().subtypes()
    }

    /// Check an in-memory fulfillment's depth, fan-out and preimage lengths
    /// against `limits`.
    ///
    /// Depth is counted in the same constructed levels the DER form uses, so
    /// these three checks agree with decoding. The encoded length limit and
    /// structural rules such as a threshold needing a sub-fulfillment are not
    /// checked here.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::DepthExceeded`] if nested deeper than allowed
    /// - [`DecodeError::FanOutExceeded`] if a threshold has too many branches
    /// - [`DecodeError::PreimageTooLong`] if a preimage is too long
    pub fn check_limits(&self, limits: &Limits) -> Result<(), DecodeError> {
        self.check_limits_at(limits, 0)
    }

    fn check_limits_at(&self, limits: &Limits, depth: usize) -> Result<(), DecodeError> {
        let depth = depth + 1;
        if depth > limits.max_depth() {
            return Err(DecodeError::DepthExceeded {
                max: limits.max_depth(),
            });
        }

        match self {
            Self::Preimage(f) => {
                let len = f.preimage().len();
                if len > limits.max_preimage_len() {
                    return Err(DecodeError::PreimageTooLong {
                        len,
                        max: limits.max_preimage_len(),
                    });
                }
                Ok(())
            }
            Self::Prefix(f) => f.subfulfillment().check_limits_at(limits, depth + 1),
            Self::Threshold(f) => {
                let count = f.subfulfillments().len() + f.subconditions().len();
                if count > limits.max_fan_out() {
                    return Err(DecodeError::FanOutExceeded {
                        count,
                        max: limits.max_fan_out(),
                    });
                }
                f.subfulfillments()
                    .iter()
                    .try_for_each(|sub| sub.check_limits_at(limits, depth + 1))
            }
            Self::Rsa(_) | Self::Ed25519(_) => Ok(()),
        }
    }
}

impl Fulfill for Fulfillment {
    fn condition_type(&self) -> ConditionType {
        match self {
            Self::Preimage(f) => f.condition_type(),
            Self::Prefix(f) => f.condition_type(),
            Self::Threshold(f) => f.condition_type(),
            Self::Rsa(f) => f.condition_type(),
            Self::Ed25519(f) => f.condition_type(),
        }
    }

    fn condition(&self) -> Condition {
        match self {
            Self::Preimage(f) => f.condition(),
            Self::Prefix(f) => f.condition(),
            Self::Threshold(f) => f.condition(),
            Self::Rsa(f) => f.condition(),
            Self::Ed25519(f) => f.condition(),
        }
    }

    fn validate(&self, message: &[u8]) -> bool {
        match self {
            Self::Preimage(f) => f.validate(message),
            Self::Prefix(f) => f.validate(message),
            Self::Threshold(f) => f.validate(message),
            Self::Rsa(f) => f.validate(message),
            Self::Ed25519(f) => f.validate(message),
        }
    }

    fn validation_depends_on_message(&self) -> bool {
        match self {
            Self::Preimage(f) => f.validation_depends_on_message(),
            Self::Prefix(f) => f.validation_depends_on_message(),
            Self::Threshold(f) => f.validation_depends_on_message(),
            Self::Rsa(f) => f.validation_depends_on_message(),
            Self::Ed25519(f) => f.validation_depends_on_message(),
        }
    }
}

impl Encode for Fulfillment {
    fn encode(&self, writer: &mut Writer) {
        match self {
            Self::Preimage(f) => encode_body(f, writer),
            Self::Prefix(f) => encode_body(f, writer),
            Self::Threshold(f) => encode_body(f, writer),
            Self::Rsa(f) => encode_body(f, writer),
            Self::Ed25519(f) => encode_body(f, writer),
        }
    }
}

impl Decode for Fulfillment {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let (schema, body) = schema::read_choice(reader)?;
        Ok(match schema.condition_type {
            ConditionType::PreimageSha256 => Self::Preimage(decode_body(body)?),
            ConditionType::PrefixSha256 => Self::Prefix(decode_body(body)?),
            ConditionType::ThresholdSha256 => Self::Threshold(decode_body(body)?),
            ConditionType::RsaSha256 => Self::Rsa(decode_body(body)?),
            ConditionType::Ed25519Sha256 => Self::Ed25519(decode_body(body)?),
        })
    }
}

impl From<PreimageSha256> for Fulfillment {
    fn from(f: PreimageSha256) -> Self {
        Self::Preimage(f)
    }
}

impl From<PrefixSha256> for Fulfillment {
    fn from(f: PrefixSha256) -> Self {
        Self::Prefix(f)
    }
}

impl From<ThresholdSha256> for Fulfillment {
    fn from(f: ThresholdSha256) -> Self {
        Self::Threshold(f)
    }
}

impl From<RsaSha256> for Fulfillment {
    fn from(f: RsaSha256) -> Self {
        Self::Rsa(f)
    }
}

impl From<Ed25519Sha256> for Fulfillment {
    fn from(f: Ed25519Sha256) -> Self {
        Self::Ed25519(f)
    }
}
