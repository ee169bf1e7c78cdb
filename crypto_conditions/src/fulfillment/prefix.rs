//! Prefix fulfillment.

use alloc::{boxed::Box, vec::Vec};

use super::{fingerprint_of, saturating_cost, Body, Fulfill, Fulfillment};
use crate::{
    condition::Condition,
    condition_type::ConditionType,
    error::DecodeError,
    schema::{self, FieldReader, FieldWriter, TypeSchema},
};

/// Fixed cost added by a prefix layer.
pub const PREFIX_COST_OVERHEAD: u64 = 1024;

/// Prepends a fixed prefix to the message and delegates to a sub-fulfillment.
///
/// Binding a signature to a prefix lets one key sign for several purposes
/// without one signature being replayable for another. Messages longer than
/// `max_message_length` are rejected before the sub-fulfillment runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixSha256 {
    prefix: Vec<u8>,
    max_message_length: u32,
    subfulfillment: Box<Fulfillment>,
}

impl PrefixSha256 {
    /// Wrap `subfulfillment` behind `prefix`.
    #[must_use]
    pub fn new(
        prefix: impl Into<Vec<u8>>,
        max_message_length: u32,
        subfulfillment: impl Into<Fulfillment>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            max_message_length,
            subfulfillment: Box::new(subfulfillment.into()),
        }
    }

    /// The prefix prepended to every message.
    #[must_use]
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Longest message accepted, in bytes.
    #[must_use]
    pub const fn max_message_length(&self) -> u32 {
        self.max_message_length
    }

    /// The wrapped fulfillment.
    #[must_use]
    pub fn subfulfillment(&self) -> &Fulfillment {
        &self.subfulfillment
    }
}

impl Fulfill for PrefixSha256 {
    fn condition_type(&self) -> ConditionType {
        ConditionType::PrefixSha256
    }

    fn condition(&self) -> Condition {
        let subcondition = self.subfulfillment.condition();

        let fingerprint = fingerprint_of(&schema::PREFIX, |f| {
            f.octet_string(&self.prefix)
                .integer(self.max_message_length)
                .explicit(&subcondition);
        });

        let cost = self.prefix.len() as u64
            + u64::from(self.max_message_length)
            + u64::from(subcondition.cost())
            + PREFIX_COST_OVERHEAD;

        let subtypes = subcondition
            .self_and_subtypes()
            .without(ConditionType::PrefixSha256);

        Condition::from_parts(
            ConditionType::PrefixSha256,
            fingerprint,
            saturating_cost(cost),
            subtypes,
        )
    }

    fn validate(&self, message: &[u8]) -> bool {
        let too_long = usize::try_from(self.max_message_length)
            .is_ok_and(|max| message.len() > max);
        if too_long {
            return false;
        }

        let mut prefixed = Vec::with_capacity(self.prefix.len() + message.len());
        prefixed.extend_from_slice(&self.prefix);
        prefixed.extend_from_slice(message);
        self.subfulfillment.validate(&prefixed)
    }

    fn validation_depends_on_message(&self) -> bool {
        self.subfulfillment.validation_depends_on_message()
    }
}

impl Body for PrefixSha256 {
    const SCHEMA: &'static TypeSchema = &schema::PREFIX;

    fn read_fields(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        let prefix = fields.octet_string()?;
        let max_message_length = fields.integer()?;
        let subfulfillment: Fulfillment = fields.explicit()?;
        Ok(Self::new(prefix, max_message_length, subfulfillment))
    }

    fn write_fields(&self, fields: &mut FieldWriter<'_>) {
        fields
            .octet_string(&self.prefix)
            .integer(self.max_message_length)
            .explicit(self.subfulfillment.as_ref());
    }
}
