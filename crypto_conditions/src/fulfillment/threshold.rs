//! M-of-N threshold fulfillment.

use alloc::vec::Vec;

use super::{fingerprint_of, saturating_cost, Body, Fulfill, Fulfillment};
use crate::{
    condition::Condition,
    condition_type::ConditionType,
    der::Encode,
    error::DecodeError,
    schema::{self, FieldReader, FieldWriter, TypeSchema},
    subtypes::SubtypeSet,
};

/// Fixed cost added per branch of a threshold.
pub const THRESHOLD_COST_PER_BRANCH: u64 = 1024;

/// Requires `threshold` of its branches to be fulfilled.
///
/// A threshold has N branches. The fulfilled ones are present as
/// sub-fulfillments; the rest appear only as their conditions. The
/// fingerprint is computed over the threshold and the conditions of *all*
/// branches, so it does not depend on which branches were fulfilled:
///
/// ```text
///            threshold = 2
///   ┌──────────────┼──────────────┐
///   ▼              ▼              ▼
/// Ed25519 A     Ed25519 B     Condition C     fingerprint = H(2, {cond A, cond B, cond C})
/// (signed)      (signed)      (unfulfilled)
/// ```
///
/// # Wire form
///
/// The encoding carries no explicit threshold: a decoded threshold requires
/// every sub-fulfillment it contains, so `threshold` is the number of
/// sub-fulfillments. Constructing a value with a different threshold is
/// possible (and is how an under-fulfilled threshold is represented), but
/// its encoding decodes back with the wire threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdSha256 {
    threshold: u32,
    subfulfillments: Vec<Fulfillment>,
    subconditions: Vec<Condition>,
}

impl ThresholdSha256 {
    /// Build a threshold requiring `threshold` of the given branches.
    ///
    /// Sub-conditions are kept in [`Condition`] order and sub-fulfillments
    /// in the order of their encodings, so equality does not depend on the
    /// order branches are supplied in.
    #[must_use]
    pub fn new(
        threshold: u32,
        mut subfulfillments: Vec<Fulfillment>,
        mut subconditions: Vec<Condition>,
    ) -> Self {
        subfulfillments.sort_by_cached_key(Encode::to_der);
        subconditions.sort_unstable();
        Self {
            threshold,
            subfulfillments,
            subconditions,
        }
    }

    /// Number of branches that must be fulfilled.
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// The fulfilled branches.
    #[must_use]
    pub fn subfulfillments(&self) -> &[Fulfillment] {
        &self.subfulfillments
    }

    /// The unfulfilled branches.
    #[must_use]
    pub fn subconditions(&self) -> &[Condition] {
        &self.subconditions
    }

    /// Conditions of every branch: derived for the fulfilled ones, as given
    /// for the rest.
    #[must_use]
    pub fn all_conditions(&self) -> Vec<Condition> {
        self.subfulfillments
            .iter()
            .map(Fulfill::condition)
            .chain(self.subconditions.iter().copied())
            .collect()
    }
}

/// Sum of the `threshold` largest costs plus the per-branch overhead.
fn threshold_cost(threshold: u32, conditions: &[Condition]) -> u32 {
    let mut costs: Vec<u32> = conditions.iter().map(Condition::cost).collect();
    costs.sort_unstable_by(|a, b| b.cmp(a));

    let required: u64 = costs
        .iter()
        .take(usize::try_from(threshold).unwrap_or(usize::MAX))
        .map(|&c| u64::from(c))
        .sum();
    let overhead = THRESHOLD_COST_PER_BRANCH.saturating_mul(conditions.len() as u64);

    saturating_cost(required.saturating_add(overhead))
}

impl Fulfill for ThresholdSha256 {
    fn condition_type(&self) -> ConditionType {
        ConditionType::ThresholdSha256
    }

    fn condition(&self) -> Condition {
        let conditions = self.all_conditions();

        let fingerprint = fingerprint_of(&schema::THRESHOLD, |f| {
            f.integer(self.threshold).set_of(&conditions);
        });

        let subtypes = conditions
            .iter()
            .map(Condition::self_and_subtypes)
            .fold(SubtypeSet::EMPTY, SubtypeSet::union)
            .without(ConditionType::ThresholdSha256);

        Condition::from_parts(
            ConditionType::ThresholdSha256,
            fingerprint,
            threshold_cost(self.threshold, &conditions),
            subtypes,
        )
    }

    fn validate(&self, message: &[u8]) -> bool {
        let Ok(threshold) = usize::try_from(self.threshold) else {
            return false;
        };
        if threshold == 0 || self.subfulfillments.len() + self.subconditions.len() < threshold {
            return false;
        }

        self.subfulfillments
            .iter()
            .filter(|f| f.validate(message))
            .take(threshold)
            .count()
            == threshold
    }

    fn validation_depends_on_message(&self) -> bool {
        self.subfulfillments
            .iter()
            .any(Fulfill::validation_depends_on_message)
    }
}

impl Body for ThresholdSha256 {
    const SCHEMA: &'static TypeSchema = &schema::THRESHOLD;

    fn read_fields(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        let max_fan_out = fields.limits().max_fan_out();

        let subfulfillments: Vec<Fulfillment> = fields.set_of(max_fan_out)?;
        if subfulfillments.is_empty() {
            return Err(DecodeError::EmptyThreshold);
        }

        let remaining = max_fan_out - subfulfillments.len();
        let subconditions: Vec<Condition> = fields.set_of(remaining).map_err(|err| match err {
            DecodeError::FanOutExceeded { .. } => DecodeError::FanOutExceeded {
                count: max_fan_out + 1,
                max: max_fan_out,
            },
            other => other,
        })?;

        let threshold = u32::try_from(subfulfillments.len()).map_err(|_| {
            DecodeError::FanOutExceeded {
                count: subfulfillments.len(),
                max: max_fan_out,
            }
        })?;

        Ok(Self::new(threshold, subfulfillments, subconditions))
    }

    fn write_fields(&self, fields: &mut FieldWriter<'_>) {
        fields
            .set_of(&self.subfulfillments)
            .set_of(&self.subconditions);
    }
}
