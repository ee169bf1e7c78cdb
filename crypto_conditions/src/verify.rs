//! Verification entry points.
//!
//! [`verify`] is the in-memory check; [`verify_der`] is the boundary used by
//! an escrow handler holding raw condition and fulfillment bytes. The
//! condition comparison always happens before validation, so a fulfillment
//! for the wrong condition never reaches a signature check.

use crate::{
    condition::Condition,
    error::{DecodeError, VerifyError},
    fulfillment::{Fulfill, Fulfillment},
    limits::Limits,
};

/// A successful verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Verified {
    cost: u32,
}

impl Verified {
    /// Cost of the fulfillment, for fee accounting.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }
}

/// Verify `fulfillment` against `target` for `message`, under the default [`Limits`].
///
/// # Errors
///
/// - [`VerifyError::Decode`] if the fulfillment exceeds the limits
/// - [`VerifyError::ConditionMismatch`] if it derives a different condition
/// - [`VerifyError::ValidationFailed`] if it rejects the message
pub fn verify(
    target: &Condition,
    fulfillment: &Fulfillment,
    message: &[u8],
) -> Result<Verified, VerifyError> {
    verify_with_limits(target, fulfillment, message, &Limits::default())
}

/// Verify `fulfillment` against `target` for `message`, under `limits`.
///
/// # Errors
///
/// As [`verify`].
#[tracing::instrument(skip_all, fields(condition_type = %target.condition_type(), message_len = message.len()))]
pub fn verify_with_limits(
    target: &Condition,
    fulfillment: &Fulfillment,
    message: &[u8],
    limits: &Limits,
) -> Result<Verified, VerifyError> {
    fulfillment.check_limits(limits)?;

    let derived = fulfillment.condition();
    if derived != *target {
        tracing::debug!(%derived, expected = %target, "condition mismatch");
        return Err(VerifyError::ConditionMismatch {
            expected: target.condition_type(),
            derived: derived.condition_type(),
        });
    }

    if !fulfillment.validate(message) {
        tracing::debug!("fulfillment rejected message");
        return Err(VerifyError::ValidationFailed {
            condition_type: fulfillment.condition_type(),
        });
    }

    tracing::trace!(cost = derived.cost(), "verified");
    Ok(Verified {
        cost: derived.cost(),
    })
}

/// Decode both inputs and verify, under the default [`Limits`].
///
/// # Errors
///
/// Any decode error of either input, then as [`verify`].
pub fn verify_der(
    condition: &[u8],
    fulfillment: &[u8],
    message: &[u8],
) -> Result<Verified, VerifyError> {
    verify_der_with_limits(condition, fulfillment, message, &Limits::default())
}

/// Decode both inputs and verify, under `limits`.
///
/// # Errors
///
/// As [`verify_der`].
pub fn verify_der_with_limits(
    condition: &[u8],
    fulfillment: &[u8],
    message: &[u8],
    limits: &Limits,
) -> Result<Verified, VerifyError> {
    let target = Condition::from_der_with_limits(condition, limits)?;
    let fulfillment = Fulfillment::from_der_with_limits(fulfillment, limits)
        .inspect_err(|err: &DecodeError| tracing::debug!(%err, "rejected fulfillment encoding"))?;
    verify_with_limits(&target, &fulfillment, message, limits)
}

/// Whether `fulfillment` derives exactly `condition`.
///
/// Compares types first, so a mismatched type costs no hashing.
#[must_use]
pub fn matches(fulfillment: &Fulfillment, condition: &Condition) -> bool {
    fulfillment.condition_type() == condition.condition_type()
        && fulfillment.condition() == *condition
}
