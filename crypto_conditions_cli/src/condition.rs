//! Derive the condition of a fulfillment.

use anyhow::{Context, Result};
use crypto_conditions::{hex::encode_hex, Condition, Fulfill, Fulfillment, Limits};

/// Arguments for the condition command.
#[derive(Debug, clap::Parser)]
pub(crate) struct ConditionArgs {
    /// DER-encoded fulfillment, as hex
    pub(crate) fulfillment: String,
}

/// Run the condition command.
pub(crate) fn run(args: &ConditionArgs, limits: &Limits) -> Result<()> {
    let bytes = crate::parse_hex(&args.fulfillment, "fulfillment")?;
    let fulfillment = Fulfillment::from_der_with_limits(&bytes, limits)
        .context("could not decode fulfillment")?;

    let condition = fulfillment.condition();
    println!("{}", encode_hex(&condition.to_der()));
    print_summary(&condition);
    Ok(())
}

/// Print the parts of `condition`, one per line.
pub(crate) fn print_summary(condition: &Condition) {
    println!("type: {}", condition.condition_type());
    println!("cost: {}", condition.cost());
    if condition.is_compound() {
        println!("subtypes: {}", condition.subtypes());
    }
    println!("fingerprint: {}", condition.fingerprint());
}
