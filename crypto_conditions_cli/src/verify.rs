//! Verify a fulfillment against a condition.

use std::process::ExitCode;

use crypto_conditions::{verify_der_with_limits, Limits};

/// Arguments for the verify command.
#[derive(Debug, clap::Parser)]
pub(crate) struct VerifyArgs {
    /// DER-encoded condition, as hex
    #[arg(short, long)]
    pub(crate) condition: String,

    /// DER-encoded fulfillment, as hex
    #[arg(short, long)]
    pub(crate) fulfillment: String,

    /// Message the fulfillment must accept, as hex
    #[arg(short, long, default_value = "")]
    pub(crate) message: String,
}

/// Run the verify command.
///
/// Prints `valid cost=<n>` and succeeds, or prints the rejection and exits
/// with status 1. Arguments that are not hex exit with status 2.
pub(crate) fn run(args: &VerifyArgs, limits: &Limits) -> ExitCode {
    let inputs = crate::parse_hex(&args.condition, "condition").and_then(|condition| {
        let fulfillment = crate::parse_hex(&args.fulfillment, "fulfillment")?;
        let message = crate::parse_hex(&args.message, "message")?;
        Ok((condition, fulfillment, message))
    });
    let (condition, fulfillment, message) = match inputs {
        Ok(inputs) => inputs,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    match verify_der_with_limits(&condition, &fulfillment, &message, limits) {
        Ok(verified) => {
            println!("valid cost={}", verified.cost());
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::info!(%err, "verification rejected");
            println!("invalid kind={} error={err}", err.kind());
            ExitCode::FAILURE
        }
    }
}
