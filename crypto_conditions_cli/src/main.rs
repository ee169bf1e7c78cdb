//! Command-line tool for deriving, inspecting and verifying crypto-conditions.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod condition;
mod inspect;
mod limits;
mod verify;

#[derive(Debug, Parser)]
#[command(name = "crypto-conditions", version, about = "Inspect and verify crypto-conditions")]
struct Arguments {
    #[command(flatten)]
    limits: limits::LimitArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Derive the condition of a fulfillment
    Condition(condition::ConditionArgs),

    /// Describe an encoded condition or fulfillment
    Inspect(inspect::InspectArgs),

    /// Verify a fulfillment against a condition and message
    Verify(verify::VerifyArgs),
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Arguments::parse();
    let limits = args.limits.to_limits();
    tracing::debug!(?limits, "parsed arguments");

    match args.command {
        Command::Condition(cmd) => condition::run(&cmd, &limits).map(|()| ExitCode::SUCCESS),
        Command::Inspect(cmd) => inspect::run(&cmd, &limits).map(|()| ExitCode::SUCCESS),
        Command::Verify(cmd) => Ok(verify::run(&cmd, &limits)),
    }
}

/// Decode a hex argument, ignoring surrounding whitespace and an optional `0x`.
pub(crate) fn parse_hex(input: &str, what: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    crypto_conditions::hex::decode_hex(digits)
        .ok_or_else(|| anyhow::anyhow!("{what} is not valid hex: {input:?}"))
}
