//! Describe an encoded condition or fulfillment.

use std::fmt::Write as _;

use anyhow::{anyhow, Result};
use crypto_conditions::{hex::encode_hex, Condition, Fulfill, Fulfillment, Limits};

/// What the input encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Encoding {
    /// A condition
    Condition,
    /// A fulfillment
    Fulfillment,
}

/// Arguments for the inspect command.
#[derive(Debug, clap::Parser)]
pub(crate) struct InspectArgs {
    /// DER-encoded condition or fulfillment, as hex
    pub(crate) input: String,

    /// Decode as this; by default a fulfillment is tried first, then a condition
    #[arg(long = "as", value_enum)]
    pub(crate) encoding: Option<Encoding>,
}

/// Run the inspect command.
pub(crate) fn run(args: &InspectArgs, limits: &Limits) -> Result<()> {
    let bytes = crate::parse_hex(&args.input, "input")?;

    let description = match args.encoding {
        Some(Encoding::Condition) => {
            describe_condition(&Condition::from_der_with_limits(&bytes, limits)?)
        }
        Some(Encoding::Fulfillment) => {
            describe_fulfillment(&Fulfillment::from_der_with_limits(&bytes, limits)?)
        }
        None => match Fulfillment::from_der_with_limits(&bytes, limits) {
            Ok(fulfillment) => describe_fulfillment(&fulfillment),
            Err(as_fulfillment) => match Condition::from_der_with_limits(&bytes, limits) {
                Ok(condition) => describe_condition(&condition),
                Err(as_condition) => {
                    return Err(anyhow!(
                        "input is neither a fulfillment ({as_fulfillment}) nor a condition ({as_condition})"
                    ))
                }
            },
        },
    };

    print!("{description}");
    Ok(())
}

fn describe_condition(condition: &Condition) -> String {
    format!("condition {condition}\n")
}

/// An indented tree, one node per line.
fn describe_fulfillment(fulfillment: &Fulfillment) -> String {
    let mut out = String::new();
    write_node(&mut out, fulfillment, 0);
    out
}

fn write_node(out: &mut String, fulfillment: &Fulfillment, depth: usize) {
    let indent = "  ".repeat(depth);
    let condition_type = fulfillment.condition_type();
    let cost = fulfillment.cost();

    // Writing to a String cannot fail.
    let _ = match fulfillment {
        Fulfillment::Preimage(f) => writeln!(
            out,
            "{indent}{condition_type} cost={cost} preimage={}",
            encode_hex(f.preimage())
        ),
        Fulfillment::Prefix(f) => writeln!(
            out,
            "{indent}{condition_type} cost={cost} prefix={} max_message_length={}",
            encode_hex(f.prefix()),
            f.max_message_length()
        ),
        Fulfillment::Threshold(f) => writeln!(
            out,
            "{indent}{condition_type} cost={cost} threshold={} of {}",
            f.threshold(),
            f.subfulfillments().len() + f.subconditions().len()
        ),
        Fulfillment::Rsa(f) => writeln!(
            out,
            "{indent}{condition_type} cost={cost} modulus_bits={}",
            f.modulus().len() * 8
        ),
        Fulfillment::Ed25519(f) => writeln!(
            out,
            "{indent}{condition_type} cost={cost} public_key={}",
            encode_hex(f.public_key())
        ),
    };

    match fulfillment {
        Fulfillment::Prefix(f) => write_node(out, f.subfulfillment(), depth + 1),
        Fulfillment::Threshold(f) => {
            for sub in f.subfulfillments() {
                write_node(out, sub, depth + 1);
            }
            let child_indent = "  ".repeat(depth + 1);
            for condition in f.subconditions() {
                let _ = writeln!(out, "{child_indent}unfulfilled {condition}");
            }
        }
        Fulfillment::Preimage(_) | Fulfillment::Rsa(_) | Fulfillment::Ed25519(_) => {}
    }
}
