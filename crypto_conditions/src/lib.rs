//! Crypto-conditions for conditional ledger payments.
//!
//! A [`Condition`] is a compact commitment stored in ledger state: a type
//! tag, a 32-byte SHA-256 fingerprint, a verification cost and, for compound
//! types, the set of types it may transitively require. A [`Fulfillment`] is
//! the evidence presented later to release the payment. It either satisfies
//! the condition directly (a preimage or a signature) or composes other
//! fulfillments (prefix-wrapped, or M-of-N threshold).
//!
//! # Verification
//!
//! ```text
//! condition bytes ──from_der──► Condition ─────────────────────────┐
//!                                                                  ▼
//! fulfillment bytes ──from_der──► Fulfillment ──condition()──► equal? ──no──► ConditionMismatch
//!                                      │                           │
//!                                      │                          yes
//!                                      ▼                           ▼
//!                                  validate(message) ──false──► ValidationFailed
//!                                      │
//!                                    true
//!                                      ▼
//!                                 Verified { cost }
//! ```
//!
//! # Wire format
//!
//! Both conditions and fulfillments are ASN.1 DER with automatic tagging.
//! Decoding is strict: any input that is not the unique canonical encoding
//! of its value is rejected, so a decoded value always re-encodes to the
//! bytes it came from. Resource use while decoding is bounded by [`Limits`].
//!
//! # Example
//!
//! ```
//! use crypto_conditions::{verify, Fulfill, Fulfillment, PreimageSha256};
//!
//! let fulfillment = Fulfillment::from(PreimageSha256::new(b"open sesame".to_vec()));
//! let condition = fulfillment.condition();
//!
//! let verified = verify(&condition, &fulfillment, b"any message").unwrap();
//! assert_eq!(verified.cost(), 11);
//! ```
//!
//! # Crate Organization
//!
//! - [`der`]: Bounds-checked DER reader and minimal-form writer
//! - [`schema`]: Per-type field layout consumed by the codec
//! - [`condition`]: The [`Condition`] value type
//! - [`fulfillment`]: The five fulfillment variants
//! - [`verify`](mod@verify): The verification entry points
//! - [`primitives`]: SHA-256, Ed25519 and RSA-PSS collaborators

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub mod condition;
pub mod condition_type;
pub mod der;
pub mod error;
pub mod fingerprint;
pub mod fulfillment;
pub mod hex;
pub mod limits;
pub mod primitives;
pub mod schema;
pub mod subtypes;
pub mod verify;

pub use condition::Condition;
pub use condition_type::ConditionType;
pub use error::{DecodeError, ErrorKind, VerifyError};
pub use fingerprint::Fingerprint;
pub use fulfillment::{
    ed25519::Ed25519Sha256, prefix::PrefixSha256, preimage::PreimageSha256, rsa::RsaSha256,
    threshold::ThresholdSha256, Fulfill, Fulfillment,
};
pub use limits::Limits;
pub use subtypes::SubtypeSet;
pub use verify::{matches, verify, verify_der, verify_der_with_limits, verify_with_limits, Verified};
