//! Cryptographic primitives consumed by the fulfillment types.
//!
//! These are thin, total wrappers: every malformed key or signature is a
//! `false` result, never an error or a panic.

use rsa::{pss, signature::Verifier, BigUint, RsaPublicKey};
use sha2::{Digest, Sha256};

/// Smallest accepted RSA modulus, in bytes (1024 bits).
pub const RSA_MIN_MODULUS_LEN: usize = 128;

/// Largest accepted RSA modulus, in bytes (4096 bits).
pub const RSA_MAX_MODULUS_LEN: usize = 512;

/// The only accepted RSA public exponent.
pub const RSA_PUBLIC_EXPONENT: u32 = 65_537;

/// Length of an Ed25519 public key, in bytes.
pub const ED25519_PUBLIC_KEY_LEN: usize = 32;

/// Length of an Ed25519 signature, in bytes.
pub const ED25519_SIGNATURE_LEN: usize = 64;

/// SHA-256 of `data`.
#[must_use]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Strict Ed25519 verification of `signature` over `message`.
///
/// Rejects non-canonical points and small-order keys.
#[must_use]
pub fn ed25519_verify(
    public_key: &[u8; ED25519_PUBLIC_KEY_LEN],
    signature: &[u8; ED25519_SIGNATURE_LEN],
    message: &[u8],
) -> bool {
    let Ok(key) = ed25519_dalek::VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let signature = ed25519_dalek::Signature::from_bytes(signature);
    key.verify_strict(message, &signature).is_ok()
}

/// RSA-PSS verification with SHA-256, MGF1-SHA-256 and a 32-byte salt.
///
/// The modulus must be 128 to 512 bytes with a non-zero leading byte, the
/// exponent is fixed at 65537, and the signature must be exactly as long as
/// the modulus.
#[must_use]
pub fn rsa_verify(modulus: &[u8], signature: &[u8], message: &[u8]) -> bool {
    if !(RSA_MIN_MODULUS_LEN..=RSA_MAX_MODULUS_LEN).contains(&modulus.len())
        || modulus.first() == Some(&0)
        || signature.len() != modulus.len()
    {
        return false;
    }

    let n = BigUint::from_bytes_be(modulus);
    let e = BigUint::from(RSA_PUBLIC_EXPONENT);
    let Ok(key) = RsaPublicKey::new(n, e) else {
        return false;
    };
    let Ok(signature) = pss::Signature::try_from(signature) else {
        return false;
    };

    pss::VerifyingKey::<Sha256>::new(key)
        .verify(message, &signature)
        .is_ok()
}
