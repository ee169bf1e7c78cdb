//! Error types for decoding and verification.
//!
//! Each error maps onto one of six terminal [`ErrorKind`]s. None of them is
//! retryable; a ledger treats every kind as a rejected fulfillment.

use thiserror::Error;

use crate::{condition_type::ConditionType, der::Tag};

/// The terminal category of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    /// Structurally invalid DER, or a structurally invalid value.
    DerMalformed,

    /// Valid DER that is not the unique canonical encoding.
    NotCanonical,

    /// A type tag outside the five supported condition types.
    UnsupportedType,

    /// A depth, size, fan-out or preimage bound was exceeded.
    SizeLimitExceeded,

    /// The fulfillment derives a different condition than the target.
    ConditionMismatch,

    /// The fulfillment matches the condition but does not validate the message.
    ValidationFailed,
}

impl ErrorKind {
    /// The kind's stable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DerMalformed => "DerMalformed",
            Self::NotCanonical => "NotCanonical",
            Self::UnsupportedType => "UnsupportedType",
            Self::SizeLimitExceeded => "SizeLimitExceeded",
            Self::ConditionMismatch => "ConditionMismatch",
            Self::ValidationFailed => "ValidationFailed",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while decoding a condition or fulfillment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input ended before a complete value was read.
    #[error("truncated input at offset {offset}: need {need} bytes, have {have}")]
    Truncated {
        /// Offset where the read was attempted.
        offset: usize,
        /// Bytes needed from the offset.
        need: usize,
        /// Bytes available from the offset.
        have: usize,
    },

    /// Indefinite-length form, which DER forbids.
    #[error("indefinite length at offset {offset}")]
    IndefiniteLength {
        /// Offset of the length octet.
        offset: usize,
    },

    /// Bytes left over after a complete value.
    #[error("{count} trailing bytes at offset {offset}")]
    TrailingBytes {
        /// Offset of the first unread byte.
        offset: usize,
        /// Number of unread bytes.
        count: usize,
    },

    /// A tag other than the one the layout requires.
    #[error("unexpected tag at offset {offset}: expected {expected}, found {found}")]
    UnexpectedTag {
        /// Offset of the tag.
        offset: usize,
        /// The tag the layout requires.
        expected: Tag,
        /// The tag found in the input.
        found: Tag,
    },

    /// A CHOICE position holding a tag of the wrong class or form.
    #[error("unexpected {found} at offset {offset} where a condition type was expected")]
    UnexpectedChoice {
        /// Offset of the tag.
        offset: usize,
        /// The tag found in the input.
        found: Tag,
    },

    /// An integer with no content octets.
    #[error("empty integer at offset {offset}")]
    EmptyInteger {
        /// Offset of the integer's content.
        offset: usize,
    },

    /// A negative integer where only unsigned values are allowed.
    #[error("negative integer at offset {offset}")]
    NegativeInteger {
        /// Offset of the integer's content.
        offset: usize,
    },

    /// An integer that does not fit in 32 bits.
    #[error("integer at offset {offset} does not fit in u32")]
    IntegerOverflow {
        /// Offset of the integer's content.
        offset: usize,
    },

    /// A bit string with an invalid size, unused-bit count or padding.
    #[error("invalid bit string at offset {offset}: {reason}")]
    InvalidBitString {
        /// Offset of the bit string's content.
        offset: usize,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A fixed-size field with the wrong number of bytes.
    #[error("{field} must be {expected} bytes, got {actual}")]
    WrongLength {
        /// Name of the field.
        field: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// A threshold fulfillment with no subfulfillments.
    #[error("threshold fulfillment has no subfulfillments")]
    EmptyThreshold,

    /// A subtypes set on a condition type that cannot have one.
    #[error("{condition_type} condition cannot carry subtypes")]
    UnexpectedSubtypes {
        /// The simple condition type.
        condition_type: ConditionType,
    },

    /// A length encoded in more octets than necessary.
    #[error("non-minimal length at offset {offset}")]
    NonMinimalLength {
        /// Offset of the length octets.
        offset: usize,
    },

    /// An integer with a redundant leading zero octet.
    #[error("non-minimal integer at offset {offset}")]
    NonMinimalInteger {
        /// Offset of the integer's content.
        offset: usize,
    },

    /// A tag number in high-tag-number form that fits the low form, or with leading zero septets.
    #[error("non-minimal tag at offset {offset}")]
    NonMinimalTag {
        /// Offset of the tag.
        offset: usize,
    },

    /// A bit string whose unused-bit count is not minimal for its value.
    #[error("non-minimal bit string at offset {offset}")]
    NonMinimalBitString {
        /// Offset of the bit string's content.
        offset: usize,
    },

    /// SET OF elements not in ascending order of their encodings.
    #[error("set elements out of order at index {index}")]
    UnsortedSet {
        /// Index of the first element that sorts before its predecessor.
        index: usize,
    },

    /// A condition type tag outside the supported set.
    #[error("unsupported condition type tag {tag}")]
    UnsupportedType {
        /// The tag number found.
        tag: u32,
    },

    /// Constructed values nested deeper than allowed.
    #[error("nesting depth exceeds maximum of {max}")]
    DepthExceeded {
        /// The configured maximum depth.
        max: usize,
    },

    /// Input larger than allowed.
    #[error("encoding is {len} bytes, max {max}")]
    TooLarge {
        /// Input length.
        len: usize,
        /// The configured maximum.
        max: usize,
    },

    /// A length field wider than four octets.
    #[error("length at offset {offset} uses {octets} octets")]
    LengthTooWide {
        /// Offset of the length octets.
        offset: usize,
        /// Number of length octets declared.
        octets: usize,
    },

    /// A threshold with more branches than allowed.
    #[error("threshold has {count} branches, max {max}")]
    FanOutExceeded {
        /// Number of branches.
        count: usize,
        /// The configured maximum.
        max: usize,
    },

    /// A preimage longer than allowed.
    #[error("preimage is {len} bytes, max {max}")]
    PreimageTooLong {
        /// Preimage length, or the cost of a preimage condition.
        len: usize,
        /// The configured maximum.
        max: usize,
    },
}

impl DecodeError {
    /// The terminal category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Truncated { .. }
            | Self::IndefiniteLength { .. }
            | Self::TrailingBytes { .. }
            | Self::UnexpectedTag { .. }
            | Self::UnexpectedChoice { .. }
            | Self::EmptyInteger { .. }
            | Self::NegativeInteger { .. }
            | Self::IntegerOverflow { .. }
            | Self::InvalidBitString { .. }
            | Self::WrongLength { .. }
            | Self::EmptyThreshold
            | Self::UnexpectedSubtypes { .. } => ErrorKind::DerMalformed,

            Self::NonMinimalLength { .. }
            | Self::NonMinimalInteger { .. }
            | Self::NonMinimalTag { .. }
            | Self::NonMinimalBitString { .. }
            | Self::UnsortedSet { .. } => ErrorKind::NotCanonical,

            Self::UnsupportedType { .. } => ErrorKind::UnsupportedType,

            Self::DepthExceeded { .. }
            | Self::TooLarge { .. }
            | Self::LengthTooWide { .. }
            | Self::FanOutExceeded { .. }
            | Self::PreimageTooLong { .. } => ErrorKind::SizeLimitExceeded,
        }
    }
}

/// Errors that can occur while verifying a fulfillment against a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// The condition or fulfillment could not be decoded, or exceeds the limits.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The fulfillment derives a different condition than the target.
    #[error("fulfillment derives a {derived} condition that does not match the target {expected} condition")]
    ConditionMismatch {
        /// Type of the target condition.
        expected: ConditionType,
        /// Type of the condition the fulfillment derives.
        derived: ConditionType,
    },

    /// The fulfillment matches the condition but rejects the message.
    #[error("{condition_type} fulfillment failed validation")]
    ValidationFailed {
        /// Type of the fulfillment.
        condition_type: ConditionType,
    },
}

impl VerifyError {
    /// The terminal category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode(err) => err.kind(),
            Self::ConditionMismatch { .. } => ErrorKind::ConditionMismatch,
            Self::ValidationFailed { .. } => ErrorKind::ValidationFailed,
        }
    }
}
