//! Resource bounds applied while decoding and verifying.

/// Default maximum nesting depth of constructed DER values.
///
/// Each compound fulfillment level uses two constructed levels (the variant
/// body and the wrapper around its children), so the default admits sixteen
/// levels of nested prefix or threshold fulfillments.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Default maximum size of a single encoded condition or fulfillment.
pub const DEFAULT_MAX_ENCODED_LEN: usize = 64 * 1024;

/// Default maximum number of branches (fulfilled and unfulfilled) in one threshold.
pub const DEFAULT_MAX_FAN_OUT: usize = 256;

/// Default maximum preimage length, in bytes.
pub const DEFAULT_MAX_PREIMAGE_LEN: usize = 128;

/// Resource bounds for a single decode or verification call.
///
/// Every bound is checked before the work it guards is done, so exceeding
/// one is a deterministic [`SizeLimitExceeded`] rejection rather than
/// unbounded allocation or recursion.
///
/// ```
/// use crypto_conditions::Limits;
///
/// let strict = Limits::default().with_max_depth(8).with_max_fan_out(16);
/// assert_eq!(strict.max_depth(), 8);
/// assert_eq!(strict.max_preimage_len(), 128);
/// ```
///
/// [`SizeLimitExceeded`]: crate::ErrorKind::SizeLimitExceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Limits {
    max_depth: usize,
    max_encoded_len: usize,
    max_fan_out: usize,
    max_preimage_len: usize,
}

impl Limits {
    /// Limits with the protocol defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_encoded_len: DEFAULT_MAX_ENCODED_LEN,
            max_fan_out: DEFAULT_MAX_FAN_OUT,
            max_preimage_len: DEFAULT_MAX_PREIMAGE_LEN,
        }
    }

    /// Maximum nesting depth of constructed DER values.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Maximum size of an encoded condition or fulfillment, in bytes.
    #[must_use]
    pub const fn max_encoded_len(&self) -> usize {
        self.max_encoded_len
    }

    /// Maximum number of branches in a threshold.
    #[must_use]
    pub const fn max_fan_out(&self) -> usize {
        self.max_fan_out
    }

    /// Maximum preimage length, in bytes.
    #[must_use]
    pub const fn max_preimage_len(&self) -> usize {
        self.max_preimage_len
    }

    /// Replace the maximum nesting depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Replace the maximum encoded size.
    #[must_use]
    pub const fn with_max_encoded_len(mut self, max_encoded_len: usize) -> Self {
        self.max_encoded_len = max_encoded_len;
        self
    }

    /// Replace the maximum threshold fan-out.
    #[must_use]
    pub const fn with_max_fan_out(mut self, max_fan_out: usize) -> Self {
        self.max_fan_out = max_fan_out;
        self
    }

    /// Replace the maximum preimage length.
    #[must_use]
    pub const fn with_max_preimage_len(mut self, max_preimage_len: usize) -> Self {
        self.max_preimage_len = max_preimage_len;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_constants() {
        let limits = Limits::default();
        assert_eq!(limits.max_depth(), DEFAULT_MAX_DEPTH);
        assert_eq!(limits.max_encoded_len(), DEFAULT_MAX_ENCODED_LEN);
        assert_eq!(limits.max_fan_out(), DEFAULT_MAX_FAN_OUT);
        assert_eq!(limits.max_preimage_len(), DEFAULT_MAX_PREIMAGE_LEN);
    }

    #[test]
    fn setters_only_touch_their_field() {
        let limits = Limits::new().with_max_encoded_len(10);
        assert_eq!(limits.max_encoded_len(), 10);
        assert_eq!(limits.with_max_encoded_len(DEFAULT_MAX_ENCODED_LEN), Limits::new());
    }
}
