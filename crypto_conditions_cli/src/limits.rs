//! Decoding limits shared by every command.

use crypto_conditions::{
    limits::{
        DEFAULT_MAX_DEPTH, DEFAULT_MAX_ENCODED_LEN, DEFAULT_MAX_FAN_OUT, DEFAULT_MAX_PREIMAGE_LEN,
    },
    Limits,
};

/// Resource limits applied while decoding and verifying.
#[derive(Debug, clap::Args)]
pub(crate) struct LimitArgs {
    /// Maximum nesting depth of constructed DER values
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    pub(crate) max_depth: usize,

    /// Maximum size of one encoded condition or fulfillment, in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ENCODED_LEN)]
    pub(crate) max_encoded_len: usize,

    /// Maximum number of branches in one threshold
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_FAN_OUT)]
    pub(crate) max_fan_out: usize,

    /// Maximum preimage length, in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_PREIMAGE_LEN)]
    pub(crate) max_preimage_len: usize,
}

impl LimitArgs {
    pub(crate) const fn to_limits(&self) -> Limits {
        Limits::new()
            .with_max_depth(self.max_depth)
            .with_max_encoded_len(self.max_encoded_len)
            .with_max_fan_out(self.max_fan_out)
            .with_max_preimage_len(self.max_preimage_len)
    }
}
