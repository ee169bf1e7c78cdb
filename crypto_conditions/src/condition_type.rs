//! The closed set of condition types.

/// A condition type. The discriminant is the type's DER tag number.
///
/// The order of variants is the order of their tags, which is also the
/// first key of the [`Condition`](crate::Condition) ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ConditionType {
    /// SHA-256 hashlock.
    PreimageSha256 = 0,

    /// Prepends a fixed prefix to the message before delegating.
    PrefixSha256 = 1,

    /// M-of-N over nested conditions.
    ThresholdSha256 = 2,

    /// RSA-PSS signature with SHA-256.
    RsaSha256 = 3,

    /// Ed25519 signature.
    Ed25519Sha256 = 4,
}

impl ConditionType {
    /// Every type, in tag order.
    pub const ALL: [Self; 5] = [
        Self::PreimageSha256,
        Self::PrefixSha256,
        Self::ThresholdSha256,
        Self::RsaSha256,
        Self::Ed25519Sha256,
    ];

    /// Look up a type by its DER tag number.
    #[must_use]
    pub const fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(Self::PreimageSha256),
            1 => Some(Self::PrefixSha256),
            2 => Some(Self::ThresholdSha256),
            3 => Some(Self::RsaSha256),
            4 => Some(Self::Ed25519Sha256),
            _ => None,
        }
    }

    /// The DER tag number.
    #[must_use]
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// Whether conditions of this type carry a subtypes set.
    #[must_use]
    pub const fn is_compound(self) -> bool {
        matches!(self, Self::PrefixSha256 | Self::ThresholdSha256)
    }

    /// The registered type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PreimageSha256 => "preimage-sha-256",
            Self::PrefixSha256 => "prefix-sha-256",
            Self::ThresholdSha256 => "threshold-sha-256",
            Self::RsaSha256 => "rsa-sha-256",
            Self::Ed25519Sha256 => "ed25519-sha-256",
        }
    }
}

impl core::fmt::Display for ConditionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for ty in ConditionType::ALL {
            assert_eq!(ConditionType::from_tag(ty.tag()), Some(ty));
        }
        assert_eq!(ConditionType::from_tag(5), None);
        assert_eq!(ConditionType::from_tag(u32::MAX), None);
    }

    #[test]
    fn only_prefix_and_threshold_are_compound() {
        let compound: alloc::vec::Vec<_> = ConditionType::ALL
            .into_iter()
            .filter(|ty| ty.is_compound())
            .collect();
        assert_eq!(
            compound,
            [ConditionType::PrefixSha256, ConditionType::ThresholdSha256]
        );
    }
}
