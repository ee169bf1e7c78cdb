//! The set of condition types a compound condition may require.

use crate::condition_type::ConditionType;

/// A set of [`ConditionType`]s, stored as a five-bit mask where bit `n` is
/// the type with tag `n`.
///
/// A verifier uses it to reject a condition that could require a type it
/// does not support before asking for the fulfillment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubtypeSet(u8);

const MASK: u8 = 0b1_1111;

impl SubtypeSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Build from a raw mask. Returns `None` if any bit above the five types is set.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !MASK == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Build from a raw mask, ignoring bits above the five types.
    #[must_use]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & MASK)
    }

    /// The raw mask.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether the set has no members.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether `ty` is a member.
    #[must_use]
    pub const fn contains(self, ty: ConditionType) -> bool {
        self.0 & (1 << ty as u8) != 0
    }

    /// The set with `ty` added.
    #[must_use]
    pub const fn with(self, ty: ConditionType) -> Self {
        Self(self.0 | (1 << ty as u8))
    }

    /// The set with `ty` removed.
    #[must_use]
    pub const fn without(self, ty: ConditionType) -> Self {
        Self(self.0 & !(1 << ty as u8))
    }

    /// Members of either set.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Members in tag order.
    pub fn iter(self) -> impl Iterator<Item = ConditionType> {
        ConditionType::ALL
            .into_iter()
            .filter(move |&ty| self.contains(ty))
    }
}

impl FromIterator<ConditionType> for SubtypeSet {
    fn from_iter<I: IntoIterator<Item = ConditionType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl core::fmt::Display for SubtypeSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for ty in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            first = false;
            f.write_str(ty.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{format, vec::Vec};

    #[test]
    fn bit_n_is_tag_n() {
        let set = SubtypeSet::EMPTY
            .with(ConditionType::PreimageSha256)
            .with(ConditionType::Ed25519Sha256);
        assert_eq!(set.bits(), 0b1_0001);
        assert!(set.contains(ConditionType::Ed25519Sha256));
        assert!(!set.contains(ConditionType::RsaSha256));
    }

    #[test]
    fn rejects_unknown_bits() {
        assert_eq!(SubtypeSet::from_bits(0b10_0000), None);
        assert_eq!(SubtypeSet::from_bits(0b1_1111).map(SubtypeSet::bits), Some(0b1_1111));
    }

    #[test]
    fn iterates_in_tag_order() {
        let set: SubtypeSet = [ConditionType::RsaSha256, ConditionType::PrefixSha256]
            .into_iter()
            .collect();
        let members: Vec<_> = set.iter().collect();
        assert_eq!(members, [ConditionType::PrefixSha256, ConditionType::RsaSha256]);
        assert_eq!(format!("{set}"), "prefix-sha-256,rsa-sha-256");
    }

    #[test]
    fn without_removes_only_that_type() {
        let set = SubtypeSet::from_bits(0b0_0111).unwrap_or_default();
        assert_eq!(set.without(ConditionType::ThresholdSha256).bits(), 0b0_0011);
        assert_eq!(SubtypeSet::EMPTY.without(ConditionType::ThresholdSha256), SubtypeSet::EMPTY);
    }
}
