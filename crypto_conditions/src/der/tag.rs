//! DER identifier octets.

use alloc::vec::Vec;

/// The class bits of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Class {
    /// Built-in ASN.1 types (`SEQUENCE`, `INTEGER`, ...).
    Universal,
    /// Application-wide types.
    Application,
    /// Tags assigned within an enclosing type, as automatic tagging does.
    ContextSpecific,
    /// Private-use types.
    Private,
}

impl Class {
    const fn from_bits(byte: u8) -> Self {
        match byte >> 6 {
            0 => Self::Universal,
            1 => Self::Application,
            2 => Self::ContextSpecific,
            _ => Self::Private,
        }
    }

    const fn bits(self) -> u8 {
        match self {
            Self::Universal => 0x00,
            Self::Application => 0x40,
            Self::ContextSpecific => 0x80,
            Self::Private => 0xC0,
        }
    }
}

/// A decoded identifier: class, primitive/constructed form and tag number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    class: Class,
    constructed: bool,
    number: u32,
}

/// Constructed bit of the identifier octet.
pub(crate) const CONSTRUCTED_BIT: u8 = 0x20;

/// Low tag-number bits signalling the high-tag-number form.
pub(crate) const HIGH_TAG_NUMBER: u8 = 0x1F;

impl Tag {
    /// Universal constructed `SEQUENCE` (`0x30`).
    pub const SEQUENCE: Self = Self::new(Class::Universal, true, 16);

    /// Build a tag from its parts.
    #[must_use]
    pub const fn new(class: Class, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    /// Context-specific primitive tag `[number]`.
    #[must_use]
    pub const fn context(number: u32) -> Self {
        Self::new(Class::ContextSpecific, false, number)
    }

    /// Context-specific constructed tag `[number]`.
    #[must_use]
    pub const fn context_constructed(number: u32) -> Self {
        Self::new(Class::ContextSpecific, true, number)
    }

    /// Parse the first identifier octet. Returns `None` when the
    /// high-tag-number form follows.
    pub(crate) const fn from_first_octet(byte: u8) -> Option<Self> {
        if byte & HIGH_TAG_NUMBER == HIGH_TAG_NUMBER {
            None
        } else {
            Some(Self::new(
                Class::from_bits(byte),
                byte & CONSTRUCTED_BIT != 0,
                (byte & HIGH_TAG_NUMBER) as u32,
            ))
        }
    }

    /// Class and form bits of the first identifier octet.
    pub(crate) const fn leading_bits(byte: u8) -> (Class, bool) {
        (Class::from_bits(byte), byte & CONSTRUCTED_BIT != 0)
    }

    /// The tag's class.
    #[must_use]
    pub const fn class(&self) -> Class {
        self.class
    }

    /// Whether the value is constructed (contains nested TLVs).
    #[must_use]
    pub const fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// The tag number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Append the identifier octets.
    pub fn encode(&self, out: &mut Vec<u8>) {
        let mut first = self.class.bits();
        if self.constructed {
            first |= CONSTRUCTED_BIT;
        }

        if self.number < u32::from(HIGH_TAG_NUMBER) {
            #[allow(clippy::cast_possible_truncation)] // number < 31
            out.push(first | self.number as u8);
            return;
        }

        out.push(first | HIGH_TAG_NUMBER);
        let septets = (32 - self.number.leading_zeros()).div_ceil(7);
        for i in (0..septets).rev() {
            #[allow(clippy::cast_possible_truncation)] // masked to 7 bits
            let septet = ((self.number >> (7 * i)) & 0x7F) as u8;
            out.push(if i == 0 { septet } else { septet | 0x80 });
        }
    }
}

impl core::fmt::Display for Tag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let form = if self.constructed {
            "constructed"
        } else {
            "primitive"
        };
        match self.class {
            Class::Universal => write!(f, "UNIVERSAL {} ({form})", self.number),
            Class::Application => write!(f, "APPLICATION {} ({form})", self.number),
            Class::ContextSpecific => write!(f, "[{}] ({form})", self.number),
            Class::Private => write!(f, "PRIVATE {} ({form})", self.number),
        }
    }
}
