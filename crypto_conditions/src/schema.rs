//! Field layouts of the five condition types.
//!
//! Every type is described by a [`TypeSchema`]: three ordered lists of
//! [`Field`]s for its condition body, fulfillment body, and fingerprint
//! contents. The codec never hard-codes a tag number. It walks a layout with
//! a [`FieldReader`] or [`FieldWriter`], which take each field's tag from the
//! table. Field order is fixed, and is part of what makes an encoding
//! canonical.
//!
//! ```text
//! ┌─────┬───────────────────┬──────────────────────────┬──────────────────────────────────────────────┐
//! │ Tag │ Type              │ Condition body           │ Fulfillment body                             │
//! ├─────┼───────────────────┼──────────────────────────┼──────────────────────────────────────────────┤
//! │  0  │ preimage-sha-256  │ fingerprint, cost        │ preimage                                     │
//! │  1  │ prefix-sha-256    │ fingerprint, cost, subt. │ prefix, maxMessageLength, subfulfillment     │
//! │  2  │ threshold-sha-256 │ fingerprint, cost, subt. │ subfulfillments (SET), subconditions (SET)   │
//! │  3  │ rsa-sha-256       │ fingerprint, cost        │ modulus, signature                           │
//! │  4  │ ed25519-sha-256   │ fingerprint, cost        │ publicKey (32), signature (64)               │
//! └─────┴───────────────────┴──────────────────────────┴──────────────────────────────────────────────┘
//! ```

use alloc::vec::Vec;

use crate::{
    condition_type::ConditionType,
    der::{Class, Decode, Encode, Reader, Tag, Writer},
    error::DecodeError,
    fingerprint::Fingerprint,
    primitives::{ED25519_PUBLIC_KEY_LEN, ED25519_SIGNATURE_LEN},
};

/// What a field holds, which determines how it is read and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// An octet string, optionally of a fixed length.
    OctetString {
        /// Required length, if fixed.
        len: Option<usize>,
    },
    /// An unsigned integer up to `u32::MAX`.
    Integer,
    /// The five-bit subtypes list.
    BitString,
    /// One fulfillment, explicitly wrapped.
    Fulfillment,
    /// One condition, explicitly wrapped.
    Condition,
    /// `SET OF` fulfillments.
    FulfillmentSet,
    /// `SET OF` conditions.
    ConditionSet,
}

impl FieldKind {
    /// Whether the field's own TLV is constructed.
    #[must_use]
    pub const fn is_constructed(self) -> bool {
        !matches!(
            self,
            Self::OctetString { .. } | Self::Integer | Self::BitString
        )
    }
}

/// One field of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name, used in errors and descriptions.
    pub name: &'static str,
    /// Context-specific tag number.
    pub number: u32,
    /// What the field holds.
    pub kind: FieldKind,
}

impl Field {
    const fn new(name: &'static str, number: u32, kind: FieldKind) -> Self {
        Self { name, number, kind }
    }

    /// The field's tag.
    #[must_use]
    pub const fn tag(&self) -> Tag {
        Tag::new(Class::ContextSpecific, self.kind.is_constructed(), self.number)
    }
}

/// Layouts for one condition type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSchema {
    /// The type described.
    pub condition_type: ConditionType,
    /// Fields of the condition body.
    pub condition: &'static [Field],
    /// Fields of the fulfillment body.
    pub fulfillment: &'static [Field],
    /// Fields of the `SEQUENCE` hashed into the fingerprint. Empty when the
    /// fingerprint is taken over raw bytes instead.
    pub fingerprint: &'static [Field],
}

const FINGERPRINT: Field = Field::new(
    "fingerprint",
    0,
    FieldKind::OctetString {
        len: Some(Fingerprint::LEN),
    },
);
const COST: Field = Field::new("cost", 1, FieldKind::Integer);
const SUBTYPES: Field = Field::new("subtypes", 2, FieldKind::BitString);

const SIMPLE_CONDITION: &[Field] = &[FINGERPRINT, COST];
const COMPOUND_CONDITION: &[Field] = &[FINGERPRINT, COST, SUBTYPES];

const ANY_LEN: FieldKind = FieldKind::OctetString { len: None };

const PUBLIC_KEY: Field = Field::new(
    "public key",
    0,
    FieldKind::OctetString {
        len: Some(ED25519_PUBLIC_KEY_LEN),
    },
);

/// Preimage: `{ preimage [0] }`, fingerprinted over the raw preimage.
pub const PREIMAGE: TypeSchema = TypeSchema {
    condition_type: ConditionType::PreimageSha256,
    condition: SIMPLE_CONDITION,
    fulfillment: &[Field::new("preimage", 0, ANY_LEN)],
    fingerprint: &[],
};

/// Prefix: the sub-fulfillment's condition takes its place in the fingerprint.
pub const PREFIX: TypeSchema = TypeSchema {
    condition_type: ConditionType::PrefixSha256,
    condition: COMPOUND_CONDITION,
    fulfillment: &[
        Field::new("prefix", 0, ANY_LEN),
        Field::new("max message length", 1, FieldKind::Integer),
        Field::new("subfulfillment", 2, FieldKind::Fulfillment),
    ],
    fingerprint: &[
        Field::new("prefix", 0, ANY_LEN),
        Field::new("max message length", 1, FieldKind::Integer),
        Field::new("subcondition", 2, FieldKind::Condition),
    ],
};

/// Threshold: the fingerprint covers the threshold and every branch's condition.
pub const THRESHOLD: TypeSchema = TypeSchema {
    condition_type: ConditionType::ThresholdSha256,
    condition: COMPOUND_CONDITION,
    fulfillment: &[
        Field::new("subfulfillments", 0, FieldKind::FulfillmentSet),
        Field::new("subconditions", 1, FieldKind::ConditionSet),
    ],
    fingerprint: &[
        Field::new("threshold", 0, FieldKind::Integer),
        Field::new("subconditions", 1, FieldKind::ConditionSet),
    ],
};

/// RSA-PSS: the fingerprint covers the modulus only.
pub const RSA: TypeSchema = TypeSchema {
    condition_type: ConditionType::RsaSha256,
    condition: SIMPLE_CONDITION,
    fulfillment: &[
        Field::new("modulus", 0, ANY_LEN),
        Field::new("signature", 1, ANY_LEN),
    ],
    fingerprint: &[Field::new("modulus", 0, ANY_LEN)],
};

/// Ed25519: the fingerprint covers the public key only.
pub const ED25519: TypeSchema = TypeSchema {
    condition_type: ConditionType::Ed25519Sha256,
    condition: SIMPLE_CONDITION,
    fulfillment: &[
        PUBLIC_KEY,
        Field::new(
            "signature",
            1,
            FieldKind::OctetString {
                len: Some(ED25519_SIGNATURE_LEN),
            },
        ),
    ],
    fingerprint: &[PUBLIC_KEY],
};

/// All layouts, indexed by tag number.
pub const SCHEMAS: [&TypeSchema; 5] = [&PREIMAGE, &PREFIX, &THRESHOLD, &RSA, &ED25519];

/// The layout of `condition_type`.
#[must_use]
pub const fn schema(condition_type: ConditionType) -> &'static TypeSchema {
    match condition_type {
        ConditionType::PreimageSha256 => &PREIMAGE,
        ConditionType::PrefixSha256 => &PREFIX,
        ConditionType::ThresholdSha256 => &THRESHOLD,
        ConditionType::RsaSha256 => &RSA,
        ConditionType::Ed25519Sha256 => &ED25519,
    }
}

/// Look up a layout by tag number.
///
/// # Errors
///
/// Returns [`DecodeError::UnsupportedType`] for any tag outside 0–4.
pub const fn lookup(tag: u32) -> Result<&'static TypeSchema, DecodeError> {
    match ConditionType::from_tag(tag) {
        Some(ty) => Ok(schema(ty)),
        None => Err(DecodeError::UnsupportedType { tag }),
    }
}

/// Read the tag of a condition or fulfillment `CHOICE` and enter its body.
///
/// # Errors
///
/// - [`DecodeError::UnexpectedChoice`] if the tag is not context-specific constructed
/// - [`DecodeError::UnsupportedType`] if the tag number is not a known type
/// - any error entering the body
pub fn read_choice<'a>(
    reader: &mut Reader<'a>,
) -> Result<(&'static TypeSchema, Reader<'a>), DecodeError> {
    let offset = reader.offset();
    let tag = reader.read_tag()?;
    if tag.class() != Class::ContextSpecific || !tag.is_constructed() {
        return Err(DecodeError::UnexpectedChoice { offset, found: tag });
    }

    let schema = lookup(tag.number())?;
    Ok((schema, reader.enter()?))
}

/// Tag of a condition or fulfillment `CHOICE` alternative.
#[must_use]
pub const fn choice_tag(condition_type: ConditionType) -> Tag {
    Tag::context_constructed(condition_type.tag())
}

/// Sentinel returned once a layout is exhausted. Its tag never matches real input.
const PAST_END: Field = Field::new("<past end of layout>", u32::MAX, FieldKind::Integer);

/// Reads the fields of a body in layout order.
#[derive(Debug)]
pub struct FieldReader<'a> {
    reader: Reader<'a>,
    layout: core::slice::Iter<'static, Field>,
}

impl<'a> FieldReader<'a> {
    /// Read `reader`'s content as `layout`.
    #[must_use]
    pub fn new(reader: Reader<'a>, layout: &'static [Field]) -> Self {
        Self {
            reader,
            layout: layout.iter(),
        }
    }

    /// The underlying reader's limits.
    #[must_use]
    pub const fn limits(&self) -> &'a crate::limits::Limits {
        self.reader.limits()
    }

    fn next_field(&mut self, kind_ok: impl FnOnce(FieldKind) -> bool) -> &'static Field {
        let field = self.layout.next().unwrap_or(&PAST_END);
        debug_assert!(kind_ok(field.kind), "layout mismatch at {}", field.name);
        field
    }

    /// Read an octet string of any length.
    ///
    /// # Errors
    ///
    /// Returns a tag or length error, or [`DecodeError::WrongLength`] if the
    /// layout fixes the length and it differs.
    pub fn octet_string(&mut self) -> Result<&'a [u8], DecodeError> {
        let field = self.next_field(|k| matches!(k, FieldKind::OctetString { .. }));
        let bytes = self.reader.read_octet_string(field.tag())?;
        match field.kind {
            FieldKind::OctetString { len: Some(len) } if len != bytes.len() => {
                Err(DecodeError::WrongLength {
                    field: field.name,
                    expected: len,
                    actual: bytes.len(),
                })
            }
            _ => Ok(bytes),
        }
    }

    /// Read a fixed-length octet string.
    ///
    /// # Errors
    ///
    /// As [`octet_string`](Self::octet_string); the length must be `N`.
    pub fn fixed_octet_string<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let bytes = self.octet_string()?;
        <[u8; N]>::try_from(bytes).map_err(|_| DecodeError::WrongLength {
            field: "fixed-length octet string",
            expected: N,
            actual: bytes.len(),
        })
    }

    /// Read an unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns any [`Reader::read_integer`] error.
    pub fn integer(&mut self) -> Result<u32, DecodeError> {
        let field = self.next_field(|k| k == FieldKind::Integer);
        self.reader.read_integer(field.tag())
    }

    /// Read the subtypes bit string.
    ///
    /// # Errors
    ///
    /// Returns any [`Reader::read_bit_string`] error.
    pub fn bit_string(&mut self) -> Result<u8, DecodeError> {
        let field = self.next_field(|k| k == FieldKind::BitString);
        self.reader.read_bit_string(field.tag())
    }

    /// Read one explicitly wrapped value.
    ///
    /// # Errors
    ///
    /// Returns any error decoding the value, or [`DecodeError::TrailingBytes`]
    /// if the wrapper holds more than one value.
    pub fn explicit<T: Decode>(&mut self) -> Result<T, DecodeError> {
        let field = self.next_field(|k| {
            matches!(k, FieldKind::Fulfillment | FieldKind::Condition)
        });
        let mut inner = self.reader.read_constructed(field.tag())?;
        let value = T::decode(&mut inner)?;
        inner.finish()?;
        Ok(value)
    }

    /// Read a `SET OF` holding at most `max_elements` values.
    ///
    /// # Errors
    ///
    /// Returns any [`Reader::read_set_of`] error.
    pub fn set_of<T: Decode>(&mut self, max_elements: usize) -> Result<Vec<T>, DecodeError> {
        let field = self.next_field(|k| {
            matches!(k, FieldKind::FulfillmentSet | FieldKind::ConditionSet)
        });
        self.reader.read_set_of(field.tag(), max_elements, T::decode)
    }

    /// Require that the body held nothing beyond the layout.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::TrailingBytes`] if bytes remain.
    pub fn finish(self) -> Result<(), DecodeError> {
        debug_assert!(self.layout.len() == 0, "layout not fully read");
        self.reader.finish()
    }
}

/// Writes the fields of a body in layout order.
#[derive(Debug)]
pub struct FieldWriter<'w> {
    writer: &'w mut Writer,
    layout: core::slice::Iter<'static, Field>,
}

impl<'w> FieldWriter<'w> {
    /// Write `layout` into `writer`.
    pub fn new(writer: &'w mut Writer, layout: &'static [Field]) -> Self {
        Self {
            writer,
            layout: layout.iter(),
        }
    }

    fn next_field(&mut self, kind_ok: impl FnOnce(FieldKind) -> bool) -> &'static Field {
        let field = self.layout.next().unwrap_or(&PAST_END);
        debug_assert!(kind_ok(field.kind), "layout mismatch at {}", field.name);
        field
    }

    /// Write an octet string.
    pub fn octet_string(&mut self, bytes: &[u8]) -> &mut Self {
        let field = self.next_field(|k| matches!(k, FieldKind::OctetString { .. }));
        self.writer.write_octet_string(field.tag(), bytes);
        self
    }

    /// Write an unsigned integer.
    pub fn integer(&mut self, value: u32) -> &mut Self {
        let field = self.next_field(|k| k == FieldKind::Integer);
        self.writer.write_integer(field.tag(), value);
        self
    }

    /// Write the subtypes bit string.
    pub fn bit_string(&mut self, bits: u8) -> &mut Self {
        let field = self.next_field(|k| k == FieldKind::BitString);
        self.writer.write_bit_string(field.tag(), bits);
        self
    }

    /// Write one explicitly wrapped value.
    pub fn explicit(&mut self, value: &impl Encode) -> &mut Self {
        let field = self.next_field(|k| {
            matches!(k, FieldKind::Fulfillment | FieldKind::Condition)
        });
        self.writer
            .write_constructed(field.tag(), |w| value.encode(w));
        self
    }

    /// Write a `SET OF`, sorted by encoding.
    pub fn set_of<'v, T: Encode + 'v>(&mut self, values: impl IntoIterator<Item = &'v T>) -> &mut Self {
        let field = self.next_field(|k| {
            matches!(k, FieldKind::FulfillmentSet | FieldKind::ConditionSet)
        });
        let elements = values.into_iter().map(Encode::to_der).collect();
        self.writer.write_set_of(field.tag(), elements);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn table_is_indexed_by_tag() {
        for (tag, schema) in (0u32..).zip(SCHEMAS) {
            assert_eq!(schema.condition_type.tag(), tag);
            assert_eq!(lookup(tag), Ok(schema));
        }
    }

    #[test]
    fn unknown_tags_are_unsupported() {
        for tag in [5, 6, 30, 31, 1000] {
            let err = lookup(tag).unwrap_err();
            assert_eq!(err, DecodeError::UnsupportedType { tag });
            assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        }
    }

    #[test]
    fn compound_types_carry_subtypes() {
        for schema in SCHEMAS {
            let has_subtypes = schema.condition.contains(&SUBTYPES);
            assert_eq!(has_subtypes, schema.condition_type.is_compound());
        }
    }

    #[test]
    fn field_numbers_are_sequential() {
        for schema in SCHEMAS {
            for layout in [schema.condition, schema.fulfillment, schema.fingerprint] {
                for (expected, field) in (0u32..).zip(layout) {
                    assert_eq!(field.number, expected, "{}", field.name);
                }
            }
        }
    }

    #[test]
    fn field_tags_reflect_form() {
        assert_eq!(FINGERPRINT.tag(), Tag::context(0));
        assert_eq!(
            THRESHOLD.fulfillment.first().map(Field::tag),
            Some(Tag::context_constructed(0))
        );
    }

    #[test]
    fn choice_rejects_universal_tags() {
        let limits = crate::limits::Limits::default();
        let input = [0x30, 0x00];
        let mut reader = Reader::new(&input, &limits).unwrap_or_else(|e| panic!("{e}"));
        let err = read_choice(&mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DerMalformed);
    }

    #[test]
    fn choice_rejects_primitive_form() {
        let limits = crate::limits::Limits::default();
        let input = [0x80, 0x00];
        let mut reader = Reader::new(&input, &limits).unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(
            read_choice(&mut reader),
            Err(DecodeError::UnexpectedChoice { offset: 0, .. })
        ));
    }
}
