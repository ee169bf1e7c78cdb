//! Bounds-checked DER reader.

use alloc::vec::Vec;

use super::tag::{Tag, HIGH_TAG_NUMBER};
use crate::{error::DecodeError, limits::Limits};

/// Widest length field accepted, in octets.
const MAX_LENGTH_OCTETS: usize = 4;

/// Most septets a `u32` tag number can need.
const MAX_TAG_SEPTETS: usize = 5;

/// Length octet announcing the indefinite form.
const INDEFINITE_LENGTH: u8 = 0x80;

/// A cursor over untrusted DER input.
///
/// Every read checks the remaining input before touching it, so a malformed
/// length can never cause an out-of-bounds access or an allocation larger
/// than the input. Entering a constructed value produces a child reader over
/// exactly that value's content, one level deeper; the depth is checked
/// against [`Limits::max_depth`] before the child is created.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
    base: usize,
    depth: usize,
    limits: &'a Limits,
}

impl<'a> Reader<'a> {
    /// Start reading `input`, rejecting it outright if it exceeds
    /// [`Limits::max_encoded_len`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::TooLarge`] if the input is over the size ceiling.
    pub fn new(input: &'a [u8], limits: &'a Limits) -> Result<Self, DecodeError> {
        if input.len() > limits.max_encoded_len() {
            return Err(DecodeError::TooLarge {
                len: input.len(),
                max: limits.max_encoded_len(),
            });
        }

        Ok(Self {
            input,
            pos: 0,
            base: 0,
            depth: 0,
            limits,
        })
    }

    /// Absolute offset of the cursor within the outermost input.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Number of constructed values enclosing this reader.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// The limits this reader enforces.
    #[must_use]
    pub const fn limits(&self) -> &'a Limits {
        self.limits
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.input.len().saturating_sub(self.pos)
    }

    /// Whether all input has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Require that all input has been consumed.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::TrailingBytes`] if any bytes are left.
    pub fn finish(self) -> Result<(), DecodeError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::TrailingBytes {
                offset: self.offset(),
                count: self.remaining(),
            })
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let bytes = self
            .pos
            .checked_add(n)
            .and_then(|end| self.input.get(self.pos..end))
            .ok_or(DecodeError::Truncated {
                offset: self.offset(),
                need: n,
                have: self.remaining(),
            })?;
        self.pos += n;
        Ok(bytes)
    }

    fn take_byte(&mut self) -> Result<u8, DecodeError> {
        let byte = *self.input.get(self.pos).ok_or(DecodeError::Truncated {
            offset: self.offset(),
            need: 1,
            have: 0,
        })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read identifier octets.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Truncated`] if the input ends inside the identifier
    /// - [`DecodeError::NonMinimalTag`] if the high-tag-number form is used
    ///   for a number below 31, or starts with a zero septet
    /// - [`DecodeError::IntegerOverflow`] if the tag number exceeds `u32`
    pub fn read_tag(&mut self) -> Result<Tag, DecodeError> {
        let offset = self.offset();
        let first = self.take_byte()?;
        if let Some(tag) = Tag::from_first_octet(first) {
            return Ok(tag);
        }

        let (class, constructed) = Tag::leading_bits(first);
        let mut number: u32 = 0;
        for septets in 1..=MAX_TAG_SEPTETS {
            let byte = self.take_byte()?;
            if septets == 1 && byte == 0x80 {
                return Err(DecodeError::NonMinimalTag { offset });
            }
            if number > u32::MAX >> 7 {
                return Err(DecodeError::IntegerOverflow { offset });
            }
            number = (number << 7) | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                if number < u32::from(HIGH_TAG_NUMBER) {
                    return Err(DecodeError::NonMinimalTag { offset });
                }
                return Ok(Tag::new(class, constructed, number));
            }
        }

        Err(DecodeError::IntegerOverflow { offset })
    }

    /// Read length octets, checking the length against the remaining input.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::IndefiniteLength`] for the `0x80` form
    /// - [`DecodeError::LengthTooWide`] for more than four length octets
    /// - [`DecodeError::NonMinimalLength`] for a leading zero octet or a
    ///   long form below 128
    /// - [`DecodeError::Truncated`] if the length exceeds the remaining input
    pub fn read_length(&mut self) -> Result<usize, DecodeError> {
        let offset = self.offset();
        let first = self.take_byte()?;

        let len = if first < 0x80 {
            usize::from(first)
        } else if first == INDEFINITE_LENGTH {
            return Err(DecodeError::IndefiniteLength { offset });
        } else {
            let octets = usize::from(first & 0x7F);
            if octets > MAX_LENGTH_OCTETS {
                return Err(DecodeError::LengthTooWide { offset, octets });
            }

            let bytes = self.take(octets)?;
            if bytes.first() == Some(&0) {
                return Err(DecodeError::NonMinimalLength { offset });
            }

            let len = bytes
                .iter()
                .fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
            if len < 0x80 {
                return Err(DecodeError::NonMinimalLength { offset });
            }
            len
        };

        if len > self.remaining() {
            return Err(DecodeError::Truncated {
                offset: self.offset(),
                need: len,
                have: self.remaining(),
            });
        }

        Ok(len)
    }

    /// Read a tag and require it to be `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedTag`] on mismatch, or any
    /// [`read_tag`](Self::read_tag) error.
    pub fn expect_tag(&mut self, expected: Tag) -> Result<(), DecodeError> {
        let offset = self.offset();
        let found = self.read_tag()?;
        if found == expected {
            Ok(())
        } else {
            Err(DecodeError::UnexpectedTag {
                offset,
                expected,
                found,
            })
        }
    }

    /// Read the length and content of a value whose tag was already read.
    ///
    /// Returns the content and its absolute offset.
    fn read_content(&mut self) -> Result<(&'a [u8], usize), DecodeError> {
        let len = self.read_length()?;
        let offset = self.offset();
        Ok((self.take(len)?, offset))
    }

    /// Read a primitive octet string tagged `tag`.
    ///
    /// # Errors
    ///
    /// Returns a tag, length or truncation error.
    pub fn read_octet_string(&mut self, tag: Tag) -> Result<&'a [u8], DecodeError> {
        self.expect_tag(tag)?;
        Ok(self.read_content()?.0)
    }

    /// Read an unsigned integer tagged `tag` that must fit in a `u32`.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::EmptyInteger`] if there are no content octets
    /// - [`DecodeError::NegativeInteger`] if the sign bit is set
    /// - [`DecodeError::NonMinimalInteger`] for a redundant leading zero
    /// - [`DecodeError::IntegerOverflow`] if the value exceeds `u32::MAX`
    pub fn read_integer(&mut self, tag: Tag) -> Result<u32, DecodeError> {
        self.expect_tag(tag)?;
        let (content, offset) = self.read_content()?;

        let magnitude = match content {
            [] => return Err(DecodeError::EmptyInteger { offset }),
            [first, ..] if first & 0x80 != 0 => {
                return Err(DecodeError::NegativeInteger { offset })
            }
            [0, second, ..] if second & 0x80 == 0 => {
                return Err(DecodeError::NonMinimalInteger { offset })
            }
            [0, rest @ ..] if !rest.is_empty() => rest,
            _ => content,
        };

        if magnitude.len() > 4 {
            return Err(DecodeError::IntegerOverflow { offset });
        }

        Ok(magnitude
            .iter()
            .fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
    }

    /// Read a named-bit-list bit string of at most five bits tagged `tag`.
    ///
    /// The result has bit `n` set when named bit `n` is set. The encoding is
    /// always one unused-bit count octet and one data octet, with the count
    /// between 3 and 7, zero padding, and no trailing zero bits beyond the
    /// padding (an empty list uses count 7).
    ///
    /// # Errors
    ///
    /// - [`DecodeError::InvalidBitString`] for a wrong size, an out-of-range
    ///   unused-bit count, or set padding bits
    /// - [`DecodeError::NonMinimalBitString`] if the unused-bit count is
    ///   smaller than the value allows
    pub fn read_bit_string(&mut self, tag: Tag) -> Result<u8, DecodeError> {
        self.expect_tag(tag)?;
        let (content, offset) = self.read_content()?;

        let &[unused, data] = content else {
            return Err(DecodeError::InvalidBitString {
                offset,
                reason: "expected exactly one data octet",
            });
        };
        if unused > 7 {
            return Err(DecodeError::InvalidBitString {
                offset,
                reason: "unused-bit count above 7",
            });
        }
        if unused < 3 {
            return Err(DecodeError::InvalidBitString {
                offset,
                reason: "bits set beyond the five named bits",
            });
        }
        if data & ((1u8 << unused) - 1) != 0 {
            return Err(DecodeError::InvalidBitString {
                offset,
                reason: "padding bits set",
            });
        }

        #[allow(clippy::cast_possible_truncation)] // at most 8
        let minimal = if data == 0 { 7 } else { data.trailing_zeros() as u8 };
        if unused != minimal {
            return Err(DecodeError::NonMinimalBitString { offset });
        }

        Ok(data.reverse_bits())
    }

    /// Enter the constructed value whose tag was already read.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::DepthExceeded`] if the child would be nested
    /// deeper than [`Limits::max_depth`], or a length error.
    pub fn enter(&mut self) -> Result<Reader<'a>, DecodeError> {
        let depth = self.depth + 1;
        if depth > self.limits.max_depth() {
            return Err(DecodeError::DepthExceeded {
                max: self.limits.max_depth(),
            });
        }

        let (content, offset) = self.read_content()?;
        Ok(Reader {
            input: content,
            pos: 0,
            base: offset,
            depth,
            limits: self.limits,
        })
    }

    /// Read a constructed value tagged `tag` and return a reader over its content.
    ///
    /// # Errors
    ///
    /// Returns a tag error or any [`enter`](Self::enter) error.
    pub fn read_constructed(&mut self, tag: Tag) -> Result<Reader<'a>, DecodeError> {
        self.expect_tag(tag)?;
        self.enter()
    }

    /// Read a `SET OF` tagged `tag`, decoding each element with `decode_element`.
    ///
    /// Elements must appear in ascending order of their encodings (equal
    /// encodings are allowed to repeat). At most `max_elements` are read.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::UnsortedSet`] if an element sorts before its predecessor
    /// - [`DecodeError::FanOutExceeded`] if there are more than `max_elements`
    /// - any error from reading the set or its elements
    pub fn read_set_of<T>(
        &mut self,
        tag: Tag,
        max_elements: usize,
        mut decode_element: impl FnMut(&mut Reader<'a>) -> Result<T, DecodeError>,
    ) -> Result<Vec<T>, DecodeError> {
        let mut set = self.read_constructed(tag)?;
        let mut elements = Vec::new();
        let mut previous: Option<&'a [u8]> = None;

        while !set.is_empty() {
            if elements.len() == max_elements {
                return Err(DecodeError::FanOutExceeded {
                    count: elements.len() + 1,
                    max: max_elements,
                });
            }

            let start = set.pos;
            let element = decode_element(&mut set)?;
            let encoding = set.input.get(start..set.pos).unwrap_or_default();

            if previous.is_some_and(|prev| encoding < prev) {
                return Err(DecodeError::UnsortedSet {
                    index: elements.len(),
                });
            }

            previous = Some(encoding);
            elements.push(element);
        }

        Ok(elements)
    }
}
