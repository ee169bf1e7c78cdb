//! Minimal-form DER writer.

use alloc::vec::Vec;

use super::tag::Tag;

/// Accumulates DER output, always in the unique minimal form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// An empty writer.
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer and return its output.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Write identifier octets.
    pub fn write_tag(&mut self, tag: Tag) {
        tag.encode(&mut self.buf);
    }

    /// Write length octets: short form below 128, otherwise the fewest
    /// big-endian octets.
    pub fn write_length(&mut self, len: usize) {
        if len < 0x80 {
            #[allow(clippy::cast_possible_truncation)] // len < 128
            self.buf.push(len as u8);
            return;
        }

        let bytes = len.to_be_bytes();
        let skip = bytes.iter().take_while(|&&b| b == 0).count();
        let significant = bytes.get(skip..).unwrap_or_default();

        #[allow(clippy::cast_possible_truncation)] // at most size_of::<usize>()
        self.buf.push(0x80 | significant.len() as u8);
        self.buf.extend_from_slice(significant);
    }

    /// Write a complete TLV with the given content.
    pub fn write_tlv(&mut self, tag: Tag, content: &[u8]) {
        self.write_tag(tag);
        self.write_length(content.len());
        self.buf.extend_from_slice(content);
    }

    /// Write an octet string.
    pub fn write_octet_string(&mut self, tag: Tag, bytes: &[u8]) {
        self.write_tlv(tag, bytes);
    }

    /// Write an unsigned integer in the fewest two's-complement octets.
    pub fn write_integer(&mut self, tag: Tag, value: u32) {
        let bytes = value.to_be_bytes();
        let skip = bytes
            .iter()
            .take_while(|&&b| b == 0)
            .count()
            .min(bytes.len() - 1);
        let significant = bytes.get(skip..).unwrap_or_default();

        self.write_tag(tag);
        if significant.first().is_some_and(|b| b & 0x80 != 0) {
            self.write_length(significant.len() + 1);
            self.buf.push(0);
        } else {
            self.write_length(significant.len());
        }
        self.buf.extend_from_slice(significant);
    }

    /// Write a named-bit-list bit string where bit `n` of `bits` is named bit `n`.
    ///
    /// Only the low five bits are meaningful. Trailing zero bits are dropped;
    /// an empty list is written with one zero data octet and seven unused bits.
    pub fn write_bit_string(&mut self, tag: Tag, bits: u8) {
        let data = (bits & 0x1F).reverse_bits();
        #[allow(clippy::cast_possible_truncation)] // at most 8
        let unused = if data == 0 { 7 } else { data.trailing_zeros() as u8 };
        self.write_tlv(tag, &[unused, data]);
    }

    /// Write a constructed value whose content is produced by `content`.
    pub fn write_constructed(&mut self, tag: Tag, content: impl FnOnce(&mut Writer)) {
        let mut inner = Writer::new();
        content(&mut inner);
        self.write_tlv(tag, &inner.buf);
    }

    /// Write a `SET OF` from already-encoded elements, sorted ascending by
    /// their encodings.
    pub fn write_set_of(&mut self, tag: Tag, mut elements: Vec<Vec<u8>>) {
        elements.sort_unstable();
        self.write_constructed(tag, |w| {
            for element in &elements {
                w.buf.extend_from_slice(element);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn written(f: impl FnOnce(&mut Writer)) -> Vec<u8> {
        let mut w = Writer::new();
        f(&mut w);
        w.into_bytes()
    }

    #[test]
    fn lengths_use_fewest_octets() {
        assert_eq!(written(|w| w.write_length(0)), [0x00]);
        assert_eq!(written(|w| w.write_length(127)), [0x7F]);
        assert_eq!(written(|w| w.write_length(128)), [0x81, 0x80]);
        assert_eq!(written(|w| w.write_length(255)), [0x81, 0xFF]);
        assert_eq!(written(|w| w.write_length(256)), [0x82, 0x01, 0x00]);
        assert_eq!(written(|w| w.write_length(65_536)), [0x83, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn integers_are_minimal_and_unsigned() {
        let tag = Tag::context(1);
        assert_eq!(written(|w| w.write_integer(tag, 0)), [0x81, 0x01, 0x00]);
        assert_eq!(written(|w| w.write_integer(tag, 127)), [0x81, 0x01, 0x7F]);
        assert_eq!(written(|w| w.write_integer(tag, 128)), [0x81, 0x02, 0x00, 0x80]);
        assert_eq!(
            written(|w| w.write_integer(tag, 131_072)),
            [0x81, 0x03, 0x02, 0x00, 0x00]
        );
        assert_eq!(
            written(|w| w.write_integer(tag, u32::MAX)),
            [0x81, 0x05, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn bit_strings_drop_trailing_zero_bits() {
        let tag = Tag::context(2);
        assert_eq!(written(|w| w.write_bit_string(tag, 0)), [0x82, 0x02, 0x07, 0x00]);
        assert_eq!(written(|w| w.write_bit_string(tag, 0b0_0001)), [0x82, 0x02, 0x07, 0x80]);
        assert_eq!(written(|w| w.write_bit_string(tag, 0b1_0000)), [0x82, 0x02, 0x03, 0x08]);
        assert_eq!(written(|w| w.write_bit_string(tag, 0b1_1001)), [0x82, 0x02, 0x03, 0x98]);
    }

    #[test]
    fn set_of_sorts_by_encoding() {
        let out = written(|w| {
            w.write_set_of(
                Tag::context_constructed(1),
                vec![vec![0x80, 0x02, 0x00, 0x00], vec![0x80, 0x01, 0x01]],
            );
        });
        assert_eq!(out, [0xA1, 0x07, 0x80, 0x01, 0x01, 0x80, 0x02, 0x00, 0x00]);
    }

    #[test]
    fn nested_constructed_lengths() {
        let out = written(|w| {
            w.write_constructed(Tag::context_constructed(0), |w| {
                w.write_constructed(Tag::context_constructed(1), |w| {
                    w.write_octet_string(Tag::context(0), &[0xAB; 130]);
                });
            });
        });
        assert_eq!(out.get(..8), Some(&[0xA0, 0x81, 0x88, 0xA1, 0x81, 0x85, 0x80, 0x81][..]));
        assert_eq!(out.len(), 3 + 3 + 3 + 130);
    }
}
