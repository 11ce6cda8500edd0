//! Tag-length-value fields of a BR Code.
//!
//! Every field is rendered as a two-digit tag, a two-digit zero-padded
//! length and the value itself. The length is derived from the value when
//! rendering, never stored, so the two cannot disagree.

use crate::error::{PixError, Result};
use std::fmt;

/// Largest value length a two-digit length prefix can express.
pub const MAX_VALUE_LEN: usize = 99;

/// A single TLV element. `value` may itself be a concatenation of nested
/// fields (merchant account information, additional data).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixField {
    tag: u8,
    value: String,
}

impl PixField {
    /// Creates a field, rejecting tags above 99, non-ASCII values (whose
    /// byte and character counts differ) and values whose length does not
    /// fit in two digits.
    pub fn new(tag: u8, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if tag > 99 {
            return Err(PixError::malformed(0, format!("tag {} is not two digits", tag)));
        }
        if !value.is_ascii() {
            return Err(PixError::InvalidCharacters {
                field: "TLV value",
                value,
            });
        }
        if value.len() > MAX_VALUE_LEN {
            return Err(PixError::FieldTooLong {
                field: "TLV value",
                len: value.len(),
                max: MAX_VALUE_LEN,
            });
        }
        Ok(PixField { tag, value })
    }

    /// Builds a composite field from already-constructed nested fields.
    pub fn nested(tag: u8, children: &[PixField]) -> Result<Self> {
        Self::new(tag, encode_fields(children))
    }

    /// Numeric tag.
    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// Raw value, including any nested fields.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Length prefix as it appears on the wire.
    pub fn length(&self) -> String {
        format!("{:02}", self.value.len())
    }
}

impl fmt::Display for PixField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}{}", self.tag, self.value.len(), self.value)
    }
}

/// Concatenates fields with no separators.
pub fn encode_fields(fields: &[PixField]) -> String {
    fields.iter().map(|field| field.to_string()).collect()
}

/// Splits TLV text into its top-level fields.
///
/// `offset` is added to reported error positions so nested parses point at
/// the location within the full code.
pub fn parse_fields(input: &str, offset: usize) -> Result<Vec<PixField>> {
    if !input.is_ascii() {
        return Err(PixError::malformed(offset, "non-ASCII content"));
    }

    let bytes = input.as_bytes();
    let mut fields = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes.len() - pos < 4 {
            return Err(PixError::malformed(
                offset + pos,
                "truncated tag/length header",
            ));
        }

        let tag = parse_two_digits(&input[pos..pos + 2])
            .ok_or_else(|| PixError::malformed(offset + pos, "tag is not two digits"))?;
        let len = parse_two_digits(&input[pos + 2..pos + 4])
            .ok_or_else(|| PixError::malformed(offset + pos + 2, "length is not two digits"))?;

        let start = pos + 4;
        let end = start + len as usize;
        if end > bytes.len() {
            return Err(PixError::malformed(
                offset + pos,
                format!(
                    "field {:02} declares {} characters but only {} remain",
                    tag,
                    len,
                    bytes.len() - start
                ),
            ));
        }

        fields.push(PixField {
            tag,
            value: input[start..end].to_string(),
        });
        pos = end;
    }

    Ok(fields)
}

fn parse_two_digits(s: &str) -> Option<u8> {
    if s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}
