//! BR Code payload construction and verification.
//!
//! Builds the static PIX subset of EMV Merchant Presented Mode:
//!
//! | Tag | Field                          | Value                         |
//! |-----|--------------------------------|-------------------------------|
//! | 00  | Payload format indicator       | `01`                          |
//! | 01  | Point of initiation method     | `12`                          |
//! | 26  | Merchant account information   | `00` GUI, `01` PIX key        |
//! | 52  | Merchant category code         | `0000`                        |
//! | 53  | Transaction currency           | `986` (BRL)                   |
//! | 54  | Transaction amount             | `12.34`                       |
//! | 58  | Country code                   | `BR`                          |
//! | 59  | Merchant name                  | up to 25 chars                |
//! | 60  | Merchant city                  | up to 15 chars                |
//! | 62  | Additional data field template | `05` reference (txid)         |
//! | 63  | CRC16                          | 4 uppercase hex digits        |
//!
//! The field order is fixed; receiving apps reject reordered payloads.

use crate::amount::Amount;
use crate::crc;
use crate::error::{PixError, Result};
use crate::key::PixKey;
use crate::merchant::Merchant;
use crate::tlv::{self, PixField};
use log::debug;
use std::str::FromStr;

pub const TAG_PAYLOAD_FORMAT: u8 = 0;
pub const TAG_INITIATION_METHOD: u8 = 1;
pub const TAG_MERCHANT_ACCOUNT: u8 = 26;
pub const TAG_CATEGORY_CODE: u8 = 52;
pub const TAG_CURRENCY: u8 = 53;
pub const TAG_AMOUNT: u8 = 54;
pub const TAG_COUNTRY: u8 = 58;
pub const TAG_MERCHANT_NAME: u8 = 59;
pub const TAG_MERCHANT_CITY: u8 = 60;
pub const TAG_ADDITIONAL_DATA: u8 = 62;
pub const TAG_CRC: u8 = 63;

const SUBTAG_GUI: u8 = 0;
const SUBTAG_KEY: u8 = 1;
const SUBTAG_REFERENCE: u8 = 5;

const PAYLOAD_FORMAT: &str = "01";
/// Static code: the same payload can be scanned any number of times.
const STATIC_INITIATION: &str = "12";
const PIX_GUI: &str = "br.gov.bcb.pix";
const CATEGORY_UNCLASSIFIED: &str = "0000";
const CURRENCY_BRL: &str = "986";
const COUNTRY_BR: &str = "BR";

/// Tag 63 with length 04; the checksum covers this prefix.
const CRC_PREFIX: &str = "6304";
const CRC_LEN: usize = 4;

/// Reference used when the caller has no transaction identifier.
pub const EMPTY_REFERENCE: &str = "***";

/// Longest reference accepted in the additional data field.
pub const MAX_REFERENCE_LEN: usize = 25;

/// Tags in the order they appear in every emitted code.
pub const FIELD_ORDER: [u8; 11] = [
    TAG_PAYLOAD_FORMAT,
    TAG_INITIATION_METHOD,
    TAG_MERCHANT_ACCOUNT,
    TAG_CATEGORY_CODE,
    TAG_CURRENCY,
    TAG_AMOUNT,
    TAG_COUNTRY,
    TAG_MERCHANT_NAME,
    TAG_MERCHANT_CITY,
    TAG_ADDITIONAL_DATA,
    TAG_CRC,
];

/// Ordered fields of a BR Code, everything before the CRC field.
///
/// A payload is immutable once built; [`PixPayload::encode`] appends the
/// checksum and yields the final text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixPayload {
    fields: Vec<PixField>,
}

impl PixPayload {
    /// Assembles the fields for one payment request.
    pub fn new(merchant: &Merchant, amount: Amount, reference: &str) -> Result<Self> {
        let reference = format_reference(reference)?;

        let account = PixField::nested(
            TAG_MERCHANT_ACCOUNT,
            &[
                PixField::new(SUBTAG_GUI, PIX_GUI)?,
                PixField::new(SUBTAG_KEY, merchant.pix_key().as_str())?,
            ],
        )?;
        let additional = PixField::nested(
            TAG_ADDITIONAL_DATA,
            &[PixField::new(SUBTAG_REFERENCE, reference)?],
        )?;

        let fields = vec![
            PixField::new(TAG_PAYLOAD_FORMAT, PAYLOAD_FORMAT)?,
            PixField::new(TAG_INITIATION_METHOD, STATIC_INITIATION)?,
            account,
            PixField::new(TAG_CATEGORY_CODE, CATEGORY_UNCLASSIFIED)?,
            PixField::new(TAG_CURRENCY, CURRENCY_BRL)?,
            PixField::new(TAG_AMOUNT, amount.to_string())?,
            PixField::new(TAG_COUNTRY, COUNTRY_BR)?,
            PixField::new(TAG_MERCHANT_NAME, merchant.name())?,
            PixField::new(TAG_MERCHANT_CITY, merchant.city())?,
            additional,
        ];

        Ok(PixPayload { fields })
    }

    /// Fields in emission order, excluding the CRC field.
    pub fn fields(&self) -> &[PixField] {
        &self.fields
    }

    /// Renders the fields, appends `6304` and the checksum over all of it.
    pub fn encode(&self) -> String {
        let mut code = tlv::encode_fields(&self.fields);
        code.push_str(CRC_PREFIX);
        let checksum = compute_crc(&code);
        code.push_str(&checksum);
        code
    }
}

/// Builds a complete static BR Code for `amount` payable to `merchant`.
///
/// Deterministic: identical inputs always produce the identical string.
///
/// # Errors
///
/// - [`PixError::FieldTooLong`] if the formatted reference exceeds 25
///   characters or a composed field exceeds 99
///
/// Amount, key, name and city are validated when their types are built.
pub fn build_pix_code(merchant: &Merchant, amount: Amount, reference: &str) -> Result<String> {
    let code = PixPayload::new(merchant, amount, reference)?.encode();
    debug!(
        "Built BR Code for {} key, amount {}, {} chars",
        merchant.pix_key().kind(),
        amount,
        code.len()
    );
    Ok(code)
}

/// CRC16/CCITT-FALSE of `payload` as 4 uppercase hex digits.
///
/// `payload` is expected to end with the `6304` prefix.
pub fn compute_crc(payload: &str) -> String {
    crc::to_hex(crc::crc16_ccitt(payload.as_bytes()))
}

/// Drops everything but ASCII letters and digits; an empty result becomes
/// `***`. Overlong references are rejected, not truncated.
pub fn format_reference(reference: &str) -> Result<String> {
    let formatted: String = reference
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    if formatted.is_empty() {
        return Ok(EMPTY_REFERENCE.to_string());
    }
    if formatted.len() > MAX_REFERENCE_LEN {
        return Err(PixError::FieldTooLong {
            field: "reference",
            len: formatted.len(),
            max: MAX_REFERENCE_LEN,
        });
    }
    Ok(formatted)
}

/// A verified BR Code, decoded back into its variable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrCode {
    pub pix_key: PixKey,
    pub merchant_name: String,
    pub merchant_city: String,
    pub amount: Amount,
    pub reference: String,
}

impl BrCode {
    /// Parses and verifies a BR Code produced by this encoder.
    ///
    /// Checks the checksum first, then the TLV structure, the tag order and
    /// every fixed value. The decoded key, amount, name and city go through
    /// the same validation the encoder applies.
    pub fn parse(code: &str) -> Result<Self> {
        let code = code.trim();
        if !code.is_ascii() {
            return Err(PixError::malformed(0, "non-ASCII content"));
        }
        if code.len() < CRC_PREFIX.len() + CRC_LEN {
            return Err(PixError::malformed(0, "too short to hold a checksum"));
        }

        let split = code.len() - CRC_LEN;
        let (signed, found) = code.split_at(split);
        if !signed.ends_with(CRC_PREFIX) {
            return Err(PixError::malformed(
                split - CRC_PREFIX.len(),
                "missing 6304 checksum field",
            ));
        }
        if !found.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PixError::malformed(split, "checksum is not hexadecimal"));
        }

        let expected = compute_crc(signed);
        if !expected.eq_ignore_ascii_case(found) {
            return Err(PixError::ChecksumMismatch {
                expected,
                found: found.to_string(),
            });
        }

        let fields = tlv::parse_fields(code, 0)?;
        let tags: Vec<u8> = fields.iter().map(PixField::tag).collect();
        if tags != FIELD_ORDER {
            return Err(PixError::malformed(
                0,
                format!("unexpected field order {:?}", tags),
            ));
        }

        // Offsets of each value, for error positions in nested fields.
        let mut offsets = Vec::with_capacity(fields.len());
        let mut pos = 0;
        for field in &fields {
            offsets.push(pos + 4);
            pos += 4 + field.value().len();
        }

        expect_value(&fields[0], offsets[0], PAYLOAD_FORMAT)?;
        expect_value(&fields[1], offsets[1], STATIC_INITIATION)?;
        expect_value(&fields[3], offsets[3], CATEGORY_UNCLASSIFIED)?;
        expect_value(&fields[4], offsets[4], CURRENCY_BRL)?;
        expect_value(&fields[6], offsets[6], COUNTRY_BR)?;

        let account = tlv::parse_fields(fields[2].value(), offsets[2])?;
        let gui = subfield(&account, SUBTAG_GUI, offsets[2])?;
        if !gui.eq_ignore_ascii_case(PIX_GUI) {
            return Err(PixError::malformed(
                offsets[2],
                format!("unknown GUI '{}'", gui),
            ));
        }
        let pix_key = PixKey::parse(subfield(&account, SUBTAG_KEY, offsets[2])?)?;

        let amount = Amount::from_str(fields[5].value())?;
        let merchant = Merchant::new(pix_key, fields[7].value(), fields[8].value())?;

        let additional = tlv::parse_fields(fields[9].value(), offsets[9])?;
        let reference = subfield(&additional, SUBTAG_REFERENCE, offsets[9])?.to_string();

        Ok(BrCode {
            pix_key: merchant.pix_key().clone(),
            merchant_name: merchant.name().to_string(),
            merchant_city: merchant.city().to_string(),
            amount,
            reference,
        })
    }
}

impl FromStr for BrCode {
    type Err = PixError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        BrCode::parse(s)
    }
}

fn expect_value(field: &PixField, offset: usize, expected: &str) -> Result<()> {
    if field.value() == expected {
        Ok(())
    } else {
        Err(PixError::malformed(
            offset,
            format!(
                "field {:02} is '{}', expected '{}'",
                field.tag(),
                field.value(),
                expected
            ),
        ))
    }
}

fn subfield(fields: &[PixField], tag: u8, offset: usize) -> Result<&str> {
    fields
        .iter()
        .find(|f| f.tag() == tag)
        .map(PixField::value)
        .ok_or_else(|| PixError::malformed(offset, format!("missing sub-field {:02}", tag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: &str = "00020101021226360014br.gov.bcb.pix0114+5511998008397\
                            520400005303986540525.505802BR5923NICOLLY ASCIONE SALOMAO\
                            6009SAO PAULO62200516COOKITIE1234567863040548";

    fn merchant() -> Merchant {
        Merchant::new(
            PixKey::parse("+5511998008397").unwrap(),
            "NICOLLY ASCIONE SALOMAO",
            "SAO PAULO",
        )
        .unwrap()
    }

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_builds_known_code() {
        let code = build_pix_code(&merchant(), amount("25.50"), "COOKITIE12345678").unwrap();
        assert_eq!(code, EXPECTED);
    }

    #[test]
    fn test_payload_fields_in_order() {
        let payload = PixPayload::new(&merchant(), amount("25.50"), "X1").unwrap();
        let tags: Vec<u8> = payload.fields().iter().map(|f| f.tag()).collect();
        assert_eq!(tags, FIELD_ORDER[..10].to_vec());
    }

    #[test]
    fn test_compute_crc_over_prefix() {
        let signed = &EXPECTED[..EXPECTED.len() - 4];
        assert_eq!(compute_crc(signed), "0548");
    }

    #[test]
    fn test_format_reference() {
        assert_eq!(format_reference("COOKITIE-1234_56").unwrap(), "COOKITIE123456");
        assert_eq!(format_reference("").unwrap(), "***");
        assert_eq!(format_reference("--").unwrap(), "***");
        assert_eq!(format_reference(&"A".repeat(25)).unwrap().len(), 25);
        assert!(matches!(
            format_reference(&"A".repeat(26)),
            Err(PixError::FieldTooLong {
                field: "reference",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_reference_uses_placeholder() {
        let code = build_pix_code(&merchant(), amount("1"), "").unwrap();
        assert!(code.contains("62070503***6304"));
    }

    #[test]
    fn test_parse_recovers_inputs() {
        let decoded = BrCode::parse(EXPECTED).unwrap();
        assert_eq!(decoded.pix_key.as_str(), "+5511998008397");
        assert_eq!(decoded.merchant_name, "NICOLLY ASCIONE SALOMAO");
        assert_eq!(decoded.merchant_city, "SAO PAULO");
        assert_eq!(decoded.amount, amount("25.50"));
        assert_eq!(decoded.reference, "COOKITIE12345678");
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let padded = format!("  {}\n", EXPECTED);
        assert_eq!(BrCode::parse(&padded).unwrap().reference, "COOKITIE12345678");
    }

    #[test]
    fn test_parse_keeps_placeholder_reference() {
        let code = build_pix_code(&merchant(), amount("10"), "").unwrap();
        assert_eq!(BrCode::parse(&code).unwrap().reference, EMPTY_REFERENCE);
    }

    #[test]
    fn test_parse_detects_corruption() {
        let corrupted = EXPECTED.replace("25.50", "26.50");
        assert!(matches!(
            BrCode::parse(&corrupted),
            Err(PixError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_missing_crc_field() {
        assert!(matches!(
            BrCode::parse("000201"),
            Err(PixError::Malformed { .. })
        ));
        assert!(matches!(
            BrCode::parse("0002016304ZZZZ"),
            Err(PixError::Malformed { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_reordered_fields() {
        // Country code moved before currency, checksum recomputed.
        let body = "00020101021226360014br.gov.bcb.pix0114+5511998008397\
                    520400005802BR5303986540525.505923NICOLLY ASCIONE SALOMAO\
                    6009SAO PAULO62200516COOKITIE123456786304";
        let code = format!("{}{}", body, compute_crc(body));
        match BrCode::parse(&code) {
            Err(PixError::Malformed { message, .. }) => assert!(message.contains("order")),
            other => panic!("Expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_dynamic_initiation() {
        let body = "00020101021126360014br.gov.bcb.pix0114+5511998008397\
                    520400005303986540525.505802BR5923NICOLLY ASCIONE SALOMAO\
                    6009SAO PAULO62200516COOKITIE123456786304";
        let code = format!("{}{}", body, compute_crc(body));
        assert!(matches!(
            BrCode::parse(&code),
            Err(PixError::Malformed { position: 10, .. })
        ));
    }
}
