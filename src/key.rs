//! PIX key classification.
//!
//! The encoder embeds the key text unchanged; classification only decides
//! whether the text is something a receiving bank could resolve.

use crate::error::{PixError, Result};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Longest email address accepted as a PIX key.
const MAX_EMAIL_LEN: usize = 77;

/// A PIX key, tagged with the pattern it was recognized as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PixKey {
    /// E-mail address.
    Email(String),

    /// Individual tax ID, 11 digits.
    Cpf(String),

    /// Company tax ID, 14 digits.
    Cnpj(String),

    /// `+` followed by country code, area code and number.
    Phone(String),

    /// Random (EVP) key, a hyphenated UUID.
    Random(String),
}

impl PixKey {
    /// Classifies `raw`, rejecting anything that matches no key pattern.
    ///
    /// Surrounding whitespace is trimmed; nothing else is rewritten.
    pub fn parse(raw: &str) -> Result<Self> {
        let key = raw.trim();

        if key.contains('@') {
            if is_email(key) {
                return Ok(PixKey::Email(key.to_string()));
            }
        } else if let Some(digits) = key.strip_prefix('+') {
            if (8..=15).contains(&digits.len()) && all_digits(digits) {
                return Ok(PixKey::Phone(key.to_string()));
            }
        } else if all_digits(key) && key.len() == 11 {
            if has_valid_cpf_digits(key) {
                return Ok(PixKey::Cpf(key.to_string()));
            }
        } else if all_digits(key) && key.len() == 14 {
            if has_valid_cnpj_digits(key) {
                return Ok(PixKey::Cnpj(key.to_string()));
            }
        } else if key.len() == 36 && Uuid::parse_str(key).is_ok() {
            return Ok(PixKey::Random(key.to_string()));
        }

        Err(PixError::UnsupportedKeyType(key.to_string()))
    }

    /// The key text as embedded in the merchant account field.
    pub fn as_str(&self) -> &str {
        match self {
            PixKey::Email(k)
            | PixKey::Cpf(k)
            | PixKey::Cnpj(k)
            | PixKey::Phone(k)
            | PixKey::Random(k) => k,
        }
    }

    /// Short lowercase name of the key type, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PixKey::Email(_) => "email",
            PixKey::Cpf(_) => "cpf",
            PixKey::Cnpj(_) => "cnpj",
            PixKey::Phone(_) => "phone",
            PixKey::Random(_) => "random",
        }
    }
}

impl FromStr for PixKey {
    type Err = PixError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PixKey::parse(s)
    }
}

impl fmt::Display for PixKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_email(s: &str) -> bool {
    if s.len() > MAX_EMAIL_LEN || !s.is_ascii() || s.bytes().any(|b| b.is_ascii_whitespace()) {
        return false;
    }

    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn digits_of(s: &str) -> Vec<u32> {
    s.bytes().map(|b| u32::from(b - b'0')).collect()
}

/// Mod-11 check digit with the given weights.
fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let rem = sum % 11;
    if rem < 2 {
        0
    } else {
        11 - rem
    }
}

fn has_valid_cpf_digits(s: &str) -> bool {
    let d = digits_of(s);
    // Repeated-digit sequences pass the checksum but are never issued.
    if d.iter().all(|&x| x == d[0]) {
        return false;
    }
    let first = check_digit(&d[..9], &[10, 9, 8, 7, 6, 5, 4, 3, 2]);
    let second = check_digit(&d[..10], &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
    d[9] == first && d[10] == second
}

fn has_valid_cnpj_digits(s: &str) -> bool {
    let d = digits_of(s);
    if d.iter().all(|&x| x == d[0]) {
        return false;
    }
    let first = check_digit(&d[..12], &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    let second = check_digit(&d[..13], &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    d[12] == first && d[13] == second
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_phone() {
        let key = PixKey::parse("+5511998008397").unwrap();
        assert_eq!(key, PixKey::Phone("+5511998008397".to_string()));
        assert_eq!(key.kind(), "phone");
    }

    #[test]
    fn test_parse_email() {
        let key = PixKey::parse("  pedidos@cookitie.com.br ").unwrap();
        assert_eq!(key.as_str(), "pedidos@cookitie.com.br");
        assert_eq!(key.kind(), "email");
    }

    #[test]
    fn test_parse_cpf_and_cnpj() {
        assert_eq!(
            PixKey::parse("52998224725").unwrap(),
            PixKey::Cpf("52998224725".to_string())
        );
        assert_eq!(
            PixKey::parse("11222333000181").unwrap(),
            PixKey::Cnpj("11222333000181".to_string())
        );
    }

    #[test]
    fn test_rejects_bad_check_digits() {
        assert!(matches!(
            PixKey::parse("52998224724"),
            Err(PixError::UnsupportedKeyType(_))
        ));
        assert!(PixKey::parse("11222333000180").is_err());
        assert!(PixKey::parse("11111111111").is_err());
    }

    #[test]
    fn test_parse_random_key() {
        let key = PixKey::parse("123E4567-E89B-12D3-A456-426614174000").unwrap();
        assert_eq!(key.kind(), "random");
        assert_eq!(key.as_str(), "123E4567-E89B-12D3-A456-426614174000");
    }

    #[test]
    fn test_rejects_unrecognized_keys() {
        for raw in [
            "",
            "hello",
            "@cookitie.com",
            "pedidos@cookitie",
            "a@b@c.com",
            "+55 11 99800 8397",
            "+123",
            "123456789",
            "123e4567e89b12d3a456426614174000",
        ] {
            assert!(
                matches!(PixKey::parse(raw), Err(PixError::UnsupportedKeyType(_))),
                "expected rejection for {:?}",
                raw
            );
        }
    }
}
