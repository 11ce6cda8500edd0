//! Merchant identity embedded in every BR Code.

use crate::error::{PixError, Result};
use crate::key::PixKey;

/// Merchant identity copied into tags 26, 59 and 60.
///
/// # Invariants
///
/// - `name` is 1..=25 and `city` 1..=15 printable ASCII characters with no
///   lowercase letters, the BR Code convention for tags 59 and 60
/// - Nothing is truncated: overlong input is rejected, because banking apps
///   show these fields to the payer verbatim
///
/// Free text such as legal names with accents should go through
/// [`sanitize_text`] before reaching [`Merchant::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merchant {
    pix_key: PixKey,
    name: String,
    city: String,
}

impl Merchant {
    /// Maximum length of the merchant name field.
    pub const MAX_NAME_LEN: usize = 25;

    /// Maximum length of the merchant city field.
    pub const MAX_CITY_LEN: usize = 15;

    /// Validates and creates a merchant identity.
    pub fn new(pix_key: PixKey, name: &str, city: &str) -> Result<Self> {
        let name = checked_text("merchant name", name, Self::MAX_NAME_LEN)?;
        let city = checked_text("merchant city", city, Self::MAX_CITY_LEN)?;

        Ok(Merchant {
            pix_key,
            name,
            city,
        })
    }

    pub fn pix_key(&self) -> &PixKey {
        &self.pix_key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

fn checked_text(field: &'static str, value: &str, max: usize) -> Result<String> {
    if value.is_empty()
        || !value
            .bytes()
            .all(|b| (0x20..=0x7E).contains(&b) && !b.is_ascii_lowercase())
    {
        return Err(PixError::InvalidCharacters {
            field,
            value: value.to_string(),
        });
    }
    if value.len() > max {
        return Err(PixError::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(value.to_string())
}

/// Normalizes free text to the BR Code convention: uppercase ASCII, accents
/// folded to their base letter, other symbols dropped and whitespace runs
/// collapsed to a single space.
///
/// ```
/// use pix_brcode::sanitize_text;
///
/// assert_eq!(sanitize_text("  Nicolly Ascione Salomão "), "NICOLLY ASCIONE SALOMAO");
/// assert_eq!(sanitize_text("São Paulo"), "SAO PAULO");
/// ```
pub fn sanitize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    for c in input.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }

        let folded = match fold_accent(c) {
            Some(base) => base,
            None if c.is_ascii_alphanumeric() || is_kept_symbol(c) => c,
            None => continue,
        };

        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(folded.to_ascii_uppercase());
    }

    out
}

fn is_kept_symbol(c: char) -> bool {
    matches!(c, '.' | '-' | '&' | '\'' | '/')
}

fn fold_accent(c: char) -> Option<char> {
    let base = match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' | 'Ç' => 'C',
        'ñ' | 'Ñ' => 'N',
        _ => return None,
    };
    Some(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> PixKey {
        PixKey::parse("+5511998008397").unwrap()
    }

    #[test]
    fn test_new_accepts_uppercase_ascii() {
        let merchant = Merchant::new(phone(), "NICOLLY ASCIONE SALOMAO", "SAO PAULO").unwrap();
        assert_eq!(merchant.name(), "NICOLLY ASCIONE SALOMAO");
        assert_eq!(merchant.city(), "SAO PAULO");
        assert_eq!(merchant.pix_key().as_str(), "+5511998008397");
    }

    #[test]
    fn test_new_rejects_accented_text() {
        assert!(matches!(
            Merchant::new(phone(), "NICOLLY ASCIONE SALOMÃO", "SAO PAULO"),
            Err(PixError::InvalidCharacters {
                field: "merchant name",
                ..
            })
        ));
        assert!(matches!(
            Merchant::new(phone(), "COOKITIE", "São Paulo"),
            Err(PixError::InvalidCharacters {
                field: "merchant city",
                ..
            })
        ));
    }

    #[test]
    fn test_new_rejects_lowercase_ascii() {
        assert!(matches!(
            Merchant::new(phone(), "Cookitie", "SAO PAULO"),
            Err(PixError::InvalidCharacters {
                field: "merchant name",
                ..
            })
        ));
        assert!(matches!(
            Merchant::new(phone(), "COOKITIE", "sao paulo"),
            Err(PixError::InvalidCharacters {
                field: "merchant city",
                ..
            })
        ));
        assert!(Merchant::new(phone(), "COOKIE & CIA. 2", "SAO PAULO").is_ok());
    }

    #[test]
    fn test_new_rejects_empty_fields() {
        assert!(Merchant::new(phone(), "", "SAO PAULO").is_err());
        assert!(Merchant::new(phone(), "COOKITIE", "").is_err());
    }

    #[test]
    fn test_new_rejects_overlong_instead_of_truncating() {
        assert!(matches!(
            Merchant::new(phone(), &"A".repeat(26), "SAO PAULO"),
            Err(PixError::FieldTooLong {
                len: 26,
                max: 25,
                ..
            })
        ));
        assert!(matches!(
            Merchant::new(phone(), "COOKITIE", "SAO JOSE DOS CAMPOS"),
            Err(PixError::FieldTooLong { max: 15, .. })
        ));
        assert!(Merchant::new(phone(), &"A".repeat(25), &"B".repeat(15)).is_ok());
    }

    #[test]
    fn test_sanitize_folds_accents_and_case() {
        assert_eq!(sanitize_text("Nicolly Ascione Salomão"), "NICOLLY ASCIONE SALOMAO");
        assert_eq!(sanitize_text("Florianópolis"), "FLORIANOPOLIS");
        assert_eq!(sanitize_text("Açaí & Cia."), "ACAI & CIA.");
    }

    #[test]
    fn test_sanitize_collapses_whitespace_and_drops_symbols() {
        assert_eq!(sanitize_text("  São\t\tPaulo \n"), "SAO PAULO");
        assert_eq!(sanitize_text("Cookie™ Shop 🍪"), "COOKIE SHOP");
        assert_eq!(sanitize_text(""), "");
    }

    #[test]
    fn test_sanitized_text_is_accepted() {
        let name = sanitize_text("Nicolly Ascione Salomão");
        let city = sanitize_text("São Paulo");
        assert!(Merchant::new(phone(), &name, &city).is_ok());
    }
}
