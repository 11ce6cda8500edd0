//! # PIX BR Code
//!
//! Encoder and verifier for static PIX payment codes (BR Code, the EMV
//! Merchant Presented Mode subset used by Brazilian banking apps).
//!
//! ## Design Principles
//!
//! - **Pure codec**: building and verifying codes has no I/O and no state
//! - **Fixed-point amounts**: 2 decimal places via `rust_decimal`
//! - **Derived lengths**: TLV length prefixes are computed, never stored
//! - **No silent truncation**: overlong name, city or reference is an error
//!
//! ## Example
//!
//! ```
//! use pix_brcode::{build_pix_code, Amount, BrCode, Merchant, PixKey};
//! use std::str::FromStr;
//!
//! let key = PixKey::parse("+5511998008397").unwrap();
//! let merchant = Merchant::new(key, "NICOLLY ASCIONE SALOMAO", "SAO PAULO").unwrap();
//! let amount = Amount::from_str("25.50").unwrap();
//!
//! let code = build_pix_code(&merchant, amount, "COOKITIE12345678").unwrap();
//! assert!(code.ends_with("63040548"));
//!
//! let decoded = BrCode::parse(&code).unwrap();
//! assert_eq!(decoded.amount, amount);
//! ```

pub mod amount;
pub mod batch;
pub mod brcode;
pub mod crc;
pub mod error;
pub mod key;
pub mod merchant;
pub mod order;
pub mod settings;
pub mod tlv;

pub use amount::Amount;
pub use batch::BatchEncoder;
pub use brcode::{build_pix_code, compute_crc, format_reference, BrCode, PixPayload};
pub use error::{PixError, Result};
pub use key::PixKey;
pub use merchant::{sanitize_text, Merchant};
pub use order::{EncodedOrder, OrderRecord, ParsedOrder};
pub use settings::Settings;
pub use tlv::PixField;
