//! Merchant configuration.
//!
//! The merchant identity is never compiled in. It is read from an optional
//! TOML file and overridden by `PIX_MERCHANT__*` environment variables.

use crate::error::Result;
use crate::key::PixKey;
use crate::merchant::{sanitize_text, Merchant};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "pix.toml";

/// The `[merchant]` table, as raw configured text.
#[derive(Debug, Clone, Deserialize)]
pub struct MerchantSettings {
    /// PIX key; classified when [`Settings::merchant`] is called
    pub pix_key: String,

    /// Legal name, may contain accents and lowercase letters
    pub name: String,

    /// City, may contain accents and lowercase letters
    pub city: String,
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub merchant: MerchantSettings,
}

impl Settings {
    /// Loads `pix.toml` if present, overridden by `PIX_MERCHANT__*` variables.
    pub fn new() -> Result<Self> {
        Self::from_file(DEFAULT_CONFIG_FILE)
    }

    /// Loads `path` if it exists, then applies the environment overrides.
    ///
    /// The file format is taken from the extension. A missing file is not an
    /// error; a missing `[merchant]` table after both sources is.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("PIX")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Builds the validated merchant identity. Name and city are sanitized
    /// first, so legal names can be configured with accents.
    pub fn merchant(&self) -> Result<Merchant> {
        let key = PixKey::parse(&self.merchant.pix_key)?;
        Merchant::new(
            key,
            &sanitize_text(&self.merchant.name),
            &sanitize_text(&self.merchant.city),
        )
    }
}
