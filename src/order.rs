//! Order models for CSV parsing and encoded output.

use crate::amount::Amount;
use crate::brcode::format_reference;
use crate::error::{PixError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Raw order record as read from CSV.
///
/// Fields are kept as strings so that a bad amount can be reported with
/// its row instead of failing deserialization of the whole record.
#[derive(Debug, Deserialize)]
pub struct OrderRecord {
    /// Transaction identifier, used as the BR Code txid
    pub reference: String,

    /// Amount in reais, e.g. `25.50`
    pub amount: Option<String>,
}

impl OrderRecord {
    /// Parses the raw CSV record into a validated order.
    pub fn parse(&self, row: usize) -> Result<ParsedOrder> {
        let reference = format_reference(&self.reference).map_err(|e| PixError::InvalidRecord {
            row,
            message: e.to_string(),
        })?;

        let raw_amount = self
            .amount
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PixError::InvalidRecord {
                row,
                message: "missing amount".to_string(),
            })?;

        let amount = Amount::from_str(raw_amount).map_err(|e| PixError::InvalidRecord {
            row,
            message: e.to_string(),
        })?;

        Ok(ParsedOrder { reference, amount })
    }
}

/// A parsed and validated order ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOrder {
    /// Formatted reference, `***` when the input had none
    pub reference: String,

    pub amount: Amount,
}

/// One output row: the order and its BR Code.
#[derive(Debug, Clone, Serialize)]
pub struct EncodedOrder {
    pub reference: String,
    pub amount: Amount,
    pub brcode: String,
}
