//! Batch encoding of orders into BR Codes.
//!
//! Reads a CSV of orders in streaming fashion and keeps one encoded row per
//! accepted order. Output preserves input order.

use crate::brcode::{build_pix_code, EMPTY_REFERENCE};
use crate::error::{PixError, Result};
use crate::merchant::Merchant;
use crate::order::{EncodedOrder, OrderRecord, ParsedOrder};
use csv::{ReaderBuilder, Trim, Writer};
use log::{debug, warn};
use std::collections::HashSet;
use std::io::{Read, Write};

/// Encodes orders for a single merchant.
///
/// # Duplicate References
///
/// A reference seen earlier in the batch is skipped, since two different
/// amounts under the same txid would be ambiguous to reconcile. Orders
/// without a reference (`***`) are never considered duplicates.
pub struct BatchEncoder {
    merchant: Merchant,

    /// Encoded rows in input order.
    encoded: Vec<EncodedOrder>,

    /// References already encoded.
    seen: HashSet<String>,
}

impl BatchEncoder {
    /// Creates an empty batch for `merchant`.
    pub fn new(merchant: Merchant) -> Self {
        BatchEncoder {
            merchant,
            encoded: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Processes orders from a CSV reader with header `reference,amount`.
    ///
    /// Invalid rows are logged at warn level and skipped.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<OrderRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => {
                    if let Err(e) = record
                        .parse(row_num)
                        .and_then(|order| self.process_order(order, row_num))
                    {
                        warn!("Row {}: {}", row_num, e);
                    }
                }
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(())
    }

    /// Encodes a single parsed order.
    pub fn process_order(&mut self, order: ParsedOrder, row: usize) -> Result<()> {
        if order.reference != EMPTY_REFERENCE && self.seen.contains(&order.reference) {
            return Err(PixError::InvalidRecord {
                row,
                message: format!("duplicate reference {}", order.reference),
            });
        }

        let brcode = build_pix_code(&self.merchant, order.amount, &order.reference)?;
        debug!(
            "Row {}: Encoded {} for reference {}",
            row, order.amount, order.reference
        );

        self.seen.insert(order.reference.clone());
        self.encoded.push(EncodedOrder {
            reference: order.reference,
            amount: order.amount,
            brcode,
        });

        Ok(())
    }

    /// Encoded rows so far, in input order.
    pub fn encoded(&self) -> &[EncodedOrder] {
        &self.encoded
    }

    /// Writes `reference,amount,brcode` rows to the given writer.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = Writer::from_writer(writer);

        if self.encoded.is_empty() {
            csv_writer.write_record(["reference", "amount", "brcode"])?;
        }
        for order in &self.encoded {
            csv_writer.serialize(order)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
