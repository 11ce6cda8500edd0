//! PIX BR Code CLI
//!
//! Encodes a CSV of orders into BR Codes for the configured merchant, or
//! verifies a single BR Code.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- encode orders.csv > codes.csv
//! cargo run -- verify '000201010212...6304ABCD'
//! ```
//!
//! # Configuration
//!
//! The merchant is read from `pix.toml` in the working directory and from
//! `PIX_MERCHANT__PIX_KEY`, `PIX_MERCHANT__NAME` and `PIX_MERCHANT__CITY`.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use pix_brcode::{BatchEncoder, BrCode, PixError, Result, Settings};
use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).ok_or(PixError::MissingArgument)?;
    let operand = args.get(2).ok_or(PixError::MissingArgument)?;

    match command.as_str() {
        "encode" => encode(operand),
        "verify" => verify(operand),
        _ => Err(PixError::MissingArgument),
    }
}

fn encode(input_path: &str) -> Result<()> {
    let merchant = Settings::new()?.merchant()?;

    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let mut batch = BatchEncoder::new(merchant);
    batch.process_csv(reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    batch.write_output(handle)?;

    Ok(())
}

fn verify(code: &str) -> Result<()> {
    let decoded = BrCode::parse(code)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "pix_key: {}", decoded.pix_key)?;
    writeln!(handle, "key_type: {}", decoded.pix_key.kind())?;
    writeln!(handle, "merchant_name: {}", decoded.merchant_name)?;
    writeln!(handle, "merchant_city: {}", decoded.merchant_city)?;
    writeln!(handle, "amount: {}", decoded.amount)?;
    writeln!(handle, "reference: {}", decoded.reference)?;

    Ok(())
}
