//! CRC16/CCITT-FALSE checksum used in the trailing `63` field.
//!
//! Initial register `0xFFFF`, polynomial `0x1021`, no reflection and no
//! final XOR. Inputs are at most a few hundred bytes, so the bitwise loop
//! is used instead of a lookup table.

const INITIAL: u16 = 0xFFFF;
const POLYNOMIAL: u16 = 0x1021;

/// Computes the CRC16/CCITT-FALSE register over `data`.
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc = INITIAL;

    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
    }

    crc
}

/// Renders a checksum as 4 uppercase, zero-padded hex digits.
pub fn to_hex(crc: u16) -> String {
    format!("{:04X}", crc)
}
