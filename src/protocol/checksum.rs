//! Frame checksum.
//!
//! The checksum covers `message_type | format | data`, with both integers in
//! big-endian order, exactly as they appear on the wire after the `crc`
//! field. The default algorithm is CRC-16/CCITT-FALSE (poly `0x1021`,
//! init `0xFFFF`, no reflection, no final xor).

use crc::{Crc, CRC_16_IBM_3740};

/// Checksum algorithm used to seal and verify frames.
///
/// Implemented as a marker type with a static method so the reassembler can
/// select the algorithm at compile time.
pub trait Checksum {
    /// Compute the checksum for a frame body.
    fn checksum(message_type: u16, format: u16, data: &[u8]) -> u16;
}

/// CRC-16/CCITT-FALSE.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc16;

/// CRC-16/IBM-3740 is the catalogue name for CCITT-FALSE.
const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

impl Crc16 {
    /// CRC over a single contiguous slice.
    pub fn compute(bytes: &[u8]) -> u16 {
        CRC16.checksum(bytes)
    }
}

impl Checksum for Crc16 {
    fn checksum(message_type: u16, format: u16, data: &[u8]) -> u16 {
        let mut digest = CRC16.digest();
        digest.update(&message_type.to_be_bytes());
        digest.update(&format.to_be_bytes());
        digest.update(data);
        digest.finalize()
    }
}
