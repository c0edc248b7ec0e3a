//! Wire format encoding and decoding.
//!
//! Implements the 12-byte fixed header that precedes every payload:
//! ```text
//! ┌────────────┬──────────┬──────────┬──────────────┬──────────┐
//! │ Sentinel   │ Size     │ CRC      │ Message type │ Format   │
//! │ 4 bytes    │ 2 bytes  │ 2 bytes  │ 2 bytes      │ 2 bytes  │
//! │ AA 55 AA 55│ uint16 BE│ uint16 BE│ uint16 BE    │ uint16 BE│
//! └────────────┴──────────┴──────────┴──────────────┴──────────┘
//! ```
//!
//! All multi-byte integers are Big Endian.

use super::format::PackageFormat;

/// Frame start sentinel.
pub const HEADER_VALUE: u32 = 0xAA55_AA55;

/// Sentinel as it appears on the wire.
pub const SENTINEL: [u8; SENTINEL_LEN] = HEADER_VALUE.to_be_bytes();

/// Sentinel length in bytes.
pub const SENTINEL_LEN: usize = 4;

/// Fixed header size in bytes (sentinel included).
pub const HEADER_SIZE: usize = 12;

/// Largest payload the 16-bit size field can describe.
pub const ABSOLUTE_MAX_PAYLOAD_SIZE: u16 = u16::MAX;

/// Default payload ceiling applied by the reassembler.
pub const DEFAULT_MAX_PAYLOAD_SIZE: u16 = 4096;

/// Decoded fixed header.
///
/// The sentinel is implied: [`Header::decode`] only succeeds on bytes that
/// start with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Payload length in bytes.
    pub size: u16,
    /// Checksum over message type, format and payload.
    pub crc: u16,
    /// Command identifier.
    pub message_type: u16,
    /// Crypto / compression / ack bitfield.
    pub format: PackageFormat,
}

impl Header {
    pub fn new(size: u16, crc: u16, message_type: u16, format: PackageFormat) -> Self {
        Self {
            size,
            crc,
            message_type,
            format,
        }
    }

    /// Encode header to bytes (Big Endian), sentinel included.
    ///
    /// # Example
    ///
    /// ```
    /// use maxpb::protocol::{Header, PackageFormat};
    ///
    /// let header = Header::new(2, 0xBEEF, 0x0001, PackageFormat::PLAIN);
    /// let bytes = header.encode();
    /// assert_eq!(&bytes[..4], &[0xAA, 0x55, 0xAA, 0x55]);
    /// assert_eq!(bytes.len(), 12);
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        self.encode_into(&mut buf);
        buf
    }

    /// Encode header into an existing buffer.
    ///
    /// # Panics
    ///
    /// Panics if buffer is smaller than `HEADER_SIZE` (12 bytes).
    pub fn encode_into(&self, buf: &mut [u8]) {
        debug_assert!(buf.len() >= HEADER_SIZE);
        buf[0..4].copy_from_slice(&SENTINEL);
        buf[4..6].copy_from_slice(&self.size.to_be_bytes());
        buf[6..8].copy_from_slice(&self.crc.to_be_bytes());
        buf[8..10].copy_from_slice(&self.message_type.to_be_bytes());
        buf[10..12].copy_from_slice(&self.format.bits().to_be_bytes());
    }

    /// Decode header from bytes (Big Endian).
    ///
    /// Returns `None` if the buffer is too short or does not start with the
    /// sentinel.
    ///
    /// # Example
    ///
    /// ```
    /// use maxpb::protocol::Header;
    ///
    /// let bytes = [0xAA, 0x55, 0xAA, 0x55, 0, 2, 0x12, 0x34, 0, 1, 0x80, 0];
    /// let header = Header::decode(&bytes).unwrap();
    /// assert_eq!(header.size, 2);
    /// assert_eq!(header.crc, 0x1234);
    /// assert_eq!(header.message_type, 1);
    /// assert!(header.format.ack_required());
    /// ```
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_SIZE || buf[..SENTINEL_LEN] != SENTINEL[..] {
            return None;
        }
        Some(Self::decode_fields(buf))
    }

    /// Decode the fields after the sentinel without checking it.
    pub(crate) fn decode_fields(buf: &[u8]) -> Self {
        Self {
            size: u16::from_be_bytes([buf[4], buf[5]]),
            crc: u16::from_be_bytes([buf[6], buf[7]]),
            message_type: u16::from_be_bytes([buf[8], buf[9]]),
            format: PackageFormat(u16::from_be_bytes([buf[10], buf[11]])),
        }
    }

    /// Total encoded frame length (header + payload).
    #[inline]
    pub fn frame_len(&self) -> usize {
        HEADER_SIZE + self.size as usize
    }
}

/// Outcome of validating a received frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameValidity {
    Valid,
    /// Start bytes are not the sentinel.
    MissingSentinel,
    SizeOutOfBounds,
    ChecksumMismatch,
}

impl FrameValidity {
    #[inline]
    pub fn is_valid(self) -> bool {
        self == FrameValidity::Valid
    }
}

/// Validate the raw fields of a frame.
///
/// Checks run in wire order: sentinel, size, checksum.
pub fn validate(
    raw_header: u32,
    size: u16,
    crc: u16,
    computed_crc: u16,
    max_size: u16,
) -> FrameValidity {
    match validate_header(raw_header, size, max_size) {
        FrameValidity::Valid if crc != computed_crc => FrameValidity::ChecksumMismatch,
        validity => validity,
    }
}

/// The checks of [`validate`] that need only the fixed header.
pub fn validate_header(raw_header: u32, size: u16, max_size: u16) -> FrameValidity {
    if raw_header != HEADER_VALUE {
        FrameValidity::MissingSentinel
    } else if size > max_size {
        FrameValidity::SizeOutOfBounds
    } else {
        FrameValidity::Valid
    }
}

/// First four bytes of `buf` as the big-endian sentinel word.
#[inline]
pub(crate) fn read_header_value(buf: &[u8]) -> u32 {
    u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]])
}
