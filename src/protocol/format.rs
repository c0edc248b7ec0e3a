//! Package format bitfield.
//!
//! The `format` field is a 16-bit word, bit 0 being the least significant:
//!
//! ```text
//!  15  14 ........ 6  5   4   3   2   1   0
//! ┌───┬─────────────┬───────┬───┬───────────┐
//! │ACK│  reserved   │ comp  │rsv│  crypto   │
//! └───┴─────────────┴───────┴───┴───────────┘
//! ```
//!
//! Reserved bits are carried through untouched and never cause rejection.

/// Mask for the crypto type (bits 0-2).
pub const CRYPTO_MASK: u16 = 0b0000_0000_0000_0111;
/// Shift for the compress type.
pub const COMPRESS_SHIFT: u16 = 4;
/// Mask for the compress type (bits 4-5, after shifting).
pub const COMPRESS_MASK: u16 = 0b11;
/// Ack-required flag (bit 15).
pub const ACK_REQUIRED: u16 = 0b1000_0000_0000_0000;

/// Payload encryption scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CryptoType {
    None,
    Aes128,
    /// Value not defined by this protocol revision.
    Other(u8),
}

impl CryptoType {
    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => CryptoType::None,
            1 => CryptoType::Aes128,
            n => CryptoType::Other(n),
        }
    }

    fn bits(self) -> u16 {
        let raw = match self {
            CryptoType::None => 0,
            CryptoType::Aes128 => 1,
            CryptoType::Other(n) => n,
        };
        u16::from(raw) & CRYPTO_MASK
    }
}

/// Payload compression scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressType {
    None,
    Zlib,
    /// Value not defined by this protocol revision.
    Other(u8),
}

impl CompressType {
    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => CompressType::None,
            1 => CompressType::Zlib,
            n => CompressType::Other(n),
        }
    }

    fn bits(self) -> u16 {
        let raw = match self {
            CompressType::None => 0,
            CompressType::Zlib => 1,
            CompressType::Other(n) => n,
        };
        (u16::from(raw) & COMPRESS_MASK) << COMPRESS_SHIFT
    }
}

/// Decoded view of the format word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub crypto_type: CryptoType,
    pub compress_type: CompressType,
    pub ack_required: bool,
}

impl FormatInfo {
    /// True when the payload is neither encrypted nor compressed.
    #[inline]
    pub fn is_plain(&self) -> bool {
        self.crypto_type == CryptoType::None && self.compress_type == CompressType::None
    }
}

/// Raw format word as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackageFormat(pub u16);

impl PackageFormat {
    /// Plain payload, no ack requested.
    pub const PLAIN: PackageFormat = PackageFormat(0);

    /// Build a format word from its parts. Reserved bits are zero.
    pub fn new(crypto_type: CryptoType, compress_type: CompressType, ack_required: bool) -> Self {
        let mut bits = crypto_type.bits() | compress_type.bits();
        if ack_required {
            bits |= ACK_REQUIRED;
        }
        PackageFormat(bits)
    }

    /// Raw 16-bit value.
    #[inline]
    pub fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn crypto_type(self) -> CryptoType {
        CryptoType::from_bits((self.0 & CRYPTO_MASK) as u8)
    }

    #[inline]
    pub fn compress_type(self) -> CompressType {
        CompressType::from_bits(((self.0 >> COMPRESS_SHIFT) & COMPRESS_MASK) as u8)
    }

    #[inline]
    pub fn ack_required(self) -> bool {
        self.0 & ACK_REQUIRED != 0
    }

    /// Return a copy with the ack-required bit set or cleared.
    pub fn with_ack_required(self, ack_required: bool) -> Self {
        if ack_required {
            PackageFormat(self.0 | ACK_REQUIRED)
        } else {
            PackageFormat(self.0 & !ACK_REQUIRED)
        }
    }

    pub fn info(self) -> FormatInfo {
        decode_format(self.0)
    }
}

impl From<u16> for PackageFormat {
    fn from(bits: u16) -> Self {
        PackageFormat(bits)
    }
}

impl From<PackageFormat> for u16 {
    fn from(format: PackageFormat) -> Self {
        format.0
    }
}

/// Extract crypto, compression and ack fields from a raw format word.
///
/// Unknown values and reserved bits are ignored, never rejected.
pub fn decode_format(bits: u16) -> FormatInfo {
    let format = PackageFormat(bits);
    FormatInfo {
        crypto_type: format.crypto_type(),
        compress_type: format.compress_type(),
        ack_required: format.ack_required(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_format() {
        let info = decode_format(0);
        assert_eq!(info.crypto_type, CryptoType::None);
        assert_eq!(info.compress_type, CompressType::None);
        assert!(!info.ack_required);
        assert!(info.is_plain());
    }

    #[test]
    fn test_bit_positions() {
        assert_eq!(decode_format(0x0001).crypto_type, CryptoType::Aes128);
        assert_eq!(decode_format(0x0010).compress_type, CompressType::Zlib);
        assert!(decode_format(0x8000).ack_required);
    }

    #[test]
    fn test_reserved_bits_ignored() {
        // bit 3 and bits 6..15 set
        let info = decode_format(0b0111_1111_1100_1000);
        assert!(info.is_plain());
        assert!(!info.ack_required);
    }

    #[test]
    fn test_unknown_values_preserved() {
        let info = decode_format(0x0007 | 0x0030);
        assert_eq!(info.crypto_type, CryptoType::Other(7));
        assert_eq!(info.compress_type, CompressType::Other(3));
    }

    #[test]
    fn test_new_matches_wire_bits() {
        let format = PackageFormat::new(CryptoType::Aes128, CompressType::Zlib, true);
        assert_eq!(format.bits(), 0x8011);
        assert_eq!(
            format.info(),
            FormatInfo {
                crypto_type: CryptoType::Aes128,
                compress_type: CompressType::Zlib,
                ack_required: true,
            }
        );
    }

    #[test]
    fn test_with_ack_required_keeps_other_bits() {
        let format = PackageFormat(0x0041);
        assert_eq!(format.with_ack_required(true).bits(), 0x8041);
        assert_eq!(format.with_ack_required(true).with_ack_required(false).bits(), 0x0041);
    }
}
