//! Frame struct with typed accessors.
//!
//! A frame is a fixed [`Header`] plus a separately owned payload. The two are
//! joined only when encoding for the wire. Uses `bytes::Bytes` for zero-copy
//! payload sharing.
//!
//! # Example
//!
//! ```
//! use maxpb::protocol::{CommandCode, Frame, PackageFormat};
//!
//! let frame = Frame::new(CommandCode::Position, PackageFormat::PLAIN, &b"hi"[..]).unwrap();
//!
//! assert_eq!(frame.message_type(), 0x0001);
//! assert_eq!(frame.payload(), b"hi");
//! assert_eq!(frame.encode().len(), 12 + 2);
//! ```

use bytes::Bytes;

use super::checksum::{Checksum, Crc16};
use super::command::CommandCode;
use super::format::{CompressType, CryptoType, FormatInfo, PackageFormat};
use super::wire_format::{Header, ABSOLUTE_MAX_PAYLOAD_SIZE, HEADER_SIZE};
use crate::codec::PayloadCodec;
use crate::error::{MaxPbError, Result};

/// A complete, checksummed protocol frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Decoded header.
    pub header: Header,
    /// Payload bytes (zero-copy via `bytes::Bytes`).
    pub payload: Bytes,
}

impl Frame {
    /// Build a frame, filling in `size` and a CRC-16 checksum.
    ///
    /// Fails if the payload does not fit the 16-bit size field.
    pub fn new(
        message_type: impl Into<u16>,
        format: PackageFormat,
        payload: impl Into<Bytes>,
    ) -> Result<Self> {
        Self::with_checksum::<Crc16>(message_type.into(), format, payload.into())
    }

    /// Build a frame sealed with a specific checksum algorithm.
    pub fn with_checksum<C: Checksum>(
        message_type: u16,
        format: PackageFormat,
        payload: Bytes,
    ) -> Result<Self> {
        let size = u16::try_from(payload.len()).map_err(|_| MaxPbError::PayloadTooLarge {
            size: payload.len(),
            max: ABSOLUTE_MAX_PAYLOAD_SIZE as usize,
        })?;
        let crc = C::checksum(message_type, format.bits(), &payload);
        Ok(Self {
            header: Header::new(size, crc, message_type, format),
            payload,
        })
    }

    /// Assemble a frame from an already decoded header and payload.
    ///
    /// No validation is performed; the reassembler uses this after it has
    /// checked size and checksum.
    pub fn from_parts(header: Header, payload: Bytes) -> Self {
        Self { header, payload }
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get a clone of the payload as Bytes (cheap, zero-copy).
    #[inline]
    pub fn payload_bytes(&self) -> Bytes {
        self.payload.clone()
    }

    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Raw command identifier.
    #[inline]
    pub fn message_type(&self) -> u16 {
        self.header.message_type
    }

    /// Command identifier resolved against the command table.
    pub fn command(&self) -> Result<CommandCode> {
        CommandCode::try_from(self.header.message_type)
    }

    #[inline]
    pub fn format(&self) -> PackageFormat {
        self.header.format
    }

    #[inline]
    pub fn format_info(&self) -> FormatInfo {
        self.header.format.info()
    }

    #[inline]
    pub fn crypto_type(&self) -> CryptoType {
        self.header.format.crypto_type()
    }

    #[inline]
    pub fn compress_type(&self) -> CompressType {
        self.header.format.compress_type()
    }

    /// Check if the sender expects an ack.
    #[inline]
    pub fn ack_required(&self) -> bool {
        self.header.format.ack_required()
    }

    #[inline]
    pub fn crc(&self) -> u16 {
        self.header.crc
    }

    /// Run the payload through a codec (decrypt and/or decompress).
    pub fn decoded_payload<P: PayloadCodec + ?Sized>(&self, codec: &P) -> Result<Bytes> {
        codec.decode(self.format_info(), self.payload.clone())
    }

    /// Encode header and payload into one contiguous buffer.
    pub fn encode(&self) -> Vec<u8> {
        build_frame(&self.header, &self.payload)
    }
}

/// Build a complete frame as a single byte vector.
///
/// Encodes header and appends payload into a contiguous buffer. The header
/// is written as given; use [`Frame::new`] to compute size and checksum.
pub fn build_frame(header: &Header, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&header.encode());
    buf.extend_from_slice(payload);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RawCodec;

    #[test]
    fn test_frame_creation() {
        let frame = Frame::new(CommandCode::Status, PackageFormat::PLAIN, &b"hello"[..]).unwrap();

        assert_eq!(frame.message_type(), 0x0011);
        assert_eq!(frame.command().unwrap(), CommandCode::Status);
        assert_eq!(frame.header.size, 5);
        assert_eq!(frame.payload(), b"hello");
        assert_eq!(frame.payload_len(), 5);
        assert_eq!(frame.crc(), Crc16::checksum(0x0011, 0, b"hello"));
    }

    #[test]
    fn test_frame_empty_payload() {
        let frame = Frame::new(CommandCode::KeepAlive, PackageFormat::PLAIN, Bytes::new()).unwrap();

        assert_eq!(frame.header.size, 0);
        assert!(frame.payload().is_empty());
        assert_eq!(frame.encode().len(), HEADER_SIZE);
    }

    #[test]
    fn test_frame_format_accessors() {
        let format = PackageFormat::new(CryptoType::Aes128, CompressType::Zlib, true);
        let frame = Frame::new(CommandCode::SetupData, format, &b"x"[..]).unwrap();

        assert_eq!(frame.crypto_type(), CryptoType::Aes128);
        assert_eq!(frame.compress_type(), CompressType::Zlib);
        assert!(frame.ack_required());
        assert!(!frame.format_info().is_plain());
    }

    #[test]
    fn test_unknown_message_type_is_kept() {
        let frame = Frame::new(0x7777u16, PackageFormat::PLAIN, Bytes::new()).unwrap();

        assert_eq!(frame.message_type(), 0x7777);
        assert!(matches!(
            frame.command(),
            Err(MaxPbError::UnknownCommand(0x7777))
        ));
    }

    #[test]
    fn test_payload_too_large() {
        let payload = vec![0u8; ABSOLUTE_MAX_PAYLOAD_SIZE as usize + 1];
        let result = Frame::new(CommandCode::FileData, PackageFormat::PLAIN, payload);

        assert!(matches!(
            result,
            Err(MaxPbError::PayloadTooLarge { size: 65536, max: 65535 })
        ));
    }

    #[test]
    fn test_payload_bytes_zero_copy() {
        let original = Bytes::from_static(b"test data");
        let frame = Frame::new(CommandCode::User, PackageFormat::PLAIN, original.clone()).unwrap();

        let cloned = frame.payload_bytes();
        assert_eq!(cloned.as_ptr(), original.as_ptr());
    }

    #[test]
    fn test_encode_layout() {
        let frame = Frame::new(CommandCode::Position, PackageFormat::PLAIN, vec![0x10, 0x20]).unwrap();
        let bytes = frame.encode();
        let crc = frame.crc().to_be_bytes();

        assert_eq!(
            bytes,
            vec![0xAA, 0x55, 0xAA, 0x55, 0x00, 0x02, crc[0], crc[1], 0x00, 0x01, 0x00, 0x00, 0x10, 0x20]
        );
    }

    #[test]
    fn test_decoded_payload_plain() {
        let frame = Frame::new(CommandCode::Position, PackageFormat::PLAIN, &b"abc"[..]).unwrap();
        assert_eq!(&frame.decoded_payload(&RawCodec).unwrap()[..], b"abc");
    }

    #[test]
    fn test_build_frame_roundtrip() {
        use super::super::FrameReceiver;

        let frame = Frame::new(CommandCode::Router, PackageFormat(0x8000), &b"0123456789"[..]).unwrap();
        let bytes = build_frame(&frame.header, &frame.payload);

        let mut receiver = FrameReceiver::new();
        let frames = receiver.feed_frames(&bytes);

        assert_eq!(frames, vec![frame]);
    }
}
