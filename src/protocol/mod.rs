//! Protocol module - wire format, framing, and frame types.
//!
//! This module implements the MaxPB binary protocol:
//! - 12-byte header encoding/decoding and validity rules
//! - Format bitfield (crypto, compression, ack)
//! - Command table
//! - Frame checksum
//! - Streaming reassembler for chunked input

mod checksum;
mod command;
mod format;
mod frame;
mod receiver;
mod wire_format;

pub use checksum::{Checksum, Crc16};
pub use command::CommandCode;
pub use format::{decode_format, CompressType, CryptoType, FormatInfo, PackageFormat};
pub use frame::{build_frame, Frame};
pub use receiver::{FrameEvent, FrameReceiver, ReceiverState, ReceiverStats, RejectReason};
pub use wire_format::{
    validate, validate_header, FrameValidity, Header, ABSOLUTE_MAX_PAYLOAD_SIZE,
    DEFAULT_MAX_PAYLOAD_SIZE, HEADER_SIZE, HEADER_VALUE, SENTINEL, SENTINEL_LEN,
};
