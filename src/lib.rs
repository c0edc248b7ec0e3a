//! # maxpb
//!
//! Wire format and streaming frame reassembler for the MaxPB telemetry and
//! command protocol spoken between vehicle-tracking devices and their
//! backend.
//!
//! ## Architecture
//!
//! - **Protocol**: 12-byte header, format bitfield, command table, CRC-16,
//!   and [`protocol::FrameReceiver`], which turns arbitrarily chunked bytes
//!   into validated frames or structured rejections
//! - **Transport**: async reader/writer adapters over any tokio stream
//! - **Dispatch**: command-code handler registry and serve loop
//!
//! Payload encryption, compression and protobuf decoding are supplied by the
//! application through [`codec::PayloadCodec`] and the handlers.
//!
//! ## Example
//!
//! ```
//! use maxpb::protocol::{CommandCode, Frame, FrameEvent, FrameReceiver, PackageFormat};
//!
//! let frame = Frame::new(CommandCode::Position, PackageFormat::PLAIN, &b"\x08\x01"[..]).unwrap();
//! let wire = frame.encode();
//!
//! let mut receiver = FrameReceiver::new();
//! let mut events = receiver.feed(&wire[..7]);
//! events.extend(receiver.feed(&wire[7..]));
//!
//! assert_eq!(events, vec![FrameEvent::FrameReady(frame)]);
//! ```

pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod transport;

pub use config::ReceiverConfig;
pub use error::{MaxPbError, Result};
pub use protocol::{CommandCode, Frame, FrameEvent, FrameReceiver, RejectReason};
