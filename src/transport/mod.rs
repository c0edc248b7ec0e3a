//! Transport module - async adapters between byte streams and frames.
//!
//! Works over anything implementing `tokio::io::AsyncRead` / `AsyncWrite`
//! (TCP socket, serial port, in-memory duplex). Choosing and opening the
//! transport is up to the application.

mod reader;
mod writer;

pub use reader::FrameReader;
pub use writer::{
    spawn_writer_task, FrameWriter, OutboundFrame, WriterHandle, DEFAULT_CHANNEL_CAPACITY,
};
