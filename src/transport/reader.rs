//! Inbound side: pull chunks from a reader and run them through a
//! [`FrameReceiver`].
//!
//! # Example
//!
//! ```
//! use maxpb::protocol::{CommandCode, Frame, PackageFormat};
//! use maxpb::transport::FrameReader;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> maxpb::error::Result<()> {
//! let wire = Frame::new(CommandCode::Position, PackageFormat::PLAIN, &b"fix"[..])?.encode();
//! let mut reader = FrameReader::new(&wire[..]);
//!
//! let frame = reader.next_frame().await?.unwrap();
//! assert_eq!(frame.payload(), b"fix");
//! assert!(reader.next_frame().await?.is_none());
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::ReceiverConfig;
use crate::error::Result;
use crate::protocol::{Frame, FrameEvent, FrameReceiver, ReceiverStats};

/// Reads frames from one connection.
///
/// Owned by a single task; the receiver inside is never shared.
pub struct FrameReader<R> {
    reader: R,
    receiver: FrameReceiver,
    /// Events produced by the last read and not yet returned.
    pending: VecDeque<FrameEvent>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Create a reader with default limits.
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, &ReceiverConfig::default())
    }

    /// Create a reader with explicit limits.
    pub fn with_config(reader: R, config: &ReceiverConfig) -> Self {
        Self {
            reader,
            receiver: FrameReceiver::from_config(config),
            pending: VecDeque::new(),
            buf: vec![0u8; config.read_buffer_size.max(1)],
        }
    }

    /// Next frame or rejection, in stream order.
    ///
    /// Returns `Ok(None)` once the peer closes the stream and every buffered
    /// event has been returned. Bytes of an unfinished frame at EOF are
    /// dropped.
    pub async fn next_event(&mut self) -> Result<Option<FrameEvent>> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }

            let n = self.reader.read(&mut self.buf).await?;
            if n == 0 {
                if self.receiver.buffered_len() > 0 {
                    tracing::debug!(
                        "Connection closed with {} unframed bytes",
                        self.receiver.buffered_len()
                    );
                }
                return Ok(None);
            }

            self.pending.extend(self.receiver.feed(&self.buf[..n]));
        }
    }

    /// Next valid frame, skipping (and logging) rejections.
    pub async fn next_frame(&mut self) -> Result<Option<Frame>> {
        while let Some(event) = self.next_event().await? {
            match event {
                FrameEvent::FrameReady(frame) => return Ok(Some(frame)),
                FrameEvent::FrameRejected(reason) => {
                    tracing::debug!("Dropping invalid input: {}", reason);
                }
            }
        }
        Ok(None)
    }

    /// Receiver counters so far.
    pub fn stats(&self) -> ReceiverStats {
        self.receiver.stats()
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Give back the underlying reader. Buffered partial input is lost.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
