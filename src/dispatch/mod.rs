//! Dispatch module - route received frames to command handlers.
//!
//! Provides:
//! - [`HandlerRegistry`] - maps command codes to handlers
//! - [`ReplyContext`] - lets a handler send frames back on the connection
//! - [`serve`] - read loop driving a [`FrameReader`] into a registry
//!
//! Whether repeated rejections should close the connection is left to the
//! caller, who can inspect [`FrameReader::stats`].

mod registry;

pub use registry::{BoxFuture, FnHandler, Handler, HandlerRegistry, HandlerResult};

use std::sync::Arc;

use tokio::io::AsyncRead;

use crate::error::{MaxPbError, Result};
use crate::protocol::{Frame, FrameEvent, ReceiverStats};
use crate::transport::{FrameReader, WriterHandle};

/// Context passed to handlers for answering the peer.
#[derive(Debug, Clone)]
pub struct ReplyContext {
    writer: Option<WriterHandle>,
}

impl ReplyContext {
    /// Context connected to a writer task.
    pub fn new(writer: WriterHandle) -> Self {
        Self {
            writer: Some(writer),
        }
    }

    /// Context with nowhere to reply (tests, offline replay).
    pub fn detached() -> Self {
        Self { writer: None }
    }

    pub fn can_reply(&self) -> bool {
        self.writer.is_some()
    }

    /// Send a frame back to the peer.
    pub async fn reply(&self, frame: Frame) -> Result<()> {
        match &self.writer {
            Some(writer) => writer.send(frame).await,
            None => Err(MaxPbError::ConnectionClosed),
        }
    }
}

/// Read frames until EOF and hand each one to its handler.
///
/// Handlers run one at a time, in arrival order. Rejected input and handler
/// failures are logged and do not stop the loop; only I/O errors on the
/// reader do. Returns the receiver's counters at EOF.
pub async fn serve<R>(
    mut reader: FrameReader<R>,
    registry: Arc<HandlerRegistry>,
    ctx: ReplyContext,
) -> Result<ReceiverStats>
where
    R: AsyncRead + Unpin,
{
    while let Some(event) = reader.next_event().await? {
        let frame = match event {
            FrameEvent::FrameReady(frame) => frame,
            FrameEvent::FrameRejected(reason) => {
                tracing::debug!("Dropping invalid input: {}", reason);
                continue;
            }
        };

        let message_type = frame.message_type();
        if let Err(e) = registry.dispatch(frame, ctx.clone()).await {
            tracing::error!("Handler error for message type {:#06x}: {}", message_type, e);
        }
    }

    Ok(reader.stats())
}
