//! Outbound side: encode frames onto a writer.
//!
//! [`FrameWriter`] writes directly and suits a single producer. When several
//! tasks need to send on one connection, [`spawn_writer_task`] moves the
//! writer into a dedicated task fed by an mpsc channel:
//!
//! ```text
//! Handler 1 ─┐
//! Handler 2 ─┼─► mpsc::Sender<OutboundFrame> ─► Writer Task ─► Stream
//! Handler N ─┘
//! ```

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{MaxPbError, Result};
use crate::protocol::{Frame, HEADER_SIZE};

/// Default channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Maximum frames to batch before a flush.
const MAX_BATCH_SIZE: usize = 64;

/// A frame ready to be written.
#[derive(Debug, Clone)]
pub struct OutboundFrame {
    /// Pre-encoded header (12 bytes).
    pub header: [u8; HEADER_SIZE],
    /// Payload bytes.
    pub payload: Bytes,
}

impl OutboundFrame {
    #[inline]
    pub fn new(frame: &Frame) -> Self {
        Self {
            header: frame.header.encode(),
            payload: frame.payload.clone(),
        }
    }

    /// Total size of this frame (header + payload).
    #[inline]
    pub fn size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

impl From<&Frame> for OutboundFrame {
    fn from(frame: &Frame) -> Self {
        OutboundFrame::new(frame)
    }
}

impl From<Frame> for OutboundFrame {
    fn from(frame: Frame) -> Self {
        Self {
            header: frame.header.encode(),
            payload: frame.payload,
        }
    }
}

/// Writes frames to one connection.
pub struct FrameWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write one frame and flush.
    pub async fn send(&mut self, frame: &Frame) -> Result<()> {
        write_frame(&mut self.writer, &OutboundFrame::new(frame)).await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Handle for sending frames to the writer task.
///
/// This is cheaply cloneable and can be shared across handlers.
#[derive(Debug, Clone)]
pub struct WriterHandle {
    tx: mpsc::Sender<OutboundFrame>,
}

impl WriterHandle {
    /// Queue a frame, waiting while the channel is full.
    pub async fn send(&self, frame: impl Into<OutboundFrame>) -> Result<()> {
        self.tx
            .send(frame.into())
            .await
            .map_err(|_| MaxPbError::ConnectionClosed)
    }

    /// Check whether the writer task has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Spawn the writer task and return a handle for sending frames.
///
/// The task ends with `Ok(())` once every handle is dropped, or with the
/// first write error.
pub fn spawn_writer_task<W>(writer: W, capacity: usize) -> (WriterHandle, JoinHandle<Result<()>>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let task = tokio::spawn(writer_loop(rx, writer));
    (WriterHandle { tx }, task)
}

/// Receive frames and write them, flushing once per batch.
async fn writer_loop<W>(mut rx: mpsc::Receiver<OutboundFrame>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(first) = rx.recv().await {
        let mut batch = Vec::with_capacity(MAX_BATCH_SIZE);
        batch.push(first);

        while batch.len() < MAX_BATCH_SIZE {
            match rx.try_recv() {
                Ok(frame) => batch.push(frame),
                Err(_) => break,
            }
        }

        for frame in &batch {
            if let Err(e) = write_frame(&mut writer, frame).await {
                tracing::error!("Frame write failed: {}", e);
                return Err(e);
            }
        }
        writer.flush().await?;
    }

    Ok(())
}

async fn write_frame<W>(writer: &mut W, frame: &OutboundFrame) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&frame.header).await?;
    if !frame.payload.is_empty() {
        writer.write_all(&frame.payload).await?;
    }
    Ok(())
}
