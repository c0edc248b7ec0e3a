//! Streaming frame reassembler.
//!
//! Uses `bytes::BytesMut` for buffer management and a small state machine to
//! turn arbitrarily chunked input into validated frames:
//! - `Seeking`: scan for the `AA 55 AA 55` sentinel
//! - `HeaderFound`: sentinel seen, need the rest of the 12-byte header
//! - `AwaitingPayload`: header parsed, need `size` more payload bytes
//!
//! Each chunk is consumed in steps no larger than the current phase needs, so
//! the buffer never grows past `max_size + HEADER_SIZE` and the emitted event
//! sequence does not depend on how the stream was split into chunks.
//!
//! # Example
//!
//! ```
//! use maxpb::protocol::{CommandCode, Frame, FrameEvent, FrameReceiver, PackageFormat};
//!
//! let wire = Frame::new(CommandCode::KeepAlive, PackageFormat::PLAIN, &b""[..])
//!     .unwrap()
//!     .encode();
//!
//! let mut receiver = FrameReceiver::new();
//! assert!(receiver.feed(&wire[..5]).is_empty());
//!
//! let events = receiver.feed(&wire[5..]);
//! assert!(matches!(&events[..], [FrameEvent::FrameReady(_)]));
//! ```

use std::marker::PhantomData;

use bytes::BytesMut;
use thiserror::Error;

use super::checksum::{Checksum, Crc16};
use super::wire_format::{
    read_header_value, validate, validate_header, FrameValidity, Header,
    DEFAULT_MAX_PAYLOAD_SIZE, HEADER_SIZE, SENTINEL, SENTINEL_LEN,
};
use super::Frame;
use crate::config::{ReceiverConfig, DEFAULT_SCAN_CEILING};

/// Why a candidate frame was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// Recomputed checksum differs from the stored one.
    #[error("checksum mismatch for message type {message_type:#06x}: stored {stored:#06x}, computed {computed:#06x}")]
    ChecksumMismatch {
        message_type: u16,
        stored: u16,
        computed: u16,
    },

    /// Declared payload size is above the configured ceiling.
    #[error("payload size {size} exceeds maximum {max}")]
    SizeOutOfBounds { size: u16, max: u16 },

    /// Scan ceiling reached without finding a sentinel.
    #[error("no frame sentinel found, discarded {discarded} bytes")]
    DesyncNoise { discarded: usize },
}

/// Output of [`FrameReceiver::feed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    FrameReady(Frame),
    FrameRejected(RejectReason),
}

impl FrameEvent {
    /// The frame, if this event carries one.
    pub fn into_frame(self) -> Option<Frame> {
        match self {
            FrameEvent::FrameReady(frame) => Some(frame),
            FrameEvent::FrameRejected(_) => None,
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, FrameEvent::FrameReady(_))
    }
}

/// Parsing phase, as visible from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverState {
    Seeking,
    HeaderFound,
    AwaitingPayload,
}

/// Internal state machine.
#[derive(Debug, Clone, Copy)]
enum State {
    /// Looking for the sentinel.
    Seeking,
    /// Buffer starts with the sentinel, waiting for the full header.
    HeaderFound,
    /// Header parsed and size accepted, waiting for payload bytes.
    AwaitingPayload { header: Header },
}

/// Counters kept over the receiver's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    pub frames: u64,
    pub checksum_mismatches: u64,
    pub oversize: u64,
    pub desync_events: u64,
    /// Bytes dropped while looking for a sentinel.
    pub discarded_bytes: u64,
}

impl ReceiverStats {
    /// Total rejection events.
    pub fn rejected(&self) -> u64 {
        self.checksum_mismatches + self.oversize + self.desync_events
    }
}

/// Reassembles frames from a chunked byte stream.
///
/// One receiver serves exactly one connection. It performs no I/O; feed it
/// whatever the transport delivers and handle the returned events.
///
/// `C` selects the checksum algorithm (CRC-16/CCITT-FALSE by default).
pub struct FrameReceiver<C: Checksum = Crc16> {
    /// Bytes not yet resolved into a frame.
    buffer: BytesMut,
    /// Current parsing state.
    state: State,
    /// Maximum accepted payload size.
    max_size: u16,
    /// Buffer length at which seeking gives up and drops noise
    /// (scan ceiling plus one sentinel).
    scan_window: usize,
    stats: ReceiverStats,
    _checksum: PhantomData<C>,
}

impl FrameReceiver<Crc16> {
    /// Create a receiver with default limits.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_PAYLOAD_SIZE, DEFAULT_SCAN_CEILING)
    }

    /// Create a receiver with a custom payload ceiling.
    pub fn with_max_size(max_size: u16) -> Self {
        Self::with_limits(max_size, DEFAULT_SCAN_CEILING)
    }

    /// Create a receiver from configuration.
    pub fn from_config(config: &ReceiverConfig) -> Self {
        Self::with_limits(config.max_size, config.scan_ceiling)
    }

    /// Create a receiver with explicit limits.
    ///
    /// `scan_ceiling` is the number of noise bytes tolerated ahead of a
    /// sentinel. It is capped at `max_size + HEADER_SIZE - SENTINEL_LEN` so
    /// the scan window never exceeds the largest frame.
    pub fn with_limits(max_size: u16, scan_ceiling: usize) -> Self {
        Self::with_checksum_limits(max_size, scan_ceiling)
    }
}

impl<C: Checksum> FrameReceiver<C> {
    /// Like [`FrameReceiver::with_limits`], with checksum algorithm `C`.
    pub fn with_checksum_limits(max_size: u16, scan_ceiling: usize) -> Self {
        let buffer_limit = max_size as usize + HEADER_SIZE;
        let scan_window = scan_ceiling.min(buffer_limit - SENTINEL_LEN) + SENTINEL_LEN;
        Self {
            buffer: BytesMut::with_capacity(scan_window.max(HEADER_SIZE)),
            state: State::Seeking,
            max_size,
            scan_window,
            stats: ReceiverStats::default(),
            _checksum: PhantomData,
        }
    }

    /// Push data into the receiver and collect every event it completes.
    ///
    /// Never blocks. Returns an empty vector when the chunk does not finish
    /// any frame; the partial data stays buffered for the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<FrameEvent> {
        let mut events = Vec::new();
        let mut input = chunk;

        loop {
            self.advance(&mut events);
            if input.is_empty() {
                break;
            }
            // `advance` stopped because the current phase needs more bytes.
            let take = self.wanted().min(input.len());
            self.buffer.extend_from_slice(&input[..take]);
            input = &input[take..];
        }

        events
    }

    /// Like [`feed`](Self::feed) but keeps only accepted frames.
    pub fn feed_frames(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.feed(chunk)
            .into_iter()
            .filter_map(FrameEvent::into_frame)
            .collect()
    }

    /// Run the state machine until it needs more input.
    fn advance(&mut self, events: &mut Vec<FrameEvent>) {
        while let Some(event) = self.step() {
            if let Some(event) = event {
                events.push(event);
            }
        }
    }

    /// One transition.
    ///
    /// Returns:
    /// - `None` if more data is needed
    /// - `Some(None)` if the state changed without an event
    /// - `Some(Some(event))` if a frame completed or was rejected
    fn step(&mut self) -> Option<Option<FrameEvent>> {
        match self.state {
            State::Seeking => self.seek(),

            State::HeaderFound => {
                if self.buffer.len() < HEADER_SIZE {
                    return None;
                }

                let raw_header = read_header_value(&self.buffer);
                let header = Header::decode_fields(&self.buffer[..HEADER_SIZE]);

                match validate_header(raw_header, header.size, self.max_size) {
                    FrameValidity::Valid => {
                        self.state = State::AwaitingPayload { header };
                        Some(None)
                    }
                    FrameValidity::SizeOutOfBounds => {
                        // Drop one byte only: the sentinel repeats every two
                        // bytes, so a real one may overlap this candidate.
                        self.drop_candidate();
                        self.stats.oversize += 1;
                        let reason = RejectReason::SizeOutOfBounds {
                            size: header.size,
                            max: self.max_size,
                        };
                        tracing::warn!("Rejected frame: {}", reason);
                        Some(Some(FrameEvent::FrameRejected(reason)))
                    }
                    FrameValidity::MissingSentinel | FrameValidity::ChecksumMismatch => {
                        self.drop_candidate();
                        Some(None)
                    }
                }
            }

            State::AwaitingPayload { header } => {
                if self.buffer.len() < header.frame_len() {
                    return None;
                }

                let mut raw = self.buffer.split_to(header.frame_len());
                let payload = raw.split_off(HEADER_SIZE).freeze();
                self.state = State::Seeking;

                let computed = C::checksum(header.message_type, header.format.bits(), &payload);
                let validity = validate(
                    read_header_value(&raw),
                    header.size,
                    header.crc,
                    computed,
                    self.max_size,
                );
                if !validity.is_valid() {
                    self.stats.checksum_mismatches += 1;
                    let reason = RejectReason::ChecksumMismatch {
                        message_type: header.message_type,
                        stored: header.crc,
                        computed,
                    };
                    tracing::warn!("Rejected frame: {}", reason);
                    return Some(Some(FrameEvent::FrameRejected(reason)));
                }

                self.stats.frames += 1;
                tracing::debug!(
                    "Frame ready: message type {:#06x}, {} payload bytes",
                    header.message_type,
                    header.size
                );
                Some(Some(FrameEvent::FrameReady(Frame::from_parts(header, payload))))
            }
        }
    }

    /// Give up on the candidate at the buffer start and rescan after its
    /// first byte.
    fn drop_candidate(&mut self) {
        let _ = self.buffer.split_to(1);
        self.state = State::Seeking;
    }

    fn seek(&mut self) -> Option<Option<FrameEvent>> {
        if let Some(pos) = find_sentinel(&self.buffer) {
            if pos > 0 {
                let _ = self.buffer.split_to(pos);
                self.stats.discarded_bytes += pos as u64;
                tracing::debug!("Skipped {} bytes before frame sentinel", pos);
            }
            self.state = State::HeaderFound;
            return Some(None);
        }

        if self.buffer.len() < self.scan_window {
            return None;
        }

        // Keep a possible partial sentinel at the tail.
        let discarded = self.buffer.len() - (SENTINEL_LEN - 1);
        let _ = self.buffer.split_to(discarded);
        self.stats.discarded_bytes += discarded as u64;
        self.stats.desync_events += 1;
        let reason = RejectReason::DesyncNoise { discarded };
        tracing::warn!("Stream out of sync: {}", reason);
        Some(Some(FrameEvent::FrameRejected(reason)))
    }

    /// Bytes the current phase can accept before it must be re-evaluated.
    fn wanted(&self) -> usize {
        let target = match self.state {
            State::Seeking => self.scan_window,
            State::HeaderFound => HEADER_SIZE,
            State::AwaitingPayload { header } => header.frame_len(),
        };
        target.saturating_sub(self.buffer.len()).max(1)
    }

    /// Bytes still outstanding for the current phase.
    ///
    /// While seeking this is the number of sentinel bytes not yet buffered.
    pub fn waiting_size(&self) -> usize {
        match self.state {
            State::Seeking => SENTINEL_LEN.saturating_sub(self.buffer.len()),
            State::HeaderFound => HEADER_SIZE.saturating_sub(self.buffer.len()),
            State::AwaitingPayload { header } => {
                header.frame_len().saturating_sub(self.buffer.len())
            }
        }
    }

    /// Payload size of the frame in progress, once its header is parsed.
    pub fn pending_size(&self) -> Option<u16> {
        match self.state {
            State::AwaitingPayload { header } => Some(header.size),
            _ => None,
        }
    }

    pub fn state(&self) -> ReceiverState {
        match self.state {
            State::Seeking => ReceiverState::Seeking,
            State::HeaderFound => ReceiverState::HeaderFound,
            State::AwaitingPayload { .. } => ReceiverState::AwaitingPayload,
        }
    }

    #[inline]
    pub fn max_size(&self) -> u16 {
        self.max_size
    }

    /// Effective scan ceiling after capping.
    #[inline]
    pub fn scan_ceiling(&self) -> usize {
        self.scan_window - SENTINEL_LEN
    }

    /// Get the number of buffered bytes.
    #[inline]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    /// Drop buffered bytes and go back to seeking. Statistics are kept.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = State::Seeking;
    }
}

impl Default for FrameReceiver<Crc16> {
    fn default() -> Self {
        Self::new()
    }
}

fn find_sentinel(buf: &[u8]) -> Option<usize> {
    buf.windows(SENTINEL_LEN).position(|w| w == SENTINEL.as_slice())
}
