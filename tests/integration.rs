//! Integration tests for maxpb.
//!
//! These tests drive the public API the way a backend connection does.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use maxpb::codec::RawCodec;
use maxpb::config::ReceiverConfig;
use maxpb::dispatch::{serve, HandlerRegistry, ReplyContext};
use maxpb::protocol::{
    build_frame, validate, Checksum, CommandCode, CompressType, Crc16, CryptoType, Frame,
    FrameEvent, FrameReceiver, FrameValidity, Header, PackageFormat, ReceiverState, RejectReason,
    HEADER_SIZE, HEADER_VALUE,
};
use maxpb::transport::{FrameReader, FrameWriter};
use maxpb::MaxPbError;

/// Raw bytes for a position report with a two-byte payload.
fn position_report_bytes(data: [u8; 2]) -> Vec<u8> {
    let crc = Crc16::checksum(0x0001, 0x0000, &data).to_be_bytes();
    vec![
        0xAA, 0x55, 0xAA, 0x55, // sentinel
        0x00, 0x02, // size
        crc[0], crc[1], // crc
        0x00, 0x01, // message type
        0x00, 0x00, // format
        data[0], data[1],
    ]
}

/// Hand-built position report decodes with all format fields clear.
#[test]
fn test_position_report_scenario() {
    let mut receiver = FrameReceiver::new();
    let events = receiver.feed(&position_report_bytes([0x08, 0x2A]));

    assert_eq!(events.len(), 1);
    let frame = match &events[0] {
        FrameEvent::FrameReady(frame) => frame,
        other => panic!("expected frame, got {:?}", other),
    };

    assert_eq!(frame.message_type(), 0x0001);
    assert_eq!(frame.command().unwrap(), CommandCode::Position);
    assert_eq!(frame.header.size, 2);
    assert_eq!(frame.crypto_type(), CryptoType::None);
    assert_eq!(frame.compress_type(), CompressType::None);
    assert!(!frame.ack_required());
    assert_eq!(frame.payload(), &[0x08, 0x2A]);
}

/// Same bytes with the last data byte flipped are rejected.
#[test]
fn test_position_report_corrupted_scenario() {
    let mut bytes = position_report_bytes([0x08, 0x2A]);
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;

    let mut receiver = FrameReceiver::new();
    let events = receiver.feed(&bytes);

    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        FrameEvent::FrameRejected(RejectReason::ChecksumMismatch { message_type: 1, .. })
    ));
    assert_eq!(receiver.state(), ReceiverState::Seeking);
}

/// Encoder output matches the hand-built layout.
#[test]
fn test_encoder_matches_layout() {
    let frame = Frame::new(CommandCode::Position, PackageFormat::PLAIN, vec![0x08, 0x2A]).unwrap();
    assert_eq!(frame.encode(), position_report_bytes([0x08, 0x2A]));
}

/// Frame-model validity agrees with what the receiver does.
#[test]
fn test_validate_agrees_with_receiver() {
    let frame = Frame::new(CommandCode::Status, PackageFormat::PLAIN, &b"ok"[..]).unwrap();
    let computed = Crc16::checksum(frame.message_type(), frame.format().bits(), frame.payload());

    assert_eq!(
        validate(HEADER_VALUE, frame.header.size, frame.crc(), computed, 16),
        FrameValidity::Valid
    );
    assert_eq!(
        validate(HEADER_VALUE, frame.header.size, frame.crc() ^ 1, computed, 16),
        FrameValidity::ChecksumMismatch
    );
    assert_eq!(
        validate(HEADER_VALUE, frame.header.size, frame.crc(), computed, 1),
        FrameValidity::SizeOutOfBounds
    );
}

/// Oversize header followed by a good frame: one rejection, then recovery.
///
/// Only the header is sent; a real oversize payload would be scanned as noise.
#[test]
fn test_oversize_then_valid() {
    let config = ReceiverConfig::new().with_max_size(16);
    let mut receiver = FrameReceiver::from_config(&config);

    let oversize = Header::new(17, 0, 0x0001, PackageFormat::PLAIN);
    let mut data = build_frame(&oversize, &[]);
    let good = Frame::new(CommandCode::Status, PackageFormat::PLAIN, &b"fine"[..]).unwrap();
    data.extend(good.encode());

    let events = receiver.feed(&data);

    assert_eq!(
        events,
        vec![
            FrameEvent::FrameRejected(RejectReason::SizeOutOfBounds { size: 17, max: 16 }),
            FrameEvent::FrameReady(good),
        ]
    );
}

/// Encrypted frames pass the reassembler but need an external codec.
#[test]
fn test_encrypted_payload_needs_codec() {
    let format = PackageFormat::new(CryptoType::Aes128, CompressType::None, true);
    let frame = Frame::new(CommandCode::SetupData, format, Bytes::from_static(b"cipher")).unwrap();

    let mut receiver = FrameReceiver::new();
    let frames = receiver.feed_frames(&frame.encode());

    assert_eq!(frames.len(), 1);
    assert!(frames[0].ack_required());
    assert!(matches!(
        frames[0].decoded_payload(&RawCodec),
        Err(MaxPbError::UnsupportedFormat(_))
    ));
}

/// Writer output read back through the async reader.
#[tokio::test]
async fn test_writer_to_reader() {
    let (client, server) = tokio::io::duplex(256);
    let frames = vec![
        Frame::new(CommandCode::Position, PackageFormat::PLAIN, &b"one"[..]).unwrap(),
        Frame::new(CommandCode::Status, PackageFormat::PLAIN.with_ack_required(true), &b""[..])
            .unwrap(),
        Frame::new(CommandCode::FileData, PackageFormat::PLAIN, vec![0xAA; 300]).unwrap(),
    ];

    let to_send = frames.clone();
    let sender = tokio::spawn(async move {
        let mut writer = FrameWriter::new(client);
        for frame in &to_send {
            writer.send(frame).await.unwrap();
        }
    });

    let config = ReceiverConfig::new().with_read_buffer_size(5);
    let mut reader = FrameReader::with_config(server, &config);
    let mut received = Vec::new();
    while let Some(frame) = reader.next_frame().await.unwrap() {
        received.push(frame);
    }
    sender.await.unwrap();

    assert_eq!(received, frames);
}

/// Full pipeline: noisy stream in, handlers called for valid frames only.
#[tokio::test]
async fn test_serve_noisy_stream() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut registry = HandlerRegistry::new();
    let log = seen.clone();
    registry.register(CommandCode::Position, move |frame, _| {
        let log = log.clone();
        async move {
            log.lock().unwrap().push(frame.payload_bytes());
            Ok(())
        }
    });

    let mut data = vec![0x13u8; 40];
    data.extend(position_report_bytes([1, 2]));
    data.extend([0xAA, 0x55]); // poses as a sentinel with the next frame's start
    let mut corrupt = position_report_bytes([3, 4]);
    corrupt[HEADER_SIZE] ^= 0x10;
    data.extend(corrupt);
    data.extend(position_report_bytes([5, 6]));

    let stats = serve(
        FrameReader::new(&data[..]),
        Arc::new(registry),
        ReplyContext::detached(),
    )
    .await
    .unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![Bytes::from_static(&[1, 2]), Bytes::from_static(&[5, 6])]
    );
    assert_eq!(stats.frames, 2);
    assert_eq!(stats.checksum_mismatches, 1);
    assert_eq!(stats.oversize, 1);
    assert_eq!(stats.discarded_bytes, 41);
}
