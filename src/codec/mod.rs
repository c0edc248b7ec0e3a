//! Codec module - payload transforms selected by the frame's format word.
//!
//! Encryption (AES-128) and compression (zlib) are provided by the
//! application through [`PayloadCodec`]. This crate only ships
//! [`RawCodec`], which passes plain payloads through and refuses anything
//! else.
//!
//! # Example
//!
//! ```
//! use maxpb::codec::{PayloadCodec, RawCodec};
//! use maxpb::protocol::PackageFormat;
//! use bytes::Bytes;
//!
//! let plain = PackageFormat::PLAIN.info();
//! let payload = Bytes::from_static(b"report");
//! assert_eq!(RawCodec.decode(plain, payload.clone()).unwrap(), payload);
//! ```

mod raw;

pub use raw::RawCodec;

use bytes::Bytes;

use crate::error::Result;
use crate::protocol::FormatInfo;

/// Transforms payload bytes according to a frame's crypto and compression
/// settings.
pub trait PayloadCodec {
    /// Turn wire payload into plain bytes (decrypt, then decompress).
    fn decode(&self, format: FormatInfo, payload: Bytes) -> Result<Bytes>;

    /// Turn plain bytes into wire payload (compress, then encrypt).
    fn encode(&self, format: FormatInfo, payload: Bytes) -> Result<Bytes>;
}
