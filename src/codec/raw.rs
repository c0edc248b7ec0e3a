//! Raw codec - pass-through for plain payloads.
//!
//! Zero-copy: the returned `Bytes` shares memory with the input.
//!
//! # Example
//!
//! ```
//! use maxpb::codec::{PayloadCodec, RawCodec};
//! use maxpb::protocol::{CompressType, CryptoType, PackageFormat};
//! use bytes::Bytes;
//!
//! let zlib = PackageFormat::new(CryptoType::None, CompressType::Zlib, false).info();
//! assert!(RawCodec.decode(zlib, Bytes::from_static(b"x")).is_err());
//! ```

use bytes::Bytes;

use super::PayloadCodec;
use crate::error::{MaxPbError, Result};
use crate::protocol::FormatInfo;

/// Codec that accepts only unencrypted, uncompressed payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl RawCodec {
    fn check(format: FormatInfo) -> Result<()> {
        if format.is_plain() {
            Ok(())
        } else {
            Err(MaxPbError::UnsupportedFormat(format!(
                "crypto {:?}, compression {:?}",
                format.crypto_type, format.compress_type
            )))
        }
    }
}

impl PayloadCodec for RawCodec {
    #[inline]
    fn decode(&self, format: FormatInfo, payload: Bytes) -> Result<Bytes> {
        Self::check(format)?;
        Ok(payload)
    }

    #[inline]
    fn encode(&self, format: FormatInfo, payload: Bytes) -> Result<Bytes> {
        Self::check(format)?;
        Ok(payload)
    }
}
