//! Receiver configuration.
//!
//! Loaded from JSON (typically a section of the backend's settings file) or
//! built in code. Every field has a default, so `{}` is a valid config.
//!
//! # Example
//!
//! ```
//! use maxpb::config::ReceiverConfig;
//!
//! let config = ReceiverConfig::from_json(r#"{ "max_size": 1024 }"#).unwrap();
//! assert_eq!(config.max_size, 1024);
//! assert_eq!(config.scan_ceiling, 256);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{MaxPbError, Result};
use crate::protocol::DEFAULT_MAX_PAYLOAD_SIZE;

/// Default number of noise bytes tolerated ahead of a sentinel.
pub const DEFAULT_SCAN_CEILING: usize = 256;

/// Default size of a single transport read.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

/// Limits applied to one inbound connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReceiverConfig {
    /// Largest accepted payload in bytes.
    pub max_size: u16,
    /// Noise bytes tolerated ahead of a sentinel before a desync is reported.
    pub scan_ceiling: usize,
    /// Bytes requested per transport read.
    pub read_buffer_size: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_PAYLOAD_SIZE,
            scan_ceiling: DEFAULT_SCAN_CEILING,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl ReceiverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the payload ceiling.
    pub fn with_max_size(mut self, max_size: u16) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the sentinel scan ceiling.
    pub fn with_scan_ceiling(mut self, scan_ceiling: usize) -> Self {
        self.scan_ceiling = scan_ceiling;
        self
    }

    /// Set the transport read size.
    pub fn with_read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.read_buffer_size = read_buffer_size;
        self
    }

    /// Check that the limits are usable.
    pub fn validate(&self) -> Result<()> {
        if self.read_buffer_size == 0 {
            return Err(MaxPbError::Config(
                "read_buffer_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
