//! Host configuration
//!
//! Buffer sizes, flush thresholds and handshake pacing for a
//! [`Transport`](crate::Transport).

use canvaslink_hal::{LinkConfig, LinkConfigError};
use canvaslink_protocol::{SerializeConfig, MIN_BUFFER_SIZE};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Host-side settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HostConfig {
    /// Initial size of the outgoing frame buffer
    pub tx_buffer_size: usize,
    /// Frame length that triggers a synchronous flush
    pub high_watermark: usize,
    /// Size of the receive buffer filled on every exchange
    pub rx_buffer_size: usize,
    /// Frames of this length or longer are refused
    pub max_frame_size: usize,
    /// Delay between handshake polls in milliseconds
    pub handshake_poll_ms: u32,
    /// Give up the handshake after this many polls (`None` = poll forever)
    pub handshake_max_attempts: Option<u32>,
    pub link: LinkConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tx_buffer_size: 8192,
            high_watermark: 8128,
            rx_buffer_size: 8192,
            max_frame_size: 8192,
            handshake_poll_ms: 200,
            handshake_max_attempts: None,
            link: LinkConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A buffer is smaller than the codec minimum
    BufferTooSmall(usize),
    /// Watermark leaves no room for the trailing synchronicity command
    WatermarkTooHigh { watermark: usize, max_frame_size: usize },
    /// Link settings rejected
    Link(LinkConfigError),
}

impl From<LinkConfigError> for ConfigError {
    fn from(err: LinkConfigError) -> Self {
        ConfigError::Link(err)
    }
}

/// Room reserved after the watermark for the closing `SetSynchronicity`
/// and the largest fixed-size command
pub const FRAME_RESERVE: usize = 64;

impl HostConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for size in [self.tx_buffer_size, self.rx_buffer_size, self.max_frame_size] {
            if size < MIN_BUFFER_SIZE {
                return Err(ConfigError::BufferTooSmall(size));
            }
        }
        if self.high_watermark + FRAME_RESERVE > self.max_frame_size {
            return Err(ConfigError::WatermarkTooHigh {
                watermark: self.high_watermark,
                max_frame_size: self.max_frame_size,
            });
        }
        self.link.validate()?;
        Ok(())
    }

    /// Settings for the outgoing frame context
    pub fn serialize_config(&self) -> SerializeConfig {
        SerializeConfig {
            buffer_size: self.tx_buffer_size,
            high_watermark: Some(self.high_watermark),
        }
    }
}
