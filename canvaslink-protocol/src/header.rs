//! Frame header
//!
//! Every frame starts with:
//! - VERSION (1 byte): protocol version, currently 3
//! - LENGTH (2 bytes, big-endian): total frame length including the header

use crate::error::CodecError;

/// Protocol version carried in every frame
pub const VERSION: u8 = 3;

/// Header size in bytes
pub const HEADER_SIZE: usize = 3;

/// Largest frame the length field can describe
pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

/// Frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Header {
    /// Protocol version
    pub version: u8,
    /// Frame length including the header, 0 for streams
    pub length: u16,
}

impl Header {
    /// Header with the current version and the given length
    pub fn new(length: u16) -> Self {
        Self {
            version: VERSION,
            length,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let len = self.length.to_be_bytes();
        [self.version, len[0], len[1]]
    }

    pub fn from_bytes(bytes: [u8; HEADER_SIZE]) -> Self {
        Self {
            version: bytes[0],
            length: u16::from_be_bytes([bytes[1], bytes[2]]),
        }
    }

    /// Check the version byte
    pub fn check_version(&self) -> Result<(), CodecError> {
        if self.version != VERSION {
            return Err(CodecError::VersionMismatch {
                expected: VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}
