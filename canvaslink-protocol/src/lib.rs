//! Canvaslink command-stream protocol
//!
//! A host with little memory records drawing operations as a compact binary
//! stream, ships it to a display module, and the module replays it.
//!
//! # Frame Format
//!
//! ```text
//! ┌─────────┬────────────┬──────────────────────────────────────┐
//! │ VERSION │ LENGTH     │ CONTENT                              │
//! │ 1B (3)  │ 2B, BE     │ opcode, args, opcode, args, ...      │
//! └─────────┴────────────┴──────────────────────────────────────┘
//! ```
//!
//! LENGTH counts the whole frame, header included. Integers are big-endian,
//! floats are IEEE-754 bits in big-endian order, strings and arrays carry a
//! 16-bit count.
//!
//! Responses from the module use the same framing with a one-byte tag as
//! the first content byte.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod command;
pub mod deserialize;
pub mod error;
pub mod handshake;
pub mod header;
pub mod opcode;
pub mod response;
pub mod serialize;
pub mod sink;
pub mod source;
pub mod types;

#[cfg(test)]
mod test_util;

pub use command::{ButtonStyle, Command, ProgressBar};
pub use deserialize::{Decode, DeserializeContext};
pub use error::CodecError;
pub use header::{Header, HEADER_SIZE, VERSION};
pub use opcode::Opcode;
pub use response::{CalibrationMatrix, Response, ResponseKind, TouchEvent};
pub use serialize::{Encode, SerializeConfig, SerializeContext, TextEncoding, MIN_BUFFER_SIZE};
pub use sink::{BufferSink, Sink, StreamSink};
pub use source::{SliceSource, Source, StreamSource};
pub use types::{
    Color, CornerPosition, DialogType, DrawingDirection, FontHandle, Orientation, PixelFormat,
    RoundedCornerStyle, Synchronicity, TouchEventMode,
};

/// Re-export of the I/O traits stream sinks and sources are built on
pub use embedded_io as io;
