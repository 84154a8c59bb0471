//! Host side of canvaslink
//!
//! This crate provides:
//! - `RecordingCanvas`, a `Canvas` that encodes drawing calls into frames
//! - `Transport`, which exchanges frames with a display module over a
//!   `LinkBus` and waits on its completion signal
//! - `RemoteCanvas`, the two combined, with touchscreen requests
//! - `FrameCollector` for recording command streams offline
//!
//! # Frame flow
//!
//! ```text
//!   draw_*() ──► SerializeContext ──(watermark)──► Transport::execute
//!                                                     │
//!                       LinkBus::exchange ◄───────────┘
//!                       CompletionSignal::wait (synchronous frames)
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod recorder;
pub mod remote;
pub mod transport;

pub use config::{ConfigError, HostConfig};
pub use error::TransportError;
pub use recorder::{Flush, FrameCollector, RecordingCanvas};
pub use remote::RemoteCanvas;
pub use transport::Transport;
