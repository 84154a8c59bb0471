//! Canvaslink Hardware Abstraction Layer
//!
//! Traits that separate the command-stream transport from the physical link
//! between the host controller and the display module.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  canvaslink-host (transport, canvas)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  canvaslink-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │   loopback /  │
//! │  SpiDevice    │       │  test links   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`link::LinkBus`] - Full-duplex frame exchange
//! - [`signal::CompletionSignal`] - "Module finished processing" notification

#![no_std]
#![deny(unsafe_code)]

pub mod link;
pub mod signal;

// Re-export key traits at crate root for convenience
pub use link::{LinkBus, LinkConfig, LinkConfigError, SpiLink};
pub use signal::CompletionSignal;
