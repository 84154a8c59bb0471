//! Display-module side of canvaslink
//!
//! This crate provides:
//! - `Canvas` trait, the drawing surface every command maps onto
//! - `Replayer`, which decodes a command frame and dispatches it to a canvas
//! - `DisplayModule`, the link-facing state machine answering host frames
//! - `GraphicsCanvas`, a `Canvas` over any `embedded-graphics` draw target
//! - Font metric tables, color themes and a touch widget registry
//!
//! # Architecture
//!
//! ```text
//!   host frame ──► DisplayModule ──► Replayer ──► Canvas (GraphicsCanvas, ...)
//!                        │               └──────► ModuleControl (touch, dialogs)
//!                        └── staged response / ready frame ──► next exchange
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod canvas;
pub mod color;
pub mod font;
pub mod graphics;
pub mod module;
pub mod replay;
pub mod widget;

#[cfg(test)]
mod testing;

pub use canvas::Canvas;
pub use color::{to_rgb565, Theme};
pub use font::{known_font, FontRegistry, FontTable, UnknownFont};
pub use graphics::{GraphicsCanvas, GraphicsError};
pub use module::{DisplayModule, FrameResult};
pub use replay::{ModuleControl, ReplayError, ReplayOutcome, ReplayState, Replayer};
pub use widget::{RenderScope, ScreenArea, Widget, WidgetError, WidgetRegistry};
