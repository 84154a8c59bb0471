//! Tagged responses sent from the module back to the host
//!
//! A response frame is a normal frame whose content starts with a one-byte
//! tag naming the payload that follows.

use alloc::string::String;

use crate::deserialize::{Decode, DeserializeContext};
use crate::error::CodecError;
use crate::serialize::{Encode, SerializeContext, TextEncoding};
use crate::sink::{Sink, StreamSink};
use crate::source::{Source, StreamSource};

// Response tags
pub const RESPONSE_TEXT: u8 = 0;
pub const RESPONSE_TOUCH_EVENT: u8 = 1;
pub const RESPONSE_CALIBRATION_MATRIX: u8 = 2;

/// Response payload kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseKind {
    Text,
    TouchEvent,
    CalibrationMatrix,
}

impl ResponseKind {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            RESPONSE_TEXT => Some(ResponseKind::Text),
            RESPONSE_TOUCH_EVENT => Some(ResponseKind::TouchEvent),
            RESPONSE_CALIBRATION_MATRIX => Some(ResponseKind::CalibrationMatrix),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            ResponseKind::Text => RESPONSE_TEXT,
            ResponseKind::TouchEvent => RESPONSE_TOUCH_EVENT,
            ResponseKind::CalibrationMatrix => RESPONSE_CALIBRATION_MATRIX,
        }
    }
}

/// Touch sample reported by the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchEvent {
    pub x: u16,
    pub y: u16,
    pub pressure: u32,
    /// Non-zero when the sample is a real touch
    pub valid: u8,
}

impl TouchEvent {
    pub fn is_valid(&self) -> bool {
        self.valid != 0
    }
}

impl Encode for TouchEvent {
    fn encode<S: Sink>(&self, ctx: &mut SerializeContext<S>) -> Result<(), CodecError> {
        ctx.put_u16(self.x)?;
        ctx.put_u16(self.y)?;
        ctx.put_u32(self.pressure)?;
        ctx.put_u8(self.valid)
    }
}

impl Decode for TouchEvent {
    fn decode<S: Source>(ctx: &mut DeserializeContext<S>) -> Result<Self, CodecError> {
        Ok(TouchEvent {
            x: ctx.get_u16()?,
            y: ctx.get_u16()?,
            pressure: ctx.get_u32()?,
            valid: ctx.get_u8()?,
        })
    }
}

/// Touch panel calibration coefficients
///
/// Maps raw panel samples to screen coordinates:
/// `x = (a*X + b*Y + c) / divider`, `y = (d*X + e*Y + f) / divider`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationMatrix {
    pub a: i32,
    pub b: i32,
    pub c: i32,
    pub d: i32,
    pub e: i32,
    pub f: i32,
    pub divider: i32,
}

impl CalibrationMatrix {
    /// Map a raw sample; `None` for an uncalibrated (zero divider) matrix
    pub fn transform(&self, raw_x: i32, raw_y: i32) -> Option<(i32, i32)> {
        if self.divider == 0 {
            return None;
        }
        let (x, y, div) = (raw_x as i64, raw_y as i64, self.divider as i64);
        let sx = (self.a as i64 * x + self.b as i64 * y + self.c as i64) / div;
        let sy = (self.d as i64 * x + self.e as i64 * y + self.f as i64) / div;
        Some((sx as i32, sy as i32))
    }

    /// Persist to a stream, e.g. a file on removable storage
    pub fn save<W: embedded_io::Write>(&self, writer: W) -> Result<W, CodecError> {
        let mut ctx: SerializeContext<StreamSink<W>> = SerializeContext::for_stream(writer)?;
        ctx.put(self)?;
        ctx.into_writer()
    }

    /// Load a matrix written by [`CalibrationMatrix::save`]
    pub fn load<R: embedded_io::Read + embedded_io::Seek>(reader: R) -> Result<Self, CodecError> {
        let mut ctx: DeserializeContext<StreamSource<R>> = DeserializeContext::for_stream(reader)?;
        ctx.get()
    }
}

impl Encode for CalibrationMatrix {
    fn encode<S: Sink>(&self, ctx: &mut SerializeContext<S>) -> Result<(), CodecError> {
        for value in [self.a, self.b, self.c, self.d, self.e, self.f, self.divider] {
            ctx.put_i32(value)?;
        }
        Ok(())
    }
}

impl Decode for CalibrationMatrix {
    fn decode<S: Source>(ctx: &mut DeserializeContext<S>) -> Result<Self, CodecError> {
        Ok(CalibrationMatrix {
            a: ctx.get_i32()?,
            b: ctx.get_i32()?,
            c: ctx.get_i32()?,
            d: ctx.get_i32()?,
            e: ctx.get_i32()?,
            f: ctx.get_i32()?,
            divider: ctx.get_i32()?,
        })
    }
}

/// Response frame content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Text typed into an on-screen dialog
    Text(String),
    Touch(TouchEvent),
    Calibration(CalibrationMatrix),
}

impl Response {
    pub fn kind(&self) -> ResponseKind {
        match self {
            Response::Text(_) => ResponseKind::Text,
            Response::Touch(_) => ResponseKind::TouchEvent,
            Response::Calibration(_) => ResponseKind::CalibrationMatrix,
        }
    }

    /// Decode a response, failing unless its tag is `expected`
    pub fn decode_expecting<S: Source>(
        ctx: &mut DeserializeContext<S>,
        expected: ResponseKind,
    ) -> Result<Self, CodecError> {
        let tag = ctx.get_u8()?;
        if tag != expected.to_byte() {
            return Err(CodecError::UnexpectedResponse {
                expected: expected.to_byte(),
                found: tag,
            });
        }
        Self::decode_payload(ctx, expected)
    }

    fn decode_payload<S: Source>(
        ctx: &mut DeserializeContext<S>,
        kind: ResponseKind,
    ) -> Result<Self, CodecError> {
        Ok(match kind {
            ResponseKind::Text => Response::Text(ctx.get_string()?),
            ResponseKind::TouchEvent => Response::Touch(ctx.get()?),
            ResponseKind::CalibrationMatrix => Response::Calibration(ctx.get()?),
        })
    }
}

impl Encode for Response {
    fn encode<S: Sink>(&self, ctx: &mut SerializeContext<S>) -> Result<(), CodecError> {
        ctx.put_u8(self.kind().to_byte())?;
        match self {
            Response::Text(text) => ctx.put_str(text, TextEncoding::Utf8),
            Response::Touch(event) => ctx.put(event),
            Response::Calibration(matrix) => ctx.put(matrix),
        }
    }
}

impl Decode for Response {
    fn decode<S: Source>(ctx: &mut DeserializeContext<S>) -> Result<Self, CodecError> {
        let tag = ctx.get_u8()?;
        let kind = ResponseKind::from_byte(tag).ok_or(CodecError::InvalidDiscriminant(tag as u16))?;
        Self::decode_payload(ctx, kind)
    }
}
