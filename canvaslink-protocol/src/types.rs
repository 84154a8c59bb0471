//! Enumerated and scalar argument types carried by commands

use crate::deserialize::{Decode, DeserializeContext};
use crate::error::CodecError;
use crate::serialize::{Encode, SerializeContext};
use crate::sink::Sink;
use crate::source::Source;

/// RGB565 color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Color = Color(0x0000);
    pub const BLUE: Color = Color(0x001F);
    pub const RED: Color = Color(0xF800);
    pub const GREEN: Color = Color(0x07E0);
    pub const CYAN: Color = Color(0x07FF);
    pub const MAGENTA: Color = Color(0xF81F);
    pub const YELLOW: Color = Color(0xFFE0);
    pub const WHITE: Color = Color(0xFFFF);

    /// Truncate a 24-bit color to RGB565
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        Color((((r as u16) / 8) << 11) | (((g as u16) / 4) << 5) | ((b as u16) / 8))
    }

    /// Split into 5/6/5-bit channels
    pub const fn channels(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 11) & 0x1F) as u8,
            ((self.0 >> 5) & 0x3F) as u8,
            (self.0 & 0x1F) as u8,
        )
    }
}

impl Encode for Color {
    fn encode<S: Sink>(&self, ctx: &mut SerializeContext<S>) -> Result<(), CodecError> {
        ctx.put_u16(self.0)
    }
}

impl Decode for Color {
    fn decode<S: Source>(ctx: &mut DeserializeContext<S>) -> Result<Self, CodecError> {
        Ok(Color(ctx.get_u16()?))
    }
}

/// Font identifier resolved independently on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FontHandle(pub u16);

impl Encode for FontHandle {
    fn encode<S: Sink>(&self, ctx: &mut SerializeContext<S>) -> Result<(), CodecError> {
        ctx.put_u16(self.0)
    }
}

impl Decode for FontHandle {
    fn decode<S: Source>(ctx: &mut DeserializeContext<S>) -> Result<Self, CodecError> {
        Ok(FontHandle(ctx.get_u16()?))
    }
}

/// Closed enumeration with a fixed wire width
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $repr:ident via $put:ident / $get:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)*
        }

        impl $name {
            /// Parse from the wire value
            pub fn from_value(value: $repr) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Convert to the wire value
            pub fn to_value(self) -> $repr {
                self as $repr
            }
        }

        impl Encode for $name {
            fn encode<S: Sink>(&self, ctx: &mut SerializeContext<S>) -> Result<(), CodecError> {
                ctx.$put(self.to_value())
            }
        }

        impl Decode for $name {
            fn decode<S: Source>(ctx: &mut DeserializeContext<S>) -> Result<Self, CodecError> {
                let value = ctx.$get()?;
                Self::from_value(value).ok_or(CodecError::InvalidDiscriminant(value as u16))
            }
        }
    };
}

wire_enum! {
    /// Screen orientation
    pub enum Orientation: u16 via put_u16 / get_u16 {
        /// 240 x 320
        Portrait = 0,
        /// 320 x 240
        Landscape = 1,
    }
}

wire_enum! {
    /// Execution barrier mode for a frame
    pub enum Synchronicity: u8 via put_u8 / get_u8 {
        /// Host blocks until the module signals completion
        Synchronous = 0,
        /// Host returns right after the exchange
        Asynchronous = 1,
    }
}

wire_enum! {
    /// Which corners of a rounded rectangle are rounded
    pub enum RoundedCornerStyle: u16 via put_u16 / get_u16 {
        None = 0,
        All = 1,
        Top = 2,
        Bottom = 3,
        Left = 4,
        Right = 5,
    }
}

wire_enum! {
    /// Quadrant filled by a corner primitive
    pub enum CornerPosition: u16 via put_u16 / get_u16 {
        TopLeft = 0,
        TopRight = 1,
        BottomLeft = 2,
        BottomRight = 3,
    }
}

wire_enum! {
    /// Arrow direction
    pub enum DrawingDirection: u16 via put_u16 / get_u16 {
        Left = 0,
        Right = 1,
        Up = 2,
        Down = 3,
    }
}

wire_enum! {
    /// Bitmap pixel format, valued as bytes per pixel
    pub enum PixelFormat: u16 via put_u16 / get_u16 {
        Rgb565 = 2,
        Rgb888 = 3,
    }
}

wire_enum! {
    /// On-screen keyboard shown by the module
    pub enum DialogType: u16 via put_u16 / get_u16 {
        Alphanumeric = 0,
        Numeric = 1,
    }
}

wire_enum! {
    /// Touch wait behaviour
    pub enum TouchEventMode: u8 via put_u8 / get_u8 {
        /// Wait until the screen is touched
        Blocking = 0,
        /// Report the current state immediately
        NonBlocking = 1,
    }
}

impl Orientation {
    /// Panel size as (width, height)
    pub fn dimensions(self) -> (u16, u16) {
        match self {
            Orientation::Portrait => (240, 320),
            Orientation::Landscape => (320, 240),
        }
    }
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        self.to_value() as usize
    }
}
