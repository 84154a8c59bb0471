//! Color palettes and conversions

use canvaslink_protocol::Color;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;

// Grayscale values
pub const GRAY_15: Color = Color(0x0861);
pub const GRAY_30: Color = Color(0x18E3);
pub const GRAY_50: Color = Color(0x3186);
pub const GRAY_80: Color = Color(0x528A);
pub const GRAY_128: Color = Color(0x8410);
pub const GRAY_200: Color = Color(0xCE59);
pub const GRAY_225: Color = Color(0xE71C);

/// Five related colors used for widget look-and-feel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Theme {
    pub base: Color,
    pub darker: Color,
    pub lighter: Color,
    pub shadow: Color,
    pub accent: Color,
}

pub const LIME_GREEN: Theme = Theme {
    base: Color(0xD7F0),
    darker: Color(0x8DE8),
    lighter: Color(0xEFF9),
    shadow: Color(0x73EC),
    accent: Color(0xAE6D),
};

pub const VIOLET: Theme = Theme {
    base: Color(0x8AEF),
    darker: Color(0x4187),
    lighter: Color(0xC475),
    shadow: Color(0x40E6),
    accent: Color(0xC992),
};

pub const EARTHY: Theme = Theme {
    base: Color(0x6269),
    darker: Color(0x3103),
    lighter: Color(0x8C30),
    shadow: Color(0xAB29),
    accent: Color(0xFE77),
};

pub const SKY_BLUE: Theme = Theme {
    base: Color(0x95BF),
    darker: Color(0x73B0),
    lighter: Color(0xE75F),
    shadow: Color(0x4ACF),
    accent: Color(0xB5F9),
};

impl Default for Theme {
    fn default() -> Self {
        LIME_GREEN
    }
}

/// Wire color to embedded-graphics color
pub fn to_rgb565(color: Color) -> Rgb565 {
    Rgb565::from(RawU16::new(color.0))
}
