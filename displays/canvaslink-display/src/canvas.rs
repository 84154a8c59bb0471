//! Canvas trait
//!
//! The drawing surface shared by real renderers and the host's recording
//! canvas. A command stream replayed onto a `Canvas` produces exactly one
//! call per drawing opcode, in recorded order.

use canvaslink_protocol::{
    ButtonStyle, Color, CornerPosition, DrawingDirection, Orientation, PixelFormat, ProgressBar,
    RoundedCornerStyle,
};

use crate::font::FontTable;

/// Drawing surface
///
/// Coordinates are in pixels with the origin at the top-left corner of the
/// current orientation.
#[allow(clippy::too_many_arguments)]
pub trait Canvas {
    /// Error type for drawing operations
    type Error;

    /// Draw the module's built-in test pattern
    fn draw_test_pattern(&mut self) -> Result<(), Self::Error>;

    fn draw_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), Self::Error>;

    /// Fill the whole screen
    fn draw_fill(&mut self, color: Color) -> Result<(), Self::Error>;

    fn draw_line(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    ) -> Result<(), Self::Error>;

    /// Draw a line alternating `solid` drawn pixels and `empty` skipped ones
    fn draw_line_dotted(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        empty: u16,
        solid: u16,
        color: Color,
    ) -> Result<(), Self::Error>;

    fn draw_circle(&mut self, xc: u16, yc: u16, radius: u16, color: Color)
        -> Result<(), Self::Error>;

    fn draw_circle_filled(
        &mut self,
        xc: u16,
        yc: u16,
        radius: u16,
        color: Color,
    ) -> Result<(), Self::Error>;

    /// Fill one quadrant of a circle
    fn draw_corner_filled(
        &mut self,
        xc: u16,
        yc: u16,
        radius: u16,
        position: CornerPosition,
        color: Color,
    ) -> Result<(), Self::Error>;

    /// Draw a filled arrow head pointing in `direction`
    fn draw_arrow(
        &mut self,
        x: u16,
        y: u16,
        size: u16,
        direction: DrawingDirection,
        color: Color,
    ) -> Result<(), Self::Error>;

    fn draw_rectangle(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    ) -> Result<(), Self::Error>;

    fn draw_rectangle_filled(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    ) -> Result<(), Self::Error>;

    fn draw_rectangle_rounded(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
        radius: u16,
        corners: RoundedCornerStyle,
    ) -> Result<(), Self::Error>;

    fn draw_triangle(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        x2: u16,
        y2: u16,
        color: Color,
    ) -> Result<(), Self::Error>;

    fn draw_triangle_filled(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        x2: u16,
        y2: u16,
        color: Color,
    ) -> Result<(), Self::Error>;

    fn draw_progress_bar(&mut self, bar: &ProgressBar) -> Result<(), Self::Error>;

    /// Draw a button with `text` centered in `font`
    fn draw_button(
        &mut self,
        style: &ButtonStyle,
        font: &FontTable,
        text: &str,
    ) -> Result<(), Self::Error>;

    /// Draw a 16-pixel-wide monochrome icon, one row per element, MSB left
    fn draw_icon16(&mut self, x: u16, y: u16, color: Color, icon: &[u16])
        -> Result<(), Self::Error>;

    /// Draw `text` with its top-left corner at (x, y)
    fn draw_string(
        &mut self,
        x: u16,
        y: u16,
        color: Color,
        font: &FontTable,
        text: &str,
    ) -> Result<(), Self::Error>;

    /// Open a bitmap window; pixel bytes follow via [`Canvas::draw_bitmap_data`]
    fn draw_bitmap_initialize(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        format: PixelFormat,
    ) -> Result<(), Self::Error>;

    /// Append pixel bytes to the open bitmap window
    fn draw_bitmap_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), Self::Error>;
}
