//! Canvas over an `embedded-graphics` draw target
//!
//! Renders replayed commands onto any `DrawTarget<Color = Rgb565>`, which
//! covers most SPI TFT controller drivers.

use canvaslink_protocol::{
    ButtonStyle, Color, CornerPosition, DrawingDirection, Orientation, PixelFormat, ProgressBar,
    RoundedCornerStyle,
};
use embedded_graphics::geometry::AngleUnit;
use embedded_graphics::mono_font::ascii::FONT_6X13;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, CornerRadii, CornerRadiiBuilder, Line, PointsIter, PrimitiveStyle,
    PrimitiveStyleBuilder, Rectangle, RoundedRectangle, Sector, Triangle,
};
use embedded_graphics::text::{Baseline, Text};

use crate::canvas::Canvas;
use crate::color::to_rgb565;
use crate::font::FontTable;

/// Rendering errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GraphicsError<E> {
    /// Draw target failed
    Target(E),
    /// Bitmap data arrived with no open bitmap window
    NoBitmapWindow,
}

/// Bitmap currently being streamed in
#[derive(Debug, Clone, Copy)]
struct BitmapWindow {
    origin: Point,
    width: u32,
    pixels: u32,
    format: PixelFormat,
    next: u32,
    partial: [u8; 3],
    partial_len: usize,
}

/// [`Canvas`] rendering through `embedded-graphics`
pub struct GraphicsCanvas<D> {
    target: D,
    orientation: Orientation,
    bitmap: Option<BitmapWindow>,
}

impl<D> GraphicsCanvas<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: D) -> Self {
        Self {
            target,
            orientation: Orientation::Portrait,
            bitmap: None,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn release(self) -> D {
        self.target
    }

    fn draw<T: Drawable<Color = Rgb565>>(
        &mut self,
        item: &T,
    ) -> Result<(), GraphicsError<D::Error>> {
        item.draw(&mut self.target)
            .map(|_| ())
            .map_err(GraphicsError::Target)
    }

    fn put_pixel(&mut self, point: Point, color: Rgb565) -> Result<(), GraphicsError<D::Error>> {
        self.draw(&Pixel(point, color))
    }

    fn text(
        &mut self,
        point: Point,
        color: Color,
        font: &FontTable,
        text: &str,
    ) -> Result<(), GraphicsError<D::Error>> {
        let style = MonoTextStyle::new(mono_font_for(font), to_rgb565(color));
        self.draw(&Text::with_baseline(text, point, style, Baseline::Top))
    }
}

fn point(x: u16, y: u16) -> Point {
    Point::new(x as i32, y as i32)
}

fn corners(p0: Point, p1: Point) -> Rectangle {
    Rectangle::with_corners(p0, p1)
}

fn stroke(color: Color) -> PrimitiveStyle<Rgb565> {
    PrimitiveStyle::with_stroke(to_rgb565(color), 1)
}

fn fill(color: Color) -> PrimitiveStyle<Rgb565> {
    PrimitiveStyle::with_fill(to_rgb565(color))
}

fn corner_radii(style: RoundedCornerStyle, radius: u16) -> CornerRadii {
    let r = Size::new(radius as u32, radius as u32);
    match style {
        RoundedCornerStyle::None => CornerRadii::new(Size::zero()),
        RoundedCornerStyle::All => CornerRadii::new(r),
        RoundedCornerStyle::Top => CornerRadiiBuilder::new().top(r).build(),
        RoundedCornerStyle::Bottom => CornerRadiiBuilder::new().bottom(r).build(),
        RoundedCornerStyle::Left => CornerRadiiBuilder::new().left(r).build(),
        RoundedCornerStyle::Right => CornerRadiiBuilder::new().right(r).build(),
    }
}

/// Bitmap glyphs used for a font id; metrics still come from the table
fn mono_font_for(_font: &FontTable) -> &'static MonoFont<'static> {
    &FONT_6X13
}

fn decode_pixel(format: PixelFormat, bytes: &[u8]) -> Rgb565 {
    match format {
        PixelFormat::Rgb565 => to_rgb565(Color(u16::from_be_bytes([bytes[0], bytes[1]]))),
        PixelFormat::Rgb888 => to_rgb565(Color::from_rgb888(bytes[0], bytes[1], bytes[2])),
    }
}

const TEST_PATTERN: [Color; 8] = [
    Color::WHITE,
    Color::YELLOW,
    Color::CYAN,
    Color::GREEN,
    Color::MAGENTA,
    Color::RED,
    Color::BLUE,
    Color::BLACK,
];

impl<D> Canvas for GraphicsCanvas<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    type Error = GraphicsError<D::Error>;

    fn draw_test_pattern(&mut self) -> Result<(), Self::Error> {
        let area = self.target.bounding_box();
        let bar = (area.size.width / TEST_PATTERN.len() as u32).max(1);
        for (i, color) in TEST_PATTERN.iter().enumerate() {
            let top_left = area.top_left + Point::new((i as u32 * bar) as i32, 0);
            let rect = Rectangle::new(top_left, Size::new(bar, area.size.height));
            self.draw(&rect.into_styled(fill(*color)))?;
        }
        Ok(())
    }

    fn draw_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), Self::Error> {
        self.put_pixel(point(x, y), to_rgb565(color))
    }

    fn draw_fill(&mut self, color: Color) -> Result<(), Self::Error> {
        self.target
            .clear(to_rgb565(color))
            .map_err(GraphicsError::Target)
    }

    fn draw_line(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    ) -> Result<(), Self::Error> {
        self.draw(&Line::new(point(x0, y0), point(x1, y1)).into_styled(stroke(color)))
    }

    fn draw_line_dotted(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        empty: u16,
        solid: u16,
        color: Color,
    ) -> Result<(), Self::Error> {
        if solid == 0 {
            return Ok(());
        }
        let period = solid as u32 + empty as u32;
        let color = to_rgb565(color);
        for (i, p) in Line::new(point(x0, y0), point(x1, y1)).points().enumerate() {
            if (i as u32 % period) < solid as u32 {
                self.put_pixel(p, color)?;
            }
        }
        Ok(())
    }

    fn draw_circle(
        &mut self,
        xc: u16,
        yc: u16,
        radius: u16,
        color: Color,
    ) -> Result<(), Self::Error> {
        let diameter = radius as u32 * 2 + 1;
        self.draw(&Circle::with_center(point(xc, yc), diameter).into_styled(stroke(color)))
    }

    fn draw_circle_filled(
        &mut self,
        xc: u16,
        yc: u16,
        radius: u16,
        color: Color,
    ) -> Result<(), Self::Error> {
        let diameter = radius as u32 * 2 + 1;
        self.draw(&Circle::with_center(point(xc, yc), diameter).into_styled(fill(color)))
    }

    fn draw_corner_filled(
        &mut self,
        xc: u16,
        yc: u16,
        radius: u16,
        position: CornerPosition,
        color: Color,
    ) -> Result<(), Self::Error> {
        // Angles run clockwise from the positive x axis
        let start: f32 = match position {
            CornerPosition::BottomRight => 0.0,
            CornerPosition::BottomLeft => 90.0,
            CornerPosition::TopLeft => 180.0,
            CornerPosition::TopRight => 270.0,
        };
        let diameter = radius as u32 * 2 + 1;
        let sector = Sector::with_center(point(xc, yc), diameter, start.deg(), 90.0f32.deg());
        self.draw(&sector.into_styled(fill(color)))
    }

    fn draw_arrow(
        &mut self,
        x: u16,
        y: u16,
        size: u16,
        direction: DrawingDirection,
        color: Color,
    ) -> Result<(), Self::Error> {
        let tip = point(x, y);
        let s = size as i32;
        let (b0, b1) = match direction {
            DrawingDirection::Left => (Point::new(s, -s), Point::new(s, s)),
            DrawingDirection::Right => (Point::new(-s, -s), Point::new(-s, s)),
            DrawingDirection::Up => (Point::new(-s, s), Point::new(s, s)),
            DrawingDirection::Down => (Point::new(-s, -s), Point::new(s, -s)),
        };
        self.draw(&Triangle::new(tip, tip + b0, tip + b1).into_styled(fill(color)))
    }

    fn draw_rectangle(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    ) -> Result<(), Self::Error> {
        self.draw(&corners(point(x0, y0), point(x1, y1)).into_styled(stroke(color)))
    }

    fn draw_rectangle_filled(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    ) -> Result<(), Self::Error> {
        self.draw(&corners(point(x0, y0), point(x1, y1)).into_styled(fill(color)))
    }

    fn draw_rectangle_rounded(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
        radius: u16,
        corner_style: RoundedCornerStyle,
    ) -> Result<(), Self::Error> {
        let rect = RoundedRectangle::new(
            corners(point(x0, y0), point(x1, y1)),
            corner_radii(corner_style, radius),
        );
        self.draw(&rect.into_styled(stroke(color)))
    }

    fn draw_triangle(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        x2: u16,
        y2: u16,
        color: Color,
    ) -> Result<(), Self::Error> {
        let triangle = Triangle::new(point(x0, y0), point(x1, y1), point(x2, y2));
        self.draw(&triangle.into_styled(stroke(color)))
    }

    fn draw_triangle_filled(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        x2: u16,
        y2: u16,
        color: Color,
    ) -> Result<(), Self::Error> {
        let triangle = Triangle::new(point(x0, y0), point(x1, y1), point(x2, y2));
        self.draw(&triangle.into_styled(fill(color)))
    }

    fn draw_progress_bar(&mut self, bar: &ProgressBar) -> Result<(), Self::Error> {
        let radius = bar.height / 2;
        let outer = RoundedRectangle::new(
            Rectangle::new(point(bar.x, bar.y), Size::new(bar.width as u32, bar.height as u32)),
            corner_radii(bar.border_corners, radius),
        );
        let outer_style = PrimitiveStyleBuilder::new()
            .stroke_color(to_rgb565(bar.border_color))
            .stroke_width(1)
            .fill_color(to_rgb565(bar.border_fill_color))
            .build();
        self.draw(&outer.into_styled(outer_style))?;

        let inner_width = (bar.width.saturating_sub(4) as u32) * bar.progress.min(100) as u32 / 100;
        let inner_height = bar.height.saturating_sub(4) as u32;
        if inner_width == 0 || inner_height == 0 {
            return Ok(());
        }
        let inner = RoundedRectangle::new(
            Rectangle::new(
                point(bar.x, bar.y) + Point::new(2, 2),
                Size::new(inner_width, inner_height),
            ),
            corner_radii(bar.progress_corners, radius.saturating_sub(2)),
        );
        let inner_style = PrimitiveStyleBuilder::new()
            .stroke_color(to_rgb565(bar.progress_border_color))
            .stroke_width(1)
            .fill_color(to_rgb565(bar.progress_fill_color))
            .build();
        self.draw(&inner.into_styled(inner_style))
    }

    fn draw_button(
        &mut self,
        style: &ButtonStyle,
        font: &FontTable,
        text: &str,
    ) -> Result<(), Self::Error> {
        let radius = (style.height / 4).max(1);
        let rect = RoundedRectangle::new(
            Rectangle::new(
                point(style.x, style.y),
                Size::new(style.width as u32, style.height as u32),
            ),
            corner_radii(style.corner_style, radius),
        );
        let shape = PrimitiveStyleBuilder::new()
            .stroke_color(to_rgb565(style.border_color))
            .stroke_width(1)
            .fill_color(to_rgb565(style.fill_color))
            .build();
        self.draw(&rect.into_styled(shape))?;

        let offset = Point::new(
            (style.width.saturating_sub(font.string_width(text)) / 2) as i32,
            (style.height.saturating_sub(font.height) / 2) as i32,
        );
        let origin = point(style.x, style.y) + offset;
        self.text(origin, style.font_color, font, text)
    }

    fn draw_icon16(
        &mut self,
        x: u16,
        y: u16,
        color: Color,
        icon: &[u16],
    ) -> Result<(), Self::Error> {
        let color = to_rgb565(color);
        for (row, bits) in icon.iter().enumerate() {
            for col in 0..16 {
                if bits & (0x8000 >> col) != 0 {
                    self.put_pixel(point(x, y) + Point::new(col, row as i32), color)?;
                }
            }
        }
        Ok(())
    }

    fn draw_string(
        &mut self,
        x: u16,
        y: u16,
        color: Color,
        font: &FontTable,
        text: &str,
    ) -> Result<(), Self::Error> {
        self.text(point(x, y), color, font, text)
    }

    fn draw_bitmap_initialize(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        format: PixelFormat,
    ) -> Result<(), Self::Error> {
        self.bitmap = Some(BitmapWindow {
            origin: point(x, y),
            width: width as u32,
            pixels: width as u32 * height as u32,
            format,
            next: 0,
            partial: [0; 3],
            partial_len: 0,
        });
        Ok(())
    }

    fn draw_bitmap_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        let mut window = self.bitmap.take().ok_or(GraphicsError::NoBitmapWindow)?;
        let bpp = window.format.bytes_per_pixel();

        for &byte in data {
            if window.next >= window.pixels {
                break;
            }
            window.partial[window.partial_len] = byte;
            window.partial_len += 1;
            if window.partial_len == bpp {
                let offset = Point::new(
                    (window.next % window.width) as i32,
                    (window.next / window.width) as i32,
                );
                let color = decode_pixel(window.format, &window.partial[..bpp]);
                self.put_pixel(window.origin + offset, color)?;
                window.partial_len = 0;
                window.next += 1;
            }
        }

        if window.next < window.pixels {
            self.bitmap = Some(window);
        }
        Ok(())
    }

    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), Self::Error> {
        self.orientation = orientation;
        Ok(())
    }
}
