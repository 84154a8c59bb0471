//! Recording canvas
//!
//! A [`Canvas`] that encodes every call into an outgoing frame instead of
//! drawing it. When a complete command leaves the frame at or above the
//! high-watermark, the frame is handed to a [`Flush`] implementation:
//! the link transport on a live host, or a [`FrameCollector`] for offline
//! recording.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use canvaslink_display::{Canvas, FontTable};
use canvaslink_protocol::{
    BufferSink, ButtonStyle, CodecError, Color, Command, CornerPosition, DrawingDirection,
    Orientation, PixelFormat, ProgressBar, RoundedCornerStyle, SerializeConfig, SerializeContext,
    HEADER_SIZE,
};

/// Destination for full frames
pub trait Flush {
    type Error: From<CodecError>;

    /// Finalize and deliver the pending frame, leaving `ctx` empty
    ///
    /// Must not return before the frame has been consumed.
    fn flush(&mut self, ctx: &mut SerializeContext<BufferSink>) -> Result<(), Self::Error>;
}

impl<T: Flush + ?Sized> Flush for &mut T {
    type Error = T::Error;

    fn flush(&mut self, ctx: &mut SerializeContext<BufferSink>) -> Result<(), Self::Error> {
        T::flush(self, ctx)
    }
}

/// Opcode byte plus u16 element count of a `DrawBitmapData` chunk
const BITMAP_CHUNK_OVERHEAD: usize = 3;

/// Trailing `SetSynchronicity` a transport appends before sending
const SYNC_TRAILER: usize = 2;

/// Canvas that records commands into frames
pub struct RecordingCanvas<F> {
    pub(crate) ctx: SerializeContext<BufferSink>,
    pub(crate) flush: F,
    frame_limit: usize,
    orientation: Orientation,
    commands: u32,
    flushes: u32,
}

impl<F: Flush> RecordingCanvas<F> {
    /// Create a recorder
    ///
    /// Frames never grow to `frame_limit` bytes; bitmap chunks are cut to
    /// stay below it.
    pub fn new(config: SerializeConfig, frame_limit: usize, flush: F) -> Result<Self, CodecError> {
        Ok(Self {
            ctx: SerializeContext::new(config)?,
            flush,
            frame_limit,
            orientation: Orientation::Portrait,
            commands: 0,
            flushes: 0,
        })
    }

    /// Encode one command, then flush if the watermark was reached
    pub fn record(&mut self, command: &Command<'_>) -> Result<(), F::Error> {
        self.ctx.put(command)?;
        self.commands += 1;
        let flush = &mut self.flush;
        if self.ctx.check_high_watermark(|ctx| flush.flush(ctx))? {
            self.flushes += 1;
            trace!("watermark flush after {} commands", self.commands);
        }
        Ok(())
    }

    /// Deliver whatever is pending, even below the watermark
    pub fn flush(&mut self) -> Result<(), F::Error> {
        self.flush.flush(&mut self.ctx)?;
        self.flushes += 1;
        Ok(())
    }

    /// Send an image as one `DrawBitmapInitialize` and as many
    /// `DrawBitmapData` chunks as needed
    ///
    /// Each chunk fills the space left in the current frame and is flushed
    /// right away, so only one chunk is ever buffered.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_bitmap(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        format: PixelFormat,
        pixels: &[u8],
    ) -> Result<(), F::Error> {
        self.draw_bitmap_initialize(x, y, width, height, format)?;

        let mut rest = pixels;
        while !rest.is_empty() {
            let mut room = self.chunk_room();
            if room == 0 {
                self.flush()?;
                room = self.chunk_room();
            }
            if room == 0 {
                return Err(CodecError::FrameTooLong(self.ctx.len()).into());
            }
            let (chunk, tail) = rest.split_at(room.min(rest.len()));
            self.ctx.put(&Command::DrawBitmapData {
                data: Cow::Borrowed(chunk),
            })?;
            self.commands += 1;
            self.flush()?;
            rest = tail;
        }
        debug!("bitmap {}x{}: {} bytes", width, height, pixels.len());
        Ok(())
    }

    /// Bitmap bytes that still fit in the current frame
    fn chunk_room(&self) -> usize {
        self.frame_limit
            .saturating_sub(1)
            .saturating_sub(self.ctx.len() + BITMAP_CHUNK_OVERHEAD + SYNC_TRAILER)
            .min(u16::MAX as usize)
    }

    /// Current orientation as last recorded
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Screen width for the current orientation
    pub fn width(&self) -> u16 {
        self.orientation.dimensions().0
    }

    /// Screen height for the current orientation
    pub fn height(&self) -> u16 {
        self.orientation.dimensions().1
    }

    /// Commands recorded so far
    pub fn commands(&self) -> u32 {
        self.commands
    }

    /// Frames flushed so far
    pub fn flushes(&self) -> u32 {
        self.flushes
    }

    /// Whether any command is waiting in the frame
    pub fn has_pending(&self) -> bool {
        self.ctx.len() > HEADER_SIZE
    }

    pub fn context(&self) -> &SerializeContext<BufferSink> {
        &self.ctx
    }

    pub fn flusher(&self) -> &F {
        &self.flush
    }

    pub fn flusher_mut(&mut self) -> &mut F {
        &mut self.flush
    }

    pub fn into_flusher(self) -> F {
        self.flush
    }
}

impl<F: Flush> Canvas for RecordingCanvas<F> {
    type Error = F::Error;

    fn draw_test_pattern(&mut self) -> Result<(), Self::Error> {
        self.record(&Command::DrawTestPattern)
    }

    fn draw_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), Self::Error> {
        self.record(&Command::DrawPixel { x, y, color })
    }

    fn draw_fill(&mut self, color: Color) -> Result<(), Self::Error> {
        self.record(&Command::DrawFill { color })
    }

    fn draw_line(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    ) -> Result<(), Self::Error> {
        self.record(&Command::DrawLine { x0, y0, x1, y1, color })
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
        self.record(&Command::DrawLineDotted {
            x0,
            y0,
            x1,
            y1,
            empty,
            solid,
            color,
        })
    }

    fn draw_circle(
        &mut self,
        xc: u16,
        yc: u16,
        radius: u16,
        color: Color,
    ) -> Result<(), Self::Error> {
        self.record(&Command::DrawCircle { xc, yc, radius, color })
    }

    fn draw_circle_filled(
        &mut self,
        xc: u16,
        yc: u16,
        radius: u16,
        color: Color,
    ) -> Result<(), Self::Error> {
        self.record(&Command::DrawCircleFilled { xc, yc, radius, color })
    }

    fn draw_corner_filled(
        &mut self,
        xc: u16,
        yc: u16,
        radius: u16,
        position: CornerPosition,
        color: Color,
    ) -> Result<(), Self::Error> {
        self.record(&Command::DrawCornerFilled {
            xc,
            yc,
            radius,
            position,
            color,
        })
    }

    fn draw_arrow(
        &mut self,
        x: u16,
        y: u16,
        size: u16,
        direction: DrawingDirection,
        color: Color,
    ) -> Result<(), Self::Error> {
        self.record(&Command::DrawArrow {
            x,
            y,
            size,
            direction,
            color,
        })
    }

    fn draw_rectangle(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    ) -> Result<(), Self::Error> {
        self.record(&Command::DrawRectangle { x0, y0, x1, y1, color })
    }

    fn draw_rectangle_filled(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    ) -> Result<(), Self::Error> {
        self.record(&Command::DrawRectangleFilled { x0, y0, x1, y1, color })
    }

    fn draw_rectangle_rounded(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
        radius: u16,
        corners: RoundedCornerStyle,
    ) -> Result<(), Self::Error> {
        self.record(&Command::DrawRectangleRounded {
            x0,
            y0,
            x1,
            y1,
            color,
            radius,
            corners,
        })
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
        self.record(&Command::DrawTriangle {
            x0,
            y0,
            x1,
            y1,
            x2,
            y2,
            color,
        })
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
        self.record(&Command::DrawTriangleFilled {
            x0,
            y0,
            x1,
            y1,
            x2,
            y2,
            color,
        })
    }

    fn draw_progress_bar(&mut self, bar: &ProgressBar) -> Result<(), Self::Error> {
        self.record(&Command::DrawProgressBar(*bar))
    }

    fn draw_button(
        &mut self,
        style: &ButtonStyle,
        font: &FontTable,
        text: &str,
    ) -> Result<(), Self::Error> {
        self.record(&Command::DrawButton {
            style: *style,
            font: font.handle(),
            font_height: font.height,
            text: Cow::Borrowed(text),
        })
    }

    fn draw_icon16(
        &mut self,
        x: u16,
        y: u16,
        color: Color,
        icon: &[u16],
    ) -> Result<(), Self::Error> {
        self.record(&Command::DrawIcon16 {
            x,
            y,
            color,
            icon: Cow::Borrowed(icon),
        })
    }

    fn draw_string(
        &mut self,
        x: u16,
        y: u16,
        color: Color,
        font: &FontTable,
        text: &str,
    ) -> Result<(), Self::Error> {
        self.record(&Command::DrawString {
            x,
            y,
            color,
            font: font.handle(),
            text: Cow::Borrowed(text),
        })
    }

    fn draw_bitmap_initialize(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        format: PixelFormat,
    ) -> Result<(), Self::Error> {
        self.record(&Command::DrawBitmapInitialize {
            x,
            y,
            width,
            height,
            format,
        })
    }

    fn draw_bitmap_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.record(&Command::DrawBitmapData {
            data: Cow::Borrowed(data),
        })
    }

    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), Self::Error> {
        self.record(&Command::SetOrientation(orientation))?;
        self.orientation = orientation;
        Ok(())
    }
}

/// [`Flush`] that keeps every finalized frame in memory
#[derive(Debug, Default)]
pub struct FrameCollector {
    frames: Vec<Vec<u8>>,
}

impl FrameCollector {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Vec<u8>> {
        self.frames
    }
}

impl Flush for FrameCollector {
    type Error = CodecError;

    fn flush(&mut self, ctx: &mut SerializeContext<BufferSink>) -> Result<(), CodecError> {
        if ctx.is_empty() {
            return Ok(());
        }
        self.frames.push(ctx.finalize()?.to_vec());
        Ok(())
    }
}
