//! Replay decoder
//!
//! Reads commands from a bound frame and drives a [`Canvas`] for drawing
//! opcodes and a [`ModuleControl`] for touch, calibration and reboot.
//!
//! ```text
//!   Idle ──replay()──► Dispatching ──no more data──► Exhausted
//!                          │                             │
//!                          │ decode / dispatch error     │ replay()
//!                          ▼                             ▼
//!                       Faulted (terminal)          Dispatching
//! ```

use alloc::string::String;

use canvaslink_protocol::{
    CalibrationMatrix, CodecError, Command, DeserializeContext, DialogType, Response, Source,
    Synchronicity, TouchEvent, TouchEventMode,
};

use crate::canvas::Canvas;
use crate::font::{FontRegistry, UnknownFont};

/// Touch panel and housekeeping operations of a display module
pub trait ModuleControl {
    /// Error type for control operations
    type Error;

    /// Run the interactive touch calibration
    fn calibrate(&mut self) -> Result<(), Self::Error>;

    /// Show an on-screen keyboard and return what was typed
    fn show_dialog(&mut self, dialog: DialogType) -> Result<String, Self::Error>;

    /// Sample the touch panel
    fn wait_for_touch(&mut self, mode: TouchEventMode) -> Result<TouchEvent, Self::Error>;

    fn calibration_matrix(&mut self) -> Result<CalibrationMatrix, Self::Error>;

    fn set_calibration_matrix(&mut self, matrix: CalibrationMatrix) -> Result<(), Self::Error>;

    /// Restart the module once the current frame is done
    fn reboot(&mut self) -> Result<(), Self::Error>;
}

/// Replayer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplayState {
    /// No frame replayed yet
    Idle,
    /// Commands are being dispatched
    Dispatching,
    /// Last frame fully consumed
    Exhausted,
    /// A frame could not be replayed; no further frames are accepted
    Faulted,
}

/// Replay errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplayError<CE, KE> {
    /// Malformed frame or command
    Codec(CodecError),
    /// Font id with no table on this module
    UnknownFont(u16),
    /// Renderer failed
    Canvas(CE),
    /// Touch or housekeeping operation failed
    Control(KE),
    /// Replayer faulted on an earlier frame
    Faulted,
}

impl<CE, KE> From<CodecError> for ReplayError<CE, KE> {
    fn from(err: CodecError) -> Self {
        ReplayError::Codec(err)
    }
}

impl<CE, KE> From<UnknownFont> for ReplayError<CE, KE> {
    fn from(err: UnknownFont) -> Self {
        ReplayError::UnknownFont(err.0)
    }
}

/// What a replayed frame asked of the link
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReplayOutcome {
    /// Commands dispatched
    pub commands: usize,
    /// Response produced by a request opcode
    pub response: Option<Response>,
    /// Last synchronicity barrier seen in the frame
    pub synchronicity: Option<Synchronicity>,
    pub reboot_requested: bool,
}

/// Command-stream replayer
#[derive(Debug)]
pub struct Replayer {
    state: ReplayState,
    fonts: FontRegistry,
}

impl Default for Replayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Replayer {
    pub fn new() -> Self {
        Self {
            state: ReplayState::Idle,
            fonts: FontRegistry::new(),
        }
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    /// Replay every command left in `ctx`
    pub fn replay<S, C, K>(
        &mut self,
        ctx: &mut DeserializeContext<S>,
        canvas: &mut C,
        control: &mut K,
    ) -> Result<ReplayOutcome, ReplayError<C::Error, K::Error>>
    where
        S: Source,
        C: Canvas,
        K: ModuleControl,
    {
        if self.state == ReplayState::Faulted {
            return Err(ReplayError::Faulted);
        }
        self.state = ReplayState::Dispatching;

        let mut outcome = ReplayOutcome::default();
        while ctx.more_data() {
            let step = Command::decode(ctx)
                .map_err(ReplayError::from)
                .and_then(|command| self.dispatch(command, canvas, control, &mut outcome));
            if let Err(err) = step {
                self.state = ReplayState::Faulted;
                warn!("replay faulted after {} commands", outcome.commands);
                return Err(err);
            }
            outcome.commands += 1;
        }

        self.state = ReplayState::Exhausted;
        trace!("replayed {} commands", outcome.commands);
        Ok(outcome)
    }

    fn dispatch<C: Canvas, K: ModuleControl>(
        &mut self,
        command: Command<'_>,
        canvas: &mut C,
        control: &mut K,
        outcome: &mut ReplayOutcome,
    ) -> Result<(), ReplayError<C::Error, K::Error>> {
        let drawn = match command {
            Command::DrawTestPattern => canvas.draw_test_pattern(),
            Command::DrawPixel { x, y, color } => canvas.draw_pixel(x, y, color),
            Command::DrawFill { color } => canvas.draw_fill(color),
            Command::DrawLine { x0, y0, x1, y1, color } => {
                canvas.draw_line(x0, y0, x1, y1, color)
            }
            Command::DrawLineDotted { x0, y0, x1, y1, empty, solid, color } => {
                canvas.draw_line_dotted(x0, y0, x1, y1, empty, solid, color)
            }
            Command::DrawCircle { xc, yc, radius, color } => {
                canvas.draw_circle(xc, yc, radius, color)
            }
            Command::DrawCircleFilled { xc, yc, radius, color } => {
                canvas.draw_circle_filled(xc, yc, radius, color)
            }
            Command::DrawCornerFilled { xc, yc, radius, position, color } => {
                canvas.draw_corner_filled(xc, yc, radius, position, color)
            }
            Command::DrawArrow { x, y, size, direction, color } => {
                canvas.draw_arrow(x, y, size, direction, color)
            }
            Command::DrawRectangle { x0, y0, x1, y1, color } => {
                canvas.draw_rectangle(x0, y0, x1, y1, color)
            }
            Command::DrawRectangleFilled { x0, y0, x1, y1, color } => {
                canvas.draw_rectangle_filled(x0, y0, x1, y1, color)
            }
            Command::DrawRectangleRounded { x0, y0, x1, y1, color, radius, corners } => {
                canvas.draw_rectangle_rounded(x0, y0, x1, y1, color, radius, corners)
            }
            Command::DrawTriangle { x0, y0, x1, y1, x2, y2, color } => {
                canvas.draw_triangle(x0, y0, x1, y1, x2, y2, color)
            }
            Command::DrawTriangleFilled { x0, y0, x1, y1, x2, y2, color } => {
                canvas.draw_triangle_filled(x0, y0, x1, y1, x2, y2, color)
            }
            Command::DrawProgressBar(bar) => canvas.draw_progress_bar(&bar),
            Command::DrawButton { style, font, font_height, text } => {
                let table = self.fonts.resolve(font)?;
                if table.height != font_height {
                    debug!("button font {} height {} != {}", font.0, font_height, table.height);
                }
                canvas.draw_button(&style, table, &text)
            }
            Command::DrawIcon16 { x, y, color, icon } => canvas.draw_icon16(x, y, color, &icon),
            Command::DrawString { x, y, color, font, text } => {
                let table = self.fonts.resolve(font)?;
                canvas.draw_string(x, y, color, table, &text)
            }
            Command::DrawBitmapInitialize { x, y, width, height, format } => {
                canvas.draw_bitmap_initialize(x, y, width, height, format)
            }
            Command::DrawBitmapData { data } => canvas.draw_bitmap_data(&data),
            Command::SetOrientation(orientation) => canvas.set_orientation(orientation),
            command => return self.dispatch_control(command, control, outcome),
        };
        drawn.map_err(ReplayError::Canvas)
    }

    fn dispatch_control<CE, K: ModuleControl>(
        &mut self,
        command: Command<'_>,
        control: &mut K,
        outcome: &mut ReplayOutcome,
    ) -> Result<(), ReplayError<CE, K::Error>> {
        let response = match command {
            Command::SetSynchronicity(sync) => {
                outcome.synchronicity = Some(sync);
                None
            }
            Command::TouchscreenCalibrate => {
                control.calibrate().map_err(ReplayError::Control)?;
                None
            }
            Command::TouchscreenShowDialog(dialog) => Some(Response::Text(
                control.show_dialog(dialog).map_err(ReplayError::Control)?,
            )),
            Command::TouchscreenWaitForEvent(mode) => Some(Response::Touch(
                control.wait_for_touch(mode).map_err(ReplayError::Control)?,
            )),
            Command::TouchscreenGetCalibrationMatrix => Some(Response::Calibration(
                control.calibration_matrix().map_err(ReplayError::Control)?,
            )),
            Command::TouchscreenSetCalibrationMatrix(matrix) => {
                control
                    .set_calibration_matrix(matrix)
                    .map_err(ReplayError::Control)?;
                None
            }
            Command::Reboot => {
                control.reboot().map_err(ReplayError::Control)?;
                outcome.reboot_requested = true;
                None
            }
            other => {
                // Drawing opcodes are handled by `dispatch`
                return Err(ReplayError::Codec(CodecError::UnknownOpcode(
                    other.opcode().to_byte(),
                )));
            }
        };

        if let Some(response) = response {
            if outcome.response.is_some() {
                warn!("frame holds more than one request; keeping the last response");
            }
            outcome.response = Some(response);
        }
        Ok(())
    }
}
