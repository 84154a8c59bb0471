//! Call-recording canvas and module control for unit tests

use std::string::String;
use std::vec::Vec;

use canvaslink_protocol::{
    ButtonStyle, CalibrationMatrix, Color, CornerPosition, DialogType, DrawingDirection,
    Orientation, PixelFormat, ProgressBar, RoundedCornerStyle, TouchEvent, TouchEventMode,
};

use crate::canvas::Canvas;
use crate::font::FontTable;
use crate::replay::ModuleControl;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    TestPattern,
    Pixel(u16, u16, Color),
    Fill(Color),
    Line(u16, u16, u16, u16, Color),
    LineDotted(u16, u16, u16, u16, u16, u16, Color),
    Circle(u16, u16, u16, Color),
    CircleFilled(u16, u16, u16, Color),
    CornerFilled(u16, u16, u16, CornerPosition, Color),
    Arrow(u16, u16, u16, DrawingDirection, Color),
    Rectangle(u16, u16, u16, u16, Color),
    RectangleFilled(u16, u16, u16, u16, Color),
    RectangleRounded(u16, u16, u16, u16, Color, u16, RoundedCornerStyle),
    Triangle(u16, u16, u16, u16, u16, u16, Color),
    TriangleFilled(u16, u16, u16, u16, u16, u16, Color),
    ProgressBar(ProgressBar),
    Button(ButtonStyle, u16, String),
    Icon16(u16, u16, Color, Vec<u16>),
    String(u16, u16, Color, u16, String),
    BitmapInitialize(u16, u16, u16, u16, PixelFormat),
    BitmapData(Vec<u8>),
    Orientation(Orientation),
    Calibrate,
    ShowDialog(DialogType),
    WaitForEvent(TouchEventMode),
    GetCalibration,
    SetCalibration(CalibrationMatrix),
    Reboot,
}

/// Canvas that records every call; optionally fails on the n-th one
#[derive(Debug, Default)]
pub struct RecordingMock {
    pub calls: Vec<Call>,
    pub fail_at: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

impl RecordingMock {
    fn record(&mut self, call: Call) -> Result<(), MockError> {
        if self.fail_at == Some(self.calls.len()) {
            return Err(MockError);
        }
        self.calls.push(call);
        Ok(())
    }
}

impl Canvas for RecordingMock {
    type Error = MockError;

    fn draw_test_pattern(&mut self) -> Result<(), MockError> {
        self.record(Call::TestPattern)
    }

    fn draw_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), MockError> {
        self.record(Call::Pixel(x, y, color))
    }

    fn draw_fill(&mut self, color: Color) -> Result<(), MockError> {
        self.record(Call::Fill(color))
    }

    fn draw_line(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    ) -> Result<(), MockError> {
        self.record(Call::Line(x0, y0, x1, y1, color))
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
    ) -> Result<(), MockError> {
        self.record(Call::LineDotted(x0, y0, x1, y1, empty, solid, color))
    }

    fn draw_circle(
        &mut self,
        xc: u16,
        yc: u16,
        radius: u16,
        color: Color,
    ) -> Result<(), MockError> {
        self.record(Call::Circle(xc, yc, radius, color))
    }

    fn draw_circle_filled(
        &mut self,
        xc: u16,
        yc: u16,
        radius: u16,
        color: Color,
    ) -> Result<(), MockError> {
        self.record(Call::CircleFilled(xc, yc, radius, color))
    }

    fn draw_corner_filled(
        &mut self,
        xc: u16,
        yc: u16,
        radius: u16,
        position: CornerPosition,
        color: Color,
    ) -> Result<(), MockError> {
        self.record(Call::CornerFilled(xc, yc, radius, position, color))
    }

    fn draw_arrow(
        &mut self,
        x: u16,
        y: u16,
        size: u16,
        direction: DrawingDirection,
        color: Color,
    ) -> Result<(), MockError> {
        self.record(Call::Arrow(x, y, size, direction, color))
    }

    fn draw_rectangle(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    ) -> Result<(), MockError> {
        self.record(Call::Rectangle(x0, y0, x1, y1, color))
    }

    fn draw_rectangle_filled(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    ) -> Result<(), MockError> {
        self.record(Call::RectangleFilled(x0, y0, x1, y1, color))
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
    ) -> Result<(), MockError> {
        self.record(Call::RectangleRounded(x0, y0, x1, y1, color, radius, corners))
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
    ) -> Result<(), MockError> {
        self.record(Call::Triangle(x0, y0, x1, y1, x2, y2, color))
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
    ) -> Result<(), MockError> {
        self.record(Call::TriangleFilled(x0, y0, x1, y1, x2, y2, color))
    }

    fn draw_progress_bar(&mut self, bar: &ProgressBar) -> Result<(), MockError> {
        self.record(Call::ProgressBar(*bar))
    }

    fn draw_button(
        &mut self,
        style: &ButtonStyle,
        font: &FontTable,
        text: &str,
    ) -> Result<(), MockError> {
        self.record(Call::Button(*style, font.id, text.into()))
    }

    fn draw_icon16(&mut self, x: u16, y: u16, color: Color, icon: &[u16]) -> Result<(), MockError> {
        self.record(Call::Icon16(x, y, color, icon.to_vec()))
    }

    fn draw_string(
        &mut self,
        x: u16,
        y: u16,
        color: Color,
        font: &FontTable,
        text: &str,
    ) -> Result<(), MockError> {
        self.record(Call::String(x, y, color, font.id, text.into()))
    }

    fn draw_bitmap_initialize(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        format: PixelFormat,
    ) -> Result<(), MockError> {
        self.record(Call::BitmapInitialize(x, y, width, height, format))
    }

    fn draw_bitmap_data(&mut self, data: &[u8]) -> Result<(), MockError> {
        self.record(Call::BitmapData(data.to_vec()))
    }

    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), MockError> {
        self.record(Call::Orientation(orientation))
    }
}

/// Module control that answers with canned values and records requests
#[derive(Debug, Default)]
pub struct MockControl {
    pub calls: Vec<Call>,
    pub dialog_text: String,
    pub touch: TouchEvent,
    pub matrix: CalibrationMatrix,
}

impl ModuleControl for MockControl {
    type Error = MockError;

    fn calibrate(&mut self) -> Result<(), MockError> {
        self.calls.push(Call::Calibrate);
        Ok(())
    }

    fn show_dialog(&mut self, dialog: DialogType) -> Result<String, MockError> {
        self.calls.push(Call::ShowDialog(dialog));
        Ok(self.dialog_text.clone())
    }

    fn wait_for_touch(&mut self, mode: TouchEventMode) -> Result<TouchEvent, MockError> {
        self.calls.push(Call::WaitForEvent(mode));
        Ok(self.touch)
    }

    fn calibration_matrix(&mut self) -> Result<CalibrationMatrix, MockError> {
        self.calls.push(Call::GetCalibration);
        Ok(self.matrix)
    }

    fn set_calibration_matrix(&mut self, matrix: CalibrationMatrix) -> Result<(), MockError> {
        self.calls.push(Call::SetCalibration(matrix));
        self.matrix = matrix;
        Ok(())
    }

    fn reboot(&mut self) -> Result<(), MockError> {
        self.calls.push(Call::Reboot);
        Ok(())
    }
}
