//! Command set
//!
//! Each [`Command`] is its opcode byte followed by its arguments in a fixed
//! order. Decoding dispatches through a table indexed by
//! [`Opcode::index`], so every opcode in the closed set has exactly one
//! decoder and anything else is rejected.

use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::deserialize::{Decode, DeserializeContext};
use crate::error::CodecError;
use crate::opcode::{Opcode, OPCODE_COUNT};
use crate::response::CalibrationMatrix;
use crate::serialize::{Encode, SerializeContext, TextEncoding};
use crate::sink::Sink;
use crate::source::Source;
use crate::types::{
    Color, CornerPosition, DialogType, DrawingDirection, FontHandle, Orientation, PixelFormat,
    RoundedCornerStyle, Synchronicity, TouchEventMode,
};

/// Progress bar geometry and colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProgressBar {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub border_corners: RoundedCornerStyle,
    pub progress_corners: RoundedCornerStyle,
    pub border_color: Color,
    pub border_fill_color: Color,
    pub progress_border_color: Color,
    pub progress_fill_color: Color,
    /// Percentage, 0-100
    pub progress: u16,
}

/// Button geometry and colors; the label and font travel separately
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonStyle {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub border_color: Color,
    pub fill_color: Color,
    pub font_color: Color,
    pub corner_style: RoundedCornerStyle,
}

/// One recorded drawing or control operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    DrawTestPattern,
    DrawPixel {
        x: u16,
        y: u16,
        color: Color,
    },
    DrawFill {
        color: Color,
    },
    DrawLine {
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    },
    DrawLineDotted {
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        empty: u16,
        solid: u16,
        color: Color,
    },
    DrawCircle {
        xc: u16,
        yc: u16,
        radius: u16,
        color: Color,
    },
    DrawCircleFilled {
        xc: u16,
        yc: u16,
        radius: u16,
        color: Color,
    },
    DrawCornerFilled {
        xc: u16,
        yc: u16,
        radius: u16,
        position: CornerPosition,
        color: Color,
    },
    DrawArrow {
        x: u16,
        y: u16,
        size: u16,
        direction: DrawingDirection,
        color: Color,
    },
    DrawRectangle {
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    },
    DrawRectangleFilled {
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    },
    DrawRectangleRounded {
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
        radius: u16,
        corners: RoundedCornerStyle,
    },
    DrawTriangle {
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        x2: u16,
        y2: u16,
        color: Color,
    },
    DrawTriangleFilled {
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        x2: u16,
        y2: u16,
        color: Color,
    },
    DrawProgressBar(ProgressBar),
    DrawButton {
        style: ButtonStyle,
        font: FontHandle,
        font_height: u16,
        text: Cow<'a, str>,
    },
    DrawIcon16 {
        x: u16,
        y: u16,
        color: Color,
        icon: Cow<'a, [u16]>,
    },
    DrawString {
        x: u16,
        y: u16,
        color: Color,
        font: FontHandle,
        text: Cow<'a, str>,
    },
    DrawBitmapInitialize {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        format: PixelFormat,
    },
    DrawBitmapData {
        data: Cow<'a, [u8]>,
    },
    SetOrientation(Orientation),
    SetSynchronicity(Synchronicity),
    TouchscreenCalibrate,
    TouchscreenShowDialog(DialogType),
    TouchscreenWaitForEvent(TouchEventMode),
    Reboot,
    TouchscreenGetCalibrationMatrix,
    TouchscreenSetCalibrationMatrix(CalibrationMatrix),
}

impl Command<'_> {
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::DrawTestPattern => Opcode::DrawTestPattern,
            Command::DrawPixel { .. } => Opcode::DrawPixel,
            Command::DrawFill { .. } => Opcode::DrawFill,
            Command::DrawLine { .. } => Opcode::DrawLine,
            Command::DrawLineDotted { .. } => Opcode::DrawLineDotted,
            Command::DrawCircle { .. } => Opcode::DrawCircle,
            Command::DrawCircleFilled { .. } => Opcode::DrawCircleFilled,
            Command::DrawCornerFilled { .. } => Opcode::DrawCornerFilled,
            Command::DrawArrow { .. } => Opcode::DrawArrow,
            Command::DrawRectangle { .. } => Opcode::DrawRectangle,
            Command::DrawRectangleFilled { .. } => Opcode::DrawRectangleFilled,
            Command::DrawRectangleRounded { .. } => Opcode::DrawRectangleRounded,
            Command::DrawTriangle { .. } => Opcode::DrawTriangle,
            Command::DrawTriangleFilled { .. } => Opcode::DrawTriangleFilled,
            Command::DrawProgressBar(_) => Opcode::DrawProgressBar,
            Command::DrawButton { .. } => Opcode::DrawButton,
            Command::DrawIcon16 { .. } => Opcode::DrawIcon16,
            Command::DrawString { .. } => Opcode::DrawString,
            Command::DrawBitmapInitialize { .. } => Opcode::DrawBitmapInitialize,
            Command::DrawBitmapData { .. } => Opcode::DrawBitmapData,
            Command::SetOrientation(_) => Opcode::SetOrientation,
            Command::SetSynchronicity(_) => Opcode::SetSynchronicity,
            Command::TouchscreenCalibrate => Opcode::TouchscreenCalibrate,
            Command::TouchscreenShowDialog(_) => Opcode::TouchscreenShowDialog,
            Command::TouchscreenWaitForEvent(_) => Opcode::TouchscreenWaitForEvent,
            Command::Reboot => Opcode::Reboot,
            Command::TouchscreenGetCalibrationMatrix => Opcode::TouchscreenGetCalibrationMatrix,
            Command::TouchscreenSetCalibrationMatrix(_) => Opcode::TouchscreenSetCalibrationMatrix,
        }
    }

    /// Read one command: opcode byte, then its arguments
    pub fn decode<S: Source>(
        ctx: &mut DeserializeContext<S>,
    ) -> Result<Command<'static>, CodecError> {
        let byte = ctx.get_u8()?;
        let opcode = Opcode::from_byte(byte).ok_or(CodecError::UnknownOpcode(byte))?;
        (Decoders::<S>::TABLE[opcode.index()])(ctx)
    }
}

impl Encode for Command<'_> {
    fn encode<S: Sink>(&self, ctx: &mut SerializeContext<S>) -> Result<(), CodecError> {
        ctx.put_u8(self.opcode().to_byte())?;
        match self {
            Command::DrawTestPattern
            | Command::TouchscreenCalibrate
            | Command::Reboot
            | Command::TouchscreenGetCalibrationMatrix => Ok(()),
            Command::DrawPixel { x, y, color } => {
                ctx.put_u16(*x)?;
                ctx.put_u16(*y)?;
                ctx.put(color)
            }
            Command::DrawFill { color } => ctx.put(color),
            Command::DrawLine { x0, y0, x1, y1, color }
            | Command::DrawRectangle { x0, y0, x1, y1, color }
            | Command::DrawRectangleFilled { x0, y0, x1, y1, color } => {
                put_u16s(ctx, &[*x0, *y0, *x1, *y1])?;
                ctx.put(color)
            }
            Command::DrawLineDotted { x0, y0, x1, y1, empty, solid, color } => {
                put_u16s(ctx, &[*x0, *y0, *x1, *y1, *empty, *solid])?;
                ctx.put(color)
            }
            Command::DrawCircle { xc, yc, radius, color }
            | Command::DrawCircleFilled { xc, yc, radius, color } => {
                put_u16s(ctx, &[*xc, *yc, *radius])?;
                ctx.put(color)
            }
            Command::DrawCornerFilled { xc, yc, radius, position, color } => {
                put_u16s(ctx, &[*xc, *yc, *radius])?;
                ctx.put(position)?;
                ctx.put(color)
            }
            Command::DrawArrow { x, y, size, direction, color } => {
                put_u16s(ctx, &[*x, *y, *size])?;
                ctx.put(direction)?;
                ctx.put(color)
            }
            Command::DrawRectangleRounded { x0, y0, x1, y1, color, radius, corners } => {
                put_u16s(ctx, &[*x0, *y0, *x1, *y1])?;
                ctx.put(color)?;
                ctx.put_u16(*radius)?;
                ctx.put(corners)
            }
            Command::DrawTriangle { x0, y0, x1, y1, x2, y2, color }
            | Command::DrawTriangleFilled { x0, y0, x1, y1, x2, y2, color } => {
                put_u16s(ctx, &[*x0, *y0, *x1, *y1, *x2, *y2])?;
                ctx.put(color)
            }
            Command::DrawProgressBar(bar) => {
                put_u16s(ctx, &[bar.x, bar.y, bar.width, bar.height])?;
                ctx.put(&bar.border_corners)?;
                ctx.put(&bar.progress_corners)?;
                ctx.put(&bar.border_color)?;
                ctx.put(&bar.border_fill_color)?;
                ctx.put(&bar.progress_border_color)?;
                ctx.put(&bar.progress_fill_color)?;
                ctx.put_u16(bar.progress)
            }
            Command::DrawButton { style, font, font_height, text } => {
                put_u16s(ctx, &[style.x, style.y, style.width, style.height])?;
                ctx.put(font)?;
                ctx.put_u16(*font_height)?;
                ctx.put(&style.border_color)?;
                ctx.put(&style.fill_color)?;
                ctx.put(&style.font_color)?;
                ctx.put_str(text, TextEncoding::Utf8)?;
                ctx.put(&style.corner_style)
            }
            Command::DrawIcon16 { x, y, color, icon } => {
                put_u16s(ctx, &[*x, *y])?;
                ctx.put(color)?;
                ctx.put_u16_array(icon)
            }
            Command::DrawString { x, y, color, font, text } => {
                put_u16s(ctx, &[*x, *y])?;
                ctx.put(color)?;
                ctx.put(font)?;
                ctx.put_str(text, TextEncoding::Utf8)
            }
            Command::DrawBitmapInitialize { x, y, width, height, format } => {
                put_u16s(ctx, &[*x, *y, *width, *height])?;
                ctx.put(format)
            }
            Command::DrawBitmapData { data } => ctx.put_byte_array(data),
            Command::SetOrientation(orientation) => ctx.put(orientation),
            Command::SetSynchronicity(sync) => ctx.put(sync),
            Command::TouchscreenShowDialog(dialog) => ctx.put(dialog),
            Command::TouchscreenWaitForEvent(mode) => ctx.put(mode),
            Command::TouchscreenSetCalibrationMatrix(matrix) => ctx.put(matrix),
        }
    }
}

impl Decode for Command<'static> {
    fn decode<S: Source>(ctx: &mut DeserializeContext<S>) -> Result<Self, CodecError> {
        Command::decode(ctx)
    }
}

fn put_u16s<S: Sink>(ctx: &mut SerializeContext<S>, values: &[u16]) -> Result<(), CodecError> {
    values.iter().try_for_each(|&v| ctx.put_u16(v))
}

fn get_u16s<const N: usize, S: Source>(
    ctx: &mut DeserializeContext<S>,
) -> Result<[u16; N], CodecError> {
    let mut values = [0u16; N];
    for value in values.iter_mut() {
        *value = ctx.get_u16()?;
    }
    Ok(values)
}

type DecodeFn<S> = fn(&mut DeserializeContext<S>) -> Result<Command<'static>, CodecError>;

/// Per-source decode table, in [`Opcode::ALL`] order
struct Decoders<S>(PhantomData<S>);

impl<S: Source> Decoders<S> {
    const TABLE: [DecodeFn<S>; OPCODE_COUNT] = [
        test_pattern::<S>,
        pixel::<S>,
        fill::<S>,
        line::<S>,
        line_dotted::<S>,
        circle::<S>,
        circle_filled::<S>,
        corner_filled::<S>,
        arrow::<S>,
        rectangle::<S>,
        rectangle_filled::<S>,
        rectangle_rounded::<S>,
        triangle::<S>,
        triangle_filled::<S>,
        progress_bar::<S>,
        button::<S>,
        icon16::<S>,
        string::<S>,
        bitmap_initialize::<S>,
        bitmap_data::<S>,
        orientation::<S>,
        synchronicity::<S>,
        calibrate::<S>,
        show_dialog::<S>,
        wait_for_event::<S>,
        reboot::<S>,
        get_calibration_matrix::<S>,
        set_calibration_matrix::<S>,
    ];
}

type Decoded = Result<Command<'static>, CodecError>;

fn test_pattern<S: Source>(_: &mut DeserializeContext<S>) -> Decoded {
    Ok(Command::DrawTestPattern)
}

fn pixel<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [x, y] = get_u16s(ctx)?;
    Ok(Command::DrawPixel { x, y, color: ctx.get()? })
}

fn fill<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    Ok(Command::DrawFill { color: ctx.get()? })
}

fn line<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [x0, y0, x1, y1] = get_u16s(ctx)?;
    Ok(Command::DrawLine { x0, y0, x1, y1, color: ctx.get()? })
}

fn line_dotted<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [x0, y0, x1, y1, empty, solid] = get_u16s(ctx)?;
    Ok(Command::DrawLineDotted { x0, y0, x1, y1, empty, solid, color: ctx.get()? })
}

fn circle<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [xc, yc, radius] = get_u16s(ctx)?;
    Ok(Command::DrawCircle { xc, yc, radius, color: ctx.get()? })
}

fn circle_filled<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [xc, yc, radius] = get_u16s(ctx)?;
    Ok(Command::DrawCircleFilled { xc, yc, radius, color: ctx.get()? })
}

fn corner_filled<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [xc, yc, radius] = get_u16s(ctx)?;
    let position = ctx.get()?;
    Ok(Command::DrawCornerFilled { xc, yc, radius, position, color: ctx.get()? })
}

fn arrow<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [x, y, size] = get_u16s(ctx)?;
    let direction = ctx.get()?;
    Ok(Command::DrawArrow { x, y, size, direction, color: ctx.get()? })
}

fn rectangle<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [x0, y0, x1, y1] = get_u16s(ctx)?;
    Ok(Command::DrawRectangle { x0, y0, x1, y1, color: ctx.get()? })
}

fn rectangle_filled<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [x0, y0, x1, y1] = get_u16s(ctx)?;
    Ok(Command::DrawRectangleFilled { x0, y0, x1, y1, color: ctx.get()? })
}

fn rectangle_rounded<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [x0, y0, x1, y1] = get_u16s(ctx)?;
    let color = ctx.get()?;
    let radius = ctx.get_u16()?;
    Ok(Command::DrawRectangleRounded { x0, y0, x1, y1, color, radius, corners: ctx.get()? })
}

fn triangle<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [x0, y0, x1, y1, x2, y2] = get_u16s(ctx)?;
    Ok(Command::DrawTriangle { x0, y0, x1, y1, x2, y2, color: ctx.get()? })
}

fn triangle_filled<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [x0, y0, x1, y1, x2, y2] = get_u16s(ctx)?;
    Ok(Command::DrawTriangleFilled { x0, y0, x1, y1, x2, y2, color: ctx.get()? })
}

fn progress_bar<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [x, y, width, height] = get_u16s(ctx)?;
    Ok(Command::DrawProgressBar(ProgressBar {
        x,
        y,
        width,
        height,
        border_corners: ctx.get()?,
        progress_corners: ctx.get()?,
        border_color: ctx.get()?,
        border_fill_color: ctx.get()?,
        progress_border_color: ctx.get()?,
        progress_fill_color: ctx.get()?,
        progress: ctx.get_u16()?,
    }))
}

fn button<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [x, y, width, height] = get_u16s(ctx)?;
    let font = ctx.get()?;
    let font_height = ctx.get_u16()?;
    let border_color = ctx.get()?;
    let fill_color = ctx.get()?;
    let font_color = ctx.get()?;
    let text = ctx.get_string()?;
    let corner_style = ctx.get()?;
    Ok(Command::DrawButton {
        style: ButtonStyle {
            x,
            y,
            width,
            height,
            border_color,
            fill_color,
            font_color,
            corner_style,
        },
        font,
        font_height,
        text: Cow::Owned(text),
    })
}

fn icon16<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [x, y] = get_u16s(ctx)?;
    let color = ctx.get()?;
    let icon: Vec<u16> = ctx.get_u16_array()?.unwrap_or_default();
    Ok(Command::DrawIcon16 { x, y, color, icon: Cow::Owned(icon) })
}

fn string<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [x, y] = get_u16s(ctx)?;
    let color = ctx.get()?;
    let font = ctx.get()?;
    let text = ctx.get_string()?;
    Ok(Command::DrawString { x, y, color, font, text: Cow::Owned(text) })
}

fn bitmap_initialize<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let [x, y, width, height] = get_u16s(ctx)?;
    Ok(Command::DrawBitmapInitialize { x, y, width, height, format: ctx.get()? })
}

fn bitmap_data<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    let data = ctx.get_byte_array()?.unwrap_or_default();
    Ok(Command::DrawBitmapData { data: Cow::Owned(data) })
}

fn orientation<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    Ok(Command::SetOrientation(ctx.get()?))
}

fn synchronicity<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    Ok(Command::SetSynchronicity(ctx.get()?))
}

fn calibrate<S: Source>(_: &mut DeserializeContext<S>) -> Decoded {
    Ok(Command::TouchscreenCalibrate)
}

fn show_dialog<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    Ok(Command::TouchscreenShowDialog(ctx.get()?))
}

fn wait_for_event<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    Ok(Command::TouchscreenWaitForEvent(ctx.get()?))
}

fn reboot<S: Source>(_: &mut DeserializeContext<S>) -> Decoded {
    Ok(Command::Reboot)
}

fn get_calibration_matrix<S: Source>(_: &mut DeserializeContext<S>) -> Decoded {
    Ok(Command::TouchscreenGetCalibrationMatrix)
}

fn set_calibration_matrix<S: Source>(ctx: &mut DeserializeContext<S>) -> Decoded {
    Ok(Command::TouchscreenSetCalibrationMatrix(ctx.get()?))
}
