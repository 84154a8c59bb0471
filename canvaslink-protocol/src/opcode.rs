//! Command opcodes
//!
//! One byte per command, from a closed set. Values are ASCII letters so a
//! captured stream can be eyeballed in a hex dump.

// Drawing primitives
pub const OP_DRAW_TEST_PATTERN: u8 = b'A';
pub const OP_DRAW_PIXEL: u8 = b'B';
pub const OP_DRAW_FILL: u8 = b'C';
pub const OP_DRAW_LINE: u8 = b'D';
pub const OP_DRAW_LINE_DOTTED: u8 = b'E';
pub const OP_DRAW_CIRCLE: u8 = b'F';
pub const OP_DRAW_CIRCLE_FILLED: u8 = b'G';
pub const OP_DRAW_CORNER_FILLED: u8 = b'H';
pub const OP_DRAW_ARROW: u8 = b'I';
pub const OP_DRAW_RECTANGLE: u8 = b'J';
pub const OP_DRAW_RECTANGLE_FILLED: u8 = b'K';
pub const OP_DRAW_RECTANGLE_ROUNDED: u8 = b'L';
pub const OP_DRAW_TRIANGLE: u8 = b'M';
pub const OP_DRAW_TRIANGLE_FILLED: u8 = b'N';
pub const OP_DRAW_PROGRESS_BAR: u8 = b'O';
pub const OP_DRAW_BUTTON: u8 = b'P';
pub const OP_DRAW_ICON16: u8 = b'Q';
pub const OP_DRAW_STRING: u8 = b'R';
pub const OP_DRAW_BITMAP_INITIALIZE: u8 = b'S';
pub const OP_DRAW_BITMAP_DATA: u8 = b'T';

// Module control
pub const OP_SET_ORIENTATION: u8 = b'U';
pub const OP_SET_SYNCHRONICITY: u8 = b'V';
pub const OP_TOUCHSCREEN_CALIBRATE: u8 = b'W';
pub const OP_TOUCHSCREEN_SHOW_DIALOG: u8 = b'X';
pub const OP_TOUCHSCREEN_WAIT_FOR_EVENT: u8 = b'Y';
pub const OP_REBOOT: u8 = b'Z';
pub const OP_TOUCHSCREEN_GET_CALIBRATION_MATRIX: u8 = b'a';
pub const OP_TOUCHSCREEN_SET_CALIBRATION_MATRIX: u8 = b'b';

/// Number of opcodes in the closed set
pub const OPCODE_COUNT: usize = 28;

/// Command opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Opcode {
    DrawTestPattern,
    DrawPixel,
    DrawFill,
    DrawLine,
    DrawLineDotted,
    DrawCircle,
    DrawCircleFilled,
    DrawCornerFilled,
    DrawArrow,
    DrawRectangle,
    DrawRectangleFilled,
    DrawRectangleRounded,
    DrawTriangle,
    DrawTriangleFilled,
    DrawProgressBar,
    DrawButton,
    DrawIcon16,
    DrawString,
    DrawBitmapInitialize,
    DrawBitmapData,
    SetOrientation,
    SetSynchronicity,
    TouchscreenCalibrate,
    TouchscreenShowDialog,
    TouchscreenWaitForEvent,
    Reboot,
    TouchscreenGetCalibrationMatrix,
    TouchscreenSetCalibrationMatrix,
}

impl Opcode {
    /// All opcodes in table order
    pub const ALL: [Opcode; OPCODE_COUNT] = [
        Opcode::DrawTestPattern,
        Opcode::DrawPixel,
        Opcode::DrawFill,
        Opcode::DrawLine,
        Opcode::DrawLineDotted,
        Opcode::DrawCircle,
        Opcode::DrawCircleFilled,
        Opcode::DrawCornerFilled,
        Opcode::DrawArrow,
        Opcode::DrawRectangle,
        Opcode::DrawRectangleFilled,
        Opcode::DrawRectangleRounded,
        Opcode::DrawTriangle,
        Opcode::DrawTriangleFilled,
        Opcode::DrawProgressBar,
        Opcode::DrawButton,
        Opcode::DrawIcon16,
        Opcode::DrawString,
        Opcode::DrawBitmapInitialize,
        Opcode::DrawBitmapData,
        Opcode::SetOrientation,
        Opcode::SetSynchronicity,
        Opcode::TouchscreenCalibrate,
        Opcode::TouchscreenShowDialog,
        Opcode::TouchscreenWaitForEvent,
        Opcode::Reboot,
        Opcode::TouchscreenGetCalibrationMatrix,
        Opcode::TouchscreenSetCalibrationMatrix,
    ];

    /// Parse from the wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            OP_DRAW_TEST_PATTERN => Some(Opcode::DrawTestPattern),
            OP_DRAW_PIXEL => Some(Opcode::DrawPixel),
            OP_DRAW_FILL => Some(Opcode::DrawFill),
            OP_DRAW_LINE => Some(Opcode::DrawLine),
            OP_DRAW_LINE_DOTTED => Some(Opcode::DrawLineDotted),
            OP_DRAW_CIRCLE => Some(Opcode::DrawCircle),
            OP_DRAW_CIRCLE_FILLED => Some(Opcode::DrawCircleFilled),
            OP_DRAW_CORNER_FILLED => Some(Opcode::DrawCornerFilled),
            OP_DRAW_ARROW => Some(Opcode::DrawArrow),
            OP_DRAW_RECTANGLE => Some(Opcode::DrawRectangle),
            OP_DRAW_RECTANGLE_FILLED => Some(Opcode::DrawRectangleFilled),
            OP_DRAW_RECTANGLE_ROUNDED => Some(Opcode::DrawRectangleRounded),
            OP_DRAW_TRIANGLE => Some(Opcode::DrawTriangle),
            OP_DRAW_TRIANGLE_FILLED => Some(Opcode::DrawTriangleFilled),
            OP_DRAW_PROGRESS_BAR => Some(Opcode::DrawProgressBar),
            OP_DRAW_BUTTON => Some(Opcode::DrawButton),
            OP_DRAW_ICON16 => Some(Opcode::DrawIcon16),
            OP_DRAW_STRING => Some(Opcode::DrawString),
            OP_DRAW_BITMAP_INITIALIZE => Some(Opcode::DrawBitmapInitialize),
            OP_DRAW_BITMAP_DATA => Some(Opcode::DrawBitmapData),
            OP_SET_ORIENTATION => Some(Opcode::SetOrientation),
            OP_SET_SYNCHRONICITY => Some(Opcode::SetSynchronicity),
            OP_TOUCHSCREEN_CALIBRATE => Some(Opcode::TouchscreenCalibrate),
            OP_TOUCHSCREEN_SHOW_DIALOG => Some(Opcode::TouchscreenShowDialog),
            OP_TOUCHSCREEN_WAIT_FOR_EVENT => Some(Opcode::TouchscreenWaitForEvent),
            OP_REBOOT => Some(Opcode::Reboot),
            OP_TOUCHSCREEN_GET_CALIBRATION_MATRIX => Some(Opcode::TouchscreenGetCalibrationMatrix),
            OP_TOUCHSCREEN_SET_CALIBRATION_MATRIX => Some(Opcode::TouchscreenSetCalibrationMatrix),
            _ => None,
        }
    }

    /// Convert to the wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            Opcode::DrawTestPattern => OP_DRAW_TEST_PATTERN,
            Opcode::DrawPixel => OP_DRAW_PIXEL,
            Opcode::DrawFill => OP_DRAW_FILL,
            Opcode::DrawLine => OP_DRAW_LINE,
            Opcode::DrawLineDotted => OP_DRAW_LINE_DOTTED,
            Opcode::DrawCircle => OP_DRAW_CIRCLE,
            Opcode::DrawCircleFilled => OP_DRAW_CIRCLE_FILLED,
            Opcode::DrawCornerFilled => OP_DRAW_CORNER_FILLED,
            Opcode::DrawArrow => OP_DRAW_ARROW,
            Opcode::DrawRectangle => OP_DRAW_RECTANGLE,
            Opcode::DrawRectangleFilled => OP_DRAW_RECTANGLE_FILLED,
            Opcode::DrawRectangleRounded => OP_DRAW_RECTANGLE_ROUNDED,
            Opcode::DrawTriangle => OP_DRAW_TRIANGLE,
            Opcode::DrawTriangleFilled => OP_DRAW_TRIANGLE_FILLED,
            Opcode::DrawProgressBar => OP_DRAW_PROGRESS_BAR,
            Opcode::DrawButton => OP_DRAW_BUTTON,
            Opcode::DrawIcon16 => OP_DRAW_ICON16,
            Opcode::DrawString => OP_DRAW_STRING,
            Opcode::DrawBitmapInitialize => OP_DRAW_BITMAP_INITIALIZE,
            Opcode::DrawBitmapData => OP_DRAW_BITMAP_DATA,
            Opcode::SetOrientation => OP_SET_ORIENTATION,
            Opcode::SetSynchronicity => OP_SET_SYNCHRONICITY,
            Opcode::TouchscreenCalibrate => OP_TOUCHSCREEN_CALIBRATE,
            Opcode::TouchscreenShowDialog => OP_TOUCHSCREEN_SHOW_DIALOG,
            Opcode::TouchscreenWaitForEvent => OP_TOUCHSCREEN_WAIT_FOR_EVENT,
            Opcode::Reboot => OP_REBOOT,
            Opcode::TouchscreenGetCalibrationMatrix => OP_TOUCHSCREEN_GET_CALIBRATION_MATRIX,
            Opcode::TouchscreenSetCalibrationMatrix => OP_TOUCHSCREEN_SET_CALIBRATION_MATRIX,
        }
    }

    /// Position in [`Opcode::ALL`], used to index decode tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether replaying this opcode produces a response
    pub fn expects_response(self) -> bool {
        matches!(
            self,
            Opcode::TouchscreenShowDialog
                | Opcode::TouchscreenWaitForEvent
                | Opcode::TouchscreenGetCalibrationMatrix
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip() {
        for (i, op) in Opcode::ALL.iter().enumerate() {
            assert_eq!(Opcode::from_byte(op.to_byte()), Some(*op));
            assert_eq!(op.index(), i);
        }
    }

    #[test]
    fn test_wire_letters() {
        assert_eq!(Opcode::DrawLine.to_byte(), b'D');
        assert_eq!(Opcode::SetSynchronicity.to_byte(), b'V');
        assert_eq!(Opcode::TouchscreenSetCalibrationMatrix.to_byte(), b'b');
    }

    #[test]
    fn test_unknown_opcodes() {
        assert_eq!(Opcode::from_byte(0x00), None);
        assert_eq!(Opcode::from_byte(b'c'), None);
        assert_eq!(Opcode::from_byte(0xFF), None);
    }
}
