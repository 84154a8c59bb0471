//! Remote canvas
//!
//! A [`RecordingCanvas`] whose frames go straight to a display module, plus
//! the touchscreen and housekeeping operations that need the link.

use alloc::string::String;

use canvaslink_hal::{CompletionSignal, LinkBus};
use canvaslink_protocol::{
    CalibrationMatrix, Command, DialogType, Response, ResponseKind, Synchronicity, TouchEvent,
    TouchEventMode,
};
use embedded_hal::delay::DelayNs;

use crate::config::HostConfig;
use crate::error::TransportError;
use crate::recorder::RecordingCanvas;
use crate::transport::Transport;

/// Canvas drawing on a display module across a link
pub type RemoteCanvas<L, S, D> = RecordingCanvas<Transport<L, S, D>>;

type RemoteResult<T, L> = core::result::Result<T, TransportError<<L as LinkBus>::Error>>;

impl<L, S, D> RecordingCanvas<Transport<L, S, D>>
where
    L: LinkBus,
    S: CompletionSignal,
    D: DelayNs,
{
    /// Build a remote canvas; the module is not contacted yet
    pub fn connect(link: L, signal: S, delay: D, config: HostConfig) -> RemoteResult<Self, L> {
        let transport = Transport::new(link, signal, delay, config)?;
        Ok(RecordingCanvas::new(
            config.serialize_config(),
            config.max_frame_size,
            transport,
        )?)
    }

    /// Wait for the module's ready announcement
    pub fn initialize(&mut self) -> RemoteResult<u32, L> {
        self.flush.wait_until_ready(&mut self.ctx)
    }

    /// Send pending commands and wait for the module to replay them
    pub fn execute(&mut self, sync: Synchronicity) -> RemoteResult<(), L> {
        self.flush.execute(&mut self.ctx, sync)
    }

    /// Run the interactive touch calibration
    pub fn touchscreen_calibrate(&mut self) -> RemoteResult<(), L> {
        self.ctx.put(&Command::TouchscreenCalibrate)?;
        self.execute(Synchronicity::Synchronous)
    }

    /// Show an on-screen keyboard and return the entered text
    pub fn touchscreen_show_dialog(&mut self, dialog: DialogType) -> RemoteResult<String, L> {
        self.ctx.put(&Command::TouchscreenShowDialog(dialog))?;
        match self.flush.request(&mut self.ctx, ResponseKind::Text)? {
            Response::Text(text) => Ok(text),
            other => Err(unexpected(ResponseKind::Text, &other)),
        }
    }

    pub fn touchscreen_wait_for_event(
        &mut self,
        mode: TouchEventMode,
    ) -> RemoteResult<TouchEvent, L> {
        self.ctx.put(&Command::TouchscreenWaitForEvent(mode))?;
        match self.flush.request(&mut self.ctx, ResponseKind::TouchEvent)? {
            Response::Touch(event) => Ok(event),
            other => Err(unexpected(ResponseKind::TouchEvent, &other)),
        }
    }

    /// Read the module's current touch calibration
    pub fn touchscreen_calibration_matrix(&mut self) -> RemoteResult<CalibrationMatrix, L> {
        self.ctx.put(&Command::TouchscreenGetCalibrationMatrix)?;
        match self.flush.request(&mut self.ctx, ResponseKind::CalibrationMatrix)? {
            Response::Calibration(matrix) => Ok(matrix),
            other => Err(unexpected(ResponseKind::CalibrationMatrix, &other)),
        }
    }

    pub fn set_touchscreen_calibration_matrix(
        &mut self,
        matrix: CalibrationMatrix,
    ) -> RemoteResult<(), L> {
        self.ctx.put(&Command::TouchscreenSetCalibrationMatrix(matrix))?;
        self.execute(Synchronicity::Synchronous)
    }

    /// Restart the module
    ///
    /// Sent asynchronously; a rebooting module never signals completion.
    /// Call [`initialize`](Self::initialize) again before drawing.
    pub fn reboot(&mut self) -> RemoteResult<(), L> {
        self.ctx.put(&Command::Reboot)?;
        self.execute(Synchronicity::Asynchronous)
    }

    pub fn transport(&self) -> &Transport<L, S, D> {
        &self.flush
    }
}

fn unexpected<E>(expected: ResponseKind, found: &Response) -> TransportError<E> {
    TransportError::Codec(canvaslink_protocol::CodecError::UnexpectedResponse {
        expected: expected.to_byte(),
        found: found.kind().to_byte(),
    })
}
