//! Display module responder
//!
//! The peripheral half of the link. Every exchange the module clocks out
//! what it prepared after the previous frame: a pending response, or the
//! ready announcement when nothing is pending. The received frame is then
//! replayed and the next output prepared.

use alloc::vec::Vec;

use canvaslink_protocol::handshake::ready_frame;
use canvaslink_protocol::{
    BufferSink, CodecError, DeserializeContext, SerializeConfig, SerializeContext, Synchronicity,
};

use crate::canvas::Canvas;
use crate::replay::{ModuleControl, ReplayError, ReplayOutcome, ReplayState, Replayer};

/// What the host side must do after a frame was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameResult {
    /// Raise the completion interrupt
    pub signal_host: bool,
    /// A response is waiting for the next exchange
    pub response_pending: bool,
    /// The module restarted after this frame
    pub rebooted: bool,
}

/// Display module: replays frames onto a canvas and stages responses
pub struct DisplayModule<C, K> {
    canvas: C,
    control: K,
    replayer: Replayer,
    response: SerializeContext<BufferSink>,
    outgoing: Vec<u8>,
    frames: u32,
}

impl<C: Canvas, K: ModuleControl> DisplayModule<C, K> {
    pub fn new(canvas: C, control: K) -> Result<Self, CodecError> {
        let mut module = Self {
            canvas,
            control,
            replayer: Replayer::new(),
            response: SerializeContext::new(SerializeConfig::default())?,
            outgoing: Vec::new(),
            frames: 0,
        };
        module.announce_ready();
        Ok(module)
    }

    /// Full-duplex exchange as seen from the module
    ///
    /// Fills `tx` with the staged output (zero padded), then handles the
    /// received frame. An empty `rx` is a pure read.
    pub fn exchange(
        &mut self,
        rx: &[u8],
        tx: &mut [u8],
    ) -> Result<FrameResult, ReplayError<C::Error, K::Error>> {
        let staged = self.outgoing.len().min(tx.len());
        tx[..staged].copy_from_slice(&self.outgoing[..staged]);
        tx[staged..].fill(0);

        if rx.is_empty() {
            return Ok(FrameResult::default());
        }
        self.handle_frame(rx)
    }

    /// Replay one received frame and stage the next output
    pub fn handle_frame(
        &mut self,
        frame: &[u8],
    ) -> Result<FrameResult, ReplayError<C::Error, K::Error>> {
        self.frames += 1;
        let mut ctx = DeserializeContext::from_slice(frame)?;
        let outcome = match self
            .replayer
            .replay(&mut ctx, &mut self.canvas, &mut self.control)
        {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("frame {} rejected", self.frames);
                // A faulted replayer refuses further frames
                self.replayer = Replayer::new();
                self.announce_ready();
                return Err(err);
            }
        };
        debug!("frame {}: {} commands", self.frames, outcome.commands);
        self.stage(&outcome)?;

        let mut result = FrameResult {
            signal_host: outcome.synchronicity == Some(Synchronicity::Synchronous),
            response_pending: outcome.response.is_some(),
            rebooted: false,
        };
        if outcome.reboot_requested {
            info!("module reboot");
            self.replayer = Replayer::new();
            self.announce_ready();
            result.rebooted = true;
            result.response_pending = false;
        }
        Ok(result)
    }

    fn stage<CE, KE>(&mut self, outcome: &ReplayOutcome) -> Result<(), ReplayError<CE, KE>> {
        match &outcome.response {
            Some(response) => {
                self.response.put(response)?;
                let frame = self.response.finalize()?;
                self.outgoing.clear();
                self.outgoing.extend_from_slice(frame);
            }
            None => self.announce_ready(),
        }
        Ok(())
    }

    fn announce_ready(&mut self) {
        self.outgoing.clear();
        self.outgoing.extend_from_slice(&ready_frame());
    }

    /// Bytes the next exchange will clock out
    pub fn staged_output(&self) -> &[u8] {
        &self.outgoing
    }

    pub fn replay_state(&self) -> ReplayState {
        self.replayer.state()
    }

    /// Frames received so far
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn control(&self) -> &K {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut K {
        &mut self.control
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, MockControl, RecordingMock};
    use canvaslink_protocol::handshake::is_module_ready;
    use canvaslink_protocol::{Color, Command, Response, ResponseKind, TouchEvent, TouchEventMode};

    fn frame(commands: &[Command<'_>]) -> Vec<u8> {
        let mut ctx: SerializeContext<BufferSink> =
            SerializeContext::new(SerializeConfig::default()).unwrap();
        for command in commands {
            ctx.put(command).unwrap();
        }
        ctx.finalize().unwrap().to_vec()
    }

    fn module() -> DisplayModule<RecordingMock, MockControl> {
        DisplayModule::new(RecordingMock::default(), MockControl::default()).unwrap()
    }

    #[test]
    fn test_idle_module_announces_ready() {
        let mut module = module();
        let mut tx = [0xAAu8; 64];
        module.exchange(&[], &mut tx).unwrap();
        assert!(is_module_ready(&tx));
        assert_eq!(tx[40], 0);
    }

    #[test]
    fn test_sync_frame_signals_host() {
        let mut module = module();
        let data = frame(&[
            Command::DrawFill { color: Color::BLUE },
            Command::SetSynchronicity(Synchronicity::Synchronous),
        ]);
        let mut tx = [0u8; 32];
        let result = module.exchange(&data, &mut tx).unwrap();

        assert!(result.signal_host);
        assert!(!result.response_pending);
        assert_eq!(module.canvas().calls, vec![Call::Fill(Color::BLUE)]);
    }

    #[test]
    fn test_async_frame_does_not_signal() {
        let mut module = module();
        let data = frame(&[Command::SetSynchronicity(Synchronicity::Asynchronous)]);
        let result = module.handle_frame(&data).unwrap();
        assert!(!result.signal_host);
    }

    #[test]
    fn test_response_clocked_out_on_next_exchange() {
        let mut module = module();
        module.control_mut().touch = TouchEvent {
            x: 1,
            y: 2,
            pressure: 3,
            valid: 1,
        };
        let request = frame(&[
            Command::TouchscreenWaitForEvent(TouchEventMode::NonBlocking),
            Command::SetSynchronicity(Synchronicity::Synchronous),
        ]);
        let poll = frame(&[Command::SetSynchronicity(Synchronicity::Synchronous)]);

        let mut tx = [0u8; 64];
        let result = module.exchange(&request, &mut tx).unwrap();
        assert!(result.response_pending);
        assert!(is_module_ready(&tx));

        module.exchange(&poll, &mut tx).unwrap();
        let mut ctx = DeserializeContext::from_slice(&tx).unwrap();
        assert_eq!(
            Response::decode_expecting(&mut ctx, ResponseKind::TouchEvent).unwrap(),
            Response::Touch(module.control().touch)
        );

        // Response consumed; back to the announcement
        assert!(is_module_ready(module.staged_output()));
    }

    #[test]
    fn test_reboot_resets_replayer() {
        let mut module = module();
        let data = frame(&[Command::Reboot]);
        let result = module.handle_frame(&data).unwrap();
        assert!(result.rebooted);
        assert_eq!(module.replay_state(), ReplayState::Idle);
        assert!(is_module_ready(module.staged_output()));
    }

    #[test]
    fn test_bad_frame_rejected() {
        let mut module = module();
        let result = module.handle_frame(&[4, 0, 5, b'C', 0]);
        assert!(matches!(result, Err(ReplayError::Codec(_))));
        assert_eq!(module.frames(), 1);
    }

    #[test]
    fn test_recovers_after_faulted_frame() {
        let mut module = module();
        let result = module.handle_frame(&[3, 0, 4, 0x7F]);
        assert!(matches!(
            result,
            Err(ReplayError::Codec(CodecError::UnknownOpcode(0x7F)))
        ));
        assert!(is_module_ready(module.staged_output()));

        let data = frame(&[Command::DrawFill { color: Color::RED }]);
        module.handle_frame(&data).unwrap();
        assert_eq!(module.replay_state(), ReplayState::Exhausted);
    }
}
