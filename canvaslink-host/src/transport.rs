//! Link transport
//!
//! Sends finalized frames to the display module over a full-duplex
//! [`LinkBus`]. Every frame ends with a `SetSynchronicity` command; for
//! synchronous frames the transport blocks on the [`CompletionSignal`]
//! until the module reports it has finished replaying.
//!
//! The module clocks out what it prepared after the previous frame, so a
//! response to a request arrives on the exchange that follows it.

use alloc::vec;
use alloc::vec::Vec;

use canvaslink_hal::{CompletionSignal, LinkBus};
use canvaslink_protocol::handshake::is_module_ready;
use canvaslink_protocol::{
    BufferSink, Command, DeserializeContext, Response, ResponseKind, SerializeContext,
    Synchronicity,
};
use embedded_hal::delay::DelayNs;

use crate::config::HostConfig;
use crate::error::TransportError;
use crate::recorder::Flush;

/// Frame transport to one display module
pub struct Transport<L, S, D> {
    link: L,
    signal: S,
    delay: D,
    rx: Vec<u8>,
    config: HostConfig,
    frames: u32,
}

impl<L, S, D> Transport<L, S, D>
where
    L: LinkBus,
    S: CompletionSignal,
    D: DelayNs,
{
    pub fn new(
        link: L,
        signal: S,
        delay: D,
        config: HostConfig,
    ) -> Result<Self, TransportError<L::Error>> {
        config.validate()?;
        Ok(Self {
            link,
            signal,
            delay,
            rx: vec![0; config.rx_buffer_size],
            config,
            frames: 0,
        })
    }

    /// Close the frame in `ctx` and exchange it with the module
    ///
    /// `Synchronous` waits for the completion signal; `Asynchronous`
    /// returns as soon as the exchange is done.
    pub fn execute(
        &mut self,
        ctx: &mut SerializeContext<BufferSink>,
        sync: Synchronicity,
    ) -> Result<(), TransportError<L::Error>> {
        ctx.put(&Command::SetSynchronicity(sync))?;
        let frame = ctx.finalize()?;
        if frame.len() >= self.config.max_frame_size {
            error!("frame of {} bytes dropped", frame.len());
            return Err(TransportError::FrameTooLarge {
                len: frame.len(),
                max: self.config.max_frame_size,
            });
        }

        self.signal.reset();
        self.link
            .exchange(frame, &mut self.rx)
            .map_err(TransportError::Link)?;
        self.frames += 1;
        trace!("frame {}: {} bytes", self.frames, frame.len());

        if sync == Synchronicity::Synchronous {
            self.signal.wait();
        }
        Ok(())
    }

    /// Poll until the module announces itself
    ///
    /// Returns the number of polls it took.
    pub fn wait_until_ready(
        &mut self,
        ctx: &mut SerializeContext<BufferSink>,
    ) -> Result<u32, TransportError<L::Error>> {
        let mut attempts = 0;
        loop {
            self.execute(ctx, Synchronicity::Asynchronous)?;
            attempts += 1;
            if is_module_ready(&self.rx) {
                info!("module ready after {} polls", attempts);
                return Ok(attempts);
            }
            if let Some(max) = self.config.handshake_max_attempts {
                if attempts >= max {
                    warn!("module not ready after {} polls", attempts);
                    return Err(TransportError::HandshakeTimeout { attempts });
                }
            }
            debug!("module not ready, poll {}", attempts);
            self.delay.delay_ms(self.config.handshake_poll_ms);
        }
    }

    /// Send the pending request and read back its response
    ///
    /// The frame carrying the request is followed by an empty synchronous
    /// frame that clocks the staged response into the receive buffer.
    pub fn request(
        &mut self,
        ctx: &mut SerializeContext<BufferSink>,
        expected: ResponseKind,
    ) -> Result<Response, TransportError<L::Error>> {
        self.execute(ctx, Synchronicity::Synchronous)?;
        self.execute(ctx, Synchronicity::Synchronous)?;

        let mut response = DeserializeContext::from_slice(&self.rx)?;
        let decoded = Response::decode_expecting(&mut response, expected)?;
        debug!("response tag {}", expected.to_byte());
        Ok(decoded)
    }

    /// Bytes received during the last exchange
    pub fn received(&self) -> &[u8] {
        &self.rx
    }

    /// Frames exchanged so far
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Release the link, signal and delay
    pub fn release(self) -> (L, S, D) {
        (self.link, self.signal, self.delay)
    }
}

/// Crossing the watermark sends the frame synchronously
impl<L, S, D> Flush for Transport<L, S, D>
where
    L: LinkBus,
    S: CompletionSignal,
    D: DelayNs,
{
    type Error = TransportError<L::Error>;

    fn flush(&mut self, ctx: &mut SerializeContext<BufferSink>) -> Result<(), Self::Error> {
        self.execute(ctx, Synchronicity::Synchronous)
    }
}
