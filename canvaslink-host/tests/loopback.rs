//! Host and display module wired back to back
//!
//! The link hands each host frame to a `DisplayModule` rendering into an
//! in-memory framebuffer and raises the completion signal the way the
//! module's interrupt line would.

use std::convert::Infallible;

use canvaslink_display::widget::RenderScope;
use canvaslink_display::{
    Canvas, DisplayModule, GraphicsCanvas, GraphicsError, ModuleControl, ReplayError, Widget,
    WidgetRegistry,
};
use canvaslink_hal::LinkBus;
use canvaslink_host::{HostConfig, RemoteCanvas, TransportError};
use canvaslink_protocol::{
    CalibrationMatrix, Color, DialogType, Orientation, PixelFormat, Synchronicity, TouchEvent,
    TouchEventMode,
};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;

const W: usize = 80;
const H: usize = 64;

struct FrameBuffer {
    pixels: Vec<Rgb565>,
}

impl FrameBuffer {
    fn new() -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; W * H],
        }
    }

    fn at(&self, x: usize, y: usize) -> Rgb565 {
        self.pixels[y * W + x]
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(W as u32, H as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Infallible>
    where
        I: IntoIterator<Item = Pixel<Rgb565>>,
    {
        for Pixel(p, c) in pixels {
            if p.x >= 0 && p.y >= 0 && (p.x as usize) < W && (p.y as usize) < H {
                self.pixels[p.y as usize * W + p.x as usize] = c;
            }
        }
        Ok(())
    }
}

/// Touch panel with canned answers
#[derive(Default)]
struct Panel {
    calibrations: u32,
    reboots: u32,
    matrix: CalibrationMatrix,
    touch: Option<TouchEvent>,
}

impl ModuleControl for Panel {
    type Error = Infallible;

    fn calibrate(&mut self) -> Result<(), Infallible> {
        self.calibrations += 1;
        Ok(())
    }

    fn show_dialog(&mut self, dialog: DialogType) -> Result<String, Infallible> {
        Ok(match dialog {
            DialogType::Numeric => "1234".to_string(),
            DialogType::Alphanumeric => "hello".to_string(),
        })
    }

    fn wait_for_touch(&mut self, _mode: TouchEventMode) -> Result<TouchEvent, Infallible> {
        Ok(self.touch.unwrap_or(TouchEvent {
            x: 0,
            y: 0,
            pressure: 0,
            valid: 0,
        }))
    }

    fn calibration_matrix(&mut self) -> Result<CalibrationMatrix, Infallible> {
        Ok(self.matrix)
    }

    fn set_calibration_matrix(&mut self, matrix: CalibrationMatrix) -> Result<(), Infallible> {
        self.matrix = matrix;
        Ok(())
    }

    fn reboot(&mut self) -> Result<(), Infallible> {
        self.reboots += 1;
        Ok(())
    }
}

type Module = DisplayModule<GraphicsCanvas<FrameBuffer>, Panel>;
type LinkError = ReplayError<GraphicsError<Infallible>, Infallible>;

struct Loopback<'a> {
    module: Module,
    signal: &'a Signal<NoopRawMutex, ()>,
    frames: usize,
}

impl LinkBus for Loopback<'_> {
    type Error = LinkError;

    fn exchange(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), LinkError> {
        self.frames += 1;
        let result = self.module.exchange(tx, rx)?;
        if result.signal_host {
            self.signal.signal(());
        }
        Ok(())
    }
}

/// Link to a module that never answers
struct DeadLink;

impl LinkBus for DeadLink {
    type Error = Infallible;

    fn exchange(&mut self, _tx: &[u8], rx: &mut [u8]) -> Result<(), Infallible> {
        rx.fill(0);
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

type Remote<'a> = RemoteCanvas<Loopback<'a>, &'a Signal<NoopRawMutex, ()>, NoDelay>;

fn small_frames() -> HostConfig {
    HostConfig {
        tx_buffer_size: 1024,
        high_watermark: 900,
        rx_buffer_size: 1024,
        max_frame_size: 1024,
        ..Default::default()
    }
}

fn remote(signal: &Signal<NoopRawMutex, ()>, config: HostConfig) -> Remote<'_> {
    let module =
        DisplayModule::new(GraphicsCanvas::new(FrameBuffer::new()), Panel::default()).unwrap();
    let link = Loopback {
        module,
        signal,
        frames: 0,
    };
    let mut remote = RemoteCanvas::connect(link, signal, NoDelay, config).unwrap();
    assert_eq!(remote.initialize().unwrap(), 1);
    remote
}

fn module<'a>(remote: &'a Remote<'_>) -> &'a Module {
    &remote.transport().link().module
}

#[test]
fn test_drawing_reaches_framebuffer() {
    let signal = Signal::new();
    let mut remote = remote(&signal, HostConfig::default());

    remote.draw_fill(Color::BLUE).unwrap();
    remote.draw_line(5, 10, 20, 10, Color::RED).unwrap();
    remote.draw_pixel(70, 50, Color::GREEN).unwrap();
    remote.execute(Synchronicity::Synchronous).unwrap();

    let fb = module(&remote).canvas().target();
    assert_eq!(fb.at(0, 0), Rgb565::BLUE);
    assert_eq!(fb.at(5, 10), Rgb565::RED);
    assert_eq!(fb.at(20, 10), Rgb565::RED);
    assert_eq!(fb.at(70, 50), Rgb565::GREEN);
}

#[test]
fn test_watermark_flushes_transparently() {
    let signal = Signal::new();
    let mut remote = remote(&signal, small_frames());

    // 7 bytes per pixel: several frames worth
    for y in 0..H as u16 {
        for x in 0..4u16 {
            remote.draw_pixel(x, y, Color::WHITE).unwrap();
        }
    }
    assert!(remote.flushes() >= 1);
    remote.execute(Synchronicity::Synchronous).unwrap();

    let fb = module(&remote).canvas().target();
    assert!((0..H).all(|y| (0..4).all(|x| fb.at(x, y) == Rgb565::WHITE)));
    assert_eq!(fb.at(4, 0), Rgb565::BLACK);
}

#[test]
fn test_bitmap_larger_than_frame() {
    let signal = Signal::new();
    let mut remote = remote(&signal, small_frames());

    let (width, height) = (75u16, 60u16);
    let mut pixels = Vec::with_capacity(9000);
    for i in 0..(width as usize * height as usize) {
        let color: u16 = if i % 2 == 0 { 0xF800 } else { 0x001F };
        pixels.extend_from_slice(&color.to_be_bytes());
    }
    assert_eq!(pixels.len(), 9000);

    let before = remote.transport().frames();
    remote
        .draw_bitmap(2, 1, width, height, PixelFormat::Rgb565, &pixels)
        .unwrap();
    assert!(remote.transport().frames() - before >= 9);

    let fb = module(&remote).canvas().target();
    assert_eq!(fb.at(2, 1), Rgb565::RED);
    assert_eq!(fb.at(3, 1), Rgb565::BLUE);
    assert_eq!(fb.at(76, 60), Rgb565::BLUE);
    assert_eq!(fb.at(77, 60), Rgb565::BLACK);
}

#[test]
fn test_touch_event_round_trip() {
    let signal = Signal::new();
    let mut remote = remote(&signal, HostConfig::default());
    let event = TouchEvent {
        x: 15,
        y: 20,
        pressure: 512,
        valid: 1,
    };
    remote.flusher_mut().link_mut().module.control_mut().touch = Some(event);

    let received = remote
        .touchscreen_wait_for_event(TouchEventMode::Blocking)
        .unwrap();
    assert_eq!(received, event);
}

#[test]
fn test_dialog_text() {
    let signal = Signal::new();
    let mut remote = remote(&signal, HostConfig::default());

    let text = remote.touchscreen_show_dialog(DialogType::Numeric).unwrap();
    assert_eq!(text, "1234");
    let text = remote
        .touchscreen_show_dialog(DialogType::Alphanumeric)
        .unwrap();
    assert_eq!(text, "hello");
}

#[test]
fn test_calibration_set_then_get() {
    let signal = Signal::new();
    let mut remote = remote(&signal, HostConfig::default());
    let matrix = CalibrationMatrix {
        a: 1,
        b: -2,
        c: 3,
        d: -4,
        e: 5,
        f: -6,
        divider: 7,
    };

    remote.touchscreen_calibrate().unwrap();
    remote.set_touchscreen_calibration_matrix(matrix).unwrap();
    assert_eq!(remote.touchscreen_calibration_matrix().unwrap(), matrix);
    assert_eq!(module(&remote).control().calibrations, 1);
}

#[test]
fn test_widgets_render_and_dispatch_touch() {
    let signal = Signal::new();
    let mut remote = remote(&signal, HostConfig::default());

    let mut widgets: WidgetRegistry<4> = WidgetRegistry::new();
    widgets
        .register(Widget::text_button(7, 10, 10, 40, 20, "OK").unwrap())
        .unwrap();
    widgets.render(&mut remote, RenderScope::All).unwrap();
    remote.execute(Synchronicity::Synchronous).unwrap();
    assert_eq!(module(&remote).canvas().target().at(14, 20), Rgb565::WHITE);

    remote.flusher_mut().link_mut().module.control_mut().touch = Some(TouchEvent {
        x: 30,
        y: 15,
        pressure: 100,
        valid: 1,
    });
    let event = remote
        .touchscreen_wait_for_event(TouchEventMode::Blocking)
        .unwrap();
    assert_eq!(widgets.on_touch(&event).as_slice(), &[7]);
}

#[test]
fn test_reboot_then_reconnect() {
    let signal = Signal::new();
    let mut remote = remote(&signal, HostConfig::default());

    remote.set_orientation(Orientation::Landscape).unwrap();
    assert_eq!((remote.width(), remote.height()), (320, 240));
    remote.reboot().unwrap();
    assert_eq!(module(&remote).control().reboots, 1);
    assert_eq!(remote.initialize().unwrap(), 1);

    remote.draw_fill(Color::RED).unwrap();
    remote.execute(Synchronicity::Synchronous).unwrap();
    assert_eq!(module(&remote).canvas().target().at(0, 0), Rgb565::RED);
}

#[test]
fn test_handshake_gives_up() {
    let signal: Signal<NoopRawMutex, ()> = Signal::new();
    let config = HostConfig {
        handshake_max_attempts: Some(3),
        ..Default::default()
    };
    let mut remote = RemoteCanvas::connect(DeadLink, &signal, NoDelay, config).unwrap();
    assert_eq!(
        remote.initialize(),
        Err(TransportError::HandshakeTimeout { attempts: 3 })
    );
}

#[test]
fn test_module_fault_surfaces_as_link_error() {
    let signal = Signal::new();
    let mut remote = remote(&signal, HostConfig::default());

    // Bitmap data without a window
    remote.draw_bitmap_data(&[1, 2]).unwrap();
    let err = remote.execute(Synchronicity::Asynchronous).unwrap_err();
    assert!(matches!(
        err,
        TransportError::Link(ReplayError::Canvas(GraphicsError::NoBitmapWindow))
    ));
    assert_eq!(remote.transport().link().frames, 2);
}
