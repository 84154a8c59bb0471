//! Serialization context
//!
//! Writes the frame header up front and then appends values in
//! big-endian order. The length field is only stamped when a buffered frame
//! is handed over for transmission.

use crate::error::CodecError;
use crate::header::{Header, HEADER_SIZE, MAX_FRAME_LEN};
use crate::sink::{BufferSink, Sink, StreamSink};

/// Smallest buffer a context accepts
pub const MIN_BUFFER_SIZE: usize = 100;

/// String encodings selectable by the flag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextEncoding {
    /// u16 code units, u16 count, u16 zero terminator
    Utf16 = 0,
    /// UTF-8 bytes, u16 count, 0x00 terminator
    Utf8 = 1,
}

impl TextEncoding {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Utf16),
            1 => Some(Self::Utf8),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Serialization context configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerializeConfig {
    /// Initial buffer size in bytes (buffered contexts only)
    pub buffer_size: usize,
    /// Frame size that triggers the flush hook, if any
    pub high_watermark: Option<usize>,
}

impl Default for SerializeConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1024,
            high_watermark: None,
        }
    }
}

/// Value that can be appended to a [`SerializeContext`]
pub trait Encode {
    fn encode<S: Sink>(&self, ctx: &mut SerializeContext<S>) -> Result<(), CodecError>;
}

/// Endian-normalizing writer over a [`Sink`]
pub struct SerializeContext<S> {
    sink: S,
    little_endian: bool,
    high_watermark: Option<usize>,
}

impl SerializeContext<BufferSink> {
    /// Create a buffered context
    ///
    /// Fails if `config.buffer_size` is below [`MIN_BUFFER_SIZE`].
    pub fn new(config: SerializeConfig) -> Result<Self, CodecError> {
        if config.buffer_size < MIN_BUFFER_SIZE {
            return Err(CodecError::BufferTooSmall {
                requested: config.buffer_size,
                minimum: MIN_BUFFER_SIZE,
            });
        }
        Self::with_sink(BufferSink::with_size(config.buffer_size), config.high_watermark)
    }

    /// Stamp the length into the header and hand out the frame
    ///
    /// The cursor is rewound to just past the header, so the next command
    /// starts a fresh frame in the same allocation.
    pub fn finalize(&mut self) -> Result<&[u8], CodecError> {
        let len = self.sink.position();
        if len > MAX_FRAME_LEN {
            return Err(CodecError::FrameTooLong(len));
        }
        self.sink.patch(0, &Header::new(len as u16).to_bytes());
        self.sink.rewind(HEADER_SIZE);
        Ok(self.sink.frame(len))
    }

    /// Discard pending content without stamping a frame
    pub fn clear(&mut self) {
        self.sink.rewind(HEADER_SIZE);
    }

    /// Zero the whole buffer and re-initialize the header
    pub fn wipe(&mut self) -> Result<(), CodecError> {
        self.sink.zero();
        self.sink.write_bytes(&Header::new(0).to_bytes())
    }

    /// Current buffer size
    pub fn capacity(&self) -> usize {
        self.sink.capacity()
    }
}

impl<W: embedded_io::Write> SerializeContext<StreamSink<W>> {
    /// Create a context writing straight into a stream
    pub fn for_stream(writer: W) -> Result<Self, CodecError> {
        Self::with_sink(StreamSink::new(writer), None)
    }

    /// Flush the stream and release the writer
    pub fn into_writer(mut self) -> Result<W, CodecError> {
        self.sink.flush()?;
        Ok(self.sink.into_inner())
    }
}

impl<S: Sink> SerializeContext<S> {
    fn with_sink(sink: S, high_watermark: Option<usize>) -> Result<Self, CodecError> {
        let mut ctx = Self {
            sink,
            little_endian: host_is_little_endian(),
            high_watermark,
        };
        ctx.sink.write_bytes(&Header::new(0).to_bytes())?;
        Ok(ctx)
    }

    /// Bytes written, header included
    pub fn len(&self) -> usize {
        self.sink.position()
    }

    /// Bytes written after the header
    pub fn content_len(&self) -> usize {
        self.sink.position().saturating_sub(HEADER_SIZE)
    }

    /// True when nothing follows the header
    pub fn is_empty(&self) -> bool {
        self.content_len() == 0
    }

    pub fn high_watermark(&self) -> Option<usize> {
        self.high_watermark
    }

    /// Whether the frame has reached the high-watermark
    pub fn above_high_watermark(&self) -> bool {
        matches!(self.high_watermark, Some(mark) if self.sink.position() >= mark)
    }

    /// Run `on_high` once if the frame has reached the high-watermark
    pub fn check_high_watermark<E, F>(&mut self, on_high: F) -> Result<bool, E>
    where
        F: FnOnce(&mut Self) -> Result<(), E>,
    {
        if self.above_high_watermark() {
            on_high(self)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Append any encodable value
    pub fn put<T: Encode + ?Sized>(&mut self, value: &T) -> Result<(), CodecError> {
        value.encode(self)
    }

    pub fn put_u8(&mut self, value: u8) -> Result<(), CodecError> {
        self.sink.write_bytes(&[value])
    }

    pub fn put_i8(&mut self, value: i8) -> Result<(), CodecError> {
        self.sink.write_bytes(&value.to_be_bytes())
    }

    pub fn put_u16(&mut self, value: u16) -> Result<(), CodecError> {
        self.sink.write_bytes(&value.to_be_bytes())
    }

    pub fn put_i16(&mut self, value: i16) -> Result<(), CodecError> {
        self.sink.write_bytes(&value.to_be_bytes())
    }

    pub fn put_u32(&mut self, value: u32) -> Result<(), CodecError> {
        self.sink.write_bytes(&value.to_be_bytes())
    }

    pub fn put_i32(&mut self, value: i32) -> Result<(), CodecError> {
        self.sink.write_bytes(&value.to_be_bytes())
    }

    pub fn put_u64(&mut self, value: u64) -> Result<(), CodecError> {
        self.sink.write_bytes(&value.to_be_bytes())
    }

    pub fn put_i64(&mut self, value: i64) -> Result<(), CodecError> {
        self.sink.write_bytes(&value.to_be_bytes())
    }

    /// IEEE-754 bits, most significant byte first
    pub fn put_f32(&mut self, value: f32) -> Result<(), CodecError> {
        let bytes = normalize_f32_bytes(value.to_ne_bytes(), self.little_endian);
        self.sink.write_bytes(&bytes)
    }

    /// u16 count followed by the bytes
    pub fn put_byte_array(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.put_u16(array_count(bytes.len())?)?;
        self.sink.write_bytes(bytes)
    }

    pub fn put_u16_array(&mut self, values: &[u16]) -> Result<(), CodecError> {
        self.put_u16(array_count(values.len())?)?;
        values.iter().try_for_each(|&v| self.put_u16(v))
    }

    pub fn put_u32_array(&mut self, values: &[u32]) -> Result<(), CodecError> {
        self.put_u16(array_count(values.len())?)?;
        values.iter().try_for_each(|&v| self.put_u32(v))
    }

    pub fn put_u64_array(&mut self, values: &[u64]) -> Result<(), CodecError> {
        self.put_u16(array_count(values.len())?)?;
        values.iter().try_for_each(|&v| self.put_u64(v))
    }

    /// Flag byte, counted payload, terminator
    pub fn put_str(&mut self, text: &str, encoding: TextEncoding) -> Result<(), CodecError> {
        self.put_u8(encoding.to_byte())?;
        match encoding {
            TextEncoding::Utf8 => {
                self.put_byte_array(text.as_bytes())?;
                self.put_u8(0)
            }
            TextEncoding::Utf16 => {
                let units = text.encode_utf16().count();
                self.put_u16(array_count(units)?)?;
                for unit in text.encode_utf16() {
                    self.put_u16(unit)?;
                }
                self.put_u16(0)
            }
        }
    }

    /// Raw bytes with no count prefix
    pub fn put_raw(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.sink.write_bytes(bytes)
    }
}

/// Probe the native layout of a known 2-byte pattern
pub(crate) fn host_is_little_endian() -> bool {
    0x0102u16.to_ne_bytes()[0] == 0x02
}

/// Swap between native and wire order for a float's bytes
///
/// The operation is its own inverse, so decoding uses it too.
pub(crate) fn normalize_f32_bytes(mut bytes: [u8; 4], little_endian: bool) -> [u8; 4] {
    if little_endian {
        bytes.reverse();
    }
    bytes
}

fn array_count(len: usize) -> Result<u16, CodecError> {
    u16::try_from(len).map_err(|_| CodecError::ArrayTooLong(len))
}

macro_rules! encode_via {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl Encode for $ty {
                fn encode<S: Sink>(&self, ctx: &mut SerializeContext<S>) -> Result<(), CodecError> {
                    ctx.$method(*self)
                }
            }
        )*
    };
}

encode_via! {
    u8 => put_u8,
    i8 => put_i8,
    u16 => put_u16,
    i16 => put_i16,
    u32 => put_u32,
    i32 => put_i32,
    u64 => put_u64,
    i64 => put_i64,
    f32 => put_f32,
}

impl Encode for [u8] {
    fn encode<S: Sink>(&self, ctx: &mut SerializeContext<S>) -> Result<(), CodecError> {
        ctx.put_byte_array(self)
    }
}

impl Encode for [u16] {
    fn encode<S: Sink>(&self, ctx: &mut SerializeContext<S>) -> Result<(), CodecError> {
        ctx.put_u16_array(self)
    }
}

impl Encode for [u32] {
    fn encode<S: Sink>(&self, ctx: &mut SerializeContext<S>) -> Result<(), CodecError> {
        ctx.put_u32_array(self)
    }
}

impl Encode for [u64] {
    fn encode<S: Sink>(&self, ctx: &mut SerializeContext<S>) -> Result<(), CodecError> {
        ctx.put_u64_array(self)
    }
}

/// Strings go out in UTF-8 mode
impl Encode for str {
    fn encode<S: Sink>(&self, ctx: &mut SerializeContext<S>) -> Result<(), CodecError> {
        ctx.put_str(self, TextEncoding::Utf8)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode<S: Sink>(&self, ctx: &mut SerializeContext<S>) -> Result<(), CodecError> {
        T::encode(self, ctx)
    }
}
