//! Byte sinks for [`SerializeContext`](crate::SerializeContext)
//!
//! A context writes either into an owned growable buffer (frames destined
//! for the link) or straight into a persistent stream (files, flash).

use alloc::vec;
use alloc::vec::Vec;

use crate::error::CodecError;

/// Destination for encoded bytes
pub trait Sink {
    /// Append bytes at the cursor
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError>;

    /// Bytes written so far, header included
    fn position(&self) -> usize;
}

/// Growable in-memory frame buffer
///
/// Storage doubles when a write does not fit. The cursor can be rewound to
/// reuse the allocation for the next frame.
#[derive(Debug, Clone)]
pub struct BufferSink {
    buffer: Vec<u8>,
    cursor: usize,
}

impl BufferSink {
    /// Create a zeroed buffer of `size` bytes
    pub fn with_size(size: usize) -> Self {
        Self {
            buffer: vec![0; size],
            cursor: 0,
        }
    }

    /// Current storage size
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Written bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.cursor]
    }

    /// Overwrite already-written bytes at `offset`
    pub(crate) fn patch(&mut self, offset: usize, bytes: &[u8]) {
        self.buffer[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub(crate) fn frame(&self, len: usize) -> &[u8] {
        &self.buffer[..len]
    }

    pub(crate) fn rewind(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    pub(crate) fn zero(&mut self) {
        self.buffer.fill(0);
        self.cursor = 0;
    }

    fn grow(&mut self, needed: usize) {
        let mut size = self.buffer.len().max(1);
        while size < needed {
            size *= 2;
        }
        self.buffer.resize(size, 0);
    }
}

impl Sink for BufferSink {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        let end = self.cursor + bytes.len();
        if end > self.buffer.len() {
            self.grow(end);
        }
        self.buffer[self.cursor..end].copy_from_slice(bytes);
        self.cursor = end;
        Ok(())
    }

    fn position(&self) -> usize {
        self.cursor
    }
}

/// Sink over an `embedded-io` writer
///
/// Nothing is buffered; the frame length field stays zero and readers take
/// the length from the stream itself.
pub struct StreamSink<W> {
    writer: W,
    written: usize,
}

impl<W: embedded_io::Write> StreamSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> Result<(), CodecError> {
        self.writer.flush().map_err(CodecError::io)
    }

    /// Release the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: embedded_io::Write> Sink for StreamSink<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.writer.write_all(bytes).map_err(CodecError::io)?;
        self.written += bytes.len();
        Ok(())
    }

    fn position(&self) -> usize {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_doubles_when_full() {
        let mut sink = BufferSink::with_size(4);
        sink.write_bytes(&[1, 2, 3]).unwrap();
        assert_eq!(sink.capacity(), 4);

        sink.write_bytes(&[4, 5]).unwrap();
        assert_eq!(sink.capacity(), 8);
        assert_eq!(sink.as_slice(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_large_write_grows_past_double() {
        let mut sink = BufferSink::with_size(4);
        sink.write_bytes(&[0xAB; 20]).unwrap();
        assert_eq!(sink.capacity(), 32);
        assert_eq!(sink.position(), 20);
    }

    #[test]
    fn test_stream_sink_counts_bytes() {
        let mut out = [0u8; 8];
        let mut sink = StreamSink::new(&mut out[..]);
        sink.write_bytes(&[9, 8, 7]).unwrap();
        assert_eq!(sink.position(), 3);
        drop(sink);
        assert_eq!(&out[..3], &[9, 8, 7]);
    }

    #[test]
    fn test_stream_sink_full_writer() {
        let mut out = [0u8; 2];
        let mut sink = StreamSink::new(&mut out[..]);
        assert_eq!(
            sink.write_bytes(&[1, 2, 3]),
            Err(CodecError::Io(embedded_io::ErrorKind::WriteZero))
        );
    }
}
