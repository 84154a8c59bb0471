//! Byte sources for [`DeserializeContext`](crate::DeserializeContext)

use crate::error::CodecError;

/// Origin of encoded bytes
pub trait Source {
    /// Fill `buf` completely from the current position
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), CodecError>;

    /// Total content length when the source knows it better than the header
    ///
    /// Streams return their own length here; slices defer to the header.
    fn stream_len(&mut self) -> Result<Option<usize>, CodecError> {
        Ok(None)
    }
}

/// Source over a borrowed byte slice, typically a received frame
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl Source for SliceSource<'_> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), CodecError> {
        let end = self.pos + buf.len();
        let bytes = self.data.get(self.pos..end).ok_or(CodecError::Truncated)?;
        buf.copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }
}

/// Source over a seekable `embedded-io` reader
pub struct StreamSource<R> {
    reader: R,
}

impl<R: embedded_io::Read + embedded_io::Seek> StreamSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Release the reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: embedded_io::Read + embedded_io::Seek> Source for StreamSource<R> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), CodecError> {
        self.reader.read_exact(buf).map_err(|err| match err {
            embedded_io::ReadExactError::UnexpectedEof => CodecError::Truncated,
            embedded_io::ReadExactError::Other(e) => CodecError::io(e),
        })
    }

    fn stream_len(&mut self) -> Result<Option<usize>, CodecError> {
        use embedded_io::SeekFrom;

        let here = self.reader.stream_position().map_err(CodecError::io)?;
        let end = self.reader.seek(SeekFrom::End(0)).map_err(CodecError::io)?;
        self.reader
            .seek(SeekFrom::Start(here))
            .map_err(CodecError::io)?;
        Ok(Some(end as usize))
    }
}
