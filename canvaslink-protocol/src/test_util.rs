//! In-memory seekable file for stream tests

use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_io::{ErrorType, Read, Seek, SeekFrom, Write};

#[derive(Debug, Default)]
pub struct MemFile {
    pub data: Vec<u8>,
    pos: usize,
}

impl MemFile {
    pub fn rewind_to_start(&mut self) {
        self.pos = 0;
    }
}

impl ErrorType for MemFile {
    type Error = Infallible;
}

impl Read for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
        let n = buf.len().min(self.data.len().saturating_sub(self.pos));
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for MemFile {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
        let end = self.pos + buf.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.pos..end].copy_from_slice(buf);
        self.pos = end;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

impl Seek for MemFile {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Infallible> {
        let target = match pos {
            SeekFrom::Start(n) => n as i64,
            SeekFrom::End(n) => self.data.len() as i64 + n,
            SeekFrom::Current(n) => self.pos as i64 + n,
        };
        self.pos = target.max(0) as usize;
        Ok(self.pos as u64)
    }
}
