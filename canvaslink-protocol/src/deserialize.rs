//! Deserialization context
//!
//! Mirror of [`SerializeContext`](crate::SerializeContext): validates the
//! header on bind, then consumes values in the order they were written.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::CodecError;
use crate::header::{Header, HEADER_SIZE};
use crate::serialize::{host_is_little_endian, normalize_f32_bytes, TextEncoding};
use crate::source::{SliceSource, Source, StreamSource};

/// Value that can be consumed from a [`DeserializeContext`]
pub trait Decode: Sized {
    fn decode<S: Source>(ctx: &mut DeserializeContext<S>) -> Result<Self, CodecError>;
}

/// Endian-normalizing reader over a [`Source`]
pub struct DeserializeContext<S> {
    source: S,
    cursor: usize,
    content_len: usize,
    little_endian: bool,
    valid: bool,
}

impl<'a> DeserializeContext<SliceSource<'a>> {
    /// Bind to a received frame
    ///
    /// Bytes after the header's length are ignored, so a fixed-size receive
    /// buffer can be passed whole.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, CodecError> {
        Self::new(SliceSource::new(data))
    }
}

impl<R: embedded_io::Read + embedded_io::Seek> DeserializeContext<StreamSource<R>> {
    /// Bind to a stream written by a stream-backed serializer
    pub fn for_stream(reader: R) -> Result<Self, CodecError> {
        Self::new(StreamSource::new(reader))
    }
}

impl<S: Source> DeserializeContext<S> {
    /// Read and validate the header
    pub fn new(mut source: S) -> Result<Self, CodecError> {
        let mut raw = [0u8; HEADER_SIZE];
        source.read_bytes(&mut raw)?;
        let header = Header::from_bytes(raw);
        header.check_version()?;

        let content_len = match source.stream_len()? {
            Some(len) => len,
            None => header.length as usize,
        };
        if content_len == 0 {
            return Err(CodecError::EmptyContent);
        }

        Ok(Self {
            source,
            cursor: HEADER_SIZE,
            content_len,
            little_endian: host_is_little_endian(),
            valid: true,
        })
    }

    /// True while unread content remains
    pub fn more_data(&self) -> bool {
        self.valid && self.cursor < self.content_len
    }

    /// Total frame length, header included
    pub fn content_len(&self) -> usize {
        self.content_len
    }

    /// Read position, header included
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.content_len.saturating_sub(self.cursor)
    }

    /// False once a framing error has been hit
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Consume any decodable value
    pub fn get<T: Decode>(&mut self) -> Result<T, CodecError> {
        T::decode(self)
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<(), CodecError> {
        if !self.valid {
            return Err(CodecError::ContextInvalid);
        }
        if self.cursor + buf.len() > self.content_len {
            self.valid = false;
            return Err(CodecError::Truncated);
        }
        if let Err(err) = self.source.read_bytes(buf) {
            self.valid = false;
            return Err(err);
        }
        self.cursor += buf.len();
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    pub fn get_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take::<1>()?[0])
    }

    pub fn get_i8(&mut self) -> Result<i8, CodecError> {
        Ok(i8::from_be_bytes(self.take()?))
    }

    pub fn get_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_be_bytes(self.take()?))
    }

    pub fn get_i16(&mut self) -> Result<i16, CodecError> {
        Ok(i16::from_be_bytes(self.take()?))
    }

    pub fn get_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_be_bytes(self.take()?))
    }

    pub fn get_i32(&mut self) -> Result<i32, CodecError> {
        Ok(i32::from_be_bytes(self.take()?))
    }

    pub fn get_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_be_bytes(self.take()?))
    }

    pub fn get_i64(&mut self) -> Result<i64, CodecError> {
        Ok(i64::from_be_bytes(self.take()?))
    }

    pub fn get_f32(&mut self) -> Result<f32, CodecError> {
        let wire = self.take::<4>()?;
        Ok(f32::from_ne_bytes(normalize_f32_bytes(
            wire,
            self.little_endian,
        )))
    }

    /// Counted byte array; a zero count decodes to `None`
    pub fn get_byte_array(&mut self) -> Result<Option<Vec<u8>>, CodecError> {
        let count = self.get_u16()? as usize;
        if count == 0 {
            return Ok(None);
        }
        let mut bytes = alloc::vec![0u8; count];
        self.fill(&mut bytes)?;
        Ok(Some(bytes))
    }

    pub fn get_u16_array(&mut self) -> Result<Option<Vec<u16>>, CodecError> {
        self.get_array(Self::get_u16)
    }

    pub fn get_u32_array(&mut self) -> Result<Option<Vec<u32>>, CodecError> {
        self.get_array(Self::get_u32)
    }

    pub fn get_u64_array(&mut self) -> Result<Option<Vec<u64>>, CodecError> {
        self.get_array(Self::get_u64)
    }

    fn get_array<T>(
        &mut self,
        mut element: impl FnMut(&mut Self) -> Result<T, CodecError>,
    ) -> Result<Option<Vec<T>>, CodecError> {
        let count = self.get_u16()? as usize;
        if count == 0 {
            return Ok(None);
        }
        let mut values = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            values.push(element(self)?);
        }
        Ok(Some(values))
    }

    /// String in either encoding, chosen by the flag byte
    pub fn get_string(&mut self) -> Result<String, CodecError> {
        let flag = self.get_u8()?;
        match TextEncoding::from_byte(flag).ok_or(CodecError::InvalidStringFlag(flag))? {
            TextEncoding::Utf8 => {
                let bytes = self.get_byte_array()?.unwrap_or_default();
                if self.get_u8()? != 0 {
                    return Err(CodecError::MissingTerminator);
                }
                String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)
            }
            TextEncoding::Utf16 => {
                let units = self.get_u16_array()?.unwrap_or_default();
                if self.get_u16()? != 0 {
                    return Err(CodecError::MissingTerminator);
                }
                String::from_utf16(&units).map_err(|_| CodecError::InvalidUtf16)
            }
        }
    }
}

macro_rules! decode_via {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl Decode for $ty {
                fn decode<S: Source>(ctx: &mut DeserializeContext<S>) -> Result<Self, CodecError> {
                    ctx.$method()
                }
            }
        )*
    };
}

decode_via! {
    u8 => get_u8,
    i8 => get_i8,
    u16 => get_u16,
    i16 => get_i16,
    u32 => get_u32,
    i32 => get_i32,
    u64 => get_u64,
    i64 => get_i64,
    f32 => get_f32,
    String => get_string,
    Option<Vec<u8>> => get_byte_array,
    Option<Vec<u16>> => get_u16_array,
    Option<Vec<u32>> => get_u32_array,
    Option<Vec<u64>> => get_u64_array,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::{SerializeConfig, SerializeContext};
    use crate::test_util::MemFile;
    use alloc::vec;
    use proptest::prelude::*;

    fn frame_of(write: impl FnOnce(&mut SerializeContext<crate::BufferSink>)) -> Vec<u8> {
        let mut ctx = SerializeContext::new(SerializeConfig::default()).unwrap();
        write(&mut ctx);
        ctx.finalize().unwrap().to_vec()
    }

    #[test]
    fn test_decode_u16_frame() {
        let mut ctx = DeserializeContext::from_slice(&[0x03, 0x00, 0x05, 0xBE, 0xEF]).unwrap();
        assert_eq!(ctx.get::<u16>().unwrap(), 0xBEEF);
        assert!(!ctx.more_data());
    }

    #[test]
    fn test_decode_utf8_string() {
        let data = [0x03, 0x00, 0x09, 0x01, 0x00, 0x02, 0x48, 0x69, 0x00];
        let mut ctx = DeserializeContext::from_slice(&data).unwrap();
        assert_eq!(ctx.get::<String>().unwrap(), "Hi");
        assert!(!ctx.more_data());
    }

    #[test]
    fn test_decode_f32_one() {
        let mut ctx = DeserializeContext::from_slice(&[3, 0, 7, 0x3F, 0x80, 0, 0]).unwrap();
        assert_eq!(ctx.get::<f32>().unwrap(), 1.0);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let result = DeserializeContext::from_slice(&[0x04, 0x00, 0x05, 0xBE, 0xEF]);
        assert!(matches!(
            result,
            Err(CodecError::VersionMismatch {
                expected: 3,
                found: 4
            })
        ));
    }

    #[test]
    fn test_zero_length_rejected() {
        let result = DeserializeContext::from_slice(&[0x03, 0x00, 0x00, 0xFF]);
        assert!(matches!(result, Err(CodecError::EmptyContent)));
    }

    #[test]
    fn test_more_data_counts_content_bytes() {
        let frame = frame_of(|c| c.put_raw(&[1, 2, 3, 4, 5]).unwrap());
        let mut ctx = DeserializeContext::from_slice(&frame).unwrap();

        let mut reads = 0;
        while ctx.more_data() {
            ctx.get_u8().unwrap();
            reads += 1;
        }
        assert_eq!(reads, frame.len() - HEADER_SIZE);
        assert_eq!(ctx.get_u8(), Err(CodecError::Truncated));
        assert_eq!(ctx.get_u8(), Err(CodecError::ContextInvalid));
        assert!(!ctx.is_valid());
    }

    #[test]
    fn test_trailing_receive_bytes_ignored() {
        let mut rx = [0xEEu8; 32];
        rx[..5].copy_from_slice(&[3, 0, 5, 0x12, 0x34]);
        let mut ctx = DeserializeContext::from_slice(&rx).unwrap();
        assert_eq!(ctx.get_u16().unwrap(), 0x1234);
        assert!(!ctx.more_data());
    }

    #[test]
    fn test_zero_count_arrays_decode_to_none() {
        let frame = frame_of(|c| {
            c.put_byte_array(&[]).unwrap();
            c.put_u16_array(&[]).unwrap();
            c.put_u32_array(&[]).unwrap();
            c.put_u64_array(&[]).unwrap();
        });
        let mut ctx = DeserializeContext::from_slice(&frame).unwrap();
        assert_eq!(ctx.get::<Option<Vec<u8>>>().unwrap(), None);
        assert_eq!(ctx.get::<Option<Vec<u16>>>().unwrap(), None);
        assert_eq!(ctx.get::<Option<Vec<u32>>>().unwrap(), None);
        assert_eq!(ctx.get::<Option<Vec<u64>>>().unwrap(), None);
    }

    #[test]
    fn test_empty_strings_both_modes() {
        let frame = frame_of(|c| {
            c.put_str("", TextEncoding::Utf8).unwrap();
            c.put_str("", TextEncoding::Utf16).unwrap();
            c.put_u8(0x42).unwrap();
        });
        let mut ctx = DeserializeContext::from_slice(&frame).unwrap();
        assert_eq!(ctx.get_string().unwrap(), "");
        assert_eq!(ctx.get_string().unwrap(), "");
        assert_eq!(ctx.get_u8().unwrap(), 0x42);
    }

    #[test]
    fn test_invalid_string_flag() {
        let mut ctx = DeserializeContext::from_slice(&[3, 0, 7, 2, 0, 0]).unwrap();
        assert_eq!(ctx.get_string(), Err(CodecError::InvalidStringFlag(2)));
    }

    #[test]
    fn test_stream_roundtrip_uses_stream_length() {
        let mut file = MemFile::default();
        {
            let mut ctx = SerializeContext::for_stream(&mut file).unwrap();
            ctx.put(&-5i32).unwrap();
            ctx.put("cal").unwrap();
            ctx.into_writer().unwrap();
        }
        // Stream frames never stamp the length
        assert_eq!(&file.data[..HEADER_SIZE], &[3, 0, 0]);

        file.rewind_to_start();
        let mut ctx = DeserializeContext::for_stream(&mut file).unwrap();
        assert_eq!(ctx.get::<i32>().unwrap(), -5);
        assert_eq!(ctx.get::<String>().unwrap(), "cal");
        assert!(!ctx.more_data());
    }

    proptest! {
        #[test]
        fn prop_primitives_roundtrip(
            a in any::<u8>(), b in any::<i8>(), c in any::<u16>(), d in any::<i16>(),
            e in any::<u32>(), f in any::<i32>(), g in any::<u64>(), h in any::<i64>(),
            x in any::<f32>().prop_filter("nan", |v| !v.is_nan()),
        ) {
            let frame = frame_of(|ctx| {
                ctx.put(&a).unwrap();
                ctx.put(&b).unwrap();
                ctx.put(&c).unwrap();
                ctx.put(&d).unwrap();
                ctx.put(&e).unwrap();
                ctx.put(&f).unwrap();
                ctx.put(&g).unwrap();
                ctx.put(&h).unwrap();
                ctx.put(&x).unwrap();
            });
            let mut ctx = DeserializeContext::from_slice(&frame).unwrap();
            prop_assert_eq!(ctx.get::<u8>().unwrap(), a);
            prop_assert_eq!(ctx.get::<i8>().unwrap(), b);
            prop_assert_eq!(ctx.get::<u16>().unwrap(), c);
            prop_assert_eq!(ctx.get::<i16>().unwrap(), d);
            prop_assert_eq!(ctx.get::<u32>().unwrap(), e);
            prop_assert_eq!(ctx.get::<i32>().unwrap(), f);
            prop_assert_eq!(ctx.get::<u64>().unwrap(), g);
            prop_assert_eq!(ctx.get::<i64>().unwrap(), h);
            prop_assert_eq!(ctx.get::<f32>().unwrap().to_bits(), x.to_bits());
            prop_assert!(!ctx.more_data());
        }

        #[test]
        fn prop_strings_roundtrip(text in "\\PC{0,40}") {
            let frame = frame_of(|ctx| {
                ctx.put_str(&text, TextEncoding::Utf8).unwrap();
                ctx.put_str(&text, TextEncoding::Utf16).unwrap();
            });
            let mut ctx = DeserializeContext::from_slice(&frame).unwrap();
            prop_assert_eq!(ctx.get_string().unwrap(), text.clone());
            prop_assert_eq!(ctx.get_string().unwrap(), text);
        }

        #[test]
        fn prop_arrays_roundtrip(
            bytes in proptest::collection::vec(any::<u8>(), 1..64),
            words in proptest::collection::vec(any::<u16>(), 1..32),
            longs in proptest::collection::vec(any::<u32>(), 1..16),
            quads in proptest::collection::vec(any::<u64>(), 1..8),
        ) {
            let frame = frame_of(|ctx| {
                ctx.put(&bytes[..]).unwrap();
                ctx.put(&words[..]).unwrap();
                ctx.put(&longs[..]).unwrap();
                ctx.put(&quads[..]).unwrap();
            });
            let mut ctx = DeserializeContext::from_slice(&frame).unwrap();
            prop_assert_eq!(ctx.get::<Option<Vec<u8>>>().unwrap(), Some(bytes));
            prop_assert_eq!(ctx.get::<Option<Vec<u16>>>().unwrap(), Some(words));
            prop_assert_eq!(ctx.get::<Option<Vec<u32>>>().unwrap(), Some(longs));
            prop_assert_eq!(ctx.get::<Option<Vec<u64>>>().unwrap(), Some(quads));
        }
    }

    #[test]
    fn test_truncated_array() {
        let data = vec![3, 0, 7, 0, 9, 1, 2];
        let mut ctx = DeserializeContext::from_slice(&data).unwrap();
        assert_eq!(ctx.get_byte_array(), Err(CodecError::Truncated));
    }
}
