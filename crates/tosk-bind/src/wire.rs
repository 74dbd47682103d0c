//! Fixed-width big-endian wire codec over `io` streams.
//!
//! All multi-byte scalars are big-endian. Variable-length fields carry a
//! `u64` length prefix; fixed-width fields have no framing at all. Stream
//! errors pass through untouched.

use std::io::{Read, Write};

use crate::error::{BindError, BindResult};

/// Writes wire-format fields into any [`Write`] sink.
#[derive(Debug)]
pub struct WireWriter<W: Write> {
    inner: W,
}

impl<W: Write> WireWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_u8(&mut self, value: u8) -> BindResult<()> {
        self.inner.write_all(&[value])?;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> BindResult<()> {
        self.inner.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> BindResult<()> {
        self.inner.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    pub fn write_u64(&mut self, value: u64) -> BindResult<()> {
        self.inner.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    pub fn write_i64(&mut self, value: i64) -> BindResult<()> {
        self.inner.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> BindResult<()> {
        self.write_u8(value as u8)
    }

    /// Length-prefixed byte string.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> BindResult<()> {
        self.write_u64(bytes.len() as u64)?;
        self.inner.write_all(bytes)?;
        Ok(())
    }

    /// Length-prefixed UTF-8 string.
    pub fn write_str(&mut self, value: &str) -> BindResult<()> {
        self.write_bytes(value.as_bytes())
    }

    /// Raw bytes with no framing; the reader must know the width.
    pub fn write_raw(&mut self, bytes: &[u8]) -> BindResult<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }
}

/// Reads wire-format fields from any [`Read`] source.
#[derive(Debug)]
pub struct WireReader<R: Read> {
    inner: R,
}

impl<R: Read> WireReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn read_u8(&mut self) -> BindResult<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self) -> BindResult<u16> {
        let mut buf = [0u8; 2];
        self.inner.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    pub fn read_u32(&mut self) -> BindResult<u32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    pub fn read_u64(&mut self) -> BindResult<u64> {
        let mut buf = [0u8; 8];
        self.inner.read_exact(&mut buf)?;
        Ok(u64::from_be_bytes(buf))
    }

    pub fn read_i64(&mut self) -> BindResult<i64> {
        let mut buf = [0u8; 8];
        self.inner.read_exact(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }

    pub fn read_bool(&mut self) -> BindResult<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(BindError::InvalidBool(other)),
        }
    }

    /// Length prefix of a variable-width field, checked against the
    /// platform's addressable size.
    pub fn read_len(&mut self) -> BindResult<usize> {
        let len = self.read_u64()?;
        usize::try_from(len).map_err(|_| BindError::LengthOverflow(len))
    }

    /// Length-prefixed byte string.
    pub fn read_bytes(&mut self) -> BindResult<Vec<u8>> {
        let len = self.read_len()?;
        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Length-prefixed UTF-8 string.
    pub fn read_str(&mut self) -> BindResult<String> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).map_err(|_| BindError::InvalidUtf8)
    }

    /// Fill `buf` with unframed bytes.
    pub fn read_raw(&mut self, buf: &mut [u8]) -> BindResult<()> {
        self.inner.read_exact(buf)?;
        Ok(())
    }
}
