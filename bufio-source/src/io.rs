//! Generic `embedded_io` adapters
//!
//! Provides [`ByteSource`]/[`ByteSink`] implementations wrapping any
//! blocking `embedded_io` reader or writer.

use embedded_io::{Read, Write};

use crate::{ByteSink, ByteSource, Fill};

/// Byte source wrapper for `embedded_io` readers
///
/// Wraps any type implementing `embedded_io::Read` and provides the
/// [`ByteSource`] trait. A read of `Ok(0)` into a non-empty buffer is the
/// `embedded_io` end-of-stream convention and is reported as
/// [`Fill::EndOfStream`].
///
/// `embedded_io` has no notion of closing a reader, so `close` is a no-op;
/// the wrapped reader is released when this value is dropped.
///
/// # Example
///
/// ```ignore
/// use bufio_source::IoSource;
/// use embedded_io_adapters::std::FromStd;
///
/// let file = std::fs::File::open("data.bin")?;
/// let source = IoSource(FromStd::new(file));
/// ```
#[derive(Debug, Default)]
pub struct IoSource<T>(pub T);

impl<T> IoSource<T> {
    /// Returns the wrapped reader, consuming this source
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Read> ByteSource for IoSource<T> {
    type Error = T::Error;

    fn fill(&mut self, buf: &mut [u8]) -> Result<Fill, Self::Error> {
        if buf.is_empty() {
            return Ok(Fill::Count(0));
        }
        match self.0.read(buf)? {
            0 => Ok(Fill::EndOfStream),
            n => Ok(Fill::Count(n)),
        }
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Byte sink wrapper for `embedded_io` writers
///
/// Wraps any type implementing `embedded_io::Write` and provides the
/// [`ByteSink`] trait. Closing flushes the writer.
#[derive(Debug, Default)]
pub struct IoSink<T>(pub T);

impl<T> IoSink<T> {
    /// Returns the wrapped writer, consuming this sink
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Write> ByteSink for IoSink<T> {
    type Error = T::Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.flush()
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.0.flush()
    }
}
