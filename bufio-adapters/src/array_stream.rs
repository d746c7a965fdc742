//! In-memory byte array streams
//!
//! [`ByteArraySource`] reads from a byte array and [`ByteArraySink`] appends
//! to a growable one. Neither has refill or flush logic; they exist so the
//! buffered adapters can run against memory, and to be used on their own.

use alloc::vec::Vec;
use core::convert::Infallible;

use bufio_source::{ByteSink, ByteSource, Fill};
use embedded_io::ErrorKind;

use crate::window::{WindowFault, window, window_mut};

/// Error type for byte array stream operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum ArrayStreamError {
    /// No buffer was supplied
    MissingBuffer,
    /// The requested window does not fit the supplied buffer
    OutOfBounds {
        /// Start of the window
        offset: usize,
        /// Length of the window
        length: usize,
        /// Length of the supplied buffer
        capacity: usize,
    },
}

impl From<WindowFault> for ArrayStreamError {
    fn from(fault: WindowFault) -> Self {
        match fault {
            WindowFault::Missing => ArrayStreamError::MissingBuffer,
            WindowFault::OutOfBounds {
                offset,
                length,
                capacity,
            } => ArrayStreamError::OutOfBounds {
                offset,
                length,
                capacity,
            },
        }
    }
}

impl core::fmt::Display for ArrayStreamError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ArrayStreamError::MissingBuffer => write!(f, "buffer is missing"),
            ArrayStreamError::OutOfBounds {
                offset,
                length,
                capacity,
            } => write!(
                f,
                "window at offset {} with length {} exceeds buffer of {} bytes",
                offset, length, capacity
            ),
        }
    }
}

impl core::error::Error for ArrayStreamError {}

impl embedded_io::Error for ArrayStreamError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

/// Read cursor over an in-memory byte array
///
/// Works with any owned or borrowed byte container (`&[u8]`, `Vec<u8>`,
/// `[u8; N]`, ...). Implements [`ByteSource`] so it can sit under a
/// [`BufReader`](crate::BufReader).
#[derive(Clone, Debug, Default)]
pub struct ByteArraySource<T> {
    data: T,
    pos: usize,
}

impl<T: AsRef<[u8]>> ByteArraySource<T> {
    /// Create a new source positioned at the first byte of `data`
    pub fn new(data: T) -> Self {
        Self { data, pos: 0 }
    }

    /// Get the current read position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the bytes not read yet
    pub fn remaining(&self) -> &[u8] {
        &self.data.as_ref()[self.pos..]
    }

    /// Returns the wrapped array, consuming this source
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Read a single byte, or `None` at the end of the array
    pub fn read_byte(&mut self) -> Option<u8> {
        let byte = *self.data.as_ref().get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// Read up to `buf.len()` bytes
    ///
    /// An empty `buf` always yields `Count(0)`.
    pub fn read(&mut self, buf: &mut [u8]) -> Fill {
        if buf.is_empty() {
            return Fill::Count(0);
        }
        let remaining = self.remaining();
        if remaining.is_empty() {
            return Fill::EndOfStream;
        }
        let n = buf.len().min(remaining.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Fill::Count(n)
    }

    /// Read into `dest[offset..offset + length]`
    ///
    /// # Errors
    /// `MissingBuffer` if `dest` is `None`, `OutOfBounds` if the window does
    /// not fit `dest`.
    pub fn read_into(
        &mut self,
        dest: Option<&mut [u8]>,
        offset: usize,
        length: usize,
    ) -> Result<Fill, ArrayStreamError> {
        let window = window_mut(dest, offset, length)?;
        Ok(self.read(window))
    }
}

impl<T: AsRef<[u8]>> ByteSource for ByteArraySource<T> {
    type Error = Infallible;

    fn fill(&mut self, buf: &mut [u8]) -> Result<Fill, Self::Error> {
        Ok(self.read(buf))
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Growable in-memory byte array to write into
///
/// Implements [`ByteSink`] so it can sit under a [`BufWriter`](crate::BufWriter).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ByteArraySink {
    data: Vec<u8>,
}

impl ByteArraySink {
    /// Create a new empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty sink with room for `capacity` bytes before growing
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Get the bytes written so far
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns the written bytes, consuming this sink
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Get the number of bytes written
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if nothing was written yet
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Discard everything written so far, keeping the allocation
    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Append a single byte
    pub fn write_byte(&mut self, byte: u8) {
        self.data.push(byte);
    }

    /// Append all of `buf`
    pub fn write(&mut self, buf: &[u8]) -> usize {
        self.data.extend_from_slice(buf);
        buf.len()
    }

    /// Append `src[offset..offset + length]`
    ///
    /// # Errors
    /// `MissingBuffer` if `src` is `None`, `OutOfBounds` if the window does
    /// not fit `src`.
    pub fn write_from(
        &mut self,
        src: Option<&[u8]>,
        offset: usize,
        length: usize,
    ) -> Result<usize, ArrayStreamError> {
        let window = window(src, offset, length)?;
        Ok(self.write(window))
    }
}

impl ByteSink for ByteArraySink {
    type Error = Infallible;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(ByteArraySink::write(self, buf))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bytes() {
        let mut source = ByteArraySource::new(b"Hello");

        for expected in *b"Hello" {
            assert_eq!(source.read_byte(), Some(expected));
        }
        assert_eq!(source.read_byte(), None);
    }

    #[test]
    fn test_read_empty_array() {
        let mut source = ByteArraySource::new(&b""[..]);

        assert_eq!(source.read_byte(), None);
        assert_eq!(source.read(&mut [0u8; 4]), Fill::EndOfStream);
        assert_eq!(source.read(&mut []), Fill::Count(0));
    }

    #[test]
    fn test_read_whole_array() {
        let mut source = ByteArraySource::new(b"Hello".to_vec());
        let mut buf = [0u8; 5];

        assert_eq!(source.read_into(Some(&mut buf[..]), 0, 5), Ok(Fill::Count(5)));
        assert_eq!(&buf, b"Hello");
        assert_eq!(source.position(), 5);
        assert!(source.remaining().is_empty());
    }

    #[test]
    fn test_read_into_bad_windows() {
        let mut source = ByteArraySource::new(b"Hello");
        let mut buf = [0u8; 5];

        assert!(matches!(
            source.read_into(Some(&mut buf[..]), 1, 5),
            Err(ArrayStreamError::OutOfBounds { .. })
        ));
        assert!(matches!(
            source.read_into(Some(&mut buf[..]), 0, 6),
            Err(ArrayStreamError::OutOfBounds { .. })
        ));
        assert_eq!(
            source.read_into(None, 0, 6),
            Err(ArrayStreamError::MissingBuffer)
        );
        // nothing was consumed
        assert_eq!(source.position(), 0);
    }

    #[test]
    fn test_source_fill_is_short_at_end() {
        let mut source = ByteArraySource::new([1u8, 2, 3]);
        let mut buf = [0u8; 2];

        assert_eq!(source.fill(&mut buf), Ok(Fill::Count(2)));
        assert_eq!(source.fill(&mut buf), Ok(Fill::Count(1)));
        assert_eq!(buf[0], 3);
        assert_eq!(source.fill(&mut buf), Ok(Fill::EndOfStream));
    }

    #[test]
    fn test_write_bytes() {
        let mut sink = ByteArraySink::new();
        sink.write(&[1, 2, 3, 4, 5]);

        assert_eq!(sink.as_slice(), &[1, 2, 3, 4, 5]);
        assert_eq!(sink.len(), 5);
    }

    #[test]
    fn test_write_from_window() {
        let mut sink = ByteArraySink::with_capacity(8);
        let src = [1u8, 2, 3, 4, 5];

        assert_eq!(sink.write_from(Some(&src[..]), 0, 3), Ok(3));
        sink.write_byte(9);
        assert_eq!(sink.into_inner(), vec![1, 2, 3, 9]);
    }

    #[test]
    fn test_write_from_bad_windows() {
        let mut sink = ByteArraySink::new();
        let src = [0u8; 5];

        assert_eq!(sink.write_from(None, 0, 0), Err(ArrayStreamError::MissingBuffer));
        assert!(matches!(
            sink.write_from(Some(&src[..]), 6, 1),
            Err(ArrayStreamError::OutOfBounds { .. })
        ));
        assert!(matches!(
            sink.write_from(Some(&src[..]), 0, 6),
            Err(ArrayStreamError::OutOfBounds { .. })
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = ArrayStreamError::OutOfBounds {
            offset: 6,
            length: 1,
            capacity: 5,
        };
        assert_eq!(
            err.to_string(),
            "window at offset 6 with length 1 exceeds buffer of 5 bytes"
        );
    }
}
