//! Buffered writer over a byte sink
//!
//! The mirror image of [`BufReader`](crate::BufReader): writes accumulate in
//! a fixed-capacity buffer that is pushed to the sink when full, on
//! [`flush`](BufWriter::flush) and on [`close`](BufWriter::close).

use alloc::vec::Vec;

use bufio_source::ByteSink;
use embedded_io::ErrorKind;

use crate::DEFAULT_CAPACITY;
use crate::io_helpers::write_all;
use crate::window::{WindowFault, window};

crate::define_adapter_error! {
    /// Error type for BufWriter operations
    #[derive(Copy, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum BufWriterError<E> {
        /// Underlying sink error
        Io(E) => "IO error: {}",
        /// The buffer capacity was zero
        InvalidCapacity { capacity: usize } => "incorrect buffer capacity: {}, should be more than 0",
        /// No source buffer was supplied
        MissingBuffer => "source buffer is missing",
        /// The requested window does not fit the source buffer
        OutOfBounds { offset: usize, length: usize, capacity: usize } => "window at offset {} with length {} exceeds buffer of {} bytes",
        /// The sink stopped accepting bytes before the buffer was drained
        WriteZero => "sink accepted zero bytes",
        /// The writer has been closed
        Closed => "the stream has been closed",
    }
}

impl<E> BufWriterError<E> {
    fn from_window(fault: WindowFault) -> Self {
        match fault {
            WindowFault::Missing => Self::MissingBuffer,
            WindowFault::OutOfBounds {
                offset,
                length,
                capacity,
            } => Self::OutOfBounds {
                offset,
                length,
                capacity,
            },
        }
    }
}

impl<E: embedded_io::Error + core::fmt::Display> embedded_io::Error for BufWriterError<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(e) => e.kind(),
            Self::InvalidCapacity { .. } | Self::MissingBuffer | Self::OutOfBounds { .. } => {
                ErrorKind::InvalidInput
            }
            Self::WriteZero => ErrorKind::WriteZero,
            Self::Closed => ErrorKind::NotConnected,
        }
    }
}

/// Buffered writer over a [`ByteSink`]
///
/// Writes that fit are copied into the buffer. A write larger than the whole
/// buffer flushes what is pending and goes straight to the sink, so bytes
/// reach the sink in the order they were written.
///
/// Dropping an open writer closes it, which flushes pending bytes; errors
/// during that implicit close are logged and otherwise lost. Call
/// [`close`](Self::close) to observe them.
pub struct BufWriter<K: ByteSink> {
    sink: K,
    buffer: Vec<u8>,
    capacity: usize,
    closed: bool,
}

impl<K: ByteSink> BufWriter<K> {
    /// Create a new buffered writer with [`DEFAULT_CAPACITY`]
    pub fn new(sink: K) -> Self {
        Self::from_parts(sink, DEFAULT_CAPACITY)
    }

    /// Create a new buffered writer with the given buffer capacity
    ///
    /// # Errors
    /// Returns `InvalidCapacity` if `capacity` is zero.
    pub fn with_capacity(sink: K, capacity: usize) -> Result<Self, BufWriterError<K::Error>> {
        if capacity == 0 {
            return Err(BufWriterError::InvalidCapacity { capacity });
        }
        Ok(Self::from_parts(sink, capacity))
    }

    fn from_parts(sink: K, capacity: usize) -> Self {
        Self {
            sink,
            buffer: Vec::with_capacity(capacity),
            capacity,
            closed: false,
        }
    }

    /// Get a reference to the underlying sink
    pub fn inner(&self) -> &K {
        &self.sink
    }

    /// Get a mutable reference to the underlying sink
    ///
    /// # Warning
    /// Bytes written to the sink directly land before any pending buffered bytes.
    pub fn inner_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Get the buffer capacity in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the bytes waiting to be flushed
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Check if the writer has been closed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Write a single byte
    pub fn write_byte(&mut self, byte: u8) -> Result<(), BufWriterError<K::Error>> {
        self.ensure_open()?;
        if self.buffer.len() == self.capacity {
            self.flush_buffer()?;
        }
        self.buffer.push(byte);
        Ok(())
    }

    /// Write all of `buf`, returning `buf.len()`
    ///
    /// # Errors
    /// Returns `Closed` after [`close`](Self::close), `Io` if the sink fails,
    /// or `WriteZero` if the sink stops accepting bytes.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize, BufWriterError<K::Error>> {
        self.ensure_open()?;
        if buf.len() > self.capacity - self.buffer.len() {
            self.flush_buffer()?;
        }

        if buf.len() > self.capacity {
            trace!("bypassing buffer for {} byte write", buf.len());
            if write_all(&mut self.sink, buf)? < buf.len() {
                return Err(BufWriterError::WriteZero);
            }
        } else {
            self.buffer.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    /// Write `src[offset..offset + length]`
    ///
    /// # Errors
    /// Besides the errors of [`write`](Self::write): `MissingBuffer` if `src`
    /// is `None`, `OutOfBounds` if the window does not fit `src`.
    pub fn write_from(
        &mut self,
        src: Option<&[u8]>,
        offset: usize,
        length: usize,
    ) -> Result<usize, BufWriterError<K::Error>> {
        self.ensure_open()?;
        let window = window(src, offset, length).map_err(BufWriterError::from_window)?;
        self.write(window)
    }

    /// Push pending bytes to the sink and flush the sink
    pub fn flush(&mut self) -> Result<(), BufWriterError<K::Error>> {
        self.ensure_open()?;
        self.flush_buffer()?;
        self.sink.flush()?;
        Ok(())
    }

    /// Flush pending bytes, then close the sink
    ///
    /// Closing an already closed writer does nothing. The writer counts as
    /// closed even if flushing or closing the sink fails; the first failure
    /// is returned.
    pub fn close(&mut self) -> Result<(), BufWriterError<K::Error>> {
        if self.closed {
            return Ok(());
        }
        debug!("closing buffered writer, {} bytes pending", self.buffer.len());

        self.closed = true;
        let flushed = self.flush_buffer();
        self.buffer = Vec::new();
        let closed = self.sink.close().map_err(BufWriterError::Io);
        flushed.and(closed)
    }

    #[inline]
    fn ensure_open(&self) -> Result<(), BufWriterError<K::Error>> {
        if self.closed {
            return Err(BufWriterError::Closed);
        }
        Ok(())
    }

    fn flush_buffer(&mut self) -> Result<(), BufWriterError<K::Error>> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let written = write_all(&mut self.sink, &self.buffer)?;
        trace!("flushed {} of {} buffered bytes", written, self.buffer.len());
        self.buffer.drain(..written);
        if !self.buffer.is_empty() {
            return Err(BufWriterError::WriteZero);
        }
        Ok(())
    }
}

impl<K: ByteSink> Drop for BufWriter<K> {
    fn drop(&mut self) {
        if !self.closed && self.close().is_err() {
            warn!("failed to flush or close sink while dropping buffered writer");
        }
    }
}

impl<K: ByteSink> ByteSink for BufWriter<K> {
    type Error = BufWriterError<K::Error>;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        BufWriter::write(self, buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        BufWriter::flush(self)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        BufWriter::close(self)
    }
}

impl<K: ByteSink> embedded_io::ErrorType for BufWriter<K>
where
    K::Error: embedded_io::Error + core::fmt::Display,
{
    type Error = BufWriterError<K::Error>;
}

impl<K: ByteSink> embedded_io::Write for BufWriter<K>
where
    K::Error: embedded_io::Error + core::fmt::Display,
{
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        BufWriter::write(self, buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        BufWriter::flush(self)
    }
}
