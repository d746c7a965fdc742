//! Buffered reader over a byte source
//!
//! Keeps a fixed-capacity buffer in front of a [`ByteSource`] so that many
//! small reads cost one large `fill` against the source.
//!
//! # Example
//!
//! ```ignore
//! use bufio_adapters::{BufReader, Fill};
//!
//! let mut reader = BufReader::with_capacity(source, 4096)?;
//!
//! // Single bytes are served from the buffer
//! while let Some(byte) = reader.read_byte()? {
//!     // ...
//! }
//!
//! reader.close()?;
//! ```

use alloc::boxed::Box;
use alloc::vec;

use bufio_source::{ByteSource, Fill};
use embedded_io::ErrorKind;

use crate::DEFAULT_CAPACITY;
use crate::window::{WindowFault, window_mut};

crate::define_adapter_error! {
    /// Error type for BufReader operations
    #[derive(Copy, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum BufReaderError<E> {
        /// Underlying source error
        Io(E) => "IO error: {}",
        /// The buffer capacity was zero
        InvalidCapacity { capacity: usize } => "incorrect buffer capacity: {}, should be more than 0",
        /// No destination buffer was supplied
        MissingBuffer => "destination buffer is missing",
        /// The requested window does not fit the destination buffer
        OutOfBounds { offset: usize, length: usize, capacity: usize } => "window at offset {} with length {} exceeds buffer of {} bytes",
        /// The reader has been closed
        Closed => "the stream has been closed",
    }
}

impl<E> BufReaderError<E> {
    fn from_window(fault: WindowFault) -> Self {
        match fault {
            WindowFault::Missing => Self::MissingBuffer,
            WindowFault::OutOfBounds {
                offset,
                length,
                capacity,
            } => Self::OutOfBounds {
                length,
                offset,
                capacity,
            },
        }
    }
}

impl<E: embedded_io::Error + core::fmt::Display> embedded_io::Error for BufReaderError<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(e) => e.kind(),
            Self::InvalidCapacity { .. } | Self::MissingBuffer | Self::OutOfBounds { .. } => {
                ErrorKind::InvalidInput
            }
            Self::Closed => ErrorKind::NotConnected,
        }
    }
}

/// Buffered reader providing byte and slice reads over a [`ByteSource`]
///
/// The internal buffer is allocated once at construction and never grows or
/// shrinks. Buffered bytes are always handed out before fresh source bytes,
/// so any sequence of reads yields the source's bytes in order, without gaps
/// or duplicates.
///
/// A single call touches the source at most twice. Short reads are normal:
/// a read that straddles a refill may return fewer bytes than requested
/// without the stream having ended. [`fill_exact`](crate::fill_exact) loops
/// until a buffer is full.
///
/// # Concurrency
///
/// The reader is single-owner. Every read blocks on the source and no
/// locking is done.
///
/// # Closing
///
/// [`close`](Self::close) releases the buffer and closes the source. It runs
/// exactly once: later calls are no-ops, and dropping an open reader closes
/// it.
pub struct BufReader<S: ByteSource> {
    /// The underlying byte source
    source: S,

    /// Fixed-capacity read buffer; empty once closed
    buffer: Box<[u8]>,

    /// Index of the next unconsumed byte, `pos <= valid`
    pos: usize,

    /// Number of live bytes at the front of `buffer`
    valid: usize,

    /// The last trip to the source reported end-of-stream
    eof: bool,

    closed: bool,
}

impl<S: ByteSource> BufReader<S> {
    /// Create a new buffered reader with [`DEFAULT_CAPACITY`]
    pub fn new(source: S) -> Self {
        Self::from_parts(source, DEFAULT_CAPACITY)
    }

    /// Create a new buffered reader with the given buffer capacity
    ///
    /// # Errors
    /// Returns `InvalidCapacity` if `capacity` is zero. The source is not
    /// touched in that case.
    pub fn with_capacity(source: S, capacity: usize) -> Result<Self, BufReaderError<S::Error>> {
        if capacity == 0 {
            return Err(BufReaderError::InvalidCapacity { capacity });
        }
        Ok(Self::from_parts(source, capacity))
    }

    fn from_parts(source: S, capacity: usize) -> Self {
        Self {
            source,
            buffer: vec![0u8; capacity].into_boxed_slice(),
            pos: 0,
            valid: 0,
            eof: false,
            closed: false,
        }
    }

    /// Get a reference to the underlying source
    pub fn inner(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the underlying source
    ///
    /// # Warning
    /// Reading from the source directly skips the buffered bytes and breaks
    /// the ordering guarantee.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Get the buffer capacity in bytes (zero once closed)
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Get the buffered bytes that have not been consumed yet
    pub fn buffer(&self) -> &[u8] {
        &self.buffer[self.pos..self.valid]
    }

    /// Check if the last trip to the source reported end-of-stream
    pub fn is_end_of_stream(&self) -> bool {
        self.eof
    }

    /// Check if the reader has been closed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Read a single byte
    ///
    /// Returns `None` once the source reports end-of-stream.
    ///
    /// # Errors
    /// Returns `Closed` after [`close`](Self::close).
    pub fn read_byte(&mut self) -> Result<Option<u8>, BufReaderError<S::Error>> {
        self.ensure_open()?;
        if self.refill()?.is_end_of_stream() {
            return Ok(None);
        }
        let byte = self.buffer[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }

    /// Read into `dest[offset..offset + length]`
    ///
    /// Bytes of `dest` outside the window are left untouched. Arguments are
    /// validated before the source is touched.
    ///
    /// # Errors
    /// - `Closed` after [`close`](Self::close)
    /// - `MissingBuffer` if `dest` is `None`, whatever `offset` and `length` are
    /// - `OutOfBounds` if the window does not fit `dest`
    pub fn read_into(
        &mut self,
        dest: Option<&mut [u8]>,
        offset: usize,
        length: usize,
    ) -> Result<Fill, BufReaderError<S::Error>> {
        self.ensure_open()?;
        let window = window_mut(dest, offset, length).map_err(BufReaderError::from_window)?;
        self.read(window)
    }

    /// Read up to `buf.len()` bytes
    ///
    /// Returns `Fill::Count(0)` for an empty `buf` without touching the
    /// source, and `Fill::EndOfStream` when no byte could be produced because
    /// the source is exhausted. Any other count may be short.
    ///
    /// Requests larger than the buffer capacity skip the buffer: buffered
    /// bytes are copied out first and the rest is read straight from the
    /// source.
    ///
    /// # Errors
    /// Returns `Closed` after [`close`](Self::close), or `Io` if the source fails.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<Fill, BufReaderError<S::Error>> {
        self.ensure_open()?;
        if buf.is_empty() {
            return Ok(Fill::Count(0));
        }
        if buf.len() > self.buffer.len() {
            return self.read_bypass(buf);
        }

        if self.refill()?.is_end_of_stream() {
            return Ok(Fill::EndOfStream);
        }

        let copied = self.copy_buffered(buf);
        if copied == buf.len() {
            return Ok(Fill::Count(copied));
        }

        // Buffer drained mid-request: pull exactly one more batch
        match self.refill()? {
            Fill::EndOfStream => Ok(Fill::Count(copied)),
            Fill::Count(_) => {
                let more = self.copy_buffered(&mut buf[copied..]);
                Ok(Fill::Count(copied + more))
            }
        }
    }

    /// Close the reader and the underlying source
    ///
    /// The buffer is released and every later read fails with `Closed`.
    /// Closing an already closed reader does nothing.
    ///
    /// # Errors
    /// Returns `Io` if the source fails to close. The reader counts as closed
    /// regardless.
    pub fn close(&mut self) -> Result<(), BufReaderError<S::Error>> {
        if self.closed {
            return Ok(());
        }
        debug!("closing buffered reader, {} bytes discarded", self.valid - self.pos);

        self.closed = true;
        self.pos = 0;
        self.valid = 0;
        self.eof = false;
        self.buffer = Box::default();

        self.source.close()?;
        Ok(())
    }

    #[inline]
    fn ensure_open(&self) -> Result<(), BufReaderError<S::Error>> {
        if self.closed {
            return Err(BufReaderError::Closed);
        }
        Ok(())
    }

    /// Refill the buffer from the source if every buffered byte was consumed
    ///
    /// Returns the number of unconsumed bytes, or `EndOfStream` if the buffer
    /// was empty and the source had nothing more. This is the only place the
    /// source is read through the buffer.
    fn refill(&mut self) -> Result<Fill, BufReaderError<S::Error>> {
        if self.pos < self.valid {
            return Ok(Fill::Count(self.valid - self.pos));
        }

        let fill = self.source.fill(&mut self.buffer)?;
        self.pos = 0;
        match fill {
            Fill::Count(n) if n > 0 => {
                self.valid = n.min(self.buffer.len());
                self.eof = false;
                trace!("refilled {} bytes", self.valid);
                Ok(Fill::Count(self.valid))
            }
            // an empty fill into a non-empty buffer can only mean exhaustion
            _ => {
                self.valid = 0;
                self.eof = true;
                trace!("source reached end of stream");
                Ok(Fill::EndOfStream)
            }
        }
    }

    /// Copy as many unconsumed bytes as fit into `dest`
    fn copy_buffered(&mut self, dest: &mut [u8]) -> usize {
        let n = dest.len().min(self.valid - self.pos);
        dest[..n].copy_from_slice(&self.buffer[self.pos..self.pos + n]);
        self.pos += n;
        n
    }

    fn read_bypass(&mut self, buf: &mut [u8]) -> Result<Fill, BufReaderError<S::Error>> {
        // buf is larger than the whole buffer, so this drains it
        let drained = self.copy_buffered(buf);
        let rest = &mut buf[drained..];
        trace!("bypassing buffer: {} buffered, {} direct", drained, rest.len());

        let direct = match self.source.fill(rest)? {
            Fill::Count(n) if n > 0 => {
                self.eof = false;
                n.min(rest.len())
            }
            _ => {
                self.eof = true;
                0
            }
        };

        match drained + direct {
            0 => Ok(Fill::EndOfStream),
            total => Ok(Fill::Count(total)),
        }
    }
}

impl<S: ByteSource> Drop for BufReader<S> {
    fn drop(&mut self) {
        if !self.closed && self.close().is_err() {
            warn!("failed to close source while dropping buffered reader");
        }
    }
}

impl<S: ByteSource> ByteSource for BufReader<S> {
    type Error = BufReaderError<S::Error>;

    fn fill(&mut self, buf: &mut [u8]) -> Result<Fill, Self::Error> {
        self.read(buf)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        BufReader::close(self)
    }
}

impl<S: ByteSource> embedded_io::ErrorType for BufReader<S>
where
    S::Error: embedded_io::Error + core::fmt::Display,
{
    type Error = BufReaderError<S::Error>;
}

impl<S: ByteSource> embedded_io::Read for BufReader<S>
where
    S::Error: embedded_io::Error + core::fmt::Display,
{
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(BufReader::read(self, buf)?.count().unwrap_or(0))
    }
}

impl<S: ByteSource> embedded_io::BufRead for BufReader<S>
where
    S::Error: embedded_io::Error + core::fmt::Display,
{
    fn fill_buf(&mut self) -> Result<&[u8], Self::Error> {
        self.ensure_open()?;
        self.refill()?;
        Ok(&self.buffer[self.pos..self.valid])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = self.pos.saturating_add(amt).min(self.valid);
    }
}
