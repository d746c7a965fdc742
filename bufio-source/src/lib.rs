//! Core byte source and sink abstractions for the bufio ecosystem.
//!
//! This crate provides the two capabilities that buffered adapters are built
//! on top of: [`ByteSource`] (something bytes can be pulled from) and
//! [`ByteSink`] (something bytes can be pushed into).
//!
//! # Features
//!
//! - `no_std` compatible by default
//! - Synchronous, blocking design: every call returns only once data,
//!   end-of-stream or an error is known
//! - End-of-stream is a tagged [`Fill`] value, never an in-band count
//! - [`IoSource`] and [`IoSink`] bridge any `embedded_io` reader or writer
//!
//! # Example
//!
//! ```ignore
//! use bufio_source::{ByteSource, Fill};
//!
//! struct Zeroes { left: usize }
//!
//! impl ByteSource for Zeroes {
//!     type Error = core::convert::Infallible;
//!
//!     fn fill(&mut self, buf: &mut [u8]) -> Result<Fill, Self::Error> {
//!         if self.left == 0 {
//!             return Ok(Fill::EndOfStream);
//!         }
//!         let n = buf.len().min(self.left);
//!         buf[..n].fill(0);
//!         self.left -= n;
//!         Ok(Fill::Count(n))
//!     }
//!
//!     fn close(&mut self) -> Result<(), Self::Error> {
//!         Ok(())
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

mod io;

pub use io::{IoSink, IoSource};

/// Outcome of pulling bytes from a [`ByteSource`].
///
/// A successful fill of zero bytes and the end of the stream are different
/// things: `Count(0)` is only ever produced for an empty request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Fill {
    /// This many bytes were written to the front of the destination.
    Count(usize),
    /// The source is exhausted; no further bytes will be produced.
    EndOfStream,
}

impl Fill {
    /// Returns the byte count, or `None` at end-of-stream.
    #[inline]
    pub const fn count(self) -> Option<usize> {
        match self {
            Fill::Count(n) => Some(n),
            Fill::EndOfStream => None,
        }
    }

    /// Check if this is the end-of-stream marker
    #[inline]
    pub const fn is_end_of_stream(self) -> bool {
        matches!(self, Fill::EndOfStream)
    }
}

/// A readable byte source.
///
/// Any object that can copy up to `buf.len()` bytes into a caller buffer is a
/// valid source: a file handle, a socket, an in-memory array, or another
/// buffered adapter.
///
/// # Contract
///
/// - `fill` may return fewer bytes than requested (a short read).
/// - For a non-empty `buf`, exhaustion must be reported as
///   [`Fill::EndOfStream`] rather than `Count(0)`.
/// - After `close`, the source is not used again by its owner.
pub trait ByteSource {
    /// The error type for the source implementation.
    type Error: core::fmt::Debug;

    /// Copy up to `buf.len()` bytes into the front of `buf`.
    fn fill(&mut self, buf: &mut [u8]) -> Result<Fill, Self::Error>;

    /// Release the source.
    fn close(&mut self) -> Result<(), Self::Error>;
}

/// A writable byte sink.
///
/// The mirror of [`ByteSource`]: `write` may accept fewer bytes than offered,
/// and returning `Ok(0)` for a non-empty `buf` means the sink cannot take
/// more data.
pub trait ByteSink {
    /// The error type for the sink implementation.
    type Error: core::fmt::Debug;

    /// Write up to `buf.len()` bytes, returning how many were accepted.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;

    /// Push any bytes held by the sink itself to their destination.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Release the sink.
    fn close(&mut self) -> Result<(), Self::Error>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    type Error = S::Error;

    #[inline]
    fn fill(&mut self, buf: &mut [u8]) -> Result<Fill, Self::Error> {
        (**self).fill(buf)
    }

    #[inline]
    fn close(&mut self) -> Result<(), Self::Error> {
        (**self).close()
    }
}

impl<K: ByteSink + ?Sized> ByteSink for &mut K {
    type Error = K::Error;

    #[inline]
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        (**self).write(buf)
    }

    #[inline]
    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }

    #[inline]
    fn close(&mut self) -> Result<(), Self::Error> {
        (**self).close()
    }
}
