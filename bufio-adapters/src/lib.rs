//! Buffered byte stream adapters for the bufio ecosystem.
//!
//! This crate turns many small reads and writes into fewer large ones against
//! an underlying [`ByteSource`] or [`ByteSink`]:
//!
//! - [`BufReader`]: Fixed-capacity read buffer with refill, short-read and bypass handling
//! - [`BufWriter`]: Fixed-capacity write buffer flushed when full, on `flush` or on `close`
//! - [`ByteArraySource`]: Read cursor over an in-memory byte array
//! - [`ByteArraySink`]: Growable in-memory byte array to write into
//!
//! Every adapter is single-owner and synchronous. Calls block on the
//! underlying source or sink and no internal locking is done; sharing one
//! adapter between execution contexts is the caller's responsibility to
//! prevent.
//!
//! # Example: Reading "Hello world" three bytes at a time
//!
//! ```ignore
//! use bufio_adapters::{BufReader, ByteArraySource, Fill};
//!
//! let mut reader = BufReader::new(ByteArraySource::new(b"Hello world"));
//! let mut chunk = [0u8; 3];
//!
//! while let Fill::Count(n) = reader.read(&mut chunk)? {
//!     handle(&chunk[..n]);
//! }
//! reader.close()?;
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub use bufio_source::{ByteSink, ByteSource, Fill, IoSink, IoSource};

/// Defines an adapter error enum wrapping the error of the underlying stream.
///
/// The first variant must be `Io(E)`; at least one more variant follows, unit
/// or with named fields. Each variant carries its `Display` message, and named
/// fields are substituted into it in declaration order. Generated alongside
/// the enum: `Debug`, `#[non_exhaustive]`, `From<E>`, `Display` and
/// `core::error::Error`.
///
/// # Example
///
/// ```ignore
/// define_adapter_error! {
///     /// Error type for BufReader operations
///     pub enum BufReaderError<E> {
///         /// Underlying source error
///         Io(E) => "IO error: {}",
///         /// The buffer capacity was zero
///         InvalidCapacity { capacity: usize } => "incorrect buffer capacity: {}",
///         /// The reader has been closed
///         Closed => "the stream has been closed",
///     }
/// }
/// ```
#[macro_export]
macro_rules! define_adapter_error {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident<$err:ident> {
            $(#[$io_meta:meta])*
            Io($io_ty:ident) => $io_msg:literal,
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $({ $($field:ident : $field_ty:ty),* $(,)? })? => $variant_msg:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        #[non_exhaustive]
        $vis enum $name<$err> {
            $(#[$io_meta])*
            Io($io_ty),
            $(
                $(#[$variant_meta])*
                $variant $({ $($field : $field_ty),* })?,
            )+
        }

        impl<$err> From<$err> for $name<$err> {
            fn from(err: $err) -> Self {
                Self::Io(err)
            }
        }

        impl<$err: core::fmt::Display> core::fmt::Display for $name<$err> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    Self::Io(err) => write!(f, $io_msg, err),
                    $(
                        Self::$variant $({ $($field),* })? => write!(f, $variant_msg $(, $($field),*)?),
                    )+
                }
            }
        }

        impl<$err: core::fmt::Debug + core::fmt::Display> core::error::Error for $name<$err> {}
    };
}

// MUST be the first module listed
mod fmt;

mod window;

mod io_helpers;
pub use io_helpers::{fill_exact, write_all};

mod array_stream;
mod buf_reader;
mod buf_writer;

pub use array_stream::{ArrayStreamError, ByteArraySink, ByteArraySource};
pub use buf_reader::{BufReader, BufReaderError};
pub use buf_writer::{BufWriter, BufWriterError};

/// Default capacity of the internal buffer of [`BufReader`] and [`BufWriter`]
pub const DEFAULT_CAPACITY: usize = 1024;

/// Common buffer capacity presets
pub mod presets {
    /// 512B - One SD card block
    pub const BUF_512: usize = 512;

    /// 1KB - The default capacity
    pub const BUF_1K: usize = 1024;

    /// 4KB - Standard OS page size
    pub const BUF_4K: usize = 4 * 1024;

    /// 8KB - Matches the buffer size of most std readers
    pub const BUF_8K: usize = 8 * 1024;

    /// 64KB - Traditional "large" I/O size
    pub const BUF_64K: usize = 64 * 1024;
}
