//! I/O helper functions for handling short reads and partial writes.
//!
//! Sources and sinks are allowed to move fewer bytes than asked for. These
//! functions loop until an exact amount of data has been moved, the stream
//! ends, or an error occurs.

use bufio_source::{ByteSink, ByteSource, Fill};

/// Fill `buf` completely, handling short reads.
///
/// This function will repeatedly call `fill()` until the buffer is completely
/// filled or the source reports end-of-stream. Returns the number of bytes
/// read, which is only less than `buf.len()` when the stream ended first.
///
/// # Errors
///
/// Returns the underlying source error if one occurs. Bytes copied before the
/// error are left in `buf`.
///
/// # Example
///
/// ```ignore
/// use bufio_adapters::fill_exact;
///
/// let mut header = [0u8; 16];
/// if fill_exact(&mut reader, &mut header)? < header.len() {
///     // truncated input
/// }
/// ```
pub fn fill_exact<S: ByteSource>(source: &mut S, buf: &mut [u8]) -> Result<usize, S::Error> {
    let mut offset = 0;
    while offset < buf.len() {
        match source.fill(&mut buf[offset..])? {
            Fill::Count(0) | Fill::EndOfStream => break,
            Fill::Count(n) => offset += n,
        }
    }
    Ok(offset)
}

/// Write all bytes from `buf`, handling partial writes.
///
/// This function will repeatedly call `write()` until all data is written
/// or an error occurs. Returns the number of bytes written.
///
/// # Errors
///
/// Returns the underlying write error if one occurs. If a write returns 0
/// (the sink cannot accept more data), the function stops early and the
/// returned count is less than `buf.len()`. The count never exceeds
/// `buf.len()`, even if the sink over-reports.
pub fn write_all<K: ByteSink>(sink: &mut K, buf: &[u8]) -> Result<usize, K::Error> {
    let mut offset = 0;
    while offset < buf.len() {
        let n = sink.write(&buf[offset..])?;
        if n == 0 {
            // Cannot write more data
            break;
        }
        // a sink may not claim more than it was handed
        offset += n.min(buf.len() - offset);
    }
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A mock source that returns data in chunks
    struct ChunkedSource {
        data: Vec<u8>,
        pos: usize,
        chunk_size: usize,
    }

    impl ChunkedSource {
        fn new(data: Vec<u8>, chunk_size: usize) -> Self {
            Self {
                data,
                pos: 0,
                chunk_size,
            }
        }
    }

    impl ByteSource for ChunkedSource {
        type Error = core::convert::Infallible;

        fn fill(&mut self, buf: &mut [u8]) -> Result<Fill, Self::Error> {
            let remaining = self.data.len() - self.pos;
            if remaining == 0 {
                return Ok(Fill::EndOfStream);
            }
            let to_read = buf.len().min(self.chunk_size).min(remaining);
            buf[..to_read].copy_from_slice(&self.data[self.pos..self.pos + to_read]);
            self.pos += to_read;
            Ok(Fill::Count(to_read))
        }

        fn close(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    /// A mock sink that accepts data in chunks, up to an optional limit
    struct ChunkedSink {
        data: Vec<u8>,
        chunk_size: usize,
        limit: usize,
    }

    impl ChunkedSink {
        fn new(chunk_size: usize) -> Self {
            Self {
                data: Vec::new(),
                chunk_size,
                limit: usize::MAX,
            }
        }
    }

    impl ByteSink for ChunkedSink {
        type Error = core::convert::Infallible;

        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            let room = self.limit - self.data.len();
            let to_write = buf.len().min(self.chunk_size).min(room);
            self.data.extend_from_slice(&buf[..to_write]);
            Ok(to_write)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn close(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_fill_exact_full_buffer() {
        let data = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let mut source = ChunkedSource::new(data.clone(), 3); // Read 3 bytes at a time
        let mut buf = [0u8; 8];

        assert_eq!(fill_exact(&mut source, &mut buf).unwrap(), 8);
        assert_eq!(&buf[..], &data[..]);
    }

    #[test]
    fn test_fill_exact_stops_at_end_of_stream() {
        let mut source = ChunkedSource::new(vec![0xAA, 0xBB, 0xCC], 1);
        let mut buf = [0u8; 8];

        assert_eq!(fill_exact(&mut source, &mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[0xAA, 0xBB, 0xCC]);
        assert_eq!(fill_exact(&mut source, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_write_all_full_buffer() {
        let data = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let mut sink = ChunkedSink::new(3); // Write 3 bytes at a time

        assert_eq!(write_all(&mut sink, &data).unwrap(), 8);
        assert_eq!(&sink.data[..], &data[..]);
    }

    #[test]
    fn test_write_all_stops_when_sink_is_full() {
        let mut sink = ChunkedSink::new(2);
        sink.limit = 5;

        assert_eq!(write_all(&mut sink, &[9u8; 8]).unwrap(), 5);
        assert_eq!(sink.data, vec![9u8; 5]);
    }

    /// A sink claiming one byte more than each write hands it
    struct OverReportingSink;

    impl ByteSink for OverReportingSink {
        type Error = core::convert::Infallible;

        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            Ok(buf.len() + 1)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn close(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_write_all_count_capped_at_buffer_length() {
        assert_eq!(write_all(&mut OverReportingSink, b"ab").unwrap(), 2);
        assert_eq!(write_all(&mut OverReportingSink, b"").unwrap(), 0);
    }
}
