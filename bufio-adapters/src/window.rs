//! Validation of caller-supplied `(buffer, offset, length)` triples.

use core::ops::Range;

/// Reason a caller window was rejected
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum WindowFault {
    /// No buffer was supplied
    Missing,
    /// `offset + length` runs past the end of the buffer
    OutOfBounds {
        offset: usize,
        length: usize,
        capacity: usize,
    },
}

fn range(offset: usize, length: usize, capacity: usize) -> Result<Range<usize>, WindowFault> {
    match offset.checked_add(length) {
        Some(end) if end <= capacity => Ok(offset..end),
        _ => Err(WindowFault::OutOfBounds {
            offset,
            length,
            capacity,
        }),
    }
}

/// Narrow `dest` to `dest[offset..offset + length]`.
pub(crate) fn window_mut(
    dest: Option<&mut [u8]>,
    offset: usize,
    length: usize,
) -> Result<&mut [u8], WindowFault> {
    let dest = dest.ok_or(WindowFault::Missing)?;
    let range = range(offset, length, dest.len())?;
    Ok(&mut dest[range])
}

/// Narrow `src` to `src[offset..offset + length]`.
pub(crate) fn window(src: Option<&[u8]>, offset: usize, length: usize) -> Result<&[u8], WindowFault> {
    let src = src.ok_or(WindowFault::Missing)?;
    let range = range(offset, length, src.len())?;
    Ok(&src[range])
}
