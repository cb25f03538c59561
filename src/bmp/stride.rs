//! Row stride arithmetic shared by the BMP decoder and encoder.
//!
//! BMP pads every stored row to a multiple of four bytes; the in-memory
//! buffer keeps rows unpadded.

use crate::error::BitmapError;

/// Bytes of real pixel data in one row: `width * bytes_per_pixel`.
pub(crate) fn unpadded_row_stride(width: u32, bytes_per_pixel: usize) -> Option<usize> {
    (width as usize).checked_mul(bytes_per_pixel)
}

/// Bytes one row occupies on disk: the unpadded stride rounded up to 4.
pub(crate) fn padded_row_stride(width: u32, bytes_per_pixel: usize) -> Option<usize> {
    unpadded_row_stride(width, bytes_per_pixel)
        .and_then(|r| r.checked_add(3))
        .map(|r| r & !3)
}

/// Unpadded and padded strides together, erroring on overflow.
pub(crate) fn row_strides(
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Result<(usize, usize), BitmapError> {
    let too_large = || BitmapError::DimensionsTooLarge { width, height };
    let unpadded = unpadded_row_stride(width, bytes_per_pixel).ok_or_else(too_large)?;
    let padded = padded_row_stride(width, bytes_per_pixel).ok_or_else(too_large)?;
    Ok((unpadded, padded))
}
