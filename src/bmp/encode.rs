//! BMP encoder: uncompressed 8, 16, 24 and 32-bit BMP with a
//! BITMAPINFOHEADER, rows bottom-up and zero-padded to four bytes.

use enough::Stop;

use super::stride::row_strides;
use super::{FILE_HEADER_SIZE, INFO_HEADER_SIZE, NO_COMPRESSION, SIGNATURE};
use crate::decode::DecodedImage;
use crate::error::BitmapError;

/// Print resolution in pixels per meter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Resolution {
    pub x: u32,
    pub y: u32,
}

impl Default for Resolution {
    /// 300 DPI.
    fn default() -> Self {
        Self { x: 11811, y: 11811 }
    }
}

/// Encode an image to a complete BMP file in memory.
pub(crate) fn encode_bmp(
    image: &DecodedImage,
    resolution: Resolution,
    stop: &dyn Stop,
) -> Result<Vec<u8>, BitmapError> {
    image.validate()?;
    let (width, height) = (image.width, image.height);
    let too_large = || BitmapError::DimensionsTooLarge { width, height };
    let h = height as usize;
    let bpp = image.bytes_per_pixel();

    let (row_bytes, row_stride) = row_strides(width, height, bpp)?;
    let pixel_data_size = row_stride.checked_mul(h).ok_or_else(too_large)?;
    let data_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
    let file_size = pixel_data_size
        .checked_add(data_offset)
        .ok_or_else(too_large)?;
    // Every size field is 32 bits wide; signed for the dimensions.
    let fits = u32::try_from(file_size).is_ok()
        && i32::try_from(width).is_ok()
        && i32::try_from(height).is_ok();
    if !fits {
        return Err(too_large());
    }

    stop.check()?;

    let mut out = Vec::with_capacity(file_size);
    write_bmp_header(
        &mut out,
        file_size,
        pixel_data_size,
        width,
        height,
        image.layout.bits_per_pixel(),
        resolution,
    );

    let pad_bytes = row_stride - row_bytes;
    for (disk_row, row) in image.pixels().rchunks_exact(row_bytes).enumerate() {
        if disk_row % 16 == 0 {
            stop.check()?;
        }
        out.extend_from_slice(row);
        out.extend(core::iter::repeat_n(0u8, pad_bytes));
    }

    debug_assert_eq!(out.len(), file_size);
    log::trace!("encoded {width}x{height} BMP into {file_size} bytes");
    Ok(out)
}

fn write_bmp_header(
    out: &mut Vec<u8>,
    file_size: usize,
    pixel_data_size: usize,
    width: u32,
    height: u32,
    bpp: u16,
    resolution: Resolution,
) {
    // File header (14 bytes)
    out.extend_from_slice(SIGNATURE);
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // reserved
    out.extend_from_slice(&((FILE_HEADER_SIZE + INFO_HEADER_SIZE) as u32).to_le_bytes());

    // DIB header (BITMAPINFOHEADER, 40 bytes)
    out.extend_from_slice(&(INFO_HEADER_SIZE as u32).to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes()); // positive = bottom-up
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&bpp.to_le_bytes());
    out.extend_from_slice(&NO_COMPRESSION.to_le_bytes());
    out.extend_from_slice(&(pixel_data_size as u32).to_le_bytes());
    out.extend_from_slice(&resolution.x.to_le_bytes());
    out.extend_from_slice(&resolution.y.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // colors used
    out.extend_from_slice(&0u32.to_le_bytes()); // important colors
}
