//! BMP decoder for uncompressed whole-byte depths (8, 16, 24, 32 bpp).
//!
//! Header fields are read at their fixed BITMAPINFOHEADER offsets. Pixel rows
//! are copied without their padding, bottom row first, into a top-down
//! buffer.

use enough::Stop;

use super::stride::row_strides;
use super::{
    BITS_PER_PIXEL_OFFSET, COMPRESSION_OFFSET, DATA_OFFSET_OFFSET, FILE_HEADER_SIZE,
    FILE_SIZE_OFFSET, HEIGHT_OFFSET, IMAGE_SIZE_OFFSET, INFO_HEADER_SIZE, INFO_HEADER_SIZE_OFFSET,
    NO_COMPRESSION, PLANES_OFFSET, Permissiveness, SIGNATURE, WIDTH_OFFSET, X_RESOLUTION_OFFSET,
    Y_RESOLUTION_OFFSET,
};
use crate::error::BitmapError;
use crate::pixel::PixelLayout;

// ── Little-endian field access ──────────────────────────────────────

fn field<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N], BitmapError> {
    data.get(offset..offset + N)
        .and_then(|b| b.try_into().ok())
        .ok_or(BitmapError::UnexpectedEof)
}

fn le_u16(data: &[u8], offset: usize) -> Result<u16, BitmapError> {
    field(data, offset).map(u16::from_le_bytes)
}

fn le_u32(data: &[u8], offset: usize) -> Result<u32, BitmapError> {
    field(data, offset).map(u32::from_le_bytes)
}

fn le_i32(data: &[u8], offset: usize) -> Result<i32, BitmapError> {
    field(data, offset).map(i32::from_le_bytes)
}

// ── Parsed BMP header info ──────────────────────────────────────────

#[derive(Debug)]
pub(crate) struct BmpHeader {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub data_offset: usize,
    pub unpadded_stride: usize,
    pub padded_stride: usize,
}

/// Parse and validate the file and info headers.
pub(crate) fn parse_bmp_header(
    data: &[u8],
    permissiveness: Permissiveness,
) -> Result<BmpHeader, BitmapError> {
    if field::<2>(data, 0)? != *SIGNATURE {
        return Err(BitmapError::UnrecognizedFormat);
    }
    if data.len() < FILE_HEADER_SIZE + INFO_HEADER_SIZE {
        return Err(BitmapError::UnexpectedEof);
    }

    let ihsize = le_u32(data, INFO_HEADER_SIZE_OFFSET)?;
    // V2..V5 headers extend BITMAPINFOHEADER without moving its fields.
    if !matches!(ihsize, 40 | 52 | 56 | 108 | 124) {
        return Err(BitmapError::InvalidHeader(format!(
            "unsupported BMP info header size: {ihsize}"
        )));
    }

    let width = le_i32(data, WIDTH_OFFSET)?;
    let height = le_i32(data, HEIGHT_OFFSET)?;
    if width <= 0 {
        return Err(BitmapError::InvalidHeader(format!(
            "BMP width must be positive, got {width}"
        )));
    }
    if height == 0 {
        return Err(BitmapError::InvalidHeader("BMP height is zero".into()));
    }
    if height < 0 {
        return Err(BitmapError::UnsupportedVariant(format!(
            "top-down BMP (height {height}) is not supported"
        )));
    }
    let (width, height) = (width as u32, height as u32);

    let planes = le_u16(data, PLANES_OFFSET)?;
    if planes != 1 {
        return Err(BitmapError::InvalidHeader(format!(
            "BMP planes field is {planes}, expected 1"
        )));
    }

    let bpp = le_u16(data, BITS_PER_PIXEL_OFFSET)?;
    if bpp == 0 || bpp % 8 != 0 {
        return Err(BitmapError::InvalidHeader(format!(
            "BMP bit depth {bpp} is not a whole number of bytes"
        )));
    }
    let layout = PixelLayout::from_bits_per_pixel(bpp).ok_or_else(|| {
        BitmapError::UnsupportedVariant(format!("BMP bit depth {bpp} unsupported"))
    })?;

    let compression = le_u32(data, COMPRESSION_OFFSET)?;
    if compression != NO_COMPRESSION {
        return Err(BitmapError::UnsupportedVariant(format!(
            "BMP compression {compression} unsupported, only uncompressed data is read"
        )));
    }

    let data_offset = le_u32(data, DATA_OFFSET_OFFSET)? as usize;
    let headers_end = FILE_HEADER_SIZE + ihsize as usize;
    if data_offset < headers_end {
        return Err(BitmapError::InvalidHeader(format!(
            "BMP pixel data offset {data_offset} overlaps the {headers_end}-byte headers"
        )));
    }

    let (unpadded_stride, padded_stride) =
        row_strides(width, height, layout.bytes_per_pixel())?;

    log::debug!(
        "BMP header: {width}x{height}, {bpp} bpp, data offset {data_offset}, \
         row stride {unpadded_stride} (padded {padded_stride})"
    );

    check_bookkeeping(data, permissiveness, padded_stride, height)?;

    Ok(BmpHeader {
        width,
        height,
        layout,
        data_offset,
        unpadded_stride,
        padded_stride,
    })
}

/// Fields that don't affect decoding: rejected in `Strict`, logged otherwise.
fn check_bookkeeping(
    data: &[u8],
    permissiveness: Permissiveness,
    padded_stride: usize,
    height: u32,
) -> Result<(), BitmapError> {
    let mut problems = Vec::new();

    let file_size_field = le_u32(data, FILE_SIZE_OFFSET)?;
    if file_size_field != 0 && file_size_field as usize != data.len() {
        problems.push(format!(
            "BMP file size field ({file_size_field}) doesn't match actual size ({})",
            data.len()
        ));
    }

    let image_size_field = le_u32(data, IMAGE_SIZE_OFFSET)?;
    let expected_size = padded_stride as u64 * u64::from(height);
    if image_size_field != 0 && u64::from(image_size_field) != expected_size {
        problems.push(format!(
            "BMP image data size field ({image_size_field}) doesn't match expected ({expected_size})"
        ));
    }

    for (axis, offset) in [("horizontal", X_RESOLUTION_OFFSET), ("vertical", Y_RESOLUTION_OFFSET)] {
        let res = le_i32(data, offset)?;
        if res < 0 {
            problems.push(format!("BMP {axis} resolution is negative ({res})"));
        }
    }

    match permissiveness {
        Permissiveness::Strict => match problems.into_iter().next() {
            Some(problem) => Err(BitmapError::InvalidHeader(problem)),
            None => Ok(()),
        },
        Permissiveness::Standard => {
            for problem in &problems {
                log::warn!("{problem}");
            }
            Ok(())
        }
    }
}

// ── Pixel data ──────────────────────────────────────────────────────

/// Copy the bottom-up padded rows into a fresh top-down unpadded buffer.
pub(crate) fn decode_bmp_pixels(
    data: &[u8],
    header: &BmpHeader,
    stop: &dyn Stop,
) -> Result<Vec<u8>, BitmapError> {
    let too_large = || BitmapError::DimensionsTooLarge {
        width: header.width,
        height: header.height,
    };
    let h = header.height as usize;
    let output_size = header
        .unpadded_stride
        .checked_mul(h)
        .ok_or_else(too_large)?;

    // The last stored row may omit its trailing padding.
    let required = header
        .padded_stride
        .checked_mul(h - 1)
        .and_then(|v| v.checked_add(header.unpadded_stride))
        .and_then(|v| v.checked_add(header.data_offset))
        .ok_or_else(too_large)?;
    if data.len() < required {
        return Err(BitmapError::UnexpectedEof);
    }

    let mut buf = vec![0u8; output_size];

    // Disk row 0 is the bottom of the image, i.e. the last buffer row.
    for (disk_row, out) in buf.rchunks_exact_mut(header.unpadded_stride).enumerate() {
        if disk_row % 16 == 0 {
            stop.check()?;
        }
        let start = header.data_offset + disk_row * header.padded_stride;
        let src = data
            .get(start..start + header.unpadded_stride)
            .ok_or(BitmapError::UnexpectedEof)?;
        out.copy_from_slice(src);
    }

    log::trace!("decoded {h} BMP rows into {output_size} bytes");
    Ok(buf)
}
