//! Uncompressed BMP decoder and encoder (internal).
//!
//! Use top-level [`crate::decode_bmp`], [`crate::encode_bmp`], etc.
//!
//! All multi-byte fields are little-endian. Rows are stored bottom-up and
//! padded to four bytes; [`crate::DecodedImage`] holds them top-down and
//! unpadded.

mod decode;
mod encode;
mod stride;

use crate::decode::DecodedImage;
use crate::error::BitmapError;
use crate::limits::Limits;
use enough::Stop;

pub(crate) use encode::Resolution;

/// `"BM"` signature.
pub(crate) const SIGNATURE: &[u8; 2] = b"BM";
/// Size of the BITMAPFILEHEADER.
pub(crate) const FILE_HEADER_SIZE: usize = 14;
/// Size of the BITMAPINFOHEADER written by the encoder.
pub(crate) const INFO_HEADER_SIZE: usize = 40;

pub(crate) const FILE_SIZE_OFFSET: usize = 0x02;
pub(crate) const DATA_OFFSET_OFFSET: usize = 0x0A;
pub(crate) const INFO_HEADER_SIZE_OFFSET: usize = 0x0E;
pub(crate) const WIDTH_OFFSET: usize = 0x12;
pub(crate) const HEIGHT_OFFSET: usize = 0x16;
pub(crate) const PLANES_OFFSET: usize = 0x1A;
pub(crate) const BITS_PER_PIXEL_OFFSET: usize = 0x1C;
pub(crate) const COMPRESSION_OFFSET: usize = 0x1E;
pub(crate) const IMAGE_SIZE_OFFSET: usize = 0x22;
pub(crate) const X_RESOLUTION_OFFSET: usize = 0x26;
pub(crate) const Y_RESOLUTION_OFFSET: usize = 0x2A;

/// BI_RGB, the only compression value accepted.
pub(crate) const NO_COMPRESSION: u32 = 0;

/// Controls how strictly the BMP decoder validates input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permissiveness {
    /// Also reject inconsistent bookkeeping fields: file size, image data
    /// size, negative resolution.
    Strict,

    /// Default behavior. Bookkeeping inconsistencies that don't affect
    /// pixel decoding are logged and accepted. Structural problems
    /// (bad magic, unsupported depth, truncation) are always errors.
    #[default]
    Standard,
}

/// Decode BMP data into a top-down, unpadded image.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<DecodedImage, BitmapError> {
    let header = decode::parse_bmp_header(data, permissiveness)?;
    check_limits(limits, &header)?;
    stop.check()?;
    let pixels = decode::decode_bmp_pixels(data, &header, stop)?;
    Ok(DecodedImage::owned(
        pixels,
        header.width,
        header.height,
        header.layout,
    ))
}

fn check_limits(limits: Option<&Limits>, header: &decode::BmpHeader) -> Result<(), BitmapError> {
    let Some(limits) = limits else {
        return Ok(());
    };
    limits.check(header.width, header.height)?;
    let out_bytes = header
        .unpadded_stride
        .checked_mul(header.height as usize)
        .ok_or(BitmapError::DimensionsTooLarge {
            width: header.width,
            height: header.height,
        })?;
    limits.check_memory(out_bytes)
}

/// Encode to BMP.
pub(crate) fn encode(
    image: &DecodedImage,
    resolution: Resolution,
    stop: &dyn Stop,
) -> Result<Vec<u8>, BitmapError> {
    encode::encode_bmp(image, resolution, stop)
}
