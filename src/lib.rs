//! # zenglyph
//!
//! Uncompressed BMP decoder and encoder, plus an ASCII-art inspector for
//! bitmap-font sheets.
//!
//! ## Pixel layout
//!
//! BMP stores rows bottom-up, each padded to a multiple of four bytes.
//! [`DecodedImage`] always holds them top-down and unpadded: row `r` starts at
//! byte `r * width * bytes_per_pixel`. Channel bytes are kept in BMP order
//! (B, G, R(, A)); nothing is swizzled or palette-expanded, so decoding and
//! re-encoding is lossless.
//!
//! ## Supported Formats
//!
//! - Uncompressed (`BI_RGB`) BMP at 8, 16, 24 and 32 bits per pixel
//! - BITMAPINFOHEADER and its V2-V5 extensions, bottom-up rows only
//!
//! ## Non-Goals
//!
//! - RLE, bitfields, embedded JPEG/PNG
//! - Palette expansion (8-bit data is returned as raw samples)
//! - Sub-byte depths, top-down (negative height) files
//! - Color management
//!
//! ## Usage
//!
//! ```no_run
//! use zenglyph::{CellGeometry, GlyphSheet, Unstoppable};
//!
//! let image = zenglyph::read_bmp("font.bmp", Unstoppable)?;
//! println!("{}x{} {:?}", image.width, image.height, image.layout);
//!
//! let sheet = GlyphSheet::new(&image, CellGeometry::new(32, 32));
//! print!("{}", sheet.render_char('A')?);
//!
//! zenglyph::write_bmp(&image, "copy.bmp", Unstoppable)?;
//! # Ok::<(), zenglyph::BitmapError>(())
//! ```

#![forbid(unsafe_code)]

mod bmp;
mod cell;
mod decode;
mod encode;
mod error;
mod limits;
mod pixel;

// Re-exports
pub use bmp::Permissiveness;
pub use cell::{
    CellGeometry, CellSamples, GlyphSheet, INTENSITY_GLYPHS, Intensity, render_cell, sample_cell,
};
pub use decode::{DecodeRequest, DecodedImage, read_bmp};
pub use encode::{EncodeRequest, write_bmp};
pub use enough::{Stop, Unstoppable};
pub use error::{BitmapError, ErrorKind};
pub use limits::Limits;
#[cfg(feature = "rgb")]
pub use pixel::DecodePixel;
pub use pixel::PixelLayout;

/// Decode BMP bytes.
pub fn decode_bmp(data: &[u8], stop: impl Stop) -> Result<DecodedImage, BitmapError> {
    DecodeRequest::new(data).decode(stop)
}

/// Decode BMP bytes, enforcing `limits` before the pixel buffer is allocated.
pub fn decode_bmp_with_limits(
    data: &[u8],
    limits: &Limits,
    stop: impl Stop,
) -> Result<DecodedImage, BitmapError> {
    DecodeRequest::new(data).with_limits(limits).decode(stop)
}

/// Read a BMP file with limits and strictness.
pub fn read_bmp_with(
    path: impl AsRef<std::path::Path>,
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
    stop: impl Stop,
) -> Result<DecodedImage, BitmapError> {
    decode::read_bmp_with(path.as_ref(), limits, permissiveness, &stop)
}

/// Encode an image as an uncompressed BMP at 300 DPI.
pub fn encode_bmp(image: &DecodedImage, stop: impl Stop) -> Result<Vec<u8>, BitmapError> {
    EncodeRequest::bmp().encode(image, stop)
}
