use std::path::Path;

use enough::Stop;

use crate::bmp::{self, Resolution};
use crate::decode::DecodedImage;
use crate::error::BitmapError;

/// Builder for BMP output.
///
/// ```no_run
/// use zenglyph::{DecodedImage, EncodeRequest, PixelLayout, Unstoppable};
///
/// let image = DecodedImage::new(vec![0u8; 3 * 2], 3, 2, PixelLayout::Gray8)?;
/// EncodeRequest::bmp()
///     .with_resolution(2835, 2835) // 72 DPI
///     .write_to(&image, "out.bmp", Unstoppable)?;
/// # Ok::<(), zenglyph::BitmapError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct EncodeRequest {
    resolution: Resolution,
}

impl EncodeRequest {
    /// Uncompressed BMP at 300 DPI.
    pub fn bmp() -> Self {
        Self::default()
    }

    /// Horizontal and vertical resolution in pixels per meter.
    pub fn with_resolution(mut self, x_pixels_per_meter: u32, y_pixels_per_meter: u32) -> Self {
        self.resolution = Resolution {
            x: x_pixels_per_meter,
            y: y_pixels_per_meter,
        };
        self
    }

    /// Encode to an in-memory BMP file.
    pub fn encode(&self, image: &DecodedImage, stop: impl Stop) -> Result<Vec<u8>, BitmapError> {
        bmp::encode(image, self.resolution, &stop)
    }

    /// Encode and write to `path`, creating or truncating the file.
    pub fn write_to(
        &self,
        image: &DecodedImage,
        path: impl AsRef<Path>,
        stop: impl Stop,
    ) -> Result<(), BitmapError> {
        let path = path.as_ref();
        let encoded = self.encode(image, stop)?;
        log::debug!("writing {} bytes to {}", encoded.len(), path.display());
        std::fs::write(path, encoded)?;
        Ok(())
    }
}

/// Encode an image and write it to `path` as a BMP.
pub fn write_bmp(
    image: &DecodedImage,
    path: impl AsRef<Path>,
    stop: impl Stop,
) -> Result<(), BitmapError> {
    EncodeRequest::bmp().write_to(image, path, stop)
}
