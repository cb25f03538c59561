/// Pixel memory layout, one per supported BMP bit depth.
///
/// Bytes are kept exactly as BMP stores them: channel order is B, G, R(, A)
/// and 16-bit pixels are little-endian words.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// 8 bits per pixel. One raw sample (intensity or palette index).
    Gray8,
    /// 16 bits per pixel, little-endian `X1R5G5B5` word.
    Rgb555,
    /// 24 bits per pixel, B, G, R.
    Bgr8,
    /// 32 bits per pixel, B, G, R, A.
    Bgra8,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb555 => 2,
            Self::Bgr8 => 3,
            Self::Bgra8 => 4,
        }
    }

    /// Value written to the BMP bits-per-pixel field.
    pub fn bits_per_pixel(&self) -> u16 {
        self.bytes_per_pixel() as u16 * 8
    }

    /// Layout for a whole-byte BMP bit depth, or `None` if the depth is not
    /// one of 8, 16, 24 or 32.
    pub fn from_bits_per_pixel(bpp: u16) -> Option<Self> {
        match bpp {
            8 => Some(Self::Gray8),
            16 => Some(Self::Rgb555),
            24 => Some(Self::Bgr8),
            32 => Some(Self::Bgra8),
            _ => None,
        }
    }

    /// Layout for a pixel size in bytes.
    pub fn from_bytes_per_pixel(bytes: usize) -> Option<Self> {
        u16::try_from(bytes)
            .ok()
            .and_then(|b| b.checked_mul(8))
            .and_then(Self::from_bits_per_pixel)
    }
}

/// Typed pixels that can view a [`crate::DecodedImage`] buffer.
#[cfg(feature = "rgb")]
pub trait DecodePixel: Copy + 'static + private::Sealed {
    fn layout() -> PixelLayout;
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::alt::BGR8 {
    fn layout() -> PixelLayout {
        PixelLayout::Bgr8
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::alt::BGRA8 {
    fn layout() -> PixelLayout {
        PixelLayout::Bgra8
    }
}

#[cfg(feature = "rgb")]
mod private {
    pub trait Sealed {}
    impl Sealed for rgb::alt::BGR8 {}
    impl Sealed for rgb::alt::BGRA8 {}
}
