use std::path::Path;
use std::slice::ChunksExact;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use enough::Stop;

use crate::bmp::{self, Permissiveness};
use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::PixelLayout;

/// A decoded image: top-down, unpadded rows in BMP byte order.
///
/// The pixel buffer always holds exactly
/// `width * height * layout.bytes_per_pixel()` bytes. It can be read and
/// mutated in place but never resized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
}

impl DecodedImage {
    /// Wrap caller-supplied pixel data.
    ///
    /// Fails with [`BitmapError::EmptyImage`] for a zero dimension and with
    /// [`BitmapError::BufferSizeMismatch`] when `pixels` is not exactly one
    /// unpadded image in size.
    pub fn new(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        layout: PixelLayout,
    ) -> Result<Self, BitmapError> {
        check_buffer_len(pixels.len(), width, height, layout)?;
        Ok(Self::owned(pixels, width, height, layout))
    }

    /// Re-check the buffer against `width`, `height` and `layout`, which
    /// callers may have reassigned since construction.
    pub(crate) fn validate(&self) -> Result<(), BitmapError> {
        check_buffer_len(self.pixels.len(), self.width, self.height, self.layout)
    }

    pub(crate) fn owned(pixels: Vec<u8>, width: u32, height: u32, layout: PixelLayout) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * layout.bytes_per_pixel()
        );
        Self {
            pixels,
            width,
            height,
            layout,
        }
    }

    /// Access the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to the pixel data. The length is fixed.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Take ownership of the pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Bytes per pixel for [`Self::layout`].
    pub fn bytes_per_pixel(&self) -> usize {
        self.layout.bytes_per_pixel()
    }

    /// Length of one unpadded row in bytes.
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Row `y`, counted from the top.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        let stride = self.row_stride();
        let start = y.checked_mul(stride)?;
        self.pixels.get(start..start.checked_add(stride)?)
    }

    /// All rows, top to bottom.
    ///
    /// Yields nothing if `width` has been set to zero.
    pub fn rows(&self) -> ChunksExact<'_, u8> {
        match self.row_stride() {
            0 => self.pixels[..0].chunks_exact(1),
            stride => self.pixels.chunks_exact(stride),
        }
    }

    /// Reinterpret pixel data as typed pixel slice.
    ///
    /// Returns [`BitmapError::LayoutMismatch`] if the pixel layout doesn't match `P`.
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: crate::DecodePixel>(&self) -> Result<&[P], BitmapError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        if self.layout != P::layout() {
            return Err(BitmapError::LayoutMismatch {
                expected: P::layout(),
                actual: self.layout,
            });
        }
        Ok(self.pixels().as_pixels())
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: crate::DecodePixel>(
        &self,
    ) -> Result<imgref::ImgRef<'_, P>, BitmapError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        self.validate()?;
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Convert to an [`imgref::ImgVec`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P: crate::DecodePixel>(&self) -> Result<imgref::ImgVec<P>, BitmapError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        self.validate()?;
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgVec::new(
            pixels.to_vec(),
            self.width as usize,
            self.height as usize,
        ))
    }
}

fn check_buffer_len(
    len: usize,
    width: u32,
    height: u32,
    layout: PixelLayout,
) -> Result<(), BitmapError> {
    if width == 0 || height == 0 {
        return Err(BitmapError::EmptyImage { width, height });
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|wh| wh.checked_mul(layout.bytes_per_pixel()))
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    if len != expected {
        return Err(BitmapError::BufferSizeMismatch {
            needed: expected,
            actual: len,
        });
    }
    Ok(())
}

/// Builder for a BMP decode with optional limits and strictness.
///
/// ```no_run
/// use zenglyph::{DecodeRequest, Limits, Permissiveness, Unstoppable};
///
/// let data = std::fs::read("font.bmp")?;
/// let limits = Limits { max_pixels: Some(4096 * 4096), ..Default::default() };
/// let image = DecodeRequest::new(&data)
///     .with_limits(&limits)
///     .with_permissiveness(Permissiveness::Strict)
///     .decode(Unstoppable)?;
/// println!("{}x{} {:?}", image.width, image.height, image.layout);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    permissiveness: Permissiveness,
}

impl<'a> DecodeRequest<'a> {
    /// Decode `data` with no limits and [`Permissiveness::Standard`].
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            permissiveness: Permissiveness::default(),
        }
    }

    /// Enforce `limits` before the pixel buffer is allocated.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Set how strictly header bookkeeping fields are checked.
    pub fn with_permissiveness(mut self, permissiveness: Permissiveness) -> Self {
        self.permissiveness = permissiveness;
        self
    }

    /// Run the decode.
    pub fn decode(self, stop: impl Stop) -> Result<DecodedImage, BitmapError> {
        bmp::decode(self.data, self.limits, self.permissiveness, &stop)
    }
}

/// Read and decode a BMP file.
///
/// The file is read in one pass and closed before any parsing happens, so
/// no handle outlives this call whether it succeeds or fails.
pub fn read_bmp(path: impl AsRef<Path>, stop: impl Stop) -> Result<DecodedImage, BitmapError> {
    read_bmp_with(path.as_ref(), None, Permissiveness::default(), &stop)
}

pub(crate) fn read_bmp_with(
    path: &Path,
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<DecodedImage, BitmapError> {
    log::debug!("reading {}", path.display());
    let data = std::fs::read(path)?;
    bmp::decode(&data, limits, permissiveness, stop)
}
