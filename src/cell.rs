//! Glyph inspection: sample one cell of a bitmap-font sheet as coarse
//! intensity levels and render it as ASCII art.
//!
//! A font sheet is a grid of equally sized cells, one glyph per cell,
//! numbered left to right and top to bottom. Each pixel is reduced to one of
//! five [`Intensity`] levels using its first byte (blue for 24/32-bit BMP,
//! the raw sample for 8-bit).

use core::iter::FusedIterator;

use crate::decode::DecodedImage;
use crate::error::BitmapError;

/// Characters used to draw intensity levels 0 through 4.
pub const INTENSITY_GLYPHS: [char; 5] = ['-', '~', '=', 'a', '#'];

/// Sample values per intensity level. `255 / 63 == 4`, so all five levels
/// are reachable.
const LEVEL_WIDTH: u8 = 63;

/// Coarse pixel brightness, `0..=4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Intensity(u8);

impl Intensity {
    /// Brightest level.
    pub const MAX: Intensity = Intensity(4);

    /// Bucket an 8-bit sample.
    pub fn from_sample(sample: u8) -> Self {
        Self(sample / LEVEL_WIDTH)
    }

    /// Level in `0..=4`.
    pub fn level(self) -> u8 {
        self.0
    }

    /// Character from [`INTENSITY_GLYPHS`] for this level.
    pub fn glyph(self) -> char {
        INTENSITY_GLYPHS[usize::from(self.0)]
    }
}

/// Pixel size of one cell in a font sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellGeometry {
    pub cell_width: u32,
    pub cell_height: u32,
}

impl CellGeometry {
    pub fn new(cell_width: u32, cell_height: u32) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    /// Whole cells per row of `image`. Partial cells at the edge don't count.
    pub fn columns(&self, image: &DecodedImage) -> u32 {
        image.width.checked_div(self.cell_width).unwrap_or(0)
    }

    /// Whole cells per column of `image`.
    pub fn rows(&self, image: &DecodedImage) -> u32 {
        image.height.checked_div(self.cell_height).unwrap_or(0)
    }
}

/// Lazy, row-major intensity samples of one cell.
///
/// Created by [`sample_cell`]. Yields exactly `cell_width * cell_height`
/// items.
#[derive(Clone, Debug)]
pub struct CellSamples<'a> {
    pixels: &'a [u8],
    origin: usize,
    row_stride: usize,
    bytes_per_pixel: usize,
    cell_width: usize,
    cell_height: usize,
    x: usize,
    y: usize,
}

impl CellSamples<'_> {
    /// Width of the cell; one rendered line holds this many samples.
    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    /// Render the remaining samples as text, one line per cell row.
    pub fn render(self) -> String {
        let width = self.cell_width;
        let start = self.y * width + self.x;
        let mut out = String::with_capacity(self.len() + self.cell_height);
        for (i, sample) in self.enumerate() {
            out.push(sample.glyph());
            if (start + i + 1) % width == 0 {
                out.push('\n');
            }
        }
        out
    }
}

impl Iterator for CellSamples<'_> {
    type Item = Intensity;

    fn next(&mut self) -> Option<Intensity> {
        if self.y >= self.cell_height {
            return None;
        }
        let offset = self.origin + self.y * self.row_stride + self.x * self.bytes_per_pixel;
        let sample = *self.pixels.get(offset)?;
        self.x += 1;
        if self.x == self.cell_width {
            self.x = 0;
            self.y += 1;
        }
        Some(Intensity::from_sample(sample))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .cell_height
            .saturating_sub(self.y)
            .saturating_mul(self.cell_width)
            .saturating_sub(self.x);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellSamples<'_> {}

impl FusedIterator for CellSamples<'_> {}

/// Sample cell `(cell_x, cell_y)` of `image`.
///
/// The cell starts `cell_y * cell_height` rows down and
/// `cell_x * cell_width` pixels across, and must lie entirely inside the
/// image.
pub fn sample_cell(
    image: &DecodedImage,
    geometry: CellGeometry,
    cell_x: u32,
    cell_y: u32,
) -> Result<CellSamples<'_>, BitmapError> {
    let columns = geometry.columns(image);
    let rows = geometry.rows(image);
    if cell_x >= columns || cell_y >= rows {
        return Err(BitmapError::CellOutOfBounds {
            cell_x,
            cell_y,
            columns,
            rows,
        });
    }

    let row_stride = image.row_stride();
    let bytes_per_pixel = image.bytes_per_pixel();
    let cell_width = geometry.cell_width as usize;
    let cell_height = geometry.cell_height as usize;
    // In bounds, so these products are bounded by the buffer length.
    let origin = cell_y as usize * cell_height * row_stride
        + cell_x as usize * cell_width * bytes_per_pixel;

    Ok(CellSamples {
        pixels: image.pixels(),
        origin,
        row_stride,
        bytes_per_pixel,
        cell_width,
        cell_height,
        x: 0,
        y: 0,
    })
}

/// Render cell `(cell_x, cell_y)` as ASCII art.
pub fn render_cell(
    image: &DecodedImage,
    geometry: CellGeometry,
    cell_x: u32,
    cell_y: u32,
) -> Result<String, BitmapError> {
    sample_cell(image, geometry, cell_x, cell_y).map(CellSamples::render)
}

/// A decoded font sheet whose cells hold consecutive characters.
#[derive(Clone, Copy, Debug)]
pub struct GlyphSheet<'a> {
    image: &'a DecodedImage,
    geometry: CellGeometry,
    first_char: char,
}

impl<'a> GlyphSheet<'a> {
    /// A sheet whose first cell is `' '`.
    pub fn new(image: &'a DecodedImage, geometry: CellGeometry) -> Self {
        Self {
            image,
            geometry,
            first_char: ' ',
        }
    }

    /// Character held by the first cell.
    pub fn with_first_char(mut self, first_char: char) -> Self {
        self.first_char = first_char;
        self
    }

    /// Cell size of this sheet.
    pub fn geometry(&self) -> CellGeometry {
        self.geometry
    }

    /// Whole cells per sheet row.
    pub fn columns(&self) -> u32 {
        self.geometry.columns(self.image)
    }

    /// Whole cells per sheet column.
    pub fn rows(&self) -> u32 {
        self.geometry.rows(self.image)
    }

    /// Number of whole cells in the sheet.
    pub fn len(&self) -> u32 {
        self.columns().saturating_mul(self.rows())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grid position of the cell at `index`.
    pub fn cell_of(&self, index: u32) -> Option<(u32, u32)> {
        let columns = self.columns();
        if index >= self.len() {
            return None;
        }
        Some((index % columns, index / columns))
    }

    /// Grid position of the cell holding `ch`.
    pub fn cell_for_char(&self, ch: char) -> Option<(u32, u32)> {
        let index = u32::from(ch).checked_sub(u32::from(self.first_char))?;
        self.cell_of(index)
    }

    /// Intensity samples of the cell holding `ch`.
    pub fn samples_for_char(&self, ch: char) -> Result<CellSamples<'a>, BitmapError> {
        let (x, y) = self
            .cell_for_char(ch)
            .ok_or(BitmapError::GlyphNotInSheet(ch))?;
        log::debug!("glyph {ch:?} is cell ({x}, {y})");
        sample_cell(self.image, self.geometry, x, y)
    }

    /// ASCII art of the glyph for `ch`.
    pub fn render_char(&self, ch: char) -> Result<String, BitmapError> {
        self.samples_for_char(ch).map(CellSamples::render)
    }
}
