use enough::StopReason;

/// Errors from BMP decoding, encoding and cell sampling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitmapError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("image has zero width or height: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    /// The pixel buffer is shorter or longer than `width * height * bpp`.
    #[error("buffer size mismatch: need {needed} bytes, got {actual}")]
    BufferSizeMismatch { needed: usize, actual: usize },

    #[error("pixel layout mismatch: expected {expected:?}, got {actual:?}")]
    LayoutMismatch {
        expected: crate::PixelLayout,
        actual: crate::PixelLayout,
    },

    #[error("cell ({cell_x}, {cell_y}) is outside the {columns}x{rows} cell grid")]
    CellOutOfBounds {
        cell_x: u32,
        cell_y: u32,
        columns: u32,
        rows: u32,
    },

    #[error("character {0:?} is not in the glyph sheet")]
    GlyphNotInSheet(char),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

/// Coarse classification of a [`BitmapError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Opening, reading or writing a file failed.
    Io,
    /// The data violates the supported BMP subset: bad magic, bad header
    /// fields, unsupported depth or compression, truncated pixel data.
    Format,
    /// A configured [`crate::Limits`] bound was exceeded.
    Limit,
    /// The caller passed an inconsistent buffer, layout or cell.
    Usage,
    /// A [`enough::Stop`] token requested cancellation.
    Cancelled,
}

impl BitmapError {
    /// Coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::UnrecognizedFormat
            | Self::InvalidHeader(_)
            | Self::UnsupportedVariant(_)
            | Self::UnexpectedEof
            | Self::DimensionsTooLarge { .. } => ErrorKind::Format,
            Self::LimitExceeded(_) => ErrorKind::Limit,
            Self::EmptyImage { .. }
            | Self::BufferSizeMismatch { .. }
            | Self::LayoutMismatch { .. }
            | Self::CellOutOfBounds { .. }
            | Self::GlyphNotInSheet(_) => ErrorKind::Usage,
            Self::Cancelled(_) => ErrorKind::Cancelled,
        }
    }
}

impl From<StopReason> for BitmapError {
    fn from(r: StopReason) -> Self {
        BitmapError::Cancelled(r)
    }
}
