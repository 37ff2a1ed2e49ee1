use miette::Diagnostic;
use thiserror::Error;

/// Main error type for gbasset operations
#[derive(Error, Diagnostic, Debug)]
pub enum AssetError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(gbasset::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(gbasset::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Image size {width}x{height} is not a multiple of 8x{tile_height}")]
    #[diagnostic(
        code(gbasset::dimensions),
        help("Pad the image so both sides are whole tiles")
    )]
    InvalidDimensions {
        width: u32,
        height: u32,
        tile_height: u32,
    },

    #[error("More than 4 colours ({found}) found on ({x}, {y}, {width}, {height})")]
    #[diagnostic(
        code(gbasset::capacity),
        help("Every 8xN band must use at most 4 colours")
    )]
    TooManyColours {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        found: usize,
    },

    #[error("More than 8 palettes needed (band at ({x}, {y}))")]
    #[diagnostic(
        code(gbasset::capacity),
        help("Reuse colour sets across bands so they fit in 8 palettes of 4 colours")
    )]
    TooManyPalettes { x: u32, y: u32 },

    #[error("Source palette has {entries} entries, more than the {max} that fit in 8 palettes")]
    #[diagnostic(
        code(gbasset::capacity),
        help("Trim the PNG palette to at most 8 groups of 4 colours")
    )]
    PaletteTooLarge { entries: usize, max: usize },

    #[error("Tile library is full: more than {max} unique tiles")]
    #[diagnostic(
        code(gbasset::capacity),
        help("Enable tile flipping or split the image into several assets")
    )]
    TooManyTiles { max: usize },

    #[error("Sprite tile at ({x}, {y}) is {dx},{dy} pixels from the previous one, which does not fit in a signed byte")]
    #[diagnostic(
        code(gbasset::offset),
        help("Use smaller sprite cells or move the pivot closer to the sprite")
    )]
    OffsetOutOfRange { x: u32, y: u32, dx: i32, dy: i32 },

    #[error("Unsupported source format: {message}")]
    #[diagnostic(code(gbasset::source))]
    UnsupportedSourceFormat {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(gbasset::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl AssetError {
    /// True for the errors raised when the image does not fit the hardware
    /// limits (colours per band, palette count, tile count).
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(
            self,
            AssetError::TooManyColours { .. }
                | AssetError::TooManyPalettes { .. }
                | AssetError::PaletteTooLarge { .. }
                | AssetError::TooManyTiles { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AssetError>;
