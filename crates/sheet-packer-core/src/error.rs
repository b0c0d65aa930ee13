use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetPackerError {
    #[error("Invalid dimensions: {width}x{height} (each side must be within 1..=8192)")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(
        "Sheet size too small: a {width}x{height} sprite does not fit within {max_width}x{max_height}"
    )]
    SizeTooSmall {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },
    #[error("Sprite '{key}' has no usable size (image source not ready or empty)")]
    SpriteUnavailable { key: String },
    #[cfg(feature = "image")]
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl SheetPackerError {
    /// True for errors raised while validating `Constraints`.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            SheetPackerError::InvalidDimensions { .. } | SheetPackerError::InvalidConfig(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SheetPackerError>;
