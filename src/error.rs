use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForensicsError {
    #[error("Image loading error: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Difference is zero at quality {quality}, nothing to normalize")]
    DegenerateDifference { quality: u8 },

    #[error("Thumbnail comparison failed: {0}")]
    ThumbnailCompare(String),

    #[error("Image dimensions differ: {0}x{1} vs {2}x{3}")]
    DimensionMismatch(u32, u32, u32, u32),

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ForensicsError>;
