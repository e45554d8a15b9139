use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("raster must have positive dimensions, got {width}x{height}")]
    InvalidInput { width: u32, height: u32 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid detection options: {0}")]
    InvalidConfig(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn ensure_non_empty(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidInput { width, height });
    }
    Ok(())
}
