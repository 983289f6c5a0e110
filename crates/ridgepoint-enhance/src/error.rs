use ridgepoint_core::ImageError;

/// Errors returned by the enhancement pipeline.
#[derive(thiserror::Error, Debug)]
pub enum EnhanceError {
    #[error("invalid image: {0}")]
    InvalidImage(#[from] ImageError),
    #[error("invalid enhancement parameters: {0}")]
    InvalidParams(String),
}
