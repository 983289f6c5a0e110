use ridgepoint_core::ImageError;

/// Errors returned by the singular-point detector.
///
/// A valid image with no cores or deltas is not an error; it yields an empty
/// `DetectionResult`.
#[derive(thiserror::Error, Debug)]
pub enum SingularDetectError {
    #[error("invalid image: {0}")]
    InvalidImage(#[from] ImageError),
    #[error("invalid detector parameters: {0}")]
    InvalidParams(String),
}
