//! End-to-end helpers on `image::GrayImage` and encoded image bytes.
use crate::{core, enhance, singular};
use std::io::Cursor;

pub use crate::DetectSource;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidGrayBuffer { expected: usize, got: usize },

    #[error("invalid grayscale image dimensions (width={width}, height={height})")]
    InvalidGrayDimensions { width: u32, height: u32 },

    #[error("failed to decode image: {0}")]
    Decode(#[source] ::image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] ::image::ImageError),

    #[error(transparent)]
    Singular(#[from] singular::SingularDetectError),

    #[error(transparent)]
    Enhance(#[from] enhance::EnhanceError),
}

/// Borrow an `image::GrayImage` as a `ridgepoint-core` view.
pub fn gray_view(img: &::image::GrayImage) -> core::GrayImageView<'_> {
    core::GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Copy a raw 8-bit buffer into an `image::GrayImage`, checking its size.
pub fn gray_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<::image::GrayImage, DetectError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(DetectError::InvalidGrayDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h) else {
        return Err(DetectError::InvalidGrayDimensions { width, height });
    };
    if expected == 0 {
        return Err(DetectError::InvalidGrayDimensions { width, height });
    }
    if pixels.len() != expected {
        return Err(DetectError::InvalidGrayBuffer {
            expected,
            got: pixels.len(),
        });
    }
    ::image::GrayImage::from_raw(width, height, pixels.to_vec())
        .ok_or(DetectError::InvalidGrayDimensions { width, height })
}

/// Convert a `ridgepoint-core` image into an `image::GrayImage`.
pub fn to_image_gray(img: core::GrayImage) -> Result<::image::GrayImage, DetectError> {
    let (Ok(width), Ok(height)) = (u32::try_from(img.width), u32::try_from(img.height)) else {
        return Err(DetectError::InvalidGrayDimensions {
            width: u32::MAX,
            height: u32::MAX,
        });
    };
    gray_image_from_slice(width, height, &img.data)
}

/// Decode PNG/JPEG/... bytes and convert to 8-bit grayscale.
pub fn decode_gray(bytes: &[u8]) -> Result<::image::GrayImage, DetectError> {
    let img = ::image::load_from_memory(bytes).map_err(DetectError::Decode)?;
    Ok(img.to_luma8())
}

/// Encode a grayscale image as PNG.
pub fn encode_png(img: &::image::GrayImage) -> Result<Vec<u8>, DetectError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ::image::ImageFormat::Png)
        .map_err(DetectError::Encode)?;
    Ok(buf.into_inner())
}

/// Run the enhancement pipeline and return the binarized ridge map.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width(), height = img.height()))
)]
pub fn enhance_image(
    img: &::image::GrayImage,
    params: &enhance::EnhanceParams,
) -> Result<::image::GrayImage, DetectError> {
    let out = enhance::enhance_ridges(&gray_view(img), params)?;
    to_image_gray(out)
}

/// Decode `bytes`, enhance, and encode the binarized result as PNG.
pub fn enhance_to_png(bytes: &[u8], params: &enhance::EnhanceParams) -> Result<Vec<u8>, DetectError> {
    let img = decode_gray(bytes)?;
    encode_png(&enhance_image(&img, params)?)
}

/// Detect cores and deltas on the image as given.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width(), height = img.height()))
)]
pub fn detect_singular_points(
    img: &::image::GrayImage,
    params: &singular::SingularParams,
) -> Result<singular::DetectionResult, DetectError> {
    Ok(singular::detect_singular_points(&gray_view(img), params)?)
}

/// Detect cores and deltas on the raw image or on its enhanced version.
pub fn detect_singular_points_with_source(
    img: &::image::GrayImage,
    source: DetectSource,
    params: &singular::SingularParams,
    enhance_params: &enhance::EnhanceParams,
) -> Result<singular::DetectionResult, DetectError> {
    match source {
        DetectSource::Raw => detect_singular_points(img, params),
        DetectSource::Enhanced => {
            let enhanced = enhance_image(img, enhance_params)?;
            detect_singular_points(&enhanced, params)
        }
    }
}

/// Detect from a raw row-major 8-bit buffer.
pub fn detect_singular_points_from_gray_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
    params: &singular::SingularParams,
) -> Result<singular::DetectionResult, DetectError> {
    let img = gray_image_from_slice(width, height, pixels)?;
    detect_singular_points(&img, params)
}

/// Decode encoded bytes and detect.
pub fn detect_singular_points_from_bytes(
    bytes: &[u8],
    source: DetectSource,
    params: &singular::SingularParams,
    enhance_params: &enhance::EnhanceParams,
) -> Result<singular::DetectionResult, DetectError> {
    let img = decode_gray(bytes)?;
    detect_singular_points_with_source(&img, source, params, enhance_params)
}
