use crate::GaussianBlurParams;
use ridgepoint_core::{convolve_separable, gaussian_kernel_sized, BorderMode, GrayImage, GrayImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Separable Gaussian blur with a reflect-101 border, rounded back to 8 bits.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(img)))]
pub fn gaussian_blur(img: &GrayImageView<'_>, params: &GaussianBlurParams) -> GrayImage {
    let taps = gaussian_kernel_sized(params.ksize, params.sigma);
    let blurred = convolve_separable(&img.to_grid(), &taps, BorderMode::Reflect101);
    GrayImage::from_grid_rounded(&blurred)
}
