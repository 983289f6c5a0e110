//! Fingerprint ridge enhancement.
//!
//! [`RidgeEnhancer`] runs a fixed sequence of stages over an 8-bit image:
//! Gaussian denoise, CLAHE, an oriented Gabor filter bank, min–max
//! normalization and Otsu binarization. Each stage is also exposed on its own.
//!
//! ```
//! use ridgepoint_core::GrayImage;
//! use ridgepoint_enhance::{EnhanceParams, RidgeEnhancer};
//!
//! let img = GrayImage::from_fn(64, 64, |x, _| if (x / 5) % 2 == 0 { 40 } else { 210 });
//! let enhancer = RidgeEnhancer::new(EnhanceParams::default()).unwrap();
//! let binary = enhancer.enhance(&img.view()).unwrap();
//! assert!(binary.data.iter().all(|&v| v == 0 || v == 255));
//! ```

mod blur;
mod clahe;
mod enhancer;
mod error;
mod gabor;
mod normalize;
mod params;
mod threshold;

pub use blur::gaussian_blur;
pub use clahe::clahe;
pub use enhancer::{enhance_ridges, EnhanceStages, RidgeEnhancer};
pub use error::EnhanceError;
pub use gabor::{apply_gabor_bank, bank_orientations, gabor_bank, gabor_kernel};
pub use normalize::normalize_min_max;
pub use params::{ClaheParams, EnhanceParams, GaborBankParams, GaborCombine, GaussianBlurParams};
pub use threshold::{binarize, otsu_binarize, otsu_threshold};
