//! Facade crate for the `ridgepoint-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core, singular-point and enhancement crates
//! - JSON configuration and report types for batch runs ([`io`])
//! - (feature `image`) helpers that work on `image::GrayImage` and encoded
//!   image bytes ([`detect`])
//! - (feature `cli`) the `ridgepoint` command-line tool
//!
//! ## Quickstart
//!
//! ```no_run
//! use ridgepoint::detect::{self, DetectSource};
//! use ridgepoint::{EnhanceParams, SingularParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("finger.png")?;
//! let img = detect::decode_gray(&bytes)?;
//! let result = detect::detect_singular_points_with_source(
//!     &img,
//!     DetectSource::Raw,
//!     &SingularParams::default(),
//!     &EnhanceParams::default(),
//! )?;
//! println!("cores: {:?}, deltas: {:?}", result.core_pixels(), result.delta_pixels());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `ridgepoint::core`: images, grids, angle helpers, filters, logger.
//! - `ridgepoint::singular`: orientation field, Poincaré index, core/delta detection.
//! - `ridgepoint::enhance`: blur, CLAHE, Gabor bank, normalization, Otsu.
//! - `ridgepoint::io`: `RidgeDetectConfig` / `RidgeDetectReport`.
//! - `ridgepoint::detect` (feature `image`): end-to-end helpers.

pub use ridgepoint_core as core;
pub use ridgepoint_enhance as enhance;
pub use ridgepoint_singular as singular;

pub use ridgepoint_core::{GrayImage, GrayImageView};
pub use ridgepoint_enhance::{EnhanceParams, RidgeEnhancer};
pub use ridgepoint_singular::{
    DetectionResult, SingularKind, SingularParams, SingularPoint, SingularPointDetector,
};

mod source;
pub use source::DetectSource;

pub mod io;

#[cfg(feature = "image")]
pub mod detect;
