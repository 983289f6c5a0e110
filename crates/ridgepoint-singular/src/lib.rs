//! Fingerprint singular-point (core/delta) detection.
//!
//! ## Quickstart
//!
//! ```
//! use ridgepoint_core::GrayImage;
//! use ridgepoint_singular::{SingularParams, SingularPointDetector};
//!
//! let img = GrayImage::filled(320, 320, 128);
//! let detector = SingularPointDetector::new(SingularParams::default()).unwrap();
//! let result = detector.detect(&img.view()).unwrap();
//! assert!(result.cores.is_empty() && result.deltas.is_empty());
//! ```
//!
//! Pipeline, each stage a pure function over the previous one's output:
//! 1. Sobel gradients (`compute_gradients`).
//! 2. Block structure tensor → orientation and coherence (`compute_orientation_field`).
//! 3. Doubled-angle Gaussian smoothing of the orientation (`smooth_orientation`).
//! 4. Poincaré index per coherent interior block (`compute_poincare_map`).
//! 5. Band, coherence and local-extremum checks per block (`find_candidates`).
//! 6. Move each candidate to the window extremum (`refine_position`).
//! 7. Greedy minimum-distance suppression per kind (`deduplicate`).

mod classify;
mod dedup;
mod detector;
mod error;
mod gradient;
mod orientation;
mod params;
mod poincare;
mod refine;
mod smoothing;
mod types;

pub use classify::{classify_cell, find_candidates, Candidate};
pub use dedup::deduplicate;
pub use detector::{detect_singular_points, SingularPointDetector};
pub use error::SingularDetectError;
pub use gradient::compute_gradients;
pub use orientation::{compute_orientation_field, COHERENCE_EPSILON};
pub use params::{IndexBand, SingularParams};
pub use poincare::{compute_poincare_map, poincare_index_at};
pub use refine::{refine_candidate, refine_position};
pub use smoothing::smooth_orientation;
pub use types::{
    BlockCoords, BlockField, DetectionDebug, DetectionResult, GradientPair, PoincareMap,
    SingularKind, SingularPoint,
};
