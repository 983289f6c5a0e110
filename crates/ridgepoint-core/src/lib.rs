//! Core types and utilities for fingerprint ridge analysis.
//!
//! This crate is intentionally small: 8-bit image views, a dense row-major
//! grid, π-periodic angle helpers and the separable/dense filters shared by
//! the singular-point detector and the enhancement pipeline.

mod angle;
mod filter;
mod grid;
mod image;
mod logger;

pub use angle::{
    doubled_angle, normalize_orientation_diff, orientation_distance, orientation_from_doubled,
    wrap_orientation,
};
pub use filter::{
    border_index, convolve_separable, filter2d, gaussian_kernel, gaussian_kernel_sized,
    gaussian_kernel_truncated, BorderMode,
};
pub use grid::Grid;
pub use image::{GrayImage, GrayImageView, ImageError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_verbosity, init_with_level};
