//! Helpers for undirected (π-periodic) ridge orientations.
//!
//! Orientations live in (−π/2, π/2]. Any averaging is done on the doubled
//! angle so that θ and θ + π map to the same vector.
use nalgebra::Vector2;
use std::f32::consts::{FRAC_PI_2, PI};

/// Wrap an orientation into (−π/2, π/2].
#[inline]
pub fn wrap_orientation(theta: f32) -> f32 {
    normalize_orientation_diff(theta)
}

/// Reduce an orientation difference into (−π/2, π/2] by whole steps of π.
///
/// A raw difference near ±π between two undirected orientations means no
/// net rotation, which is why the period is π and not 2π.
#[inline]
pub fn normalize_orientation_diff(mut d: f32) -> f32 {
    if !d.is_finite() {
        return 0.0;
    }
    while d > FRAC_PI_2 {
        d -= PI;
    }
    while d <= -FRAC_PI_2 {
        d += PI;
    }
    d
}

/// Smallest angular distance between two orientations (result in [0, π/2]).
#[inline]
pub fn orientation_distance(a: f32, b: f32) -> f32 {
    normalize_orientation_diff(a - b).abs()
}

/// Unit vector of the doubled angle `(cos 2θ, sin 2θ)`.
#[inline]
pub fn doubled_angle(theta: f32) -> Vector2<f32> {
    let (s, c) = (2.0 * theta).sin_cos();
    Vector2::new(c, s)
}

/// Recover an orientation from a (not necessarily unit) doubled-angle vector.
#[inline]
pub fn orientation_from_doubled(v: Vector2<f32>) -> f32 {
    wrap_orientation(0.5 * v.y.atan2(v.x))
}
