use ridgepoint_core::{
    convolve_separable, doubled_angle, gaussian_kernel_truncated, orientation_from_doubled,
    BorderMode, Grid,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Kernel support in units of sigma.
const TRUNCATE: f32 = 4.0;

/// Gaussian-smooth an undirected orientation field.
///
/// Blurs `sin 2θ` and `cos 2θ` separately (reflect border) and recovers
/// `0.5 · atan2(sin, cos)`, so θ and θ + π average correctly. Output stays in
/// (−π/2, π/2].
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(orientation)))]
pub fn smooth_orientation(orientation: &Grid<f32>, sigma: f32) -> Grid<f32> {
    if orientation.is_empty() {
        return orientation.clone();
    }
    let doubled: Vec<_> = orientation.data.iter().map(|&t| doubled_angle(t)).collect();
    let cos2 = Grid {
        rows: orientation.rows,
        cols: orientation.cols,
        data: doubled.iter().map(|v| v.x).collect(),
    };
    let sin2 = Grid {
        rows: orientation.rows,
        cols: orientation.cols,
        data: doubled.iter().map(|v| v.y).collect(),
    };

    let taps = gaussian_kernel_truncated(sigma, TRUNCATE);
    let cos2 = convolve_separable(&cos2, &taps, BorderMode::Reflect);
    let sin2 = convolve_separable(&sin2, &taps, BorderMode::Reflect);

    Grid {
        rows: orientation.rows,
        cols: orientation.cols,
        data: cos2
            .data
            .iter()
            .zip(sin2.data.iter())
            .map(|(&c, &s)| orientation_from_doubled(nalgebra::Vector2::new(c, s)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ridgepoint_core::orientation_distance;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn output_stays_in_half_open_range() {
        // Pseudo-random angles, including values far outside the canonical range.
        let mut state = 12345u32;
        let field = Grid::from_fn(11, 13, |_, _| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            (state >> 8) as f32 / (1u32 << 24) as f32 * 4.0 * PI - 2.0 * PI
        });
        let smoothed = smooth_orientation(&field, 1.5);
        assert_eq!(smoothed.shape(), field.shape());
        for &o in &smoothed.data {
            assert!(o > -FRAC_PI_2 && o <= FRAC_PI_2, "{o}");
        }
    }

    #[test]
    fn opposite_directions_do_not_cancel() {
        // Near-vertical orientations on both sides of the ±π/2 seam.
        let field = Grid::from_fn(8, 8, |i, j| {
            if (i + j) % 2 == 0 {
                FRAC_PI_2 - 0.05
            } else {
                -FRAC_PI_2 + 0.05
            }
        });
        let smoothed = smooth_orientation(&field, 1.5);
        for &o in &smoothed.data {
            assert!(orientation_distance(o, FRAC_PI_2) < 0.06, "{o}");
        }
    }

    #[test]
    fn zero_sigma_is_identity() {
        let field = Grid::from_fn(4, 4, |i, j| 0.1 * (i as f32) - 0.05 * (j as f32));
        let smoothed = smooth_orientation(&field, 0.0);
        for (a, b) in field.data.iter().zip(smoothed.data.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-5);
        }
    }
}
