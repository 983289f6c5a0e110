//! Oriented Gabor filter bank.
use crate::{GaborBankParams, GaborCombine};
use ridgepoint_core::{filter2d, BorderMode, Grid};
use std::f64::consts::PI;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Real Gabor kernel of size `ksize x ksize` for wave direction `theta`.
///
/// `g(x, y) = exp(-(x'^2 / sigma^2 + y'^2 / (sigma / gamma)^2) / 2) * cos(2π x' / lambda + psi)`
/// with `x' = x cos θ + y sin θ`, `y' = -x sin θ + y cos θ`. The kernel is
/// stored point-reflected (`k[ymax - y][xmax - x]`), so applying it as a
/// correlation behaves like a convolution with `g`.
pub fn gabor_kernel(ksize: usize, sigma: f32, theta: f32, lambda: f32, gamma: f32, psi: f32) -> Grid<f32> {
    let half = (ksize / 2) as i64;
    let size = (2 * half + 1) as usize;
    let sigma_x = sigma as f64;
    let sigma_y = sigma as f64 / gamma as f64;
    let ex = -0.5 / (sigma_x * sigma_x);
    let ey = -0.5 / (sigma_y * sigma_y);
    let (s, c) = (theta as f64).sin_cos();
    let wave = 2.0 * PI / lambda as f64;

    let mut kernel = Grid::filled(size, size, 0.0f32);
    for y in -half..=half {
        for x in -half..=half {
            let xr = x as f64 * c + y as f64 * s;
            let yr = -(x as f64) * s + y as f64 * c;
            let v = (ex * xr * xr + ey * yr * yr).exp() * (wave * xr + psi as f64).cos();
            *kernel.get_mut((half - y) as usize, (half - x) as usize) = v as f32;
        }
    }
    kernel
}

/// Orientations `k·π/n` for `k in 0..n`.
pub fn bank_orientations(n: usize) -> Vec<f32> {
    (0..n).map(|k| (k as f64 * PI / n as f64) as f32).collect()
}

/// All kernels of the bank, in orientation order.
pub fn gabor_bank(params: &GaborBankParams) -> Vec<Grid<f32>> {
    bank_orientations(params.num_orientations)
        .into_iter()
        .map(|theta| {
            gabor_kernel(
                params.ksize,
                params.sigma,
                theta,
                params.lambda,
                params.gamma,
                params.psi,
            )
        })
        .collect()
}

/// Filter `src` with every kernel of the bank (reflect-101 border) and merge
/// the responses.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(src), fields(rows = src.rows, cols = src.cols))
)]
pub fn apply_gabor_bank(src: &Grid<f32>, params: &GaborBankParams) -> Grid<f32> {
    let kernels = gabor_bank(params);

    #[cfg(feature = "rayon")]
    let responses: Vec<Grid<f32>> = kernels
        .par_iter()
        .map(|k| filter2d(src, k, BorderMode::Reflect101))
        .collect();
    #[cfg(not(feature = "rayon"))]
    let responses: Vec<Grid<f32>> = kernels
        .iter()
        .map(|k| filter2d(src, k, BorderMode::Reflect101))
        .collect();

    combine_responses(src.rows, src.cols, &responses, params.combine)
}

fn combine_responses(rows: usize, cols: usize, responses: &[Grid<f32>], mode: GaborCombine) -> Grid<f32> {
    let mut acc = Grid::filled(rows, cols, 0.0f32);
    for r in responses {
        for (a, &v) in acc.data.iter_mut().zip(r.data.iter()) {
            match mode {
                GaborCombine::Max => *a = a.max(v),
                GaborCombine::Mean => *a += v,
            }
        }
    }
    if mode == GaborCombine::Mean && !responses.is_empty() {
        let inv = 1.0 / responses.len() as f32;
        acc.data.iter_mut().for_each(|a| *a *= inv);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn kernel_peak_and_symmetry() {
        let k = gabor_kernel(15, 4.0, 0.3, 10.0, 0.5, 0.0);
        assert_eq!(k.shape(), (15, 15));
        assert_relative_eq!(*k.get(7, 7), 1.0);
        // psi = 0 makes the kernel even: g(x, y) = g(-x, -y).
        for i in 0..15 {
            for j in 0..15 {
                assert_relative_eq!(*k.get(i, j), *k.get(14 - i, 14 - j), epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn theta_zero_oscillates_along_columns() {
        let k = gabor_kernel(15, 4.0, 0.0, 10.0, 0.5, 0.0);
        // Half a wavelength from the centre along x the cosine is -1.
        assert!(*k.get(7, 2) < 0.0 && *k.get(7, 12) < 0.0);
        // Along y only the envelope decays.
        assert!(*k.get(2, 7) > 0.0);
        assert!(*k.get(2, 7) < *k.get(7, 7));
    }

    #[test]
    fn orientations_exclude_pi() {
        let t = bank_orientations(8);
        assert_eq!(t.len(), 8);
        assert_eq!(t[0], 0.0);
        assert_relative_eq!(t[4], std::f32::consts::FRAC_PI_2);
        assert!(*t.last().unwrap() < std::f32::consts::PI);
    }

    #[test]
    fn max_combine_is_floored_at_zero_mean_is_average() {
        let a = Grid::from_fn(1, 3, |_, j| [-2.0, 1.0, 4.0][j]);
        let b = Grid::from_fn(1, 3, |_, j| [-4.0, 3.0, 0.0][j]);
        let max = combine_responses(1, 3, &[a.clone(), b.clone()], GaborCombine::Max);
        assert_eq!(max.data, vec![0.0, 3.0, 4.0]);
        let mean = combine_responses(1, 3, &[a, b], GaborCombine::Mean);
        assert_eq!(mean.data, vec![-3.0, 2.0, 2.0]);
    }

    #[test]
    fn bank_responds_to_matching_stripes() {
        // Vertical stripes with period 10 vary along x: the theta = 0 kernel matches.
        let src = Grid::from_fn(40, 40, |_, j| {
            (2.0 * std::f32::consts::PI * j as f32 / 10.0).cos() * 100.0 + 128.0
        });
        let params = GaborBankParams {
            num_orientations: 2,
            ..GaborBankParams::default()
        };
        let kernels = gabor_bank(&params);
        let along = filter2d(&src, &kernels[0], BorderMode::Reflect101);
        let across = filter2d(&src, &kernels[1], BorderMode::Reflect101);
        let energy = |g: &Grid<f32>| (*g.get(20, 20) - *g.get(20, 25)).abs();
        assert!(energy(&along) > 10.0 * energy(&across));
    }
}
