//! Separable and dense 2-D filtering on `Grid<f32>`.
//!
//! All filters are correlations with a centred anchor. Out-of-range taps are
//! resolved through a [`BorderMode`].
use crate::Grid;
use serde::{Deserialize, Serialize};

/// How samples outside the grid are synthesised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderMode {
    /// `aaa|abcd|ddd`
    Replicate,
    /// `cba|abcd|dcb` (edge sample repeated)
    Reflect,
    /// `dcb|abcd|cba` (edge sample not repeated)
    Reflect101,
}

/// Map a possibly out-of-range index into `0..n`.
#[inline]
pub fn border_index(i: isize, n: usize, mode: BorderMode) -> usize {
    debug_assert!(n > 0);
    if i >= 0 && (i as usize) < n {
        return i as usize;
    }
    let n_i = n as isize;
    match mode {
        BorderMode::Replicate => i.clamp(0, n_i - 1) as usize,
        BorderMode::Reflect => {
            let period = 2 * n_i;
            let m = i.rem_euclid(period);
            if m >= n_i {
                (period - 1 - m) as usize
            } else {
                m as usize
            }
        }
        BorderMode::Reflect101 => {
            if n == 1 {
                return 0;
            }
            let period = 2 * n_i - 2;
            let m = i.rem_euclid(period);
            if m >= n_i {
                (period - m) as usize
            } else {
                m as usize
            }
        }
    }
}

/// Normalised sampled Gaussian with the given radius (`2 * radius + 1` taps).
pub fn gaussian_kernel(sigma: f32, radius: usize) -> Vec<f32> {
    if sigma <= 0.0 || radius == 0 {
        return vec![1.0];
    }
    let inv = -0.5 / (sigma as f64 * sigma as f64);
    let taps: Vec<f64> = (0..=2 * radius)
        .map(|k| {
            let x = k as f64 - radius as f64;
            (inv * x * x).exp()
        })
        .collect();
    let sum: f64 = taps.iter().sum();
    taps.iter().map(|&t| (t / sum) as f32).collect()
}

/// Gaussian whose support is truncated at `truncate * sigma` (radius rounded).
pub fn gaussian_kernel_truncated(sigma: f32, truncate: f32) -> Vec<f32> {
    let radius = (truncate * sigma + 0.5).max(0.0) as usize;
    gaussian_kernel(sigma, radius)
}

/// Gaussian for an explicit odd kernel size.
///
/// With `sigma <= 0` small kernels (size ≤ 7) use the fixed binomial taps,
/// larger ones derive `sigma = 0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_kernel_sized(ksize: usize, sigma: f32) -> Vec<f32> {
    const BINOMIAL: [&[f32]; 4] = [
        &[1.0],
        &[0.25, 0.5, 0.25],
        &[0.0625, 0.25, 0.375, 0.25, 0.0625],
        &[
            0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
        ],
    ];
    let ksize = ksize.max(1) | 1;
    if sigma <= 0.0 && ksize <= 7 {
        return BINOMIAL[ksize / 2].to_vec();
    }
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };
    gaussian_kernel(sigma, ksize / 2)
}

/// Apply the same symmetric 1-D kernel along rows, then along columns.
pub fn convolve_separable(src: &Grid<f32>, taps: &[f32], mode: BorderMode) -> Grid<f32> {
    if src.is_empty() || taps.len() <= 1 {
        return src.map(|&v| v * taps.first().copied().unwrap_or(1.0));
    }
    let r = (taps.len() / 2) as isize;
    let (rows, cols) = src.shape();

    let mut tmp = Grid::filled(rows, cols, 0.0f32);
    for i in 0..rows {
        let row = src.row(i);
        for j in 0..cols {
            let mut acc = 0.0f32;
            for (k, &w) in taps.iter().enumerate() {
                let jj = border_index(j as isize + k as isize - r, cols, mode);
                acc += w * row[jj];
            }
            *tmp.get_mut(i, j) = acc;
        }
    }

    let mut out = Grid::filled(rows, cols, 0.0f32);
    for i in 0..rows {
        for j in 0..cols {
            let mut acc = 0.0f32;
            for (k, &w) in taps.iter().enumerate() {
                let ii = border_index(i as isize + k as isize - r, rows, mode);
                acc += w * tmp.get(ii, j);
            }
            *out.get_mut(i, j) = acc;
        }
    }
    out
}

/// Dense 2-D correlation with a kernel anchored at its centre.
pub fn filter2d(src: &Grid<f32>, kernel: &Grid<f32>, mode: BorderMode) -> Grid<f32> {
    let (rows, cols) = src.shape();
    if src.is_empty() || kernel.is_empty() {
        return src.clone();
    }
    let ai = (kernel.rows / 2) as isize;
    let aj = (kernel.cols / 2) as isize;

    // Resolve the column offsets once per output column band.
    let col_lut: Vec<Vec<usize>> = (0..cols)
        .map(|j| {
            (0..kernel.cols)
                .map(|kj| border_index(j as isize + kj as isize - aj, cols, mode))
                .collect()
        })
        .collect();

    let mut out = Grid::filled(rows, cols, 0.0f32);
    for i in 0..rows {
        for ki in 0..kernel.rows {
            let ii = border_index(i as isize + ki as isize - ai, rows, mode);
            let src_row = src.row(ii);
            let k_row = kernel.row(ki);
            for (j, lut) in col_lut.iter().enumerate() {
                let mut acc = 0.0f32;
                for (&w, &jj) in k_row.iter().zip(lut.iter()) {
                    acc += w * src_row[jj];
                }
                *out.get_mut(i, j) += acc;
            }
        }
    }
    out
}
