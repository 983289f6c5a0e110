//! Poincaré index over a block orientation field.
//!
//! The index at `(i, j)` is the sum of orientation differences along the
//! closed 8-neighbour loop N, NE, E, SE, S, SW, W, NW (rows grow downwards),
//! each difference folded into (−π/2, π/2], divided by 2π. A core sums to
//! about +π (index +0.5), a delta to about −π (index −0.5).
use crate::PoincareMap;
use ridgepoint_core::{normalize_orientation_diff, Grid};
use std::f32::consts::TAU;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Loop offsets `(di, dj)` in traversal order.
const LOOP: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

/// Index at an interior cell, ignoring coherence.
pub fn poincare_index_at(orientation: &Grid<f32>, i: usize, j: usize) -> f32 {
    let at = |k: usize| {
        let (di, dj) = LOOP[k % LOOP.len()];
        *orientation.get((i as isize + di) as usize, (j as isize + dj) as usize)
    };
    let sum: f32 = (0..LOOP.len())
        .map(|k| normalize_orientation_diff(at(k + 1) - at(k)))
        .sum();
    sum / TAU
}

fn index_row(
    orientation: &Grid<f32>,
    coherence: &Grid<f32>,
    min_coherence: f32,
    i: usize,
    out: &mut [Option<f32>],
) {
    if i == 0 || i + 1 >= orientation.rows {
        return;
    }
    for j in 1..orientation.cols.saturating_sub(1) {
        if *coherence.get(i, j) < min_coherence {
            continue;
        }
        out[j] = Some(poincare_index_at(orientation, i, j));
    }
}

/// Compute the Poincaré map for every interior cell with
/// `coherence >= min_coherence`.
///
/// # Panics
///
/// Panics if `orientation` and `coherence` differ in shape.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(orientation, coherence), fields(rows = orientation.rows, cols = orientation.cols))
)]
pub fn compute_poincare_map(
    orientation: &Grid<f32>,
    coherence: &Grid<f32>,
    min_coherence: f32,
) -> PoincareMap {
    assert_eq!(
        orientation.shape(),
        coherence.shape(),
        "orientation and coherence grids must have the same shape"
    );
    let (rows, cols) = orientation.shape();
    let mut index: Grid<Option<f32>> = Grid::filled(rows, cols, None);
    if rows < 3 || cols < 3 {
        return PoincareMap { index };
    }

    #[cfg(feature = "rayon")]
    index
        .data
        .par_chunks_mut(cols)
        .enumerate()
        .for_each(|(i, out)| index_row(orientation, coherence, min_coherence, i, out));

    #[cfg(not(feature = "rayon"))]
    index
        .data
        .chunks_mut(cols)
        .enumerate()
        .for_each(|(i, out)| index_row(orientation, coherence, min_coherence, i, out));

    PoincareMap { index }
}
