//! Per-cell core/delta classification on a Poincaré map.
//!
//! Stateless: each cell is judged on its own index, its coherence and a
//! small neighbourhood. The delta band is checked first, so a cell can never
//! produce both kinds.
use crate::{BlockCoords, PoincareMap, SingularKind, SingularParams};
use log::debug;
use ridgepoint_core::Grid;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A cell that passed classification, before position refinement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub kind: SingularKind,
    pub block: BlockCoords,
    pub index: f32,
    pub coherence: f32,
    pub avg_coherence: f32,
}

struct Neighborhood {
    max_index: f32,
    max_abs_index: f32,
    avg_coherence: f32,
    support: usize,
}

fn neighborhood(
    map: &PoincareMap,
    coherence: &Grid<f32>,
    i: usize,
    j: usize,
    params: &SingularParams,
) -> Neighborhood {
    let r = params.neighborhood_radius;
    let mut max_index = f32::NEG_INFINITY;
    let mut max_abs_index = 0.0f32;
    for (_, v) in map.index.window(i, j, r) {
        if let Some(v) = *v {
            max_index = max_index.max(v);
            max_abs_index = max_abs_index.max(v.abs());
        }
    }

    let mut sum = 0.0f32;
    let mut count = 0usize;
    let mut support = 0usize;
    for (_, &c) in coherence.window(i, j, r) {
        sum += c;
        count += 1;
        if c > params.core_support_coherence {
            support += 1;
        }
    }

    Neighborhood {
        max_index,
        max_abs_index,
        avg_coherence: if count > 0 { sum / count as f32 } else { 0.0 },
        support,
    }
}

/// Classify a single cell; `None` when it matches neither kind.
pub fn classify_cell(
    map: &PoincareMap,
    coherence: &Grid<f32>,
    i: usize,
    j: usize,
    params: &SingularParams,
) -> Option<Candidate> {
    let value = map.get(i, j)?;
    let coh = *coherence.get(i, j);
    let block = BlockCoords { i, j };

    if params.delta_band.contains(value) {
        if coh < params.min_coherence_delta {
            return None;
        }
        let n = neighborhood(map, coherence, i, j, params);
        if value.abs() < n.max_abs_index * params.local_threshold {
            return None;
        }
        if n.avg_coherence < params.min_avg_coherence_delta {
            return None;
        }
        return Some(Candidate {
            kind: SingularKind::Delta,
            block,
            index: value,
            coherence: coh,
            avg_coherence: n.avg_coherence,
        });
    }

    if params.core_band.contains(value) {
        if coh < params.min_coherence_core {
            return None;
        }
        let n = neighborhood(map, coherence, i, j, params);
        if value < n.max_index * params.local_threshold {
            return None;
        }
        if n.avg_coherence < params.min_avg_coherence_core || n.support < params.min_core_support
        {
            return None;
        }
        return Some(Candidate {
            kind: SingularKind::Core,
            block,
            index: value,
            coherence: coh,
            avg_coherence: n.avg_coherence,
        });
    }

    None
}

/// Scan every cell with at least `margin` blocks of clearance, in row-major
/// order.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
pub fn find_candidates(
    map: &PoincareMap,
    coherence: &Grid<f32>,
    params: &SingularParams,
) -> Vec<Candidate> {
    let (rows, cols) = map.index.shape();
    let m = params.margin;
    let mut out = Vec::new();
    if rows <= 2 * m || cols <= 2 * m {
        return out;
    }
    for i in m..rows - m {
        for j in m..cols - m {
            if let Some(c) = classify_cell(map, coherence, i, j, params) {
                out.push(c);
            }
        }
    }
    debug!(
        "{} candidates ({} deltas) in {}x{} blocks",
        out.len(),
        out.iter().filter(|c| c.kind == SingularKind::Delta).count(),
        rows,
        cols
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IndexBand;

    fn map_with(rows: usize, cols: usize, cells: &[((usize, usize), f32)]) -> PoincareMap {
        let mut index = Grid::filled(rows, cols, Some(0.0f32));
        for &((i, j), v) in cells {
            *index.get_mut(i, j) = Some(v);
        }
        PoincareMap { index }
    }

    #[test]
    fn isolated_delta_is_accepted() {
        let map = map_with(12, 12, &[((6, 6), -0.5)]);
        let coh = Grid::filled(12, 12, 0.9f32);
        let found = find_candidates(&map, &coh, &SingularParams::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, SingularKind::Delta);
        assert_eq!(found[0].block, BlockCoords { i: 6, j: 6 });
    }

    #[test]
    fn weaker_neighbour_fails_local_extremum_test() {
        let map = map_with(12, 12, &[((6, 6), 0.5), ((6, 7), 0.54)]);
        let coh = Grid::filled(12, 12, 0.9f32);
        let found = find_candidates(&map, &coh, &SingularParams::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].block, BlockCoords { i: 6, j: 7 });
    }

    #[test]
    fn core_needs_supporting_neighbourhood() {
        let map = map_with(12, 12, &[((6, 6), 0.5)]);
        let mut coh = Grid::filled(12, 12, 0.9f32);
        // 11 of 25 neighbourhood cells drop to 0.6: average stays >= 0.70,
        // but only 14 cells exceed 0.65.
        let mut lowered = 0;
        'outer: for i in 4..9 {
            for j in 4..9 {
                if (i, j) != (6, 6) {
                    *coh.get_mut(i, j) = 0.6;
                    lowered += 1;
                    if lowered == 11 {
                        break 'outer;
                    }
                }
            }
        }
        let found = find_candidates(&map, &coh, &SingularParams::default());
        assert!(found.is_empty());
    }

    #[test]
    fn low_coherence_rejects_core_but_not_delta() {
        let map = map_with(12, 12, &[((5, 5), 0.5), ((5, 9), -0.5)]);
        let coh = Grid::filled(12, 12, 0.7f32);
        let params = SingularParams {
            margin: 2,
            ..SingularParams::default()
        };
        let found = find_candidates(&map, &coh, &params);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, SingularKind::Delta);
    }

    #[test]
    fn margin_excludes_border_cells() {
        let map = map_with(12, 12, &[((3, 6), -0.5)]);
        let coh = Grid::filled(12, 12, 0.9f32);
        assert!(find_candidates(&map, &coh, &SingularParams::default()).is_empty());
    }

    #[test]
    fn overlapping_bands_prefer_delta() {
        let map = map_with(12, 12, &[((6, 6), -0.5)]);
        let coh = Grid::filled(12, 12, 0.9f32);
        let params = SingularParams {
            core_band: IndexBand::new(-0.6, 0.6),
            ..SingularParams::default()
        };
        // Zero-index cells around it also fall inside the widened core band,
        // so only the cell at (6, 6) is checked.
        let found = find_candidates(&map, &coh, &params);
        let at_center: Vec<_> = found
            .iter()
            .filter(|c| c.block == BlockCoords { i: 6, j: 6 })
            .collect();
        assert_eq!(at_center.len(), 1);
        assert_eq!(at_center[0].kind, SingularKind::Delta);
        let direct = classify_cell(&map, &coh, 6, 6, &params).unwrap();
        assert_eq!(direct.kind, SingularKind::Delta);
    }
}
