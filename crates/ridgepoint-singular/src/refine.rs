use crate::classify::Candidate;
use crate::{BlockCoords, PoincareMap, SingularKind, SingularPoint};

/// Move a candidate to the strongest cell of its kind inside the
/// `(2·radius + 1)²` window (clipped at the border): the minimum index for a
/// delta, the maximum for a core. Ties keep the first cell in row-major order.
pub fn refine_position(
    map: &PoincareMap,
    block: BlockCoords,
    kind: SingularKind,
    radius: usize,
) -> BlockCoords {
    let better = |v: f32, best: f32| match kind {
        SingularKind::Delta => v < best,
        SingularKind::Core => v > best,
    };

    let mut best: Option<(BlockCoords, f32)> = None;
    for ((i, j), v) in map.index.window(block.i, block.j, radius) {
        let Some(v) = *v else {
            continue;
        };
        if best.map(|(_, b)| better(v, b)).unwrap_or(true) {
            best = Some((BlockCoords { i, j }, v));
        }
    }
    best.map(|(b, _)| b).unwrap_or(block)
}

/// Refine a candidate and attach its pixel position.
pub fn refine_candidate(
    map: &PoincareMap,
    candidate: &Candidate,
    radius: usize,
    block_size: usize,
) -> SingularPoint {
    let block = refine_position(map, candidate.block, candidate.kind, radius);
    SingularPoint {
        kind: candidate.kind,
        block,
        position: block.to_pixel(block_size),
        index: candidate.index,
        coherence: candidate.coherence,
        avg_coherence: candidate.avg_coherence,
    }
}
