use crate::SingularPoint;

/// Greedy suppression of near-duplicate points of one kind.
///
/// Points are ranked by [`SingularPoint::quality`] (stable, descending) and
/// kept only if they are at least `min_distance` pixels from every point
/// kept so far.
pub fn deduplicate(mut points: Vec<SingularPoint>, min_distance: f32) -> Vec<SingularPoint> {
    points.sort_by(|a, b| b.quality().total_cmp(&a.quality()));

    let mut kept: Vec<SingularPoint> = Vec::with_capacity(points.len());
    for p in points {
        if kept.iter().all(|k| p.distance_to(k) >= min_distance) {
            kept.push(p);
        }
    }
    kept
}
