use ridgepoint_core::{GrayImage, Grid};

/// Linearly stretch `src` onto 0..=255 and truncate to 8 bits.
///
/// A constant (or empty) input maps to all zeros. Non-finite samples are
/// ignored when computing the range and map to zero.
pub fn normalize_min_max(src: &Grid<f32>) -> GrayImage {
    let (lo, hi) = src
        .data
        .iter()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let range = (hi as f64) - (lo as f64);
    if range <= f64::EPSILON {
        return GrayImage::filled(src.cols, src.rows, 0);
    }
    GrayImage {
        width: src.cols,
        height: src.rows,
        data: src
            .data
            .iter()
            .map(|&v| {
                if !v.is_finite() {
                    return 0;
                }
                ((v as f64 - lo as f64) * 255.0 / range).clamp(0.0, 255.0) as u8
            })
            .collect(),
    }
}
