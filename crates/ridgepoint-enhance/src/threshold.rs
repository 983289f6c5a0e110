//! Global Otsu binarization.
use ridgepoint_core::{GrayImage, GrayImageView};

fn histogram(samples: &[u8]) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for &v in samples {
        hist[v as usize] += 1;
    }
    hist
}

/// Threshold maximizing the between-class variance of `samples`.
///
/// Pixels strictly above the returned value form the bright class. A constant
/// input returns its own value, so it binarizes to all zeros.
pub fn otsu_threshold(samples: &[u8]) -> u8 {
    if samples.is_empty() {
        return 127;
    }
    let hist = histogram(samples);
    let lo = hist.iter().position(|&h| h > 0).unwrap_or(0);
    let hi = hist.iter().rposition(|&h| h > 0).unwrap_or(255);
    if lo == hi {
        return lo as u8;
    }

    let total = samples.len() as f64;
    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * h as f64)
        .sum();

    let mut w_b = 0f64;
    let mut sum_b = 0f64;
    let mut best_var = -1f64;
    let mut best_t = lo as u8;
    for (t, &h) in hist.iter().enumerate().take(hi) {
        w_b += h as f64;
        sum_b += t as f64 * h as f64;
        if w_b < 1.0 {
            continue;
        }
        let w_f = total - w_b;
        let m_b = sum_b / w_b;
        let m_f = (sum_total - sum_b) / w_f;
        let var_between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        if var_between > best_var {
            best_var = var_between;
            best_t = t as u8;
        }
    }
    best_t
}

/// `v > threshold -> 255`, otherwise `0`.
pub fn binarize(img: &GrayImageView<'_>, threshold: u8) -> GrayImage {
    GrayImage {
        width: img.width,
        height: img.height,
        data: img
            .data
            .iter()
            .map(|&v| if v > threshold { 255 } else { 0 })
            .collect(),
    }
}

/// Binarize with the Otsu threshold of the image itself.
pub fn otsu_binarize(img: &GrayImageView<'_>) -> (GrayImage, u8) {
    let t = otsu_threshold(img.data);
    log::debug!("otsu threshold {t}");
    (binarize(img, t), t)
}
