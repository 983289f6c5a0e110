//! Sobel derivatives with border replication.
use crate::GradientPair;
use ridgepoint_core::{GrayImageView, Grid, ImageError};

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

type Kernel3 = [[f32; 3]; 3];

const SOBEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

fn sobel_row(img: &GrayImageView<'_>, y: usize, out_gx: &mut [f32], out_gy: &mut [f32]) {
    let (w, h) = (img.width, img.height);
    let rows = [
        img.row(y.saturating_sub(1)),
        img.row(y),
        img.row((y + 1).min(h - 1)),
    ];
    for x in 0..w {
        let xs = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
        let mut sx = 0.0f32;
        let mut sy = 0.0f32;
        for (ky, row) in rows.iter().enumerate() {
            for (kx, &xx) in xs.iter().enumerate() {
                let v = row[xx] as f32;
                sx += SOBEL_X[ky][kx] * v;
                sy += SOBEL_Y[ky][kx] * v;
            }
        }
        out_gx[x] = sx;
        out_gy[x] = sy;
    }
}

/// Compute `(gx, gy)` with the 3x3 Sobel pair. Out-of-image taps repeat the
/// nearest edge pixel.
///
/// Fails when the view has zero area or its buffer length is not `W*H`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img), fields(width = img.width, height = img.height))
)]
pub fn compute_gradients(img: &GrayImageView<'_>) -> Result<GradientPair, ImageError> {
    img.validate()?;
    let (w, h) = (img.width, img.height);
    let mut gx = Grid::filled(h, w, 0.0f32);
    let mut gy = Grid::filled(h, w, 0.0f32);

    #[cfg(feature = "rayon")]
    gx.data
        .par_chunks_mut(w)
        .zip(gy.data.par_chunks_mut(w))
        .enumerate()
        .for_each(|(y, (rx, ry))| sobel_row(img, y, rx, ry));

    #[cfg(not(feature = "rayon"))]
    gx.data
        .chunks_mut(w)
        .zip(gy.data.chunks_mut(w))
        .enumerate()
        .for_each(|(y, (rx, ry))| sobel_row(img, y, rx, ry));

    Ok(GradientPair { gx, gy })
}
