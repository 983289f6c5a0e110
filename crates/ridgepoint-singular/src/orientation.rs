//! Block-wise structure-tensor orientation and coherence.
//!
//! For each `block_size x block_size` tile:
//! - `Gxx = Σ gx²`, `Gyy = Σ gy²`, `Gxy = Σ gx·gy`
//! - orientation `= 0.5 · atan2(2·Gxy, Gxx − Gyy)`
//! - coherence `= sqrt((Gxx − Gyy)² + 4·Gxy²) / (Gxx + Gyy + ε)`
//!
//! Trailing partial tiles are ignored.
use crate::{BlockField, GradientPair};
use log::warn;
use ridgepoint_core::{wrap_orientation, Grid};

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Guards the coherence ratio on flat tiles.
pub const COHERENCE_EPSILON: f64 = 1e-10;

#[derive(Clone, Copy, Debug, Default)]
struct StructureTensor {
    gxx: f64,
    gyy: f64,
    gxy: f64,
}

impl StructureTensor {
    fn accumulate(grad: &GradientPair, bi: usize, bj: usize, block_size: usize) -> Self {
        let mut t = Self::default();
        for y in bi * block_size..(bi + 1) * block_size {
            let row_x = grad.gx.row(y);
            let row_y = grad.gy.row(y);
            for x in bj * block_size..(bj + 1) * block_size {
                let gx = row_x[x] as f64;
                let gy = row_y[x] as f64;
                t.gxx += gx * gx;
                t.gyy += gy * gy;
                t.gxy += gx * gy;
            }
        }
        t
    }

    fn orientation(&self) -> f32 {
        wrap_orientation((0.5 * (2.0 * self.gxy).atan2(self.gxx - self.gyy)) as f32)
    }

    fn coherence(&self) -> f32 {
        let diff = self.gxx - self.gyy;
        let num = (diff * diff + 4.0 * self.gxy * self.gxy).sqrt();
        let c = num / (self.gxx + self.gyy + COHERENCE_EPSILON);
        c.clamp(0.0, 1.0) as f32
    }
}

fn block_row(
    grad: &GradientPair,
    bi: usize,
    block_size: usize,
    out_orientation: &mut [f32],
    out_coherence: &mut [f32],
) {
    for (bj, (o, c)) in out_orientation
        .iter_mut()
        .zip(out_coherence.iter_mut())
        .enumerate()
    {
        let t = StructureTensor::accumulate(grad, bi, bj, block_size);
        *o = t.orientation();
        *c = t.coherence();
    }
}

/// Estimate the block orientation field from image gradients.
///
/// A `block_size` of zero, or one larger than either image dimension, yields
/// an empty field.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(grad), fields(rows = grad.gx.rows, cols = grad.gx.cols))
)]
pub fn compute_orientation_field(grad: &GradientPair, block_size: usize) -> BlockField {
    let (blocks_h, blocks_w) = if block_size == 0 {
        (0, 0)
    } else {
        (grad.gx.rows / block_size, grad.gx.cols / block_size)
    };

    let mut orientation = Grid::filled(blocks_h, blocks_w, 0.0f32);
    let mut coherence = Grid::filled(blocks_h, blocks_w, 0.0f32);
    if blocks_h == 0 || blocks_w == 0 {
        warn!(
            "block_size {block_size} leaves no complete tile in a {}x{} image",
            grad.gx.cols, grad.gx.rows
        );
        return BlockField {
            block_size,
            orientation,
            coherence,
        };
    }

    #[cfg(feature = "rayon")]
    orientation
        .data
        .par_chunks_mut(blocks_w)
        .zip(coherence.data.par_chunks_mut(blocks_w))
        .enumerate()
        .for_each(|(bi, (ro, rc))| block_row(grad, bi, block_size, ro, rc));

    #[cfg(not(feature = "rayon"))]
    orientation
        .data
        .chunks_mut(blocks_w)
        .zip(coherence.data.chunks_mut(blocks_w))
        .enumerate()
        .for_each(|(bi, (ro, rc))| block_row(grad, bi, block_size, ro, rc));

    BlockField {
        block_size,
        orientation,
        coherence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute_gradients;
    use approx::assert_relative_eq;
    use ridgepoint_core::GrayImage;
    use std::f32::consts::FRAC_PI_2;

    fn stripes(width: usize, height: usize, vertical: bool) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let t = (if vertical { x } else { y }) as f32;
            (127.5 + 100.0 * (t * std::f32::consts::TAU / 8.0).sin()) as u8
        })
    }

    #[test]
    fn flat_tiles_have_zero_coherence() {
        let img = GrayImage::filled(64, 48, 77);
        let field = compute_orientation_field(&compute_gradients(&img.view()).unwrap(), 16);
        assert_eq!(field.orientation.shape(), (3, 4));
        assert!(field.coherence.data.iter().all(|&c| c < 1e-6));
    }

    #[test]
    fn partial_tiles_are_dropped() {
        let img = GrayImage::filled(50, 33, 0);
        let field = compute_orientation_field(&compute_gradients(&img.view()).unwrap(), 16);
        assert_eq!(field.coherence.shape(), (2, 3));
    }

    #[test]
    fn oversized_block_gives_empty_field() {
        let img = GrayImage::filled(10, 40, 0);
        let field = compute_orientation_field(&compute_gradients(&img.view()).unwrap(), 16);
        assert!(field.is_empty());
    }

    #[test]
    fn vertical_stripes_are_coherent_with_horizontal_gradient() {
        let img = stripes(64, 64, true);
        let field = compute_orientation_field(&compute_gradients(&img.view()).unwrap(), 16);
        for (&o, &c) in field.orientation.data.iter().zip(field.coherence.data.iter()) {
            assert!(c > 0.95, "coherence {c}");
            assert_relative_eq!(o, 0.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn horizontal_stripes_point_along_y() {
        let img = stripes(64, 64, false);
        let field = compute_orientation_field(&compute_gradients(&img.view()).unwrap(), 16);
        for &o in &field.orientation.data {
            assert_relative_eq!(o.abs(), FRAC_PI_2, epsilon = 1e-3);
            assert!(o > -FRAC_PI_2);
        }
    }
}
