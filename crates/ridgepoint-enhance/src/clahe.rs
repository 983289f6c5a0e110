//! Contrast-limited adaptive histogram equalization.
//!
//! The image is split into a `tiles_x x tiles_y` grid (padded on the right and
//! bottom with a reflect-101 border when it does not divide evenly). Each
//! tile gets its own clipped-histogram lookup table, and every pixel is mapped
//! through a bilinear blend of the four nearest tile tables.
use crate::ClaheParams;
use ridgepoint_core::{border_index, BorderMode, GrayImage, GrayImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

const BINS: usize = 256;

struct TileGrid {
    tiles_x: usize,
    tiles_y: usize,
    tile_w: usize,
    tile_h: usize,
}

impl TileGrid {
    fn new(width: usize, height: usize, tiles_x: usize, tiles_y: usize) -> Self {
        let (pad_x, pad_y) = if width % tiles_x == 0 && height % tiles_y == 0 {
            (0, 0)
        } else {
            (tiles_x - width % tiles_x, tiles_y - height % tiles_y)
        };
        Self {
            tiles_x,
            tiles_y,
            tile_w: (width + pad_x) / tiles_x,
            tile_h: (height + pad_y) / tiles_y,
        }
    }

    fn area(&self) -> usize {
        self.tile_w * self.tile_h
    }
}

/// Clip every bin at `limit` and spread the excess evenly, handing the
/// remainder out one count at a time from the low end.
fn clip_histogram(hist: &mut [u32; BINS], limit: u32) {
    let mut clipped = 0u32;
    for h in hist.iter_mut() {
        if *h > limit {
            clipped += *h - limit;
            *h = limit;
        }
    }

    let batch = clipped / BINS as u32;
    let mut residual = clipped as usize - batch as usize * BINS;
    for h in hist.iter_mut() {
        *h += batch;
    }
    if residual > 0 {
        let step = (BINS / residual).max(1);
        let mut i = 0;
        while i < BINS && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

fn tile_lut(img: &GrayImageView<'_>, grid: &TileGrid, tx: usize, ty: usize, clip: u32) -> [u8; BINS] {
    let mut hist = [0u32; BINS];
    for y in ty * grid.tile_h..(ty + 1) * grid.tile_h {
        let sy = border_index(y as isize, img.height, BorderMode::Reflect101);
        let row = img.row(sy);
        for x in tx * grid.tile_w..(tx + 1) * grid.tile_w {
            let sx = border_index(x as isize, img.width, BorderMode::Reflect101);
            hist[row[sx] as usize] += 1;
        }
    }
    if clip > 0 {
        clip_histogram(&mut hist, clip);
    }

    let scale = (BINS - 1) as f32 / grid.area() as f32;
    let mut lut = [0u8; BINS];
    let mut sum = 0u32;
    for (l, &h) in lut.iter_mut().zip(hist.iter()) {
        sum += h;
        *l = (sum as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Neighbouring tile indices and the weight of the second one, per pixel
/// coordinate along one axis.
fn axis_weights(len: usize, tile: usize, tiles: usize) -> Vec<(usize, usize, f32)> {
    let inv = 1.0 / tile as f32;
    (0..len)
        .map(|p| {
            let f = p as f32 * inv - 0.5;
            let t1 = f.floor();
            let a = f - t1;
            let t1 = t1 as isize;
            let lo = t1.max(0) as usize;
            let hi = ((t1 + 1) as usize).min(tiles - 1);
            (lo, hi, a)
        })
        .collect()
}

/// Apply CLAHE. `params` must describe a non-empty tile grid.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(img)))]
pub fn clahe(img: &GrayImageView<'_>, params: &ClaheParams) -> GrayImage {
    let (w, h) = (img.width, img.height);
    let grid = TileGrid::new(w, h, params.tiles_x.max(1), params.tiles_y.max(1));

    let clip = if params.clip_limit > 0.0 {
        ((params.clip_limit * grid.area() as f32 / BINS as f32) as u32).max(1)
    } else {
        0
    };

    let mut luts = Vec::with_capacity(grid.tiles_x * grid.tiles_y);
    for ty in 0..grid.tiles_y {
        for tx in 0..grid.tiles_x {
            luts.push(tile_lut(img, &grid, tx, ty, clip));
        }
    }
    let lut = |tx: usize, ty: usize| &luts[ty * grid.tiles_x + tx];

    let xs = axis_weights(w, grid.tile_w, grid.tiles_x);
    let ys = axis_weights(h, grid.tile_h, grid.tiles_y);

    let mut out = GrayImage::filled(w, h, 0);
    for (y, &(ty1, ty2, ya)) in ys.iter().enumerate() {
        let src = img.row(y);
        let dst = &mut out.data[y * w..(y + 1) * w];
        for (x, &(tx1, tx2, xa)) in xs.iter().enumerate() {
            let v = src[x] as usize;
            let top = lut(tx1, ty1)[v] as f32 * (1.0 - xa) + lut(tx2, ty1)[v] as f32 * xa;
            let bottom = lut(tx1, ty2)[v] as f32 * (1.0 - xa) + lut(tx2, ty2)[v] as f32 * xa;
            dst[x] = (top * (1.0 - ya) + bottom * ya).round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_image_stays_constant() {
        let img = GrayImage::filled(64, 48, 90);
        let out = clahe(&img.view(), &ClaheParams::default());
        let first = out.data[0];
        assert!(out.data.iter().all(|&v| v == first));
    }

    #[test]
    fn odd_sizes_and_tiny_images_keep_dimensions() {
        let img = GrayImage::from_fn(37, 23, |x, y| ((x * 7 + y * 3) % 256) as u8);
        let out = clahe(&img.view(), &ClaheParams::default());
        assert_eq!((out.width, out.height), (37, 23));

        let tiny = GrayImage::from_fn(5, 3, |x, _| (x * 40) as u8);
        let out = clahe(&tiny.view(), &ClaheParams::default());
        assert_eq!(out.data.len(), 15);
    }

    #[test]
    fn unclipped_single_tile_is_global_equalization() {
        // 16 levels of equal population: 100..=115.
        let img = GrayImage::from_fn(64, 64, |x, _| 100 + (x / 4) as u8);
        let params = ClaheParams {
            clip_limit: 0.0,
            tiles_x: 1,
            tiles_y: 1,
        };
        let out = clahe(&img.view(), &params);
        let min = *out.data.iter().min().unwrap();
        let max = *out.data.iter().max().unwrap();
        // 256 of 4096 pixels at the lowest level -> 255 / 16.
        assert_eq!(min, 16);
        assert_eq!(max, 255);
    }

    #[test]
    fn clipping_conserves_histogram_mass() {
        let mut hist = [0u32; BINS];
        hist[10] = 500;
        hist[20] = 30;
        clip_histogram(&mut hist, 8);
        assert_eq!(hist.iter().sum::<u32>(), 530);
        assert!(hist.iter().all(|&h| h <= 8 + 3));
    }
}
