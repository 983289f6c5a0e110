use crate::Grid;
use serde::{Deserialize, Serialize};

/// Errors raised when a pixel buffer cannot be read as a 2-D intensity matrix.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("image has zero area (width={width}, height={height})")]
    Empty { width: usize, height: usize },
    #[error("invalid grayscale buffer length (expected {expected} bytes, got {got})")]
    BufferSize { expected: usize, got: usize },
}

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

impl<'a> GrayImageView<'a> {
    /// Wrap a row-major 8-bit buffer, checking that it describes a non-empty image.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, ImageError> {
        let view = Self {
            width,
            height,
            data,
        };
        view.validate()?;
        Ok(view)
    }

    /// Check the `H, W > 0` and `len == W*H` invariants.
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.width == 0 || self.height == 0 {
            return Err(ImageError::Empty {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self
            .width
            .checked_mul(self.height)
            .ok_or(ImageError::Empty {
                width: self.width,
                height: self.height,
            })?;
        if self.data.len() != expected {
            return Err(ImageError::BufferSize {
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Intensities as a `height x width` float grid.
    pub fn to_grid(&self) -> Grid<f32> {
        Grid {
            rows: self.height,
            cols: self.width,
            data: self.data.iter().map(|&v| v as f32).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    /// Image filled with a constant intensity.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Round and saturate a float grid back into 8-bit intensities.
    pub fn from_grid_rounded(grid: &Grid<f32>) -> Self {
        Self {
            width: grid.cols,
            height: grid.rows,
            data: grid
                .data
                .iter()
                .map(|&v| v.round().clamp(0.0, 255.0) as u8)
                .collect(),
        }
    }

    #[inline]
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}
