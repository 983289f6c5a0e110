use serde::{Deserialize, Serialize};

/// Dense row-major matrix indexed by `(i, j)` = (row, column).
///
/// Used for per-pixel gradient planes as well as per-block fields. A grid
/// with zero rows or columns is valid and simply has no cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid by evaluating `f(i, j)` in row-major order.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[i * self.cols + j]
    }

    #[inline]
    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut T {
        &mut self.data[i * self.cols + j]
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Element-wise transform into a grid of the same shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Iterate `((i, j), value)` over the square window of `radius` around
    /// `(i, j)`, clipped to the grid bounds.
    pub fn window(
        &self,
        i: usize,
        j: usize,
        radius: usize,
    ) -> impl Iterator<Item = ((usize, usize), &T)> + '_ {
        let i0 = i.saturating_sub(radius);
        let i1 = (i + radius + 1).min(self.rows);
        let j0 = j.saturating_sub(radius);
        let j1 = (j + radius + 1).min(self.cols);
        (i0..i1).flat_map(move |ii| (j0..j1).map(move |jj| ((ii, jj), self.get(ii, jj))))
    }
}
