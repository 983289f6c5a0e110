use nalgebra::Point2;
use ridgepoint_core::Grid;
use serde::{Deserialize, Serialize};

/// Horizontal and vertical first derivatives, same shape as the source image.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientPair {
    pub gx: Grid<f32>,
    pub gy: Grid<f32>,
}

/// Per-block orientation and coherence.
///
/// Both grids are `(H / block_size) x (W / block_size)`; trailing partial
/// tiles are dropped. Orientation is in (−π/2, π/2], coherence in [0, 1].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockField {
    pub block_size: usize,
    pub orientation: Grid<f32>,
    pub coherence: Grid<f32>,
}

impl BlockField {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orientation.is_empty()
    }
}

/// Poincaré index per block, as a fraction of a full turn.
///
/// Border cells and cells below the coherence floor are `None`: they are
/// not candidates, which is different from a measured index of zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoincareMap {
    pub index: Grid<Option<f32>>,
}

impl PoincareMap {
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        *self.index.get(i, j)
    }

    /// Number of populated cells.
    pub fn populated(&self) -> usize {
        self.index.data.iter().filter(|v| v.is_some()).count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SingularKind {
    /// Net +π rotation of the ridge flow (index ≈ +0.5).
    Core,
    /// Net −π rotation, three ridge flows meeting (index ≈ −0.5).
    Delta,
}

/// Block-grid coordinates: `i` is the block row, `j` the block column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockCoords {
    pub i: usize,
    pub j: usize,
}

impl BlockCoords {
    /// Pixel at the centre of this block.
    #[inline]
    pub fn to_pixel(self, block_size: usize) -> Point2<u32> {
        let half = block_size / 2;
        Point2::new(
            (self.j * block_size + half) as u32,
            (self.i * block_size + half) as u32,
        )
    }
}

/// One detected core or delta.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SingularPoint {
    pub kind: SingularKind,
    /// Refined block position.
    pub block: BlockCoords,
    /// Pixel coordinates `(x, y)` of the refined block centre.
    pub position: Point2<u32>,
    /// Poincaré index at the cell that triggered the detection.
    pub index: f32,
    /// Coherence at the triggering cell.
    pub coherence: f32,
    /// Mean coherence over the triggering cell's neighbourhood.
    pub avg_coherence: f32,
}

impl SingularPoint {
    #[inline]
    pub fn pixel(&self) -> (u32, u32) {
        (self.position.x, self.position.y)
    }

    /// Ranking score used by deduplication: `|index| * coherence`, or the
    /// coherence alone when the index is not a finite number.
    #[inline]
    pub fn quality(&self) -> f32 {
        if self.index.is_finite() {
            self.index.abs() * self.coherence
        } else {
            self.coherence
        }
    }

    pub fn distance_to(&self, other: &SingularPoint) -> f32 {
        let a = Point2::new(self.position.x as f32, self.position.y as f32);
        let b = Point2::new(other.position.x as f32, other.position.y as f32);
        nalgebra::distance(&a, &b)
    }
}

/// Output of a detection run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub deltas: Vec<SingularPoint>,
    pub cores: Vec<SingularPoint>,
    pub width: usize,
    pub height: usize,
}

impl DetectionResult {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            deltas: Vec::new(),
            cores: Vec::new(),
            width,
            height,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty() && self.cores.is_empty()
    }

    pub fn delta_pixels(&self) -> Vec<(u32, u32)> {
        self.deltas.iter().map(SingularPoint::pixel).collect()
    }

    pub fn core_pixels(&self) -> Vec<(u32, u32)> {
        self.cores.iter().map(SingularPoint::pixel).collect()
    }
}

/// Intermediate stages of one run, for inspection.
#[derive(Clone, Debug)]
pub struct DetectionDebug {
    pub field: BlockField,
    pub smoothed_orientation: Grid<f32>,
    pub poincare: PoincareMap,
}
