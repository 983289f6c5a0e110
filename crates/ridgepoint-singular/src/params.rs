use crate::SingularDetectError;
use serde::{Deserialize, Serialize};

/// Open interval `(min, max)` of accepted Poincaré index values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexBand {
    pub min: f32,
    pub max: f32,
}

impl IndexBand {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Strict containment; the band edges themselves are rejected.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        self.min < value && value < self.max
    }

    #[inline]
    pub fn overlaps(&self, other: &IndexBand) -> bool {
        self.min < other.max && other.min < self.max
    }
}

/// Configuration for [`crate::SingularPointDetector`].
///
/// When `delta_band` and `core_band` overlap, a cell inside both is only
/// evaluated as a delta.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingularParams {
    /// Tile size in pixels for the orientation, coherence and Poincaré grids.
    pub block_size: usize,
    /// Coherence floor below which no Poincaré index is computed.
    pub min_coherence: f32,
    /// Gaussian sigma (in blocks) for doubled-angle orientation smoothing.
    pub orientation_smoothing_sigma: f32,
    pub delta_band: IndexBand,
    pub core_band: IndexBand,
    pub min_coherence_delta: f32,
    pub min_coherence_core: f32,
    /// Blocks of border clearance before a cell is scanned.
    pub margin: usize,
    /// Fraction of the neighbourhood maximum a cell must reach.
    pub local_threshold: f32,
    /// Half-size of the square neighbourhood used by the extremum and
    /// coherence checks (2 = 5x5).
    pub neighborhood_radius: usize,
    pub min_avg_coherence_delta: f32,
    pub min_avg_coherence_core: f32,
    /// A neighbourhood cell supports a core when its coherence exceeds this.
    pub core_support_coherence: f32,
    /// Minimum number of supporting cells around a core.
    pub min_core_support: usize,
    /// Half-size of the window searched when refining a candidate position.
    pub refine_radius: usize,
    /// Minimum pixel distance between two kept points of the same kind.
    pub dedup_min_distance: f32,
}

impl Default for SingularParams {
    fn default() -> Self {
        Self {
            block_size: 16,
            min_coherence: 0.5,
            orientation_smoothing_sigma: 1.5,
            delta_band: IndexBand::new(-0.55, -0.45),
            core_band: IndexBand::new(0.45, 0.55),
            min_coherence_delta: 0.65,
            min_coherence_core: 0.75,
            margin: 4,
            local_threshold: 0.98,
            neighborhood_radius: 2,
            min_avg_coherence_delta: 0.55,
            min_avg_coherence_core: 0.70,
            core_support_coherence: 0.65,
            min_core_support: 15,
            refine_radius: 2,
            dedup_min_distance: 50.0,
        }
    }
}

impl SingularParams {
    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), SingularDetectError> {
        let invalid = |msg: String| Err(SingularDetectError::InvalidParams(msg));

        if self.block_size == 0 {
            return invalid("block_size must be positive".into());
        }
        let sigma = self.orientation_smoothing_sigma;
        if !sigma.is_finite() || sigma < 0.0 {
            return invalid(format!(
                "orientation_smoothing_sigma must be finite and >= 0 (got {sigma})"
            ));
        }
        for (name, band) in [("delta_band", self.delta_band), ("core_band", self.core_band)] {
            if !band.min.is_finite() || !band.max.is_finite() || band.min >= band.max {
                return invalid(format!(
                    "{name} must satisfy min < max (got ({}, {}))",
                    band.min, band.max
                ));
            }
        }
        let thresholds = [
            ("min_coherence", self.min_coherence),
            ("min_coherence_delta", self.min_coherence_delta),
            ("min_coherence_core", self.min_coherence_core),
            ("local_threshold", self.local_threshold),
            ("min_avg_coherence_delta", self.min_avg_coherence_delta),
            ("min_avg_coherence_core", self.min_avg_coherence_core),
            ("core_support_coherence", self.core_support_coherence),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() {
                return invalid(format!("{name} must be finite (got {value})"));
            }
        }
        if !self.dedup_min_distance.is_finite() || self.dedup_min_distance < 0.0 {
            return invalid(format!(
                "dedup_min_distance must be finite and >= 0 (got {})",
                self.dedup_min_distance
            ));
        }
        if self.delta_band.overlaps(&self.core_band) {
            log::warn!(
                "delta_band {:?} overlaps core_band {:?}; shared values classify as delta",
                self.delta_band,
                self.core_band
            );
        }
        Ok(())
    }
}
