use crate::classify::find_candidates;
use crate::dedup::deduplicate;
use crate::refine::refine_candidate;
use crate::{
    compute_gradients, compute_orientation_field, compute_poincare_map, smooth_orientation,
    BlockField, DetectionDebug, DetectionResult, SingularDetectError, SingularKind, SingularParams,
};
use log::debug;
use ridgepoint_core::GrayImageView;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Fingerprint core/delta detector.
///
/// Holds only validated parameters; every call to [`detect`](Self::detect)
/// is an independent, deterministic pass over the input image.
#[derive(Clone, Debug)]
pub struct SingularPointDetector {
    params: SingularParams,
}

impl SingularPointDetector {
    /// Create a detector, rejecting unusable parameters.
    pub fn new(params: SingularParams) -> Result<Self, SingularDetectError> {
        params.validate()?;
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &SingularParams {
        &self.params
    }

    /// Detect cores and deltas.
    ///
    /// Returns `InvalidImage` for an empty or malformed buffer; an image
    /// without singular points gives an empty result.
    pub fn detect(&self, image: &GrayImageView<'_>) -> Result<DetectionResult, SingularDetectError> {
        self.detect_with_debug(image).map(|(result, _)| result)
    }

    /// Same as [`detect`](Self::detect), also returning the intermediate
    /// block field, smoothed orientation and Poincaré map.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, image),
            fields(width = image.width, height = image.height, block_size = self.params.block_size)
        )
    )]
    pub fn detect_with_debug(
        &self,
        image: &GrayImageView<'_>,
    ) -> Result<(DetectionResult, DetectionDebug), SingularDetectError> {
        let gradients = compute_gradients(image)?;
        let field = compute_orientation_field(&gradients, self.params.block_size);
        Ok(self.detect_in_field(field, image.width, image.height))
    }

    /// Run smoothing, Poincaré, classification, refinement and deduplication
    /// on an already estimated block field.
    ///
    /// `width` and `height` are only echoed into the result.
    ///
    /// # Panics
    ///
    /// Panics if the field's orientation and coherence grids differ in shape.
    pub fn detect_in_field(
        &self,
        field: BlockField,
        width: usize,
        height: usize,
    ) -> (DetectionResult, DetectionDebug) {
        let p = &self.params;
        let smoothed = smooth_orientation(&field.orientation, p.orientation_smoothing_sigma);
        let poincare = compute_poincare_map(&smoothed, &field.coherence, p.min_coherence);
        debug!(
            "{}x{} blocks, {} cells with a Poincaré index",
            field.orientation.rows,
            field.orientation.cols,
            poincare.populated()
        );

        let candidates = find_candidates(&poincare, &field.coherence, p);
        let (mut deltas, mut cores) = (Vec::new(), Vec::new());
        for cand in &candidates {
            let point = refine_candidate(&poincare, cand, p.refine_radius, field.block_size);
            match point.kind {
                SingularKind::Delta => deltas.push(point),
                SingularKind::Core => cores.push(point),
            }
        }

        let deltas = deduplicate(deltas, p.dedup_min_distance);
        let cores = deduplicate(cores, p.dedup_min_distance);
        debug!("kept {} deltas, {} cores", deltas.len(), cores.len());

        let result = DetectionResult {
            deltas,
            cores,
            width,
            height,
        };
        let dbg = DetectionDebug {
            field,
            smoothed_orientation: smoothed,
            poincare,
        };
        (result, dbg)
    }
}

/// One-shot detection with the given parameters.
pub fn detect_singular_points(
    image: &GrayImageView<'_>,
    params: &SingularParams,
) -> Result<DetectionResult, SingularDetectError> {
    SingularPointDetector::new(params.clone())?.detect(image)
}
