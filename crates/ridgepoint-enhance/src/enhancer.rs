use crate::{
    apply_gabor_bank, clahe, gaussian_blur, normalize_min_max, otsu_binarize, EnhanceError,
    EnhanceParams,
};
use log::debug;
use ridgepoint_core::{GrayImage, GrayImageView, Grid};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Every intermediate image of one enhancement run.
#[derive(Clone, Debug)]
pub struct EnhanceStages {
    pub blurred: GrayImage,
    pub equalized: GrayImage,
    /// Merged filter-bank response, before normalization.
    pub gabor_response: Grid<f32>,
    pub normalized: GrayImage,
    pub binary: GrayImage,
    pub otsu_threshold: u8,
}

/// Blur, equalize, Gabor-filter, normalize and binarize a ridge image.
#[derive(Clone, Debug)]
pub struct RidgeEnhancer {
    params: EnhanceParams,
}

impl RidgeEnhancer {
    pub fn new(params: EnhanceParams) -> Result<Self, EnhanceError> {
        params.validate()?;
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &EnhanceParams {
        &self.params
    }

    /// Binarized ridge map (values 0 and 255), same size as the input.
    pub fn enhance(&self, img: &GrayImageView<'_>) -> Result<GrayImage, EnhanceError> {
        self.enhance_with_stages(img).map(|s| s.binary)
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, img), fields(width = img.width, height = img.height))
    )]
    pub fn enhance_with_stages(&self, img: &GrayImageView<'_>) -> Result<EnhanceStages, EnhanceError> {
        img.validate()?;
        let p = &self.params;

        let blurred = gaussian_blur(img, &p.blur);
        let equalized = clahe(&blurred.view(), &p.clahe);
        let gabor_response = apply_gabor_bank(&equalized.view().to_grid(), &p.gabor);
        let normalized = normalize_min_max(&gabor_response);
        let (binary, otsu_threshold) = otsu_binarize(&normalized.view());
        debug!(
            "enhanced {}x{} image, otsu threshold {}",
            img.width, img.height, otsu_threshold
        );

        Ok(EnhanceStages {
            blurred,
            equalized,
            gabor_response,
            normalized,
            binary,
            otsu_threshold,
        })
    }
}

/// One-shot enhancement with the given parameters.
pub fn enhance_ridges(img: &GrayImageView<'_>, params: &EnhanceParams) -> Result<GrayImage, EnhanceError> {
    RidgeEnhancer::new(*params)?.enhance(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GaborCombine;

    #[test]
    fn empty_image_is_rejected() {
        let view = GrayImageView {
            width: 0,
            height: 4,
            data: &[],
        };
        let err = enhance_ridges(&view, &EnhanceParams::default()).unwrap_err();
        assert!(matches!(err, EnhanceError::InvalidImage(_)));
    }

    #[test]
    fn uniform_image_binarizes_to_black() {
        let img = GrayImage::filled(48, 40, 128);
        let stages = RidgeEnhancer::new(EnhanceParams::default())
            .unwrap()
            .enhance_with_stages(&img.view())
            .unwrap();
        assert!(stages.normalized.data.iter().all(|&v| v == 0));
        assert!(stages.binary.data.iter().all(|&v| v == 0));
    }

    #[test]
    fn mean_combine_runs_end_to_end() {
        let mut params = EnhanceParams::default();
        params.gabor.combine = GaborCombine::Mean;
        let img = GrayImage::from_fn(40, 40, |x, y| ((x / 5 + y / 5) % 2 * 200 + 20) as u8);
        let out = enhance_ridges(&img.view(), &params).unwrap();
        assert_eq!((out.width, out.height), (40, 40));
        assert!(out.data.iter().all(|&v| v == 0 || v == 255));
    }
}
