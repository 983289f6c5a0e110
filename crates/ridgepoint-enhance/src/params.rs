use crate::EnhanceError;
use serde::{Deserialize, Serialize};

/// Denoising blur applied before contrast equalization.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussianBlurParams {
    /// Odd kernel size.
    pub ksize: usize,
    /// Standard deviation; `<= 0` derives it from `ksize`.
    pub sigma: f32,
}

impl Default for GaussianBlurParams {
    fn default() -> Self {
        Self {
            ksize: 5,
            sigma: 0.0,
        }
    }
}

/// Contrast-limited adaptive histogram equalization.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaheParams {
    /// Histogram clip limit relative to a flat histogram; `<= 0` disables
    /// clipping (plain tiled equalization).
    pub clip_limit: f32,
    pub tiles_x: usize,
    pub tiles_y: usize,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tiles_x: 8,
            tiles_y: 8,
        }
    }
}

/// How the per-orientation filter responses are merged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GaborCombine {
    /// Per-pixel maximum over orientations, floored at zero.
    #[default]
    Max,
    /// Per-pixel mean over orientations.
    Mean,
}

/// Oriented Gabor filter bank. Orientations are spread evenly over [0, π).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaborBankParams {
    pub num_orientations: usize,
    /// Odd kernel size.
    pub ksize: usize,
    /// Gaussian envelope sigma along the wave direction.
    pub sigma: f32,
    /// Wavelength of the sinusoid, in pixels.
    pub lambda: f32,
    /// Spatial aspect ratio; the envelope sigma across the wave is `sigma / gamma`.
    pub gamma: f32,
    /// Phase offset.
    pub psi: f32,
    pub combine: GaborCombine,
}

impl Default for GaborBankParams {
    fn default() -> Self {
        Self {
            num_orientations: 8,
            ksize: 15,
            sigma: 4.0,
            lambda: 10.0,
            gamma: 0.5,
            psi: 0.0,
            combine: GaborCombine::Max,
        }
    }
}

/// Full enhancement configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceParams {
    pub blur: GaussianBlurParams,
    pub clahe: ClaheParams,
    pub gabor: GaborBankParams,
}

impl EnhanceParams {
    pub fn validate(&self) -> Result<(), EnhanceError> {
        let invalid = |msg: String| Err(EnhanceError::InvalidParams(msg));

        if self.blur.ksize == 0 || self.blur.ksize % 2 == 0 {
            return invalid(format!("blur.ksize must be odd (got {})", self.blur.ksize));
        }
        if !self.blur.sigma.is_finite() {
            return invalid(format!("blur.sigma must be finite (got {})", self.blur.sigma));
        }
        if self.clahe.tiles_x == 0 || self.clahe.tiles_y == 0 {
            return invalid(format!(
                "clahe tile grid must be non-empty (got {}x{})",
                self.clahe.tiles_x, self.clahe.tiles_y
            ));
        }
        if !self.clahe.clip_limit.is_finite() {
            return invalid(format!(
                "clahe.clip_limit must be finite (got {})",
                self.clahe.clip_limit
            ));
        }

        let g = &self.gabor;
        if g.num_orientations == 0 {
            return invalid("gabor.num_orientations must be positive".into());
        }
        if g.ksize == 0 || g.ksize % 2 == 0 {
            return invalid(format!("gabor.ksize must be odd (got {})", g.ksize));
        }
        for (name, value) in [("sigma", g.sigma), ("lambda", g.lambda), ("gamma", g.gamma)] {
            if !value.is_finite() || value <= 0.0 {
                return invalid(format!("gabor.{name} must be finite and > 0 (got {value})"));
            }
        }
        if !g.psi.is_finite() {
            return invalid(format!("gabor.psi must be finite (got {})", g.psi));
        }
        Ok(())
    }
}
