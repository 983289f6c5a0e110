//! JSON configuration and report helpers for singular-point detection runs.

use crate::DetectSource;
use ridgepoint_enhance::EnhanceParams;
use ridgepoint_singular::{DetectionResult, SingularParams, SingularPoint};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum RidgeIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Configuration for one detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeDetectConfig {
    pub image_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    /// Run the enhancement pipeline first and detect on its output.
    #[serde(default)]
    pub enhance: bool,
    /// Where to write the binarized image, if anywhere.
    #[serde(default)]
    pub enhanced_path: Option<String>,
    #[serde(default)]
    pub singular: SingularParams,
    #[serde(default)]
    pub enhance_params: EnhanceParams,
}

impl RidgeDetectConfig {
    /// Config for `image_path` with every parameter at its default.
    pub fn for_image(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            output_path: None,
            enhance: false,
            enhanced_path: None,
            singular: SingularParams::default(),
            enhance_params: EnhanceParams::default(),
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, RidgeIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), RidgeIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ridgepoint_report.json"))
    }

    pub fn source(&self) -> DetectSource {
        DetectSource::from_enhance_flag(self.enhance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeDetectReport {
    pub image_path: String,
    pub config_path: String,
    pub source: DetectSource,
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub deltas: Vec<SingularPoint>,
    #[serde(default)]
    pub cores: Vec<SingularPoint>,
    #[serde(default)]
    pub enhanced_path: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RidgeDetectReport {
    /// Base report for a config; no points, no error.
    pub fn new(cfg: &RidgeDetectConfig, config_path: &Path) -> Self {
        Self {
            image_path: cfg.image_path.clone(),
            config_path: config_path.to_string_lossy().into_owned(),
            source: cfg.source(),
            width: 0,
            height: 0,
            deltas: Vec::new(),
            cores: Vec::new(),
            enhanced_path: None,
            error: None,
        }
    }

    /// Populate report fields from a successful detection.
    pub fn set_result(&mut self, res: DetectionResult) {
        self.width = res.width;
        self.height = res.height;
        self.deltas = res.deltas;
        self.cores = res.cores;
        self.error = None;
    }

    /// Record a failure.
    pub fn set_error(&mut self, err: impl std::fmt::Display) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, RidgeIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), RidgeIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg: RidgeDetectConfig =
            serde_json::from_str(r#"{ "image_path": "finger.png" }"#).unwrap();
        assert_eq!(cfg, RidgeDetectConfig::for_image("finger.png"));
        assert_eq!(cfg.output_path(), PathBuf::from("ridgepoint_report.json"));
        assert_eq!(cfg.source(), DetectSource::Raw);
    }

    #[test]
    fn nested_overrides_are_read() {
        let cfg: RidgeDetectConfig = serde_json::from_str(
            r#"{
                "image_path": "a.png",
                "enhance": true,
                "singular": { "block_size": 8 },
                "enhance_params": { "clahe": { "clip_limit": 3.0 } }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.source(), DetectSource::Enhanced);
        assert_eq!(cfg.singular.block_size, 8);
        assert_eq!(cfg.singular.margin, 4);
        assert_eq!(cfg.enhance_params.clahe.clip_limit, 3.0);
        assert_eq!(cfg.enhance_params.clahe.tiles_x, 8);
    }

    #[test]
    fn report_records_result_then_error() {
        let cfg = RidgeDetectConfig::for_image("a.png");
        let mut report = RidgeDetectReport::new(&cfg, Path::new("cfg.json"));
        report.set_result(DetectionResult::empty(320, 240));
        assert_eq!((report.width, report.height), (320, 240));
        assert!(report.error.is_none());

        report.set_error("decode failed");
        let json = serde_json::to_string(&report).unwrap();
        let back: RidgeDetectReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.error.as_deref(), Some("decode failed"));
        assert_eq!(back.config_path, "cfg.json");
        assert_eq!(back.source, DetectSource::Raw);
    }
}
