use serde::{Deserialize, Serialize};

/// Which image the singular-point detector runs on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectSource {
    /// The decoded grayscale input.
    #[default]
    Raw,
    /// The binarized output of the enhancement pipeline.
    Enhanced,
}

impl DetectSource {
    pub fn from_enhance_flag(enhance: bool) -> Self {
        if enhance {
            Self::Enhanced
        } else {
            Self::Raw
        }
    }
}
