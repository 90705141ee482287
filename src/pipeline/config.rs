use crate::error::PipelineError;
use boxflow_layout::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Settings for a [`Pipeline`](super::Pipeline), usually loaded from a JSON file.
///
/// Every field is optional in the JSON form; missing fields take their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    pub layout: LayoutConfig,
    /// Record per-phase timings. Only has an effect when built with the `profiling` feature.
    pub profiling: bool,
}

impl PipelineConfig {
    pub fn from_json_str(source: &str) -> Result<Self, PipelineError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path_ref = path.as_ref();
        let source = fs::read_to_string(path_ref).map_err(|e| {
            PipelineError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read config from '{}': {}", path_ref.display(), e),
            ))
        })?;
        Self::from_json_str(&source)
    }

    /// Rejects values the layout passes cannot work with.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let layout = &self.layout;
        let ratio = layout.float_intersect_ratio;
        if ratio.is_nan() || ratio <= 0.0 || ratio > 1.0 {
            return Err(PipelineError::Config(format!(
                "floatIntersectRatio must be in (0, 1], got {}",
                layout.float_intersect_ratio
            )));
        }
        if layout.percent_limit.is_nan() || layout.percent_limit <= 0.0 {
            return Err(PipelineError::Config(format!(
                "percentLimit must be positive, got {}",
                layout.percent_limit
            )));
        }
        if layout.tolerance.is_nan() || layout.tolerance < 0.0 {
            return Err(PipelineError::Config(format!(
                "tolerance must not be negative, got {}",
                layout.tolerance
            )));
        }
        Ok(())
    }
}
