use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Parameters for one synthetic match run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub total_frames: u64,
    pub fps: f64,
    pub seed: u64,
    /// Wall-clock delay between simulated frames while serving.
    pub step_ms: u64,
    /// Directory holding frame/heatmap images to serve; streams 404
    /// without it, which the dashboard tolerates.
    pub assets_dir: Option<PathBuf>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            total_frames: 600,
            fps: 30.0,
            seed: 7,
            step_ms: 33,
            assets_dir: None,
        }
    }
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario config {}", path_ref.display()))?;
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(total_frames: u64, fps: f64, seed: u64, assets_dir: Option<PathBuf>) -> Self {
        Self {
            total_frames: total_frames.max(1),
            fps: if fps > 0.0 { fps } else { 30.0 },
            seed,
            assets_dir,
            ..Default::default()
        }
    }
}
