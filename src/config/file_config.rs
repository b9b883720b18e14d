use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// On-disk TOML configuration. Every field is optional; missing values fall
/// back to the defaults in [`super::AppConfig`].
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub log_dir: Option<String>,

    pub playback: Option<PlaybackConfig>,
    pub analysis: Option<AnalysisConfig>,
    pub visual: Option<VisualConfig>,
    pub ui: Option<UiConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct PlaybackConfig {
    pub initial_volume: Option<f64>,
    pub volume_step: Option<f64>,
    pub seek_step_secs: Option<f64>,
    pub skip_secs: Option<f64>,
    pub time_update_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    pub tick_ms: Option<u64>,
    pub settle_ms: Option<u64>,
    pub min_increment: Option<f64>,
    pub max_increment: Option<f64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct VisualConfig {
    pub waveform_bars: Option<usize>,
    pub circle_count: Option<usize>,
    pub waveform_load_delay_ms: Option<u64>,
    pub frame_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct UiConfig {
    pub notification_secs: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
