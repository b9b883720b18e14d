mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "audioviz.toml";
const DEFAULT_LOG_DIR: &str = ".logs";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_dir: PathBuf,
    pub playback: PlaybackSettings,
    pub analysis: AnalysisSettings,
    pub visual: VisualSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone)]
pub struct PlaybackSettings {
    pub initial_volume: f64,
    pub volume_step: f64,
    pub seek_step_secs: f64,
    pub skip_secs: f64,
    /// Interval of the media element's time-update events
    pub time_update: Duration,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.75,
            volume_step: 0.05,
            seek_step_secs: 5.0,
            skip_secs: 10.0,
            time_update: Duration::from_millis(250),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub tick: Duration,
    pub settle: Duration,
    /// Lower bound of a progress increment, must be strictly positive
    pub min_increment: f64,
    pub max_increment: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(300),
            settle: Duration::from_millis(500),
            min_increment: 0.1,
            max_increment: 10.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VisualSettings {
    pub waveform_bars: usize,
    pub circle_count: usize,
    pub waveform_load_delay: Duration,
    pub frame: Duration,
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            waveform_bars: 60,
            circle_count: 30,
            waveform_load_delay: Duration::from_millis(1000),
            frame: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiSettings {
    pub notification_ttl: Duration,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            notification_ttl: Duration::from_secs(5),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            playback: PlaybackSettings::default(),
            analysis: AnalysisSettings::default(),
            visual: VisualSettings::default(),
            ui: UiSettings::default(),
        }
    }
}

impl AppConfig {
    /// Locate and load the optional TOML file.
    ///
    /// An explicit path must exist; the implicit `audioviz.toml` is only read
    /// when present.
    pub fn load_file(explicit: Option<&Path>) -> Result<Option<FileConfig>> {
        match explicit {
            Some(path) => Ok(Some(FileConfig::load(path)?)),
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.exists() {
                    Ok(Some(FileConfig::load(implicit)?))
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Resolve configuration from an optional TOML file over built-in defaults.
    pub fn resolve(file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let defaults = AppConfig::default();

        let log_dir = file.log_dir.map(PathBuf::from).unwrap_or(defaults.log_dir);

        let pb = file.playback.unwrap_or_default();
        let playback = PlaybackSettings {
            initial_volume: pb.initial_volume.unwrap_or(defaults.playback.initial_volume),
            volume_step: pb.volume_step.unwrap_or(defaults.playback.volume_step),
            seek_step_secs: pb.seek_step_secs.unwrap_or(defaults.playback.seek_step_secs),
            skip_secs: pb.skip_secs.unwrap_or(defaults.playback.skip_secs),
            time_update: pb
                .time_update_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.playback.time_update),
        };
        let playback_values = [
            playback.initial_volume,
            playback.volume_step,
            playback.seek_step_secs,
            playback.skip_secs,
        ];
        if playback_values.iter().any(|v| !v.is_finite()) {
            bail!("playback values must be finite numbers");
        }
        if !(0.0..=1.0).contains(&playback.initial_volume) {
            bail!("playback.initial_volume must be within [0, 1], got {}", playback.initial_volume);
        }
        if playback.volume_step <= 0.0 || playback.seek_step_secs <= 0.0 || playback.skip_secs <= 0.0 {
            bail!("playback step sizes must be positive");
        }

        let an = file.analysis.unwrap_or_default();
        let analysis = AnalysisSettings {
            tick: an.tick_ms.map(Duration::from_millis).unwrap_or(defaults.analysis.tick),
            settle: an.settle_ms.map(Duration::from_millis).unwrap_or(defaults.analysis.settle),
            min_increment: an.min_increment.unwrap_or(defaults.analysis.min_increment),
            max_increment: an.max_increment.unwrap_or(defaults.analysis.max_increment),
        };
        if !analysis.min_increment.is_finite() || !analysis.max_increment.is_finite() {
            bail!(
                "analysis increments must be finite, got min {} max {}",
                analysis.min_increment,
                analysis.max_increment
            );
        }
        // A zero increment would let the progress bar stall forever
        if analysis.min_increment <= 0.0 {
            bail!("analysis.min_increment must be strictly positive, got {}", analysis.min_increment);
        }
        if analysis.max_increment <= analysis.min_increment {
            bail!(
                "analysis.max_increment ({}) must exceed analysis.min_increment ({})",
                analysis.max_increment,
                analysis.min_increment
            );
        }
        if analysis.tick.is_zero() {
            bail!("analysis.tick_ms must be positive");
        }

        let vi = file.visual.unwrap_or_default();
        let visual = VisualSettings {
            waveform_bars: vi.waveform_bars.unwrap_or(defaults.visual.waveform_bars),
            circle_count: vi.circle_count.unwrap_or(defaults.visual.circle_count),
            waveform_load_delay: vi
                .waveform_load_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.visual.waveform_load_delay),
            frame: vi.frame_ms.map(Duration::from_millis).unwrap_or(defaults.visual.frame),
        };
        if visual.waveform_bars == 0 || visual.circle_count == 0 {
            bail!("visual.waveform_bars and visual.circle_count must be positive");
        }
        if visual.frame.is_zero() || playback.time_update.is_zero() {
            bail!("timer intervals must be positive");
        }

        let ui = UiSettings {
            notification_ttl: file
                .ui
                .and_then(|u| u.notification_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.ui.notification_ttl),
        };

        Ok(Self {
            log_dir,
            playback,
            analysis,
            visual,
            ui,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_without_file_uses_defaults() {
        let config = AppConfig::resolve(None).unwrap();
        assert_eq!(config.playback.initial_volume, 0.75);
        assert_eq!(config.analysis.tick, Duration::from_millis(300));
        assert_eq!(config.analysis.settle, Duration::from_millis(500));
        assert_eq!(config.visual.waveform_bars, 60);
        assert_eq!(config.visual.circle_count, 30);
        assert_eq!(config.ui.notification_ttl, Duration::from_secs(5));
    }

    #[test]
    fn test_file_values_override_defaults() {
        let file = FileConfig::parse(
            r#"
            log_dir = "/tmp/audioviz-logs"

            [analysis]
            tick_ms = 50
            max_increment = 25.0

            [visual]
            waveform_bars = 32
            "#,
        )
        .unwrap();

        let config = AppConfig::resolve(Some(file)).unwrap();
        assert_eq!(config.log_dir, PathBuf::from("/tmp/audioviz-logs"));
        assert_eq!(config.analysis.tick, Duration::from_millis(50));
        assert_eq!(config.analysis.max_increment, 25.0);
        assert_eq!(config.analysis.min_increment, 0.1);
        assert_eq!(config.visual.waveform_bars, 32);
        assert_eq!(config.visual.circle_count, 30);
    }

    #[test]
    fn test_zero_min_increment_is_rejected() {
        let file = FileConfig::parse("[analysis]\nmin_increment = 0.0\n").unwrap();
        assert!(AppConfig::resolve(Some(file)).is_err());
    }

    #[test]
    fn test_non_finite_increments_are_rejected() {
        for toml in [
            "[analysis]\nmin_increment = nan\n",
            "[analysis]\nmax_increment = nan\n",
            "[analysis]\nmax_increment = inf\n",
        ] {
            let file = FileConfig::parse(toml).unwrap();
            assert!(AppConfig::resolve(Some(file)).is_err(), "accepted {toml:?}");
        }
    }

    #[test]
    fn test_non_finite_playback_values_are_rejected() {
        for toml in [
            "[playback]\ninitial_volume = nan\n",
            "[playback]\nvolume_step = nan\n",
            "[playback]\nseek_step_secs = inf\n",
            "[playback]\nskip_secs = nan\n",
        ] {
            let file = FileConfig::parse(toml).unwrap();
            assert!(AppConfig::resolve(Some(file)).is_err(), "accepted {toml:?}");
        }
    }

    #[test]
    fn test_out_of_range_volume_is_rejected() {
        let file = FileConfig::parse("[playback]\ninitial_volume = 1.5\n").unwrap();
        assert!(AppConfig::resolve(Some(file)).is_err());
    }

    #[test]
    fn test_unknown_syntax_fails_to_parse() {
        assert!(FileConfig::parse("[analysis\ntick_ms = 1").is_err());
    }

    #[test]
    fn test_load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audioviz.toml");
        std::fs::write(&path, "[ui]\nnotification_secs = 9\n").unwrap();

        let file = AppConfig::load_file(Some(&path)).unwrap();
        let config = AppConfig::resolve(file).unwrap();
        assert_eq!(config.ui.notification_ttl, Duration::from_secs(9));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(AppConfig::load_file(Some(&path)).is_err());
    }
}
