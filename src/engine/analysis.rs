//! Feature extraction strategy behind the Analyze action

use chrono::Local;
use rand::Rng;
use thiserror::Error;

use crate::config::AnalysisSettings;
use crate::model::{AnalysisResult, AudioResource};

const GENRES: [&str; 5] = ["Electronic", "Pop", "Rock", "Hip-Hop", "Classical"];
const INSTRUMENTS: [&str; 6] = ["Drums", "Bass", "Piano", "Guitar", "Synthesizer", "Vocals"];

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("audio file {path} is no longer readable: {source}")]
    ResourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Drives one analysis run.
///
/// The controller calls `progress_step` on every tick until progress reaches
/// 100, then `finish` once after the settle delay.
pub trait AnalysisProvider: Send + Sync {
    /// Next progress increment in percent; must be strictly positive.
    fn progress_step(&self) -> f64;

    fn finish(&self, resource: &AudioResource) -> Result<AnalysisResult, AnalysisError>;
}

/// Canned result behind a randomized progress bar
#[derive(Debug, Clone)]
pub struct SimulatedAnalysis {
    min_increment: f64,
    max_increment: f64,
}

impl SimulatedAnalysis {
    pub fn new(settings: &AnalysisSettings) -> Self {
        Self {
            min_increment: settings.min_increment,
            max_increment: settings.max_increment,
        }
    }
}

impl AnalysisProvider for SimulatedAnalysis {
    fn progress_step(&self) -> f64 {
        rand::rng().random_range(self.min_increment..self.max_increment)
    }

    fn finish(&self, resource: &AudioResource) -> Result<AnalysisResult, AnalysisError> {
        // The only way a simulated run can fail: the file went away underneath us
        std::fs::metadata(&resource.path).map_err(|source| AnalysisError::ResourceUnavailable {
            path: resource.path.display().to_string(),
            source,
        })?;

        let mut rng = rand::rng();
        let genre_scores = GENRES
            .iter()
            .map(|g| (g.to_string(), rng.random_range(20.0..80.0)))
            .collect();
        let instrument_scores = INSTRUMENTS
            .iter()
            .map(|i| (i.to_string(), rng.random_range(20.0..100.0)))
            .collect();

        Ok(AnalysisResult {
            genre: "Electronic".to_string(),
            bpm: 128,
            key: "C Minor".to_string(),
            mood: "Energetic".to_string(),
            instruments: ["Synthesizer", "Drums", "Bass", "Piano"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            genre_scores,
            instrument_scores,
            analyzed_at: Local::now(),
        })
    }
}
