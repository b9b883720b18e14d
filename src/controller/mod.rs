//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and drives the scheduled work.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key and paste event handling
//! - `intake`: File validation and resource swaps
//! - `playback`: Transport control methods
//! - `media_events`: Time-update / ended listener for the media element
//! - `visual`: Waveform loading and animation loop
//! - `analysis`: Simulated analysis run
//!
//! Lock order is always model before audio backend.

mod input;
mod intake;
mod playback;
mod media_events;
mod visual;
mod analysis;


use std::sync::Arc;
use tokio::sync::Mutex;

use crate::audio::{AudioBackend, MediaError};
use crate::config::AppConfig;
use crate::engine::{AnalysisError, AnalysisProvider, ResourceScope, Scheduler, SpectrumProvider};
use crate::model::AppModel;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) audio_backend: Arc<Mutex<AudioBackend>>,
    pub(crate) scheduler: Scheduler,
    pub(crate) analysis_provider: Arc<dyn AnalysisProvider>,
    pub(crate) spectrum_provider: Arc<dyn SpectrumProvider>,
    pub(crate) config: Arc<AppConfig>,
    /// Scope of the running animation loop, if any
    animation: Arc<std::sync::Mutex<Option<ResourceScope>>>,
}

impl AppController {
    pub fn new(
        model: Arc<Mutex<AppModel>>,
        audio_backend: Arc<Mutex<AudioBackend>>,
        analysis_provider: Arc<dyn AnalysisProvider>,
        spectrum_provider: Arc<dyn SpectrumProvider>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            model,
            audio_backend,
            scheduler: Scheduler::new(),
            analysis_provider,
            spectrum_provider,
            config,
            animation: Arc::new(std::sync::Mutex::new(None)),
        }
    }

    /// Cancel every scheduled task; used on quit.
    pub fn shutdown(&self) {
        self.stop_animation();
        self.scheduler.shutdown();
        tracing::debug!("Scheduled tasks cancelled");
    }

    pub(crate) fn format_error(error: &MediaError) -> String {
        match error {
            MediaError::NoAudioTrack => "The file has no playable audio track.".to_string(),
            MediaError::Unreadable(_) => "The audio format is unsupported or the file is corrupt.".to_string(),
            MediaError::Open { .. } => "The file could not be opened.".to_string(),
        }
    }

    pub(crate) fn format_analysis_error(error: &AnalysisError) -> String {
        match error {
            AnalysisError::ResourceUnavailable { .. } => "The audio file can no longer be read.".to_string(),
        }
    }
}
