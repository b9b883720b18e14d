//! Main application model with state management
//!
//! `AppModel` is the root coordinator: it owns the single [`AudioResource`],
//! the playback state whose `is_playing` flag drives the other panels, and the
//! analysis and visual state. Asynchronous producers identify themselves
//! with the [`ResourceId`] they were started for; anything addressed to a
//! resource that is no longer current is dropped.

use std::path::Path;
use std::time::Duration;
use tokio::time::Instant;

use super::analysis::{AnalysisResult, AnalysisState};
use super::playback::PlaybackState;
use super::resource::{AudioResource, ObjectUrlRegistry, ResourceId};
use super::types::{AnalysisTab, Notification, NotificationKind, UiState};
#[cfg(test)]
use super::types::ActiveSection;
use super::visual::{FrequencyCircle, VisualState, Waveform};

/// Everything the view needs for one frame
#[derive(Clone, Debug)]
pub struct ViewSnapshot {
    pub resource: Option<AudioResource>,
    pub playback: PlaybackState,
    pub analysis: AnalysisState,
    pub visual: VisualState,
    pub ui: UiState,
}

/// Main application model containing all state
pub struct AppModel {
    resource: Option<AudioResource>,
    urls: ObjectUrlRegistry,
    playback: PlaybackState,
    analysis: AnalysisState,
    visual: VisualState,
    ui_state: UiState,
    should_quit: bool,
}

impl AppModel {
    pub fn new(initial_volume: f64) -> Self {
        Self {
            resource: None,
            urls: ObjectUrlRegistry::new(),
            playback: PlaybackState::new(initial_volume),
            analysis: AnalysisState::default(),
            visual: VisualState::default(),
            ui_state: UiState::default(),
            should_quit: false,
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            resource: self.resource.clone(),
            playback: self.playback.clone(),
            analysis: self.analysis.clone(),
            visual: self.visual.clone(),
            ui: self.ui_state.clone(),
        }
    }

    // ========================================================================
    // Resource
    // ========================================================================

    pub fn resource(&self) -> Option<&AudioResource> {
        self.resource.as_ref()
    }

    pub fn has_resource(&self) -> bool {
        self.resource.is_some()
    }

    pub fn is_current(&self, id: ResourceId) -> bool {
        self.resource.as_ref().is_some_and(|r| r.id == id)
    }

    #[cfg(test)]
    pub fn live_url_count(&self) -> usize {
        self.urls.live_count()
    }

    /// Swap in a new resource, revoking the previous one.
    ///
    /// Playback rewinds and stops, analysis returns to Idle and the waveform
    /// enters its loading state. Returns the new resource and the one it
    /// replaced.
    pub fn replace_resource(
        &mut self,
        name: String,
        path: &Path,
        size_bytes: u64,
        mime_type: String,
    ) -> (AudioResource, Option<AudioResource>) {
        let previous = self.resource.take();
        if let Some(old) = &previous {
            if !self.urls.revoke(&old.url) {
                tracing::warn!(url = %old.url, "Previous resource URL was already revoked");
            }
        }

        let (id, url) = self.urls.create(path);
        let resource = AudioResource {
            id,
            name,
            path: path.to_path_buf(),
            size_bytes,
            mime_type,
            url,
        };

        self.playback.reset_for_resource();
        self.analysis.reset();
        self.visual.clear();
        self.visual.waveform = Waveform::Loading;
        self.resource = Some(resource.clone());

        tracing::info!(
            resource = %resource.id,
            name = %resource.name,
            url = %resource.url,
            replaced = previous.is_some(),
            "Resource loaded"
        );

        (resource, previous)
    }

    // ========================================================================
    // Playback
    // ========================================================================

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing
    }

    /// Returns false when there is nothing to play.
    pub fn set_playing(&mut self, is_playing: bool) -> bool {
        if !self.has_resource() {
            return false;
        }
        self.playback.is_playing = is_playing;
        true
    }

    pub fn seek(&mut self, seconds: f64) -> Option<f64> {
        self.has_resource().then(|| self.playback.seek(seconds))
    }

    pub fn seek_by(&mut self, delta: f64) -> Option<f64> {
        self.has_resource().then(|| self.playback.seek_by(delta))
    }

    pub fn set_volume(&mut self, volume: f64) -> Option<f64> {
        self.has_resource().then(|| self.playback.set_volume(volume))
    }

    pub fn toggle_mute(&mut self) -> Option<bool> {
        self.has_resource().then(|| self.playback.toggle_mute())
    }

    pub fn set_duration(&mut self, id: ResourceId, duration: f64) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.playback.set_duration(duration);
        true
    }

    pub fn apply_time_update(&mut self, id: ResourceId, seconds: f64) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.playback.update_time(seconds);
        true
    }

    pub fn mark_ended(&mut self, id: ResourceId) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.playback.mark_ended();
        true
    }

    // ========================================================================
    // Analysis
    // ========================================================================

    #[cfg(test)]
    pub fn analysis(&self) -> &AnalysisState {
        &self.analysis
    }

    /// Idle/Complete/Failed → Running. `None` without a resource or while a
    /// run is already in flight.
    pub fn start_analysis(&mut self) -> Option<AudioResource> {
        let resource = self.resource.clone()?;
        if !self.analysis.start() {
            return None;
        }
        Some(resource)
    }

    pub fn advance_analysis(&mut self, id: ResourceId, increment: f64) -> Option<f64> {
        if !self.is_current(id) {
            return None;
        }
        self.analysis.advance(increment)
    }

    pub fn complete_analysis(&mut self, id: ResourceId, result: AnalysisResult) -> bool {
        self.is_current(id) && self.analysis.complete(result)
    }

    pub fn fail_analysis(&mut self, id: ResourceId, message: String) -> bool {
        self.is_current(id) && self.analysis.fail(message)
    }

    // ========================================================================
    // Visuals
    // ========================================================================

    #[cfg(test)]
    pub fn visual(&self) -> &VisualState {
        &self.visual
    }

    pub fn set_waveform(&mut self, id: ResourceId, bars: Vec<f64>) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.visual.waveform = Waveform::Ready(bars);
        true
    }

    pub fn set_circles(&mut self, id: ResourceId, circles: Vec<FrequencyCircle>) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.visual.circles = circles;
        true
    }

    /// Advance the animation clock; held while paused.
    pub fn advance_visuals(&mut self, id: ResourceId, delta_ms: f64) -> bool {
        if !self.is_current(id) || !self.playback.is_playing {
            return false;
        }
        self.visual.advance(delta_ms);
        true
    }

    // ========================================================================
    // UI
    // ========================================================================

    pub fn ui_state(&self) -> &UiState {
        &self.ui_state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_should_quit(&mut self, quit: bool) {
        self.should_quit = quit;
    }

    pub fn cycle_section_forward(&mut self) {
        self.ui_state.active_section = self.ui_state.active_section.next();
    }

    pub fn cycle_section_backward(&mut self) {
        self.ui_state.active_section = self.ui_state.active_section.prev();
    }

    #[cfg(test)]
    pub fn set_active_section(&mut self, section: ActiveSection) {
        self.ui_state.active_section = section;
    }

    pub fn append_to_path(&mut self, c: char) {
        self.ui_state.path_input.push(c);
    }

    pub fn backspace_path(&mut self) {
        self.ui_state.path_input.pop();
    }

    pub fn clear_path(&mut self) {
        self.ui_state.path_input.clear();
    }

    pub fn take_path_input(&mut self) -> String {
        std::mem::take(&mut self.ui_state.path_input)
    }

    pub fn set_analysis_tab(&mut self, tab: AnalysisTab) {
        self.ui_state.analysis_tab = tab;
    }

    pub fn next_analysis_tab(&mut self) {
        self.ui_state.analysis_tab = self.ui_state.analysis_tab.next();
    }

    pub fn prev_analysis_tab(&mut self) {
        self.ui_state.analysis_tab = self.ui_state.analysis_tab.prev();
    }

    pub fn notify(&mut self, kind: NotificationKind, title: &str, description: String) {
        self.ui_state.notification = Some(Notification {
            kind,
            title: title.to_string(),
            description,
            created_at: Instant::now(),
        });
    }

    pub fn notify_success(&mut self, title: &str, description: String) {
        self.notify(NotificationKind::Success, title, description);
    }

    pub fn notify_error(&mut self, title: &str, description: String) {
        self.notify(NotificationKind::Error, title, description);
    }

    pub fn clear_notification(&mut self) {
        self.ui_state.notification = None;
    }

    pub fn has_notification(&self) -> bool {
        self.ui_state.notification.is_some()
    }

    pub fn auto_clear_old_notifications(&mut self, ttl: Duration) {
        if let Some(n) = &self.ui_state.notification {
            if n.created_at.elapsed() >= ttl {
                self.ui_state.notification = None;
            }
        }
    }

    pub fn show_help_popup(&mut self) {
        self.ui_state.show_help_popup = true;
    }

    pub fn hide_help_popup(&mut self) {
        self.ui_state.show_help_popup = false;
    }

    pub fn is_help_popup_open(&self) -> bool {
        self.ui_state.show_help_popup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn load(model: &mut AppModel, name: &str) -> AudioResource {
        let (resource, _) = model.replace_resource(
            name.to_string(),
            Path::new(name),
            1024,
            "audio/mpeg".to_string(),
        );
        resource
    }

    fn result() -> AnalysisResult {
        AnalysisResult {
            genre: "Electronic".to_string(),
            bpm: 128,
            key: "C Minor".to_string(),
            mood: "Energetic".to_string(),
            instruments: vec![],
            genre_scores: vec![],
            instrument_scores: vec![],
            analyzed_at: Local::now(),
        }
    }

    #[test]
    fn test_replacing_resource_revokes_previous_url() {
        let mut model = AppModel::new(0.75);
        load(&mut model, "a.mp3");
        load(&mut model, "b.mp3");
        let last = load(&mut model, "c.mp3");

        assert_eq!(model.live_url_count(), 1);
        assert_eq!(model.resource().unwrap().url, last.url);
    }

    #[test]
    fn test_replacing_resource_resets_playback() {
        let mut model = AppModel::new(0.75);
        let first = load(&mut model, "a.mp3");
        model.set_duration(first.id, 120.0);
        model.set_playing(true);
        model.seek(60.0);

        load(&mut model, "b.mp3");

        assert!(!model.is_playing());
        assert_eq!(model.playback().current_time, 0.0);
        assert_eq!(model.visual().waveform, Waveform::Loading);
    }

    #[test]
    fn test_controls_are_noops_without_resource() {
        let mut model = AppModel::new(0.75);

        assert!(!model.set_playing(true));
        assert_eq!(model.seek(10.0), None);
        assert_eq!(model.set_volume(0.2), None);
        assert_eq!(model.toggle_mute(), None);
        assert!(model.start_analysis().is_none());

        assert!(!model.is_playing());
        assert_eq!(model.playback().volume, 0.75);
        assert_eq!(*model.analysis(), AnalysisState::Idle);
    }

    #[test]
    fn test_stale_producers_are_ignored() {
        let mut model = AppModel::new(0.75);
        let old = load(&mut model, "a.mp3");
        model.start_analysis();
        model.advance_analysis(old.id, 100.0);

        let new = load(&mut model, "b.mp3");

        assert!(!model.complete_analysis(old.id, result()));
        assert!(!model.set_waveform(old.id, vec![0.5]));
        assert!(!model.set_duration(old.id, 99.0));
        assert_eq!(*model.analysis(), AnalysisState::Idle);
        assert!(model.is_current(new.id));
    }

    #[test]
    fn test_analysis_runs_to_completion() {
        let mut model = AppModel::new(0.75);
        let resource = load(&mut model, "a.mp3");

        assert!(model.start_analysis().is_some());
        assert!(model.start_analysis().is_none());
        model.advance_analysis(resource.id, 60.0);
        model.advance_analysis(resource.id, 60.0);
        assert!(model.complete_analysis(resource.id, result()));
        assert_eq!(model.analysis().result().unwrap().genre, "Electronic");
    }

    #[test]
    fn test_visual_clock_holds_while_paused() {
        let mut model = AppModel::new(0.75);
        let resource = load(&mut model, "a.mp3");

        assert!(!model.advance_visuals(resource.id, 100.0));
        model.set_playing(true);
        assert!(model.advance_visuals(resource.id, 100.0));
        assert_eq!(model.visual().phase_ms, 100.0);
    }

    #[test]
    fn test_take_path_input_clears_field() {
        let mut model = AppModel::new(0.75);
        for c in "song.mp3".chars() {
            model.append_to_path(c);
        }
        model.backspace_path();
        assert_eq!(model.take_path_input(), "song.mp");
        assert!(model.ui_state().path_input.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_notifications_expire() {
        let mut model = AppModel::new(0.75);
        model.notify_error("Invalid file type", "nope".to_string());

        model.auto_clear_old_notifications(Duration::from_secs(5));
        assert!(model.has_notification());

        tokio::time::advance(Duration::from_secs(6)).await;
        model.auto_clear_old_notifications(Duration::from_secs(5));
        assert!(!model.has_notification());
    }
}
