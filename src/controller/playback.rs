//! Playback control methods
//!
//! Every transport command is a no-op until a resource is loaded.

use super::AppController;

impl AppController {
    pub async fn toggle_playback(&self) {
        let is_playing = self.model.lock().await.is_playing();
        tracing::debug!(is_playing, "Toggling playback");
        if is_playing {
            self.pause().await;
        } else {
            self.play().await;
        }
    }

    pub async fn play(&self) {
        let mut model = self.model.lock().await;
        let Some(id) = model.resource().map(|r| r.id) else {
            tracing::debug!("Play ignored, no resource loaded");
            return;
        };

        let position = {
            let mut backend = self.audio_backend.lock().await;
            if !backend.play() {
                tracing::warn!(resource = %id, "Media element refused to play");
                model.notify_error("Cannot play", "The audio could not be decoded.".to_string());
                return;
            }
            backend.position()
        };
        model.set_playing(true);
        model.apply_time_update(id, position);
        drop(model);

        self.start_animation();
        tracing::info!(resource = %id, position, "Playback started");
    }

    pub async fn pause(&self) {
        let mut model = self.model.lock().await;
        let Some(id) = model.resource().map(|r| r.id) else {
            return;
        };

        let position = {
            let mut backend = self.audio_backend.lock().await;
            backend.pause();
            backend.position()
        };
        model.set_playing(false);
        model.apply_time_update(id, position);
        drop(model);

        self.stop_animation();
        tracing::info!(resource = %id, position, "Playback paused");
    }

    /// Jump to an absolute position, clamped to the track.
    pub async fn seek_to(&self, seconds: f64) {
        let mut model = self.model.lock().await;
        if let Some(target) = model.seek(seconds) {
            self.audio_backend.lock().await.seek(target);
            tracing::debug!(target, "Seeked");
        }
    }

    /// Move relative to the element's actual position.
    pub async fn seek_relative(&self, delta: f64) {
        let mut model = self.model.lock().await;
        let Some(id) = model.resource().map(|r| r.id) else {
            return;
        };

        let mut backend = self.audio_backend.lock().await;
        model.apply_time_update(id, backend.position());
        if let Some(target) = model.seek_by(delta) {
            backend.seek(target);
            tracing::debug!(delta, target, "Seeked relative");
        }
    }

    pub async fn seek_forward(&self) {
        self.seek_relative(self.config.playback.seek_step_secs).await;
    }

    pub async fn seek_backward(&self) {
        self.seek_relative(-self.config.playback.seek_step_secs).await;
    }

    pub async fn skip_forward(&self) {
        self.seek_relative(self.config.playback.skip_secs).await;
    }

    pub async fn skip_back(&self) {
        self.seek_relative(-self.config.playback.skip_secs).await;
    }

    /// Set the volume in `[0, 1]`; this also unmutes.
    pub async fn set_volume(&self, volume: f64) {
        let mut model = self.model.lock().await;
        if model.set_volume(volume).is_some() {
            let effective = model.playback().effective_volume();
            self.audio_backend.lock().await.set_volume(effective);
            tracing::debug!(volume = effective, "Volume set");
        }
    }

    pub async fn volume_up(&self) {
        let current = self.model.lock().await.playback().volume;
        self.set_volume(current + self.config.playback.volume_step).await;
    }

    pub async fn volume_down(&self) {
        let current = self.model.lock().await.playback().volume;
        self.set_volume(current - self.config.playback.volume_step).await;
    }

    pub async fn toggle_mute(&self) {
        let mut model = self.model.lock().await;
        if let Some(muted) = model.toggle_mute() {
            let effective = model.playback().effective_volume();
            self.audio_backend.lock().await.set_volume(effective);
            tracing::debug!(muted, "Mute toggled");
        }
    }
}
