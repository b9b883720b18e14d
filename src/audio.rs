//! Media element backing the player
//!
//! The backend reads the file's container for its metadata (duration, sample
//! rate, channels) via symphonia and keeps a play clock. It never decodes the
//! signal itself.

use std::fs::File;
use std::path::Path;

use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;
use tokio::time::Instant;

use crate::model::{AudioResource, ResourceId};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported or corrupt audio: {0}")]
    Unreadable(String),
    #[error("no playable audio track")]
    NoAudioTrack,
}

/// What the container told us about the stream
#[derive(Clone, Debug, PartialEq)]
pub struct MediaInfo {
    /// Seconds; `None` when the container doesn't carry a frame count
    pub duration: Option<f64>,
    pub sample_rate: Option<u32>,
    pub channels: Option<usize>,
}

/// Events the element reports back to the player
#[derive(Clone, Debug, PartialEq)]
pub enum MediaEvent {
    TimeUpdate { position: f64 },
    Ended,
}

/// Read container metadata without decoding any audio.
pub fn read_media_info(path: &Path) -> Result<MediaInfo, MediaError> {
    let file = File::open(path).map_err(|source| MediaError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let format = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| MediaError::Unreadable(e.to_string()))?;

    let track = format
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(MediaError::NoAudioTrack)?;

    let params = &track.codec_params;
    let duration = match (params.n_frames, params.time_base, params.sample_rate) {
        (Some(frames), Some(tb), _) => {
            let time = tb.calc_time(frames);
            Some(time.seconds as f64 + time.frac)
        }
        (Some(frames), None, Some(rate)) if rate > 0 => Some(frames as f64 / rate as f64),
        _ => None,
    };

    Ok(MediaInfo {
        duration,
        sample_rate: params.sample_rate,
        channels: params.channels.map(|c| c.count()),
    })
}

/// Clock tracking the play position between transport commands
#[derive(Clone, Debug)]
pub struct PlaybackTiming {
    pub position: f64,
    pub last_update: Instant,
    pub is_playing: bool,
    pub duration: f64,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            position: 0.0,
            last_update: Instant::now(),
            is_playing: false,
            duration: 0.0,
        }
    }
}

impl PlaybackTiming {
    pub fn current_position(&self) -> f64 {
        let position = if self.is_playing {
            self.position + self.last_update.elapsed().as_secs_f64()
        } else {
            self.position
        };
        if self.duration > 0.0 {
            position.clamp(0.0, self.duration)
        } else {
            position.max(0.0)
        }
    }

    /// Freeze the clock at its current value, then apply the new play state.
    pub fn set_playing(&mut self, is_playing: bool) {
        self.position = self.current_position();
        self.last_update = Instant::now();
        self.is_playing = is_playing;
    }

    pub fn seek(&mut self, position: f64) {
        self.position = position.clamp(0.0, self.duration);
        self.last_update = Instant::now();
    }

    pub fn has_ended(&self) -> bool {
        self.duration > 0.0 && self.current_position() >= self.duration
    }
}

/// The single audio element
#[derive(Default)]
pub struct AudioBackend {
    loaded: Option<ResourceId>,
    /// The bound file's container could not be read, so it must not play
    undecodable: bool,
    timing: PlaybackTiming,
    volume: f64,
}

impl AudioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a resource. The element stays bound even when its container can't be read, with
    /// an unknown duration and playback refused; the error is returned for
    /// the caller to surface.
    pub fn load(&mut self, resource: &AudioResource) -> Result<MediaInfo, MediaError> {
        self.timing = PlaybackTiming::default();
        let inspected = read_media_info(&resource.path);

        match &inspected {
            Ok(info) => {
                self.timing.duration = info.duration.unwrap_or(0.0);
                tracing::info!(
                    resource = %resource.id,
                    duration = ?info.duration,
                    sample_rate = ?info.sample_rate,
                    channels = ?info.channels,
                    "Media metadata loaded"
                );
            }
            Err(e) => {
                tracing::warn!(resource = %resource.id, error = %e, "Media metadata unreadable");
            }
        }

        self.loaded = Some(resource.id);
        self.undecodable = inspected.is_err();
        inspected
    }

    pub fn loaded_id(&self) -> Option<ResourceId> {
        self.loaded
    }

    #[cfg(test)]
    pub fn duration(&self) -> f64 {
        self.timing.duration
    }

    /// Returns false when nothing playable is loaded. Playing from the end
    /// rewinds.
    pub fn play(&mut self) -> bool {
        if self.loaded.is_none() || self.undecodable {
            return false;
        }
        if self.timing.has_ended() {
            self.timing.seek(0.0);
        }
        self.timing.set_playing(true);
        true
    }

    pub fn pause(&mut self) {
        self.timing.set_playing(false);
    }

    #[cfg(test)]
    pub fn is_playing(&self) -> bool {
        self.timing.is_playing
    }

    pub fn seek(&mut self, position: f64) {
        if self.loaded.is_some() {
            self.timing.seek(position);
        }
    }

    pub fn position(&self) -> f64 {
        self.timing.current_position()
    }

    /// Output gain; muting is expressed by the caller as 0.
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
        tracing::trace!(volume = self.volume, "Output gain set");
    }

    #[cfg(test)]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Next event for the resource `id`, if it is still the one bound.
    ///
    /// Reaching the end stops the clock and yields `Ended` exactly once.
    pub fn poll_event(&mut self, id: ResourceId) -> Option<MediaEvent> {
        if self.loaded_id() != Some(id) || !self.timing.is_playing {
            return None;
        }
        if self.timing.has_ended() {
            self.timing.set_playing(false);
            return Some(MediaEvent::Ended);
        }
        Some(MediaEvent::TimeUpdate {
            position: self.position(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectUrlRegistry;
    use crate::test_support::write_wav;
    use std::time::Duration;

    fn resource_for(path: &Path) -> AudioResource {
        let mut urls = ObjectUrlRegistry::new();
        let (id, url) = urls.create(path);
        AudioResource {
            id,
            name: "tone.wav".to_string(),
            path: path.to_path_buf(),
            size_bytes: 0,
            mime_type: "audio/x-wav".to_string(),
            url,
        }
    }

    #[test]
    fn test_reads_wav_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, 3);

        let info = read_media_info(&path).unwrap();
        let duration = info.duration.unwrap();
        assert!((duration - 3.0).abs() < 0.01, "duration was {duration}");
        assert_eq!(info.sample_rate, Some(8000));
        assert_eq!(info.channels, Some(1));
    }

    #[test]
    fn test_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.mp3");
        std::fs::write(&path, b"definitely not audio").unwrap();

        assert!(read_media_info(&path).is_err());
    }

    #[test]
    fn test_missing_file_fails_to_open() {
        let err = read_media_info(Path::new("/nonexistent/a.wav")).unwrap_err();
        assert!(matches!(err, MediaError::Open { .. }));
    }

    #[test]
    fn test_play_without_media_is_refused() {
        let mut backend = AudioBackend::new();
        assert!(!backend.play());
        assert!(!backend.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_advances_and_ends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, 2);
        let resource = resource_for(&path);

        let mut backend = AudioBackend::new();
        backend.load(&resource).unwrap();
        assert!(backend.play());

        tokio::time::advance(Duration::from_millis(500)).await;
        match backend.poll_event(resource.id) {
            Some(MediaEvent::TimeUpdate { position }) => assert!((position - 0.5).abs() < 1e-6),
            other => panic!("unexpected event {other:?}"),
        }

        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(backend.poll_event(resource.id), Some(MediaEvent::Ended));
        assert!(!backend.is_playing());
        assert_eq!(backend.poll_event(resource.id), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, 5);
        let resource = resource_for(&path);

        let mut backend = AudioBackend::new();
        backend.load(&resource).unwrap();
        backend.play();
        tokio::time::advance(Duration::from_secs(1)).await;
        backend.pause();
        tokio::time::advance(Duration::from_secs(2)).await;

        assert!((backend.position() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_events_for_other_resource_are_suppressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, 1);
        let resource = resource_for(&path);

        let mut backend = AudioBackend::new();
        backend.load(&resource).unwrap();
        backend.play();
        assert_eq!(backend.poll_event(ResourceId(999)), None);
    }

    #[test]
    fn test_unreadable_file_keeps_element_bound() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wav");
        std::fs::write(&path, b"RIFF\x00\x00\x00\x00WAVEjunk").unwrap();
        let resource = resource_for(&path);

        let mut backend = AudioBackend::new();
        assert!(backend.load(&resource).is_err());
        assert_eq!(backend.loaded_id(), Some(resource.id));
        assert_eq!(backend.duration(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_undecodable_file_refuses_to_play() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wav");
        std::fs::write(&path, b"RIFF\x00\x00\x00\x00WAVEjunk").unwrap();
        let resource = resource_for(&path);

        let mut backend = AudioBackend::new();
        assert!(backend.load(&resource).is_err());
        assert!(!backend.play());
        tokio::time::advance(Duration::from_secs(60)).await;

        assert!(!backend.is_playing());
        assert_eq!(backend.position(), 0.0);
        assert_eq!(backend.poll_event(resource.id), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rebinding_a_valid_file_allows_play() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.wav");
        std::fs::write(&broken, b"RIFF\x00\x00\x00\x00WAVEjunk").unwrap();
        let good = dir.path().join("tone.wav");
        write_wav(&good, 2);

        let mut backend = AudioBackend::new();
        assert!(backend.load(&resource_for(&broken)).is_err());
        backend.load(&resource_for(&good)).unwrap();
        assert!(backend.play());
    }
}
