//! Playback-related types and state management

/// Transport state of the single audio element
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time: f64,
    /// Zero until the media element reports metadata
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
}

impl PlaybackState {
    pub fn new(initial_volume: f64) -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: initial_volume.clamp(0.0, 1.0),
            muted: false,
        }
    }

    /// Volume actually sent to the output
    pub fn effective_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub fn progress_ratio(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// A new resource was bound: rewind and stop. Volume and mute survive.
    pub fn reset_for_resource(&mut self) {
        self.is_playing = false;
        self.current_time = 0.0;
        self.duration = 0.0;
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        self.current_time = self.current_time.min(self.duration);
    }

    /// Clamp `seconds` into `[0, duration]` and return the stored value.
    pub fn seek(&mut self, seconds: f64) -> f64 {
        let target = if seconds.is_nan() { 0.0 } else { seconds };
        self.current_time = target.clamp(0.0, self.duration);
        self.current_time
    }

    pub fn seek_by(&mut self, delta: f64) -> f64 {
        self.seek(self.current_time + delta)
    }

    /// Setting a volume always unmutes.
    pub fn set_volume(&mut self, volume: f64) -> f64 {
        let v = if volume.is_nan() { 0.0 } else { volume };
        self.volume = v.clamp(0.0, 1.0);
        self.muted = false;
        self.volume
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Position report from the media element
    pub fn update_time(&mut self, seconds: f64) {
        let upper = if self.duration > 0.0 { self.duration } else { f64::MAX };
        self.current_time = seconds.clamp(0.0, upper);
    }

    pub fn mark_ended(&mut self) {
        self.is_playing = false;
        self.current_time = self.duration;
    }
}
