//! Display state for the waveform bars and frequency circles

use std::f64::consts::PI;

/// Length of one circle pulse, in milliseconds
const PULSE_CYCLE_MS: f64 = 2000.0;

#[derive(Clone, Debug, PartialEq, Default)]
pub enum Waveform {
    #[default]
    Empty,
    Loading,
    Ready(Vec<f64>),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencyCircle {
    /// Horizontal position as a fraction of the drawing area
    pub x: f64,
    /// Vertical position as a fraction of the drawing area
    pub y: f64,
    pub size: f64,
    /// Pulse offset in seconds
    pub delay: f64,
}

#[derive(Clone, Debug, Default)]
pub struct VisualState {
    pub waveform: Waveform,
    pub circles: Vec<FrequencyCircle>,
    /// Animation clock; only advances while playing
    pub phase_ms: f64,
}

impl VisualState {
    pub fn clear(&mut self) {
        *self = VisualState::default();
    }

    /// Bar heights to draw in `[0, 1]`.
    ///
    /// Stopped playback shows the raw magnitudes; playing modulates each bar
    /// with a travelling sine pulse.
    pub fn bar_heights(&self, is_playing: bool) -> Vec<f64> {
        let Waveform::Ready(bars) = &self.waveform else {
            return Vec::new();
        };
        if !is_playing {
            return bars.clone();
        }
        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                let pulse = ((self.phase_ms / 200.0) + i as f64 * 0.05).sin() * 0.3 + 0.7;
                (pulse * bar).clamp(0.0, 1.0)
            })
            .collect()
    }

    /// Scale factor of a circle: 1 → 1.2 → 1 over a two second cycle while
    /// playing, steady 1 otherwise.
    pub fn circle_scale(&self, circle: &FrequencyCircle, is_playing: bool) -> f64 {
        if !is_playing {
            return 1.0;
        }
        let t = self.phase_ms - circle.delay * 1000.0;
        if t < 0.0 {
            return 1.0;
        }
        let cycle = (t % PULSE_CYCLE_MS) / PULSE_CYCLE_MS;
        1.0 + 0.2 * (cycle * PI).sin()
    }

    /// Opacity follows the same pulse, held at 0.5 when stopped
    pub fn circle_opacity(&self, circle: &FrequencyCircle, is_playing: bool) -> f64 {
        if !is_playing {
            return 0.5;
        }
        let scale = self.circle_scale(circle, true);
        0.7 + (scale - 1.0) * 1.5
    }

    pub fn advance(&mut self, delta_ms: f64) {
        self.phase_ms += delta_ms;
    }
}
