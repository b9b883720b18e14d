//! Sources of display magnitudes for the visualizers

use rand::Rng;

use crate::model::{AudioResource, FrequencyCircle};

/// Produces the waveform bars and frequency circles for a resource.
///
/// The default implementation is [`RandomSpectrum`], which ignores the audio
/// content entirely. An implementation backed by decoded samples can be
/// dropped in without touching the controller or the view.
pub trait SpectrumProvider: Send + Sync {
    /// `bars` magnitudes in `[0, 1]`
    fn waveform(&self, resource: &AudioResource, bars: usize) -> Vec<f64>;

    /// `count` circles with positions as fractions of the drawing area
    fn circles(&self, resource: &AudioResource, count: usize) -> Vec<FrequencyCircle>;
}

/// Non-seeded random magnitudes
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSpectrum;

impl SpectrumProvider for RandomSpectrum {
    fn waveform(&self, _resource: &AudioResource, bars: usize) -> Vec<f64> {
        let mut rng = rand::rng();
        (0..bars).map(|_| rng.random_range(0.2..1.0)).collect()
    }

    fn circles(&self, _resource: &AudioResource, count: usize) -> Vec<FrequencyCircle> {
        let mut rng = rand::rng();
        (0..count)
            .map(|i| FrequencyCircle {
                x: rng.random_range(0.0..1.0),
                y: rng.random_range(0.0..1.0),
                size: rng.random_range(10.0..50.0),
                delay: i as f64 * 0.1,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectUrlRegistry, ResourceId};
    use std::path::{Path, PathBuf};

    fn resource() -> AudioResource {
        let mut urls = ObjectUrlRegistry::new();
        let (_, url) = urls.create(Path::new("a.wav"));
        AudioResource {
            id: ResourceId(1),
            name: "a.wav".to_string(),
            path: PathBuf::from("a.wav"),
            size_bytes: 10,
            mime_type: "audio/x-wav".to_string(),
            url,
        }
    }

    #[test]
    fn test_waveform_has_requested_size_and_range() {
        let bars = RandomSpectrum.waveform(&resource(), 60);
        assert_eq!(bars.len(), 60);
        assert!(bars.iter().all(|b| (0.2..1.0).contains(b)));
    }

    #[test]
    fn test_circles_are_staggered() {
        let circles = RandomSpectrum.circles(&resource(), 30);
        assert_eq!(circles.len(), 30);
        for (i, c) in circles.iter().enumerate() {
            assert!((0.0..1.0).contains(&c.x));
            assert!((0.0..1.0).contains(&c.y));
            assert!((10.0..50.0).contains(&c.size));
            assert!((c.delay - i as f64 * 0.1).abs() < 1e-9);
        }
    }
}
