//! Waveform loading and the animation loop of both visualizers

use std::ops::ControlFlow;

use crate::engine::ResourceScope;
use crate::model::AudioResource;
use super::AppController;

impl AppController {
    /// Populate both visualizers for a freshly loaded resource.
    ///
    /// Circles appear immediately; the waveform shows its loading state for
    /// the configured delay before the bars arrive.
    pub(crate) async fn spawn_visuals(&self, scope: &ResourceScope, resource: &AudioResource) {
        let visual = &self.config.visual;

        let circles = self.spectrum_provider.circles(resource, visual.circle_count);
        self.model.lock().await.set_circles(resource.id, circles);

        let model = self.model.clone();
        let provider = self.spectrum_provider.clone();
        let resource = resource.clone();
        let bars = visual.waveform_bars;
        scope.spawn_after(visual.waveform_load_delay, move || async move {
            let waveform = provider.waveform(&resource, bars);
            if model.lock().await.set_waveform(resource.id, waveform) {
                tracing::debug!(resource = %resource.id, bars, "Waveform ready");
            }
        });
    }

    /// Start advancing the animation clock, if not already running.
    pub(crate) fn start_animation(&self) {
        let Some(resource_scope) = self.scheduler.current() else {
            return;
        };
        let mut slot = self
            .animation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.as_ref().is_some_and(|s| !s.is_cancelled() && s.id() == resource_scope.id()) {
            return;
        }

        let scope = resource_scope.child();
        let id = scope.id();
        let frame = self.config.visual.frame;
        let frame_ms = frame.as_secs_f64() * 1000.0;
        let model = self.model.clone();
        let loop_scope = scope.clone();
        scope.spawn_interval(frame, move || {
            let model = model.clone();
            let loop_scope = loop_scope.clone();
            async move {
                if model.lock().await.advance_visuals(id, frame_ms) {
                    ControlFlow::Continue(())
                } else {
                    // Let the next start_animation replace this loop
                    loop_scope.cancel();
                    ControlFlow::Break(())
                }
            }
        });

        tracing::trace!(resource = %id, "Animation started");
        *slot = Some(scope);
    }

    /// Hold the visuals where they are.
    pub(crate) fn stop_animation(&self) {
        if let Some(scope) = self.forget_animation() {
            scope.cancel();
            tracing::trace!(resource = %scope.id(), "Animation stopped");
        }
    }

    fn forget_animation(&self) -> Option<ResourceScope> {
        self.animation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}
