//! Listener for media element events

use std::ops::ControlFlow;

use crate::audio::MediaEvent;
use crate::engine::ResourceScope;
use super::AppController;

impl AppController {
    /// Subscribe to the element's time updates for the resource of `scope`.
    ///
    /// The subscription lives exactly as long as the scope.
    pub(crate) fn start_media_listener(&self, scope: &ResourceScope) {
        let id = scope.id();
        let controller = self.clone();
        tracing::debug!(resource = %id, "Starting media event listener");

        scope.spawn_interval(self.config.playback.time_update, move || {
            let controller = controller.clone();
            async move {
                let event = controller.audio_backend.lock().await.poll_event(id);

                match event {
                    Some(MediaEvent::TimeUpdate { position }) => {
                        tracing::trace!(position, "MediaEvent::TimeUpdate");
                        if !controller.model.lock().await.apply_time_update(id, position) {
                            return ControlFlow::Break(());
                        }
                    }
                    Some(MediaEvent::Ended) => {
                        tracing::debug!(resource = %id, "MediaEvent::Ended");
                        if !controller.model.lock().await.mark_ended(id) {
                            return ControlFlow::Break(());
                        }
                        controller.stop_animation();
                    }
                    None => {}
                }
                ControlFlow::Continue(())
            }
        });
    }
}
