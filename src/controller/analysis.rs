//! Simulated analysis run

use std::ops::ControlFlow;

use super::AppController;

impl AppController {
    /// Start an analysis run for the current resource.
    ///
    /// Returns false, scheduling nothing, when no resource is loaded or a run
    /// is already in progress.
    pub async fn analyze(&self) -> bool {
        let Some(resource) = self.model.lock().await.start_analysis() else {
            tracing::debug!("Analyze ignored, no resource or run already in progress");
            return false;
        };
        let scope = match self.scheduler.current() {
            Some(scope) if scope.id() == resource.id => scope,
            _ => {
                tracing::warn!(resource = %resource.id, "No live scope for analysis run");
                self.model
                    .lock()
                    .await
                    .fail_analysis(resource.id, "Analysis could not be scheduled".to_string());
                return false;
            }
        };
        tracing::info!(resource = %resource.id, name = %resource.name, "Analysis started");

        let controller = self.clone();
        let tick_scope = scope.clone();
        scope.spawn_interval(self.config.analysis.tick, move || {
            let controller = controller.clone();
            let scope = tick_scope.clone();
            let resource = resource.clone();
            async move {
                let step = controller.analysis_provider.progress_step();
                if !(step.is_finite() && step > 0.0) {
                    tracing::warn!(resource = %resource.id, step, "Analysis provider returned a non-positive step");
                    let mut model = controller.model.lock().await;
                    if model.fail_analysis(resource.id, format!("Invalid progress step {step}")) {
                        model.notify_error("Analysis failed", "The analyzer stopped making progress.".to_string());
                    }
                    return ControlFlow::Break(());
                }
                let Some(progress) = controller.model.lock().await.advance_analysis(resource.id, step) else {
                    return ControlFlow::Break(());
                };
                tracing::trace!(resource = %resource.id, progress, "Analysis progress");
                if progress < 100.0 {
                    return ControlFlow::Continue(());
                }

                scope.spawn_after(controller.config.analysis.settle, move || async move {
                    let outcome = controller.analysis_provider.finish(&resource);
                    let mut model = controller.model.lock().await;
                    match outcome {
                        Ok(result) => {
                            let genre = result.genre.clone();
                            if model.complete_analysis(resource.id, result) {
                                tracing::info!(resource = %resource.id, genre = %genre, "Analysis complete");
                            }
                        }
                        Err(e) => {
                            tracing::error!(resource = %resource.id, error = %e, "Analysis failed");
                            if model.fail_analysis(resource.id, e.to_string()) {
                                model.notify_error("Analysis failed", Self::format_analysis_error(&e));
                            }
                        }
                    }
                });
                ControlFlow::Break(())
            }
        });
        true
    }
}
