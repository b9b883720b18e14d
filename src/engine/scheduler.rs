//! Cancellable timers bound to resource identity
//!
//! Every timer the app schedules (analysis ticks, waveform loading, animation
//! frames, media time updates) runs inside a [`ResourceScope`]. Loading a new
//! resource cancels the previous scope, which ends all of its timers before
//! they can touch the model again.

use std::future::Future;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::model::ResourceId;

/// Cancellation token tied to one resource
#[derive(Clone, Debug)]
pub struct ResourceScope {
    id: ResourceId,
    token: CancellationToken,
}

impl ResourceScope {
    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// A narrower scope that ends with this one, or earlier on its own.
    pub fn child(&self) -> ResourceScope {
        ResourceScope {
            id: self.id,
            token: self.token.child_token(),
        }
    }

    /// Run `task` once after `delay` unless the scope ends first.
    pub fn spawn_after<F, Fut>(&self, delay: Duration, task: F) -> JoinHandle<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if !token.is_cancelled() {
                        task().await;
                    }
                }
            }
        })
    }

    /// Call `tick` every `period` (first call one period from now) until it
    /// breaks or the scope ends.
    pub fn spawn_interval<F, Fut>(&self, period: Duration, mut tick: F) -> JoinHandle<()>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let token = self.token.clone();
        let id = self.id;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::trace!(resource = %id, "Interval cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        if token.is_cancelled() {
                            break;
                        }
                        if tick().await.is_break() {
                            break;
                        }
                    }
                }
            }
        })
    }
}

/// Hands out one live [`ResourceScope`] at a time.
#[derive(Clone, Default)]
pub struct Scheduler {
    current: Arc<Mutex<Option<ResourceScope>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever scope is live and open a new one for `id`.
    pub fn begin(&self, id: ResourceId) -> ResourceScope {
        let scope = ResourceScope {
            id,
            token: CancellationToken::new(),
        };
        let previous = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(scope.clone());
        if let Some(previous) = previous {
            tracing::debug!(resource = %previous.id, "Cancelling timers of replaced resource");
            previous.cancel();
        }
        scope
    }

    pub fn current(&self) -> Option<ResourceScope> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn shutdown(&self) {
        if let Some(scope) = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
        {
            scope.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_spawn_after_fires_once() {
        let scheduler = Scheduler::new();
        let scope = scheduler.begin(ResourceId(1));
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        let handle = scope.spawn_after(Duration::from_millis(500), move || async move {
            h.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        handle.await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_begin_cancels_pending_timers_of_previous_scope() {
        let scheduler = Scheduler::new();
        let old = scheduler.begin(ResourceId(1));
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        let delayed = old.spawn_after(Duration::from_secs(1), move || async move {
            h.fetch_add(1, Ordering::SeqCst);
        });
        let h = hits.clone();
        let ticking = old.spawn_interval(Duration::from_millis(100), move || {
            let h = h.clone();
            async move {
                h.fetch_add(1, Ordering::SeqCst);
                ControlFlow::Continue(())
            }
        });

        tokio::time::sleep(Duration::from_millis(250)).await;
        let before_swap = hits.load(Ordering::SeqCst);
        assert_eq!(before_swap, 2);

        let new = scheduler.begin(ResourceId(2));
        assert!(old.is_cancelled());
        assert!(!new.is_cancelled());

        delayed.await.unwrap();
        ticking.await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(hits.load(Ordering::SeqCst), before_swap);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_stops_on_break() {
        let scope = Scheduler::new().begin(ResourceId(7));
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        let handle = scope.spawn_interval(Duration::from_millis(300), move || {
            let h = h.clone();
            async move {
                if h.fetch_add(1, Ordering::SeqCst) + 1 >= 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }
        });

        handle.await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert!(!scope.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_child_scope_cancels_alone_or_with_parent() {
        let scheduler = Scheduler::new();
        let parent = scheduler.begin(ResourceId(1));

        let child = parent.child();
        child.cancel();
        assert!(!parent.is_cancelled());

        let other = parent.child();
        scheduler.begin(ResourceId(2));
        assert!(other.is_cancelled());
        assert_eq!(other.id(), ResourceId(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_current() {
        let scheduler = Scheduler::new();
        let scope = scheduler.begin(ResourceId(1));
        scheduler.shutdown();
        assert!(scope.is_cancelled());
        assert!(scheduler.current().is_none());
    }
}
