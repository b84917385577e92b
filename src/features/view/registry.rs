use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::data::repositories::SearchBackend;
use crate::features::search::SearchController;

pub type ViewId = u64;

/// Bounds on how many views stay mounted and for how long.
#[derive(Debug, Clone, Copy)]
pub struct ViewLimits {
    /// A view not touched for this long is unmounted by the next sweep.
    pub idle: Duration,
    /// Mounting past this count unmounts the least recently used view first.
    pub capacity: usize,
}

impl Default for ViewLimits {
    fn default() -> Self {
        ViewLimits {
            idle: Duration::from_secs(24 * 60 * 60),
            capacity: 1024,
        }
    }
}

struct MountedView {
    controller: Arc<SearchController>,
    last_seen: Instant,
}

/// Live views, one controller each. A view is mounted on first page load and
/// lives until it is unmounted, swept for idleness, or evicted for capacity.
pub struct ViewRegistry {
    backend: Arc<dyn SearchBackend>,
    limits: ViewLimits,
    views: RwLock<HashMap<ViewId, MountedView>>,
    next_id: AtomicU64,
}

impl ViewRegistry {
    pub fn new(backend: Arc<dyn SearchBackend>, limits: ViewLimits) -> Self {
        ViewRegistry {
            backend,
            limits,
            views: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns the view and marks it as used.
    pub async fn get(&self, id: ViewId) -> Option<Arc<SearchController>> {
        let mut views = self.views.write().await;
        let view = views.get_mut(&id)?;
        view.last_seen = Instant::now();
        Some(view.controller.clone())
    }

    /// Returns the view for `existing` if it is still mounted, otherwise mounts and
    /// initializes a fresh one.
    pub async fn mount(&self, existing: Option<ViewId>) -> (ViewId, Arc<SearchController>) {
        if let Some(id) = existing {
            if let Some(controller) = self.get(id).await {
                return (id, controller);
            }
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let controller = Arc::new(SearchController::new(self.backend.clone()));
        {
            let mut views = self.views.write().await;
            while views.len() >= self.limits.capacity.max(1) {
                let Some(oldest) = views
                    .iter()
                    .min_by_key(|(_, view)| view.last_seen)
                    .map(|(id, _)| *id)
                else {
                    break;
                };
                if let Some(evicted) = views.remove(&oldest) {
                    evicted.controller.teardown();
                    log::info!(
                        "Evicted view {} to stay within {} views",
                        oldest,
                        self.limits.capacity
                    );
                }
            }
            views.insert(
                id,
                MountedView {
                    controller: controller.clone(),
                    last_seen: Instant::now(),
                },
            );
        }
        log::info!("Mounted view {} ({} mounted)", id, self.len().await);

        controller.initialize().await;
        (id, controller)
    }

    pub async fn unmount(&self, id: ViewId) -> bool {
        match self.views.write().await.remove(&id) {
            Some(view) => {
                view.controller.teardown();
                log::info!("Unmounted view {}", id);
                true
            }
            None => false,
        }
    }

    /// Unmounts every view idle for longer than the limit as of `now`.
    pub async fn sweep(&self, now: Instant) -> usize {
        let mut views = self.views.write().await;
        let idle: Vec<ViewId> = views
            .iter()
            .filter(|(_, view)| now.saturating_duration_since(view.last_seen) > self.limits.idle)
            .map(|(id, _)| *id)
            .collect();

        for id in &idle {
            if let Some(view) = views.remove(id) {
                view.controller.teardown();
            }
        }
        if !idle.is_empty() {
            log::info!("Swept {} idle views, {} still mounted", idle.len(), views.len());
        }
        idle.len()
    }

    /// Sweeps idle views every `every` until the registry is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let registry: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(every);
            loop {
                ticks.tick().await;
                let Some(registry) = registry.upgrade() else {
                    break;
                };
                registry.sweep(Instant::now()).await;
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.views.read().await.len()
    }
}
