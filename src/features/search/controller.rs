use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::data::models::{
    BackendError, ControllerState, ResultList, SearchRequest, SearchResult,
    ToggleRequest,
};
use crate::data::repositories::SearchBackend;

#[derive(Default)]
struct Inner {
    last_query: String,
    results: ResultList,
    // Sequence number of the most recently dispatched search.
    latest_seq: u64,
    in_flight: usize,
}

/// Binds one view's search box and result list to the backend.
///
/// State changes only after the backend has answered. Search responses are applied
/// only if no newer search was dispatched in the meantime.
pub struct SearchController {
    backend: Arc<dyn SearchBackend>,
    inner: Mutex<Inner>,
    cancel: CancellationToken,
}

impl SearchController {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        SearchController {
            backend,
            inner: Mutex::new(Inner::default()),
            cancel: CancellationToken::new(),
        }
    }

    /// Initial load: searches for whatever the last query is (empty for a fresh view).
    pub async fn initialize(&self) {
        let query = self.inner.lock().await.last_query.clone();
        self.search(&query).await;
    }

    pub async fn search(&self, query: &str) -> ResultList {
        if self.cancel.is_cancelled() {
            log::warn!("Search {:?} ignored: view already closed", query);
            return self.inner.lock().await.results.clone();
        }

        let seq = {
            let mut inner = self.inner.lock().await;
            inner.latest_seq += 1;
            inner.in_flight += 1;
            inner.latest_seq
        };

        let request = SearchRequest {
            query: query.to_string(),
        };
        let outcome = tokio::select! {
            _ = self.cancel.cancelled() => None,
            res = self.backend.search(&request) => Some(res),
        };

        let mut inner = self.inner.lock().await;
        inner.in_flight -= 1;

        match outcome {
            None => log::debug!("Search #{} abandoned on teardown", seq),
            Some(Err(e)) => log_backend_error(&e),
            Some(Ok(_)) if seq != inner.latest_seq => {
                log::debug!(
                    "Dropping stale response #{} for {:?} (latest is #{})",
                    seq,
                    query,
                    inner.latest_seq
                );
            }
            Some(Ok(response)) => {
                inner.results = if query.is_empty() {
                    ResultList::empty()
                } else {
                    ResultList::from(response.results)
                };
                inner.last_query = request.query;
                if inner.results.is_empty() {
                    log::info!("Search {:?} returned no results", query);
                } else {
                    log::info!("Search {:?} returned {} results", query, inner.results.len());
                }
            }
        }

        inner.results.clone()
    }

    /// Asks the backend to flip `item`'s done flag and mirrors it locally once
    /// acknowledged. Returns whether the local list changed.
    pub async fn toggle_done(&self, item: &SearchResult) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }

        let Some(request) = ToggleRequest::flipping(item) else {
            log::warn!("Cannot toggle {:?}: result has no ID", item.title);
            return false;
        };

        let outcome = tokio::select! {
            _ = self.cancel.cancelled() => return false,
            res = self.backend.set_done(&request) => res,
        };

        if let Err(e) = outcome {
            log_backend_error(&e);
            return false;
        }

        let mut inner = self.inner.lock().await;
        match inner.results.with_done(&request.id, request.done) {
            Some(updated) => {
                inner.results = updated;
                true
            }
            None => {
                log::debug!("Toggled item {} is no longer displayed", request.id);
                false
            }
        }
    }

    /// Current item whose ID, written out, equals `key` (as it appears in a URL).
    pub async fn find_by_key(&self, key: &str) -> Option<SearchResult> {
        self.inner.lock().await.results.find_by_key(key).cloned()
    }

    pub async fn snapshot(&self) -> ControllerState {
        let inner = self.inner.lock().await;
        ControllerState {
            last_query: inner.last_query.clone(),
            is_working: inner.in_flight > 0,
            results: inner.results.clone(),
        }
    }

    /// Abandons in-flight requests; later calls become no-ops.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }
}

fn log_backend_error(err: &BackendError) {
    let code = err
        .status()
        .map(|status| status.as_u16().to_string())
        .unwrap_or_else(|| "-".to_string());
    match err {
        BackendError::Status { body, .. } => log::error!("code {}: {}", code, body),
        other => log::error!("code {}: {}", code, other),
    }
}
