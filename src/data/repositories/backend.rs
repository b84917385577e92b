use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

use crate::data::models::{BackendError, SearchRequest, SearchResponse, ToggleRequest};

const SEARCH_PATH: &str = "search/";

/// Remote side of the controller: one call per user action.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, BackendError>;

    /// Acknowledges a `Done` change. The reply body is ignored.
    async fn set_done(&self, request: &ToggleRequest) -> Result<(), BackendError>;
}

pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base: Url, timeout: Option<Duration>) -> Result<Self, BackendError> {
        if base.cannot_be_a_base() {
            return Err(BackendError::InvalidBaseUrl(base.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(HttpBackend {
            client: builder.build()?,
            base: with_trailing_slash(base),
        })
    }

    fn search_url(&self) -> Result<Url, BackendError> {
        self.base
            .join(SEARCH_PATH)
            .map_err(|e| BackendError::InvalidBaseUrl(e.to_string()))
    }

    // The ID becomes one encoded path segment directly under the base.
    fn item_url(&self, request: &ToggleRequest) -> Result<Url, BackendError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(&request.id.to_string());
        Ok(url)
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, BackendError> {
        let url = self.search_url()?;
        log::debug!("POST {} {:?}", url, request.query);

        let response = self.client.post(url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        Ok(response.json::<SearchResponse>().await?)
    }

    async fn set_done(&self, request: &ToggleRequest) -> Result<(), BackendError> {
        let url = self.item_url(request)?;
        log::debug!("PUT {} done={}", url, request.done);

        let response = self.client.put(url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        Ok(())
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
