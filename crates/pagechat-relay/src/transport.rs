//! The `Transport` seam between the session layer and the network.

use async_trait::async_trait;
use tracing::debug;

use crate::backend::BackendClient;
use crate::envelope::{RelayError, RelayRequest, RelayResponse, TabUrl, TAB_URL_UNAVAILABLE};

/// Sends one request and resolves with exactly one response.
///
/// Implementations never fail out-of-band: every failure is folded into
/// `RelayResponse::Failure`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RelayRequest) -> RelayResponse;
}

/// Performs backend calls in the current context.
#[derive(Debug, Clone)]
pub struct DirectTransport {
    backend: BackendClient,
    tab_url: Option<String>,
}

impl DirectTransport {
    pub fn new(backend: BackendClient) -> Self {
        Self {
            backend,
            tab_url: None,
        }
    }

    /// Answer `getCurrentTabUrl` with `url`.
    pub fn with_tab_url(mut self, url: impl Into<String>) -> Self {
        self.tab_url = Some(url.into());
        self
    }
}

#[async_trait]
impl Transport for DirectTransport {
    async fn send(&self, request: RelayRequest) -> RelayResponse {
        if let Err(e) = request.validate() {
            debug!(action = request.action(), "Request rejected before sending");
            return RelayResponse::Failure(e);
        }

        match request {
            RelayRequest::ScrapeAndIndex { url } => self.backend.scrape_and_index(&url).await.into(),
            RelayRequest::Chat {
                session_id,
                question,
            } => self.backend.chat(&session_id, &question).await.into(),
            RelayRequest::GetCurrentTabUrl => match self.tab_url {
                Some(ref url) => RelayResponse::Success(TabUrl { url: url.clone() }.into()),
                None => RelayResponse::Failure(RelayError::new(TAB_URL_UNAVAILABLE)),
            },
        }
    }
}
