//! Backend client struct and endpoint resolution.

use pagechat_common::{PagechatError, Result};

pub(crate) const INDEX_PATH: &str = "/scrape-and-index";
pub(crate) const CHAT_PATH: &str = "/chat";

const USER_AGENT: &str = concat!("pagechat/", env!("CARGO_PKG_VERSION"));

/// HTTP client bound to one backend base URL.
///
/// No request timeout is configured: a call settles only when the
/// backend answers or the connection fails.
#[derive(Debug, Clone)]
pub struct BackendClient {
    pub(crate) base_url: String,
    pub(crate) http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PagechatError::Relay(format!("failed to build HTTP client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
