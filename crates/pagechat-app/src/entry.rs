//! Wiring for the two entry points.
//!
//! `page` runs the chat inside the isolated page context: every backend
//! call is relayed through a privileged host. `popup` first asks the host
//! for the active tab URL, then calls the backend directly.

use std::sync::Arc;

use pagechat_common::{EntryPoint, PagechatError};
use pagechat_config::PagechatConfig;
use pagechat_relay::bridge::DEFAULT_CAPACITY;
use pagechat_relay::{BackendClient, DirectTransport, RelayClient, RelayRequest, Transport};
use pagechat_session::PageContext;
use tracing::info;

use crate::cli::Mode;

/// Spawn the privileged host and return the client the isolated side holds.
fn spawn_privileged(transport: DirectTransport) -> RelayClient {
    let (host, client) = pagechat_relay::channel(Arc::new(transport), DEFAULT_CAPACITY);
    tokio::spawn(host.run());
    client
}

/// Build the page context for `mode`. Must be called inside a tokio runtime.
pub async fn launch(mode: &Mode, config: &PagechatConfig) -> Result<PageContext, PagechatError> {
    let backend = BackendClient::new(config.backend.base_url.as_str())?;
    let max_question_len = config.chat.max_question_len as usize;

    let context = match mode {
        Mode::Page { url } => {
            let client = spawn_privileged(DirectTransport::new(backend));
            info!(%url, "Page entry ready");
            PageContext::new(url.clone(), EntryPoint::Floating, Arc::new(client))
        }
        Mode::Popup { tab_url } => {
            let mut privileged = DirectTransport::new(backend.clone());
            if let Some(url) = tab_url {
                privileged = privileged.with_tab_url(url.clone());
            }
            let client = spawn_privileged(privileged);
            let tab = client
                .send(RelayRequest::GetCurrentTabUrl)
                .await
                .into_tab_url()
                .map_err(|e| PagechatError::Relay(e.message))?;
            info!(url = %tab.url, "Popup entry ready");
            PageContext::new(tab.url, EntryPoint::Popup, Arc::new(DirectTransport::new(backend)))
        }
    };
    Ok(context.with_max_question_len(max_question_len))
}
