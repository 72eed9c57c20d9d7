//! Cross-boundary relay.
//!
//! The isolated context holds a `RelayClient`; the privileged context
//! runs a `RelayHost`. Each request travels with its own reply handle,
//! and the host keeps that handle until the backend call has settled.
//!
//! ```text
//! RelayClient --(request, reply)--> RelayHost --> Transport --> backend
//!      ^                                |
//!      +------------ reply -------------+
//! ```

mod client;
mod host;

pub use client::RelayClient;
pub use host::RelayHost;

use tokio::sync::{mpsc, oneshot};

use crate::envelope::{RelayRequest, RelayResponse};

/// Default number of requests that may wait for the host.
pub const DEFAULT_CAPACITY: usize = 16;

/// A request in flight across the boundary.
pub(crate) struct Envelope {
    pub(crate) request: RelayRequest,
    pub(crate) correlation_id: String,
    pub(crate) reply: oneshot::Sender<RelayResponse>,
}

/// Create a connected host/client pair.
pub fn channel(
    transport: std::sync::Arc<dyn crate::Transport>,
    capacity: usize,
) -> (RelayHost, RelayClient) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (RelayHost::new(transport, rx), RelayClient::new(tx))
}
