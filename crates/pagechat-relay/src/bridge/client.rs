//! Isolated side of the relay.

use async_trait::async_trait;
use pagechat_common::new_correlation_id;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use crate::envelope::{RelayRequest, RelayResponse, UNKNOWN_ACTION};
use crate::transport::Transport;

use super::Envelope;

/// Posts requests to a `RelayHost` and waits for the reply.
#[derive(Clone)]
pub struct RelayClient {
    tx: mpsc::Sender<Envelope>,
}

impl RelayClient {
    pub(crate) fn new(tx: mpsc::Sender<Envelope>) -> Self {
        Self { tx }
    }

    /// Relay a raw JSON message and return the raw JSON reply.
    ///
    /// Never fails: unparseable input comes back as an error envelope.
    pub async fn dispatch_json(&self, raw: &str) -> String {
        match RelayRequest::from_json(raw) {
            Some(request) => self.send(request).await.to_json(),
            None => {
                warn!(body_len = raw.len(), "Relay message rejected: failed to parse");
                RelayResponse::failure(UNKNOWN_ACTION).to_json()
            }
        }
    }
}

#[async_trait]
impl Transport for RelayClient {
    async fn send(&self, request: RelayRequest) -> RelayResponse {
        let correlation_id = new_correlation_id();
        let action = request.action();
        let (reply, response) = oneshot::channel();

        let envelope = Envelope {
            request,
            correlation_id: correlation_id.clone(),
            reply,
        };
        if self.tx.send(envelope).await.is_err() {
            warn!(cid = %correlation_id, action, "Relay host is not running");
            return RelayResponse::Failure(crate::RelayError::boundary_unreachable());
        }

        match response.await {
            Ok(resp) => resp,
            Err(_) => {
                warn!(cid = %correlation_id, action, "Relay host dropped the reply");
                RelayResponse::Failure(crate::RelayError::boundary_unreachable())
            }
        }
    }
}
