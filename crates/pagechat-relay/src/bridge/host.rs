//! Privileged side of the relay.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::transport::Transport;

use super::Envelope;

/// Receives requests from isolated contexts and performs them.
pub struct RelayHost {
    transport: Arc<dyn Transport>,
    rx: mpsc::Receiver<Envelope>,
}

impl RelayHost {
    pub(crate) fn new(transport: Arc<dyn Transport>, rx: mpsc::Receiver<Envelope>) -> Self {
        Self { transport, rx }
    }

    /// Serve until every `RelayClient` has been dropped.
    ///
    /// Each request runs on its own task so a slow backend call does not
    /// hold up the others.
    pub async fn run(mut self) {
        info!("Relay host started");
        while let Some(envelope) = self.rx.recv().await {
            let transport = Arc::clone(&self.transport);
            tokio::spawn(async move {
                let Envelope {
                    request,
                    correlation_id,
                    reply,
                } = envelope;
                let action = request.action();
                debug!(cid = %correlation_id, action, "Relaying request");

                let response = transport.send(request).await;
                let success = response.is_success();
                if reply.send(response).is_err() {
                    debug!(cid = %correlation_id, action, "Requester went away before reply");
                } else {
                    debug!(cid = %correlation_id, action, success, "Reply delivered");
                }
            });
        }
        info!("Relay host stopped");
    }
}
