//! Page context: one coordinator, one surface, one transport.
//!
//! Requests emitted by the coordinator run as tokio tasks; their results
//! come back over a channel and are applied here, so the coordinator is
//! only ever mutated from the context's own loop.

use std::sync::Arc;

use pagechat_common::EntryPoint;
use pagechat_relay::{ChatResult, IndexResult, RelayError, RelayRequest, Transport};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::conversation::{Conversation, ConversationUpdate};
use crate::coordinator::{AskRejected, ChatTicket, Coordinator, SessionState};
use crate::surface::{Controls, EntrySurface};

/// Result of a backend call, on its way back to the context.
enum Completion {
    Indexed(Result<IndexResult, RelayError>),
    Answered {
        ticket: ChatTicket,
        result: Result<ChatResult, RelayError>,
    },
}

/// Which kind of call a completion settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Index,
    Chat,
}

pub struct PageContext {
    coordinator: Coordinator,
    surface: EntrySurface,
    transport: Arc<dyn Transport>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl PageContext {
    pub fn new(
        page_url: impl Into<String>,
        entry: EntryPoint,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            coordinator: Coordinator::new(page_url),
            surface: EntrySurface::new(entry),
            transport,
            completion_tx,
            completion_rx,
            in_flight: 0,
        }
    }

    pub fn with_max_question_len(mut self, max: usize) -> Self {
        self.coordinator = self.coordinator.with_max_question_len(max);
        self
    }

    /// Reveal the panel, starting indexing if the surface asks for it.
    ///
    /// Returns whether an index request was sent.
    pub fn open(&mut self) -> bool {
        if !self.surface.reveal(self.coordinator.state()) {
            return false;
        }
        self.begin_indexing()
    }

    pub fn close(&mut self) {
        self.surface.hide();
    }

    /// Flip the panel. Returns whether an index request was sent.
    pub fn toggle(&mut self) -> bool {
        if self.surface.toggle(self.coordinator.state()) {
            self.begin_indexing()
        } else {
            false
        }
    }

    fn begin_indexing(&mut self) -> bool {
        match self.coordinator.begin_indexing() {
            Some(request) => {
                self.spawn_index(request);
                true
            }
            None => false,
        }
    }

    /// Submit a question from the input control.
    pub fn submit(&mut self, question: &str) -> Result<ChatTicket, AskRejected> {
        let call = self.coordinator.ask(question)?;
        self.spawn_chat(call.ticket, call.request);
        Ok(call.ticket)
    }

    /// Reset to a fresh session and, if the panel is open, index again.
    ///
    /// Returns whether the session was reset.
    pub fn reactivate(&mut self) -> bool {
        if !self.coordinator.reactivate() {
            return false;
        }
        if self.surface.is_panel_open() {
            self.begin_indexing();
        }
        true
    }

    fn spawn_index(&mut self, request: RelayRequest) {
        let transport = Arc::clone(&self.transport);
        let tx = self.completion_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = transport.send(request).await.into_index();
            // The context may be gone; nothing to do then.
            let _ = tx.send(Completion::Indexed(result));
        });
    }

    fn spawn_chat(&mut self, ticket: ChatTicket, request: RelayRequest) {
        let transport = Arc::clone(&self.transport);
        let tx = self.completion_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = transport.send(request).await.into_chat();
            let _ = tx.send(Completion::Answered { ticket, result });
        });
    }

    fn apply(&mut self, completion: Completion) -> CompletionKind {
        self.in_flight = self.in_flight.saturating_sub(1);
        match completion {
            Completion::Indexed(result) => {
                self.coordinator.complete_indexing(result);
                info!(state = %self.coordinator.state(), "Index call settled");
                CompletionKind::Index
            }
            Completion::Answered { ticket, result } => {
                self.coordinator.complete_chat(ticket, result);
                debug!(%ticket, "Chat call settled");
                CompletionKind::Chat
            }
        }
    }

    /// Wait for the next outstanding call to settle and apply it.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<CompletionKind> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.completion_rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Apply completions until no call is outstanding.
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn state(&self) -> &SessionState {
        self.coordinator.state()
    }

    pub fn status_text(&self) -> String {
        self.coordinator.status_text()
    }

    pub fn controls(&self) -> Controls {
        self.surface
            .controls(self.coordinator.state(), self.coordinator.is_chat_pending())
    }

    pub fn surface(&self) -> &EntrySurface {
        &self.surface
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn conversation(&self) -> &Conversation {
        self.coordinator.conversation()
    }

    pub fn drain_updates(&mut self) -> Vec<ConversationUpdate> {
        self.coordinator.conversation_mut().drain_updates()
    }
}
