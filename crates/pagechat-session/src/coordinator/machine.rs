//! The coordinator state machine.

use pagechat_relay::{ChatResult, IndexResult, RelayError, RelayRequest};
use tracing::{debug, info, warn};

use crate::conversation::{Conversation, Message};

use super::types::{AskRejected, ChatCall, ChatTicket, FailureReason, Session, SessionState};
use super::{
    DEFAULT_MAX_QUESTION_LEN, STATUS_CONNECTIVITY, STATUS_IDLE, STATUS_INDEXING, STATUS_READY,
};

/// Owns the session and conversation of one page context.
pub struct Coordinator {
    session: Session,
    conversation: Conversation,
    /// Ticket of the chat call awaiting its result.
    chat_in_flight: Option<ChatTicket>,
    next_ticket: u64,
    max_question_len: usize,
}

impl Coordinator {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            session: Session::new(page_url),
            conversation: Conversation::new(),
            chat_in_flight: None,
            next_ticket: 0,
            max_question_len: DEFAULT_MAX_QUESTION_LEN,
        }
    }

    pub fn with_max_question_len(mut self, max: usize) -> Self {
        self.max_question_len = max.max(1);
        self
    }

    /// Start indexing the page.
    ///
    /// Returns the request to send, or `None` when indexing is already
    /// running or has succeeded.
    pub fn begin_indexing(&mut self) -> Option<RelayRequest> {
        match self.session.state {
            SessionState::Indexing | SessionState::Ready => {
                debug!(state = %self.session.state, "begin_indexing ignored");
                return None;
            }
            SessionState::Idle | SessionState::Failed(_) => {}
        }
        if self.session.id().is_some() {
            debug!("begin_indexing ignored: session id already assigned");
            return None;
        }

        self.session.state = SessionState::Indexing;
        info!(url = %self.session.page_url(), "Indexing page");
        Some(RelayRequest::ScrapeAndIndex {
            url: self.session.page_url().to_string(),
        })
    }

    /// Apply the result of the index request. Returns whether it was applied.
    pub fn complete_indexing(&mut self, result: Result<IndexResult, RelayError>) -> bool {
        if self.session.state != SessionState::Indexing {
            debug!(state = %self.session.state, "Index result ignored");
            return false;
        }

        match result {
            Ok(indexed) => {
                if !self.session.assign_id(indexed.session_id.clone()) {
                    warn!("Index result ignored: session id already assigned");
                    return false;
                }
                self.session.state = SessionState::Ready;
                info!(session_id = %indexed.session_id, "Page indexed");
            }
            Err(e) => {
                let reason = FailureReason::from(&e);
                warn!(error = %e, connectivity = e.is_connectivity(), "Indexing failed");
                self.session.state = SessionState::Failed(reason);
            }
        }
        true
    }

    /// Accept a question.
    ///
    /// On success the user message and a pending bot placeholder have been
    /// appended, and the returned call must be sent.
    pub fn ask(&mut self, question: &str) -> Result<ChatCall, AskRejected> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AskRejected::Empty);
        }
        let session_id = match (self.session.state(), self.session.id()) {
            (SessionState::Ready, Some(id)) => id.clone(),
            _ => {
                debug!(state = %self.session.state, "Question rejected: not ready");
                return Err(AskRejected::NotReady);
            }
        };
        if self.chat_in_flight.is_some() {
            debug!("Question rejected: answer pending");
            return Err(AskRejected::Busy);
        }
        let len = question.chars().count();
        if len > self.max_question_len {
            warn!(len, max = self.max_question_len, "Question rejected: too long");
            return Err(AskRejected::TooLong {
                len,
                max: self.max_question_len,
            });
        }

        let ticket = ChatTicket(self.next_ticket);
        self.next_ticket += 1;
        self.chat_in_flight = Some(ticket);

        self.conversation.append(Message::user(question));
        self.conversation.append(Message::pending_bot());
        debug!(%ticket, len, "Question accepted");

        Ok(ChatCall {
            ticket,
            request: RelayRequest::Chat {
                session_id,
                question: question.to_string(),
            },
        })
    }

    /// Apply the result of a chat call.
    ///
    /// Only the ticket currently in flight is honoured; a stale or
    /// repeated delivery returns `false` and changes nothing.
    pub fn complete_chat(
        &mut self,
        ticket: ChatTicket,
        result: Result<ChatResult, RelayError>,
    ) -> bool {
        if self.chat_in_flight != Some(ticket) {
            debug!(%ticket, "Chat result ignored: not in flight");
            return false;
        }
        self.chat_in_flight = None;

        let text = match result {
            Ok(chat) => chat.answer,
            Err(e) => {
                warn!(%ticket, error = %e, "Chat failed");
                format!("Error: {}", e.message)
            }
        };
        if self
            .conversation
            .mutate_last(Message::is_pending_bot, text)
            .is_none()
        {
            warn!(%ticket, "No pending placeholder to resolve");
        }
        true
    }

    /// Discard the session and start over with a fresh one for the same page.
    ///
    /// Refused while any call is outstanding. The conversation log is kept.
    pub fn reactivate(&mut self) -> bool {
        if self.session.state == SessionState::Indexing || self.chat_in_flight.is_some() {
            debug!("reactivate refused: call in flight");
            return false;
        }
        let url = self.session.page_url().to_string();
        self.session = Session::new(url);
        info!("Session reset");
        true
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    pub fn is_chat_pending(&self) -> bool {
        self.chat_in_flight.is_some()
    }

    /// User-facing status line.
    pub fn status_text(&self) -> String {
        match self.session.state() {
            SessionState::Idle => STATUS_IDLE.to_string(),
            SessionState::Indexing => STATUS_INDEXING.to_string(),
            SessionState::Ready => STATUS_READY.to_string(),
            SessionState::Failed(FailureReason::Connectivity) => STATUS_CONNECTIVITY.to_string(),
            SessionState::Failed(FailureReason::Backend(msg)) => format!("Error: {msg}"),
        }
    }
}
