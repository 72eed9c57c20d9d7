//! Session state types.

use std::fmt;

use pagechat_common::SessionId;
use pagechat_relay::{RelayError, RelayRequest};

/// Why indexing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The backend was never reached.
    Connectivity,
    /// The backend (or the relay) reported an error.
    Backend(String),
}

impl From<&RelayError> for FailureReason {
    fn from(e: &RelayError) -> Self {
        if e.is_connectivity() {
            Self::Connectivity
        } else {
            Self::Backend(e.message.clone())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Indexing,
    Ready,
    Failed(FailureReason),
}

impl SessionState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Indexing => write!(f, "indexing"),
            Self::Ready => write!(f, "ready"),
            Self::Failed(_) => write!(f, "failed"),
        }
    }
}

/// The backend context bound to one page.
#[derive(Debug, Clone)]
pub struct Session {
    id: Option<SessionId>,
    pub(super) state: SessionState,
    page_url: String,
}

impl Session {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            id: None,
            state: SessionState::Idle,
            page_url: page_url.into(),
        }
    }

    pub fn id(&self) -> Option<&SessionId> {
        self.id.as_ref()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    /// Set the id. Refuses to overwrite one that is already set.
    pub(super) fn assign_id(&mut self, id: SessionId) -> bool {
        if self.id.is_some() {
            return false;
        }
        self.id = Some(id);
        true
    }
}

/// Identifies one accepted `ask`, so its result is applied at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatTicket(pub(super) u64);

impl fmt::Display for ChatTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chat-{}", self.0)
    }
}

/// An accepted question: the request to send and the ticket to complete it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCall {
    pub ticket: ChatTicket,
    pub request: RelayRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AskRejected {
    #[error("question is empty")]
    Empty,
    #[error("question is {len} characters, limit is {max}")]
    TooLong { len: usize, max: usize },
    #[error("session is not ready")]
    NotReady,
    #[error("an answer is still pending")]
    Busy,
}
