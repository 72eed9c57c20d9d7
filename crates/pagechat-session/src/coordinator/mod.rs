//! Session lifecycle coordination.
//!
//! The `Coordinator` never performs I/O. `begin_indexing` and `ask`
//! hand back the request to send; `complete_indexing` and
//! `complete_chat` feed the results back in. The serialization guards
//! therefore hold no matter how the requests are scheduled.

mod machine;
mod types;


pub use machine::Coordinator;
pub use types::{AskRejected, ChatCall, ChatTicket, FailureReason, Session, SessionState};

/// Status line before the panel has ever been opened.
pub const STATUS_IDLE: &str = "Scrape a page to begin...";
pub const STATUS_INDEXING: &str = "Scraping and indexing content... Please wait.";
pub const STATUS_READY: &str = "Ready! Ask a question below.";
/// Shown instead of the raw error when the backend could not be reached.
pub const STATUS_CONNECTIVITY: &str =
    "Error: Cannot connect to server. Make sure the backend service is running.";

/// Default longest accepted question, in characters.
pub const DEFAULT_MAX_QUESTION_LEN: usize = 4096;
