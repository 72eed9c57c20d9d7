//! Per-page chat session for Pagechat.
//!
//! - `Coordinator`: the session state machine (`Idle`, `Indexing`,
//!   `Ready`, `Failed`) that emits relay requests and absorbs their results
//! - `Conversation`: the message log with its single pending slot
//! - `EntrySurface`: visibility and input-control rules of the chat panel
//! - `PageContext`: runs the three on one event loop against a `Transport`

pub mod context;
pub mod conversation;
pub mod coordinator;
pub mod surface;

pub use context::{CompletionKind, PageContext};
pub use conversation::{Conversation, ConversationUpdate, Message};
pub use coordinator::{
    AskRejected, ChatCall, ChatTicket, Coordinator, FailureReason, Session, SessionState,
};
pub use surface::{Controls, EntrySurface};
