//! Transport relay between the isolated chat UI and the retrieval backend.
//!
//! Provides:
//! - Typed request/response envelopes with the browser relay wire shape
//! - A backend HTTP client for `/scrape-and-index` and `/chat`
//! - `DirectTransport` for contexts allowed to make network calls
//! - `RelayHost` / `RelayClient` for contexts that must go through a
//!   privileged intermediary

pub mod backend;
pub mod bridge;
pub mod envelope;
pub mod transport;

pub use backend::BackendClient;
pub use bridge::{channel, RelayClient, RelayHost};
pub use envelope::{
    ChatResult, IndexResult, RelayError, RelayRequest, RelayResponse, ResponseData, TabUrl,
};
pub use transport::{DirectTransport, Transport};
