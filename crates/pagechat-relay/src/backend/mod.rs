//! Retrieval backend HTTP client.
//!
//! Speaks the two endpoints of the backend service:
//! - `POST /scrape-and-index` `{url}` -> `{session_id}`
//! - `POST /chat` `{session_id, question}` -> `{answer}`
//!
//! Every failure is normalized into a `RelayError` before it leaves
//! this module.

mod api;
mod client;

pub use client::BackendClient;
