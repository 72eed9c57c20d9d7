//! Envelopes exchanged across the privileged boundary.
//!
//! Wire shape, as posted by the isolated context:
//! - request: `{"action": "scrapeAndIndex", "url": ...}`,
//!   `{"action": "chat", "session_id": ..., "question": ...}` or
//!   `{"action": "getCurrentTabUrl"}`
//! - response: `{"success": true, "data": {...}}` or
//!   `{"success": false, "error": "..."}`

use pagechat_common::SessionId;
use serde::{Deserialize, Serialize};

/// Message of any failure where the backend was never reached.
pub const CONNECTIVITY_FAILURE: &str = "Failed to fetch";

/// Fallback when indexing fails without a usable backend detail.
pub const INDEX_FALLBACK: &str = "Failed to index content.";

/// Fallback when a chat call fails without a usable backend detail.
pub const CHAT_FALLBACK: &str = "Failed to get answer.";

/// The privileged context did not answer (not running, or dropped the reply).
pub const BOUNDARY_UNREACHABLE: &str =
    "Could not establish connection. Receiving end does not exist.";

pub const TAB_URL_UNAVAILABLE: &str = "Could not get current tab URL.";

pub const UNKNOWN_ACTION: &str = "Unsupported relay action.";

/// A request from the isolated context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum RelayRequest {
    #[serde(rename = "scrapeAndIndex")]
    ScrapeAndIndex { url: String },
    #[serde(rename = "chat")]
    Chat {
        session_id: SessionId,
        question: String,
    },
    #[serde(rename = "getCurrentTabUrl")]
    GetCurrentTabUrl,
}

impl RelayRequest {
    /// Parse a request from raw JSON (as posted by the UI).
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "null".to_string())
    }

    /// Wire name of the action, for logging.
    pub fn action(&self) -> &'static str {
        match self {
            Self::ScrapeAndIndex { .. } => "scrapeAndIndex",
            Self::Chat { .. } => "chat",
            Self::GetCurrentTabUrl => "getCurrentTabUrl",
        }
    }

    /// Reject requests the backend could only answer with a validation error.
    pub fn validate(&self) -> Result<(), RelayError> {
        match self {
            Self::ScrapeAndIndex { url } if url.trim().is_empty() => {
                Err(RelayError::new(INDEX_FALLBACK))
            }
            Self::Chat {
                session_id,
                question,
            } if session_id.is_empty() || question.trim().is_empty() => {
                Err(RelayError::new(CHAT_FALLBACK))
            }
            _ => Ok(()),
        }
    }
}

/// Body of a successful `/scrape-and-index` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResult {
    pub session_id: SessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of a successful `/chat` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResult {
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabUrl {
    pub url: String,
}

/// Payload of a successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Index(IndexResult),
    Chat(ChatResult),
    TabUrl(TabUrl),
}

/// The only error shape that crosses the boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct RelayError {
    pub message: String,
}

impl RelayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn connectivity() -> Self {
        Self::new(CONNECTIVITY_FAILURE)
    }

    pub fn boundary_unreachable() -> Self {
        Self::new(BOUNDARY_UNREACHABLE)
    }

    /// Whether the transport never reached the backend.
    pub fn is_connectivity(&self) -> bool {
        self.message == CONNECTIVITY_FAILURE
    }

    /// Substitute `fallback` for an empty message.
    fn or_fallback(self, fallback: &str) -> Self {
        if self.message.trim().is_empty() {
            Self::new(fallback)
        } else {
            self
        }
    }
}

/// A response from the privileged context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireResponse", into = "WireResponse")]
pub enum RelayResponse {
    Success(ResponseData),
    Failure(RelayError),
}

impl RelayResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(RelayError::new(message))
    }

    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"success":false,"error":{:?}}}"#, BOUNDARY_UNREACHABLE)
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Interpret as the answer to a `scrapeAndIndex` request.
    ///
    /// A success carrying the wrong payload (or an empty session id) is a
    /// protocol error and maps to the index fallback message.
    pub fn into_index(self) -> Result<IndexResult, RelayError> {
        match self {
            Self::Success(ResponseData::Index(result)) if !result.session_id.is_empty() => {
                Ok(result)
            }
            Self::Success(_) => Err(RelayError::new(INDEX_FALLBACK)),
            Self::Failure(e) => Err(e.or_fallback(INDEX_FALLBACK)),
        }
    }

    /// Interpret as the answer to a `chat` request.
    pub fn into_chat(self) -> Result<ChatResult, RelayError> {
        match self {
            Self::Success(ResponseData::Chat(result)) => Ok(result),
            Self::Success(_) => Err(RelayError::new(CHAT_FALLBACK)),
            Self::Failure(e) => Err(e.or_fallback(CHAT_FALLBACK)),
        }
    }

    /// Interpret as the answer to a `getCurrentTabUrl` request.
    pub fn into_tab_url(self) -> Result<TabUrl, RelayError> {
        match self {
            Self::Success(ResponseData::TabUrl(tab)) if !tab.url.is_empty() => Ok(tab),
            Self::Success(_) => Err(RelayError::new(TAB_URL_UNAVAILABLE)),
            Self::Failure(e) => Err(e.or_fallback(TAB_URL_UNAVAILABLE)),
        }
    }
}

impl<T> From<Result<T, RelayError>> for RelayResponse
where
    T: Into<ResponseData>,
{
    fn from(result: Result<T, RelayError>) -> Self {
        match result {
            Ok(data) => Self::Success(data.into()),
            Err(e) => Self::Failure(e),
        }
    }
}

impl From<IndexResult> for ResponseData {
    fn from(r: IndexResult) -> Self {
        Self::Index(r)
    }
}

impl From<ChatResult> for ResponseData {
    fn from(r: ChatResult) -> Self {
        Self::Chat(r)
    }
}

impl From<TabUrl> for ResponseData {
    fn from(t: TabUrl) -> Self {
        Self::TabUrl(t)
    }
}

#[derive(Serialize, Deserialize)]
struct WireResponse {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<ResponseData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TryFrom<WireResponse> for RelayResponse {
    type Error = String;

    fn try_from(wire: WireResponse) -> Result<Self, Self::Error> {
        match (wire.success, wire.data) {
            (true, Some(data)) => Ok(Self::Success(data)),
            (true, None) => Err("success response without data".into()),
            (false, _) => Ok(Self::Failure(RelayError::new(
                wire.error.unwrap_or_default(),
            ))),
        }
    }
}

impl From<RelayResponse> for WireResponse {
    fn from(response: RelayResponse) -> Self {
        match response {
            RelayResponse::Success(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            RelayResponse::Failure(e) => Self {
                success: false,
                data: None,
                error: Some(e.message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requests_use_browser_wire_shape() {
        let req = RelayRequest::ScrapeAndIndex {
            url: "https://example.com/a".into(),
        };
        let value: serde_json::Value = serde_json::from_str(&req.to_json()).unwrap();
        assert_eq!(
            value,
            json!({"action": "scrapeAndIndex", "url": "https://example.com/a"})
        );

        let req = RelayRequest::Chat {
            session_id: SessionId::new("s1"),
            question: "What is X?".into(),
        };
        let value: serde_json::Value = serde_json::from_str(&req.to_json()).unwrap();
        assert_eq!(
            value,
            json!({"action": "chat", "session_id": "s1", "question": "What is X?"})
        );

        let value: serde_json::Value =
            serde_json::from_str(&RelayRequest::GetCurrentTabUrl.to_json()).unwrap();
        assert_eq!(value, json!({"action": "getCurrentTabUrl"}));
    }

    #[test]
    fn unknown_action_does_not_parse() {
        assert!(RelayRequest::from_json(r#"{"action":"eval","code":"1"}"#).is_none());
        assert!(RelayRequest::from_json("not json").is_none());
        assert!(RelayRequest::from_json(r#"{"action":"chat"}"#).is_none());
    }

    #[test]
    fn validate_rejects_empty_fields() {
        let err = RelayRequest::ScrapeAndIndex { url: "  ".into() }
            .validate()
            .unwrap_err();
        assert_eq!(err.message, INDEX_FALLBACK);

        let err = RelayRequest::Chat {
            session_id: SessionId::new(""),
            question: "q".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.message, CHAT_FALLBACK);

        assert!(RelayRequest::GetCurrentTabUrl.validate().is_ok());
    }

    #[test]
    fn success_response_parses_each_payload() {
        let index = RelayResponse::from_json(
            r#"{"success":true,"data":{"session_id":"s1","message":"Content indexed successfully. Ready to chat."}}"#,
        )
        .unwrap();
        assert_eq!(index.into_index().unwrap().session_id.as_str(), "s1");

        let chat =
            RelayResponse::from_json(r#"{"success":true,"data":{"answer":"X is Y."}}"#).unwrap();
        assert_eq!(chat.into_chat().unwrap().answer, "X is Y.");

        let tab = RelayResponse::from_json(r#"{"success":true,"data":{"url":"https://a.b"}}"#)
            .unwrap();
        assert_eq!(tab.into_tab_url().unwrap().url, "https://a.b");
    }

    #[test]
    fn failure_response_keeps_message() {
        let resp = RelayResponse::from_json(r#"{"success":false,"error":"rate limited"}"#).unwrap();
        assert_eq!(resp.into_chat().unwrap_err().message, "rate limited");
    }

    #[test]
    fn failure_without_message_uses_operation_fallback() {
        let resp = RelayResponse::from_json(r#"{"success":false}"#).unwrap();
        assert_eq!(resp.clone().into_index().unwrap_err().message, INDEX_FALLBACK);
        assert_eq!(resp.into_chat().unwrap_err().message, CHAT_FALLBACK);
    }

    #[test]
    fn wrong_payload_is_protocol_error() {
        let resp = RelayResponse::from_json(r#"{"success":true,"data":{"answer":"hi"}}"#).unwrap();
        assert_eq!(resp.into_index().unwrap_err().message, INDEX_FALLBACK);

        let empty_id = RelayResponse::Success(ResponseData::Index(IndexResult {
            session_id: SessionId::new(""),
            message: None,
        }));
        assert_eq!(empty_id.into_index().unwrap_err().message, INDEX_FALLBACK);
    }

    #[test]
    fn success_without_data_is_rejected() {
        assert!(RelayResponse::from_json(r#"{"success":true}"#).is_none());
    }

    #[test]
    fn response_serializes_to_wire_shape() {
        let ok: RelayResponse = Ok::<_, RelayError>(ChatResult {
            answer: "X is Y.".into(),
        })
        .into();
        let value: serde_json::Value = serde_json::from_str(&ok.to_json()).unwrap();
        assert_eq!(value, json!({"success": true, "data": {"answer": "X is Y."}}));

        let err = RelayResponse::failure("boom");
        let value: serde_json::Value = serde_json::from_str(&err.to_json()).unwrap();
        assert_eq!(value, json!({"success": false, "error": "boom"}));
    }

    #[test]
    fn connectivity_is_detected_by_message() {
        assert!(RelayError::connectivity().is_connectivity());
        assert!(!RelayError::new("Session not found.").is_connectivity());
        assert!(!RelayError::boundary_unreachable().is_connectivity());
    }
}
