//! The two backend calls and their response normalization.

use pagechat_common::{new_correlation_id, SessionId};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::envelope::{ChatResult, IndexResult, RelayError, CHAT_FALLBACK, INDEX_FALLBACK};

use super::client::{BackendClient, CHAT_PATH, INDEX_PATH};

impl BackendClient {
    /// Ask the backend to scrape and index `url`.
    pub async fn scrape_and_index(&self, url: &str) -> Result<IndexResult, RelayError> {
        let body = serde_json::json!({ "url": url });
        let result: IndexResult = self.post(INDEX_PATH, &body, INDEX_FALLBACK).await?;
        if result.session_id.is_empty() {
            warn!("backend returned an empty session id");
            return Err(RelayError::new(INDEX_FALLBACK));
        }
        Ok(result)
    }

    /// Ask a question against an indexed session.
    pub async fn chat(
        &self,
        session_id: &SessionId,
        question: &str,
    ) -> Result<ChatResult, RelayError> {
        let body = serde_json::json!({
            "session_id": session_id,
            "question": question,
        });
        self.post(CHAT_PATH, &body, CHAT_FALLBACK).await
    }

    /// POST `body` once and decode a 2xx body into `T`.
    ///
    /// - send failure -> connectivity sentinel
    /// - non-2xx -> backend `detail` if it is a non-empty string, else `fallback`
    /// - 2xx with an unexpected body -> `fallback`
    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
        fallback: &str,
    ) -> Result<T, RelayError> {
        let cid = new_correlation_id();
        let url = self.endpoint(path);
        debug!(%cid, %url, "Backend request");

        let response = self.http.post(&url).json(body).send().await.map_err(|e| {
            warn!(%cid, %url, error = %e, "Backend unreachable");
            RelayError::connectivity()
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
                .filter(|d| !d.trim().is_empty());
            warn!(%cid, %status, detail = ?detail, "Backend returned an error");
            return Err(RelayError::new(detail.unwrap_or_else(|| fallback.to_string())));
        }

        let parsed = response.json::<T>().await.map_err(|e| {
            warn!(%cid, %status, error = %e, "Malformed backend response");
            RelayError::new(fallback)
        })?;
        debug!(%cid, %status, "Backend request succeeded");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::CONNECTIVITY_FAILURE;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(server.uri()).unwrap()
    }

    #[tokio::test]
    async fn index_success_returns_session_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape-and-index"))
            .and(body_json(json!({"url": "https://example.com/page"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "session_id": "s1",
                "message": "Content indexed successfully. Ready to chat."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .scrape_and_index("https://example.com/page")
            .await
            .unwrap();
        assert_eq!(result.session_id.as_str(), "s1");
    }

    #[tokio::test]
    async fn index_error_uses_backend_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape-and-index"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "detail": "Could not extract text from the URL."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .scrape_and_index("https://example.com/empty")
            .await
            .unwrap_err();
        assert_eq!(err.message, "Could not extract text from the URL.");
    }

    #[tokio::test]
    async fn index_error_without_detail_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape-and-index"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .scrape_and_index("https://example.com")
            .await
            .unwrap_err();
        assert_eq!(err.message, INDEX_FALLBACK);
    }

    #[tokio::test]
    async fn structured_detail_falls_back() {
        // Validation errors carry a list, not a string
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape-and-index"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "detail": [{"loc": ["body", "url"], "msg": "invalid or missing URL scheme"}]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .scrape_and_index("not-a-url")
            .await
            .unwrap_err();
        assert_eq!(err.message, INDEX_FALLBACK);
    }

    #[tokio::test]
    async fn index_malformed_success_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape-and-index"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .scrape_and_index("https://example.com")
            .await
            .unwrap_err();
        assert_eq!(err.message, INDEX_FALLBACK);
    }

    #[tokio::test]
    async fn index_empty_session_id_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape-and-index"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"session_id": ""})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .scrape_and_index("https://example.com")
            .await
            .unwrap_err();
        assert_eq!(err.message, INDEX_FALLBACK);
    }

    #[tokio::test]
    async fn chat_success_returns_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"session_id": "s1", "question": "What is X?"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "X is Y."})))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .chat(&SessionId::new("s1"), "What is X?")
            .await
            .unwrap();
        assert_eq!(result.answer, "X is Y.");
    }

    #[tokio::test]
    async fn chat_error_uses_backend_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(429).set_body_json(json!({"detail": "rate limited"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .chat(&SessionId::new("s1"), "q")
            .await
            .unwrap_err();
        assert_eq!(err.message, "rate limited");
        assert!(!err.is_connectivity());
    }

    #[tokio::test]
    async fn chat_malformed_success_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .chat(&SessionId::new("s1"), "q")
            .await
            .unwrap_err();
        assert_eq!(err.message, CHAT_FALLBACK);
    }

    #[tokio::test]
    async fn unreachable_backend_is_connectivity_failure() {
        // Bind then release a port so nothing is listening on it
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = BackendClient::new(format!("http://{addr}"))
            .unwrap()
            .scrape_and_index("https://example.com")
            .await
            .unwrap_err();
        assert_eq!(err.message, CONNECTIVITY_FAILURE);
        assert!(err.is_connectivity());
    }
}
