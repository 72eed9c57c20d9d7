//! Backend service and chat input configuration.

use serde::{Deserialize, Serialize};

/// Where the retrieval backend lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL; `/scrape-and-index` and `/chat` are joined onto it.
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
        }
    }
}

/// Question input limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Longest accepted question, in characters (valid range: 1-65536).
    pub max_question_len: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_question_len: 4096,
        }
    }
}
