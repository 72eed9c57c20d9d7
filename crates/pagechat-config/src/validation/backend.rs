//! Validation for the backend and chat sections.

use crate::schema::PagechatConfig;

use super::helpers::validate_range;

/// The backend must be an absolute http(s) URL.
pub(crate) fn validate_backend(errors: &mut Vec<String>, config: &PagechatConfig) {
    let base_url = config.backend.base_url.trim();
    if base_url.is_empty() {
        errors.push("backend.base_url is empty".into());
        return;
    }
    match url::Url::parse(base_url) {
        Ok(parsed) => {
            if !matches!(parsed.scheme(), "http" | "https") {
                errors.push(format!(
                    "backend.base_url = {base_url:?} must use http or https, not {}",
                    parsed.scheme()
                ));
            } else if parsed.host_str().is_none() {
                errors.push(format!("backend.base_url = {base_url:?} has no host"));
            }
        }
        Err(e) => errors.push(format!("backend.base_url = {base_url:?} is not a valid URL: {e}")),
    }
}

pub(crate) fn validate_chat(errors: &mut Vec<String>, config: &PagechatConfig) {
    validate_range(
        errors,
        "chat.max_question_len",
        config.chat.max_question_len,
        1,
        65536,
    );
}
