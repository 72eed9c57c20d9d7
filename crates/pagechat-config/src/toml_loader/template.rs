//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Pagechat Configuration
# Only override what you want to change -- missing fields use defaults.

[backend]
# Retrieval service that serves /scrape-and-index and /chat.
# base_url = "http://127.0.0.1:8000"

[chat]
# max_question_len = 4096    # 1-65536 characters

[logging]
# level = "INFO"             # DEBUG, INFO, WARNING, ERROR
"##
}
