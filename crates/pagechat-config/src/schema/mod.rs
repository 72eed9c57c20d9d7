//! Configuration schema types for Pagechat.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod backend;
mod system;

pub use backend::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PagechatConfig {
    pub backend: BackendConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}
