pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, PagechatError};
pub use id::{new_correlation_id, SessionId};
pub use types::{EntryPoint, Sender};

pub type Result<T> = std::result::Result<T, PagechatError>;
