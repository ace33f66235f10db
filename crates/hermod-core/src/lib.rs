pub mod config;
pub mod fmt;
pub mod session;

pub use config::{Config, ConfigError};
pub use session::{SessionState, ToolRecord, ToolStatus};
