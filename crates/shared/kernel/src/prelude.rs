//! Convenience re-exports for slice crates.

pub use crate::config::{ConfigError, ConfigErrorExt, load_config};
pub use tpad_domain::config::AppConfig;
pub use tpad_domain::constants;
