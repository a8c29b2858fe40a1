//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it re-exports ergonomic helpers for config loading.
//!
//! ## Config loading
//! ```rust,no_run
//! use tpad_kernel::config::load_config;
//! use tpad_kernel::domain::config::AppConfig;
//!
//! let cfg: AppConfig = load_config(Some("studio")).unwrap_or_default();
//! ```

pub mod config;
pub mod prelude;

pub use tpad_domain as domain;
