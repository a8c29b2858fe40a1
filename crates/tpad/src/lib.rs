//! Facade crate for `TinkerPad` features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Create one [`ServiceRegistry`](tpad_registry::ServiceRegistry) per session.
//! - Call [`init`] during bring-up to detect capabilities and register
//!   feature slices; extend as new slices appear.

pub use tpad_domain as domain;
pub use tpad_kernel as kernel;
pub use tpad_registry as registry;
pub use tpad_store as store;

use tpad_domain::config::AppConfig;
use tpad_domain::constants::SETTINGS;
use tpad_registry::ServiceRegistry;

/// Feature registry for runtime introspection.
pub mod features {
    pub use tpad_settings as settings;

    /// Build-time enabled features.
    pub const ENABLED: &[&str] = &["settings"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all enabled features.
///
/// Runs the one-time capability detection pass, then initializes each feature
/// slice and registers it into the provided registry.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub async fn init(
    config: &AppConfig,
    registry: &ServiceRegistry,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    registry.detect_features();

    // Settings
    let settings = features::settings::init(config).await?;
    registry.register(SETTINGS, settings, false);

    tracing::info!(enabled = ?features::ENABLED, "Feature slices registered");
    Ok(())
}
