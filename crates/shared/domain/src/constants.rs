//! Well-known names shared across the workspace.

/// Role under which the settings service registers itself.
pub const SETTINGS: &str = "settings";
/// Role of the user-facing message sink (status bar / toast area).
pub const MESSAGE: &str = "message";
/// Role of the service that tracks the currently edited file.
pub const FILE: &str = "file";
/// Role of the modal confirmation dialog service.
pub const DIALOG: &str = "dialog";
/// Role of the editor surface itself.
pub const EDITOR: &str = "editor";

/// Fallback capability-flag group.
pub const GROUP_GENERAL: &str = "general";
/// Capability flags describing the host environment (OS, display, paths).
pub const GROUP_HOST: &str = "host";
/// Capability flags describing the async runtime.
pub const GROUP_RUNTIME: &str = "runtime";
/// Capability flags describing the embedded scripting engine.
pub const GROUP_SCRIPTING: &str = "scripting";

/// Logical database name for persisted user settings.
pub const SETTINGS_STORE: &str = "settings";

/// Prefix for environment-variable configuration overrides (`TPAD__...`).
pub const ENV_PREFIX: &str = "TPAD";
