//! Capability-flag cache scoped by group.
//!
//! Flags are populated by a one-time [`detect`](FeatureCache::detect) pass and
//! thereafter read-only except for explicit overrides through
//! [`set`](FeatureCache::set).

use fxhash::FxHashMap;
use parking_lot::RwLock;
use tpad_domain::constants::{GROUP_GENERAL, GROUP_HOST, GROUP_RUNTIME};
use tracing::debug;

/// A cached capability value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureValue {
    Bool(bool),
    Text(String),
}

impl FeatureValue {
    /// Falsy values are `Bool(false)` and the empty string.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Text(value) => !value.is_empty(),
        }
    }

    /// Returns the textual form of the flag, if it has one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Bool(_) => None,
            Self::Text(value) => Some(value),
        }
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Cache of capability flags keyed by (group, name).
///
/// Lookup of an unset flag returns a falsy default, never an error.
#[derive(Debug, Default)]
pub struct FeatureCache {
    flags: RwLock<FxHashMap<(String, String), FeatureValue>>,
}

impl FeatureCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `(group, name)`; overwrites silently.
    /// Flags without an explicit group land in the general group.
    pub fn set(&self, name: &str, value: impl Into<FeatureValue>, group: Option<&str>) {
        let group = group.unwrap_or(GROUP_GENERAL);
        self.flags.write().insert((group.to_owned(), name.to_owned()), value.into());
    }

    /// Returns the stored value or a falsy default if absent; never fails.
    #[must_use]
    pub fn get(&self, name: &str, group: Option<&str>) -> FeatureValue {
        let group = group.unwrap_or(GROUP_GENERAL);
        self.flags
            .read()
            .get(&(group.to_owned(), name.to_owned()))
            .cloned()
            .unwrap_or(FeatureValue::Bool(false))
    }

    /// Truthiness shortcut over [`get`](Self::get).
    #[must_use]
    pub fn check(&self, name: &str, group: Option<&str>) -> bool {
        self.get(name, group).is_truthy()
    }

    /// Runs the environment probes and populates the cache.
    ///
    /// Fire-and-forget: the result is the side effect on the cache. Probes
    /// stay cheap (no I/O), so detection can run during application boot.
    pub fn detect(&self) {
        self.set("os", std::env::consts::OS, Some(GROUP_HOST));
        self.set("arch", std::env::consts::ARCH, Some(GROUP_HOST));
        self.set("family", std::env::consts::FAMILY, Some(GROUP_HOST));
        self.set("display", detect_display(), Some(GROUP_HOST));
        self.set("home", std::env::var_os("HOME").is_some(), Some(GROUP_HOST));

        let threads = std::thread::available_parallelism().map_or(1, std::num::NonZero::get);
        self.set("threads", threads.to_string(), Some(GROUP_RUNTIME));

        debug!("Feature detection pass finished");
    }

    /// Dumps all cached flags to the log; diagnostics only.
    pub fn log(&self) {
        let flags = self.flags.read();
        debug!(count = flags.len(), "Cached capability flags");
        for ((group, name), value) in flags.iter() {
            debug!(%group, %name, ?value, "Capability");
        }
    }
}

fn detect_display() -> bool {
    if cfg!(windows) || cfg!(target_os = "macos") {
        return true;
    }
    std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flag_is_falsy() {
        let cache = FeatureCache::new();
        assert_eq!(cache.get("missing", None), FeatureValue::Bool(false));
        assert!(!cache.check("missing", Some("host")));
    }

    #[test]
    fn set_then_get_round_trips() {
        let cache = FeatureCache::new();
        cache.set("clipboard", true, Some("host"));
        cache.set("engine", "duktape", Some("scripting"));

        assert_eq!(cache.get("clipboard", Some("host")), FeatureValue::Bool(true));
        assert_eq!(cache.get("engine", Some("scripting")).as_text(), Some("duktape"));
    }

    #[test]
    fn groups_are_isolated() {
        let cache = FeatureCache::new();
        cache.set("flag", true, Some("host"));
        assert!(cache.check("flag", Some("host")));
        assert!(!cache.check("flag", Some("runtime")));
        assert!(!cache.check("flag", None));
    }

    #[test]
    fn set_overwrites_silently() {
        let cache = FeatureCache::new();
        cache.set("flag", true, None);
        cache.set("flag", false, None);
        assert!(!cache.check("flag", None));
    }

    #[test]
    fn empty_text_is_falsy() {
        let cache = FeatureCache::new();
        cache.set("engine", "", Some("scripting"));
        assert!(!cache.check("engine", Some("scripting")));
    }

    #[test]
    fn detect_populates_host_group() {
        let cache = FeatureCache::new();
        cache.detect();
        assert_eq!(cache.get("os", Some("host")).as_text(), Some(std::env::consts::OS));
        assert!(cache.check("threads", Some("runtime")));
    }
}
