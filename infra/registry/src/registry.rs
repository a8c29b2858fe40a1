use crate::error::RegistryError;
use crate::features::FeatureCache;
use crate::service::Service;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tpad_domain::constants::{DIALOG, FILE, GROUP_HOST, GROUP_RUNTIME, GROUP_SCRIPTING, MESSAGE};
use tracing::{debug, error, info, trace, warn};

/// Message severities understood by the display sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Warning,
    Info,
    Success,
}

#[derive(Debug, Default)]
struct RegistryInner {
    /// Role name -> registration. `None` models a role that was declared
    /// during bring-up but whose instance has not been constructed yet.
    services: RwLock<FxHashMap<String, Option<Arc<dyn Service>>>>,
    features: FeatureCache,
}

/// Single source of truth for "which service instance implements role X".
///
/// The registry is created once per application session and passed by handle
/// to every module at construction time; modules resolve peers by role name
/// at call time instead of being wired at compile time. The handle is
/// internally reference-counted and can be cheaply cloned across threads or
/// tasks.
///
/// Lookups come in two flavors:
/// * [`resolve`](Self::resolve) — lenient: logs and returns `None` on failure.
/// * [`require`](Self::require) — strict: raises [`RegistryError::MissingService`],
///   which callers treat as a startup-ordering bug.
///
/// # Example
///
/// ```rust
/// use tpad_registry::{Service, ServiceRegistry};
/// use std::any::Any;
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct Editor;
/// impl Service for Editor {
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let registry = ServiceRegistry::new();
/// registry.register("editor", Arc::new(Editor), false);
/// assert!(registry.resolve("editor").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    inner: Arc<RegistryInner>,
}

impl ServiceRegistry {
    /// Creates a new, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `instance` under `role`.
    ///
    /// Re-registering a role that already holds a live instance without
    /// `overwrite` is a reportable conflict: it is logged as an error but the
    /// prior registration is still replaced. Downstream modules rely on late
    /// re-registration during live reload, so availability wins over
    /// strictness here.
    ///
    /// If the instance exposes the [`Bindable`](crate::service::Bindable)
    /// capability it receives a handle to this registry, exactly once. This
    /// is the sole place where the registry <-> service cycle is created;
    /// both ends share process lifetime.
    pub fn register(&self, role: impl Into<String>, instance: Arc<dyn Service>, overwrite: bool) {
        let role = role.into();
        {
            let mut services = self.inner.services.write();
            if matches!(services.get(&role), Some(Some(_))) && !overwrite {
                error!(%role, "Service already registered, replacing");
            }
            debug!(%role, "Registering service");
            services.insert(role.clone(), Some(instance.clone()));
        }

        // Bind outside the lock: the callback may resolve other roles.
        if let Some(bindable) = instance.bindable() {
            trace!(%role, "Binding registry handle into service");
            bindable.bind(self);
        }
    }

    /// Marks `role` as known-but-uninitialized.
    ///
    /// Resolution of a declared role warns instead of reporting an unknown
    /// role; a later [`register`](Self::register) supplies the live instance.
    pub fn declare(&self, role: impl Into<String>) {
        let role = role.into();
        let mut services = self.inner.services.write();
        if matches!(services.get(&role), Some(Some(_))) {
            warn!(%role, "Live service downgraded to declared-only");
        }
        services.insert(role, None);
    }

    /// Lenient lookup: returns the live instance registered under `role`.
    ///
    /// An unknown role logs an error, a declared-but-uninitialized role logs
    /// a warning; both return `None` instead of failing.
    #[must_use]
    pub fn resolve(&self, role: &str) -> Option<Arc<dyn Service>> {
        let services = self.inner.services.read();
        match services.get(role) {
            None => {
                error!(%role, "Service is not registered");
                None
            },
            Some(None) => {
                warn!(%role, "Service is not initialized yet");
                None
            },
            Some(Some(instance)) => Some(Arc::clone(instance)),
        }
    }

    /// Strict lookup: like [`resolve`](Self::resolve) but raises on failure.
    ///
    /// # Errors
    /// Returns [`RegistryError::MissingService`] when the role was never
    /// registered or is still uninitialized.
    pub fn require(&self, role: &str) -> Result<Arc<dyn Service>, RegistryError> {
        let services = self.inner.services.read();
        match services.get(role) {
            None => {
                error!(%role, "Required service is not registered");
                Err(RegistryError::MissingService {
                    message: role.to_owned().into(),
                    context: Some("not registered".into()),
                })
            },
            Some(None) => {
                warn!(%role, "Required service is not initialized yet");
                Err(RegistryError::MissingService {
                    message: role.to_owned().into(),
                    context: Some("not initialized yet".into()),
                })
            },
            Some(Some(instance)) => Ok(Arc::clone(instance)),
        }
    }

    /// Returns the roles currently known to the registry, live or declared.
    #[must_use]
    pub fn roles(&self) -> Vec<String> {
        self.inner.services.read().keys().cloned().collect()
    }

    // --- Capability flags ---

    /// Stores a capability flag; overwrites silently.
    pub fn set_feature(
        &self,
        name: &str,
        value: impl Into<crate::features::FeatureValue>,
        group: Option<&str>,
    ) {
        self.inner.features.set(name, value, group);
    }

    /// Checks a capability flag; unset flags are falsy, never an error.
    #[must_use]
    pub fn check_feature(&self, name: &str, group: Option<&str>) -> bool {
        self.inner.features.check(name, group)
    }

    /// Checks a flag in the host-environment group.
    #[must_use]
    pub fn check_host_feature(&self, name: &str) -> bool {
        self.check_feature(name, Some(GROUP_HOST))
    }

    /// Checks a flag in the runtime group.
    #[must_use]
    pub fn check_runtime_feature(&self, name: &str) -> bool {
        self.check_feature(name, Some(GROUP_RUNTIME))
    }

    /// Checks a flag in the scripting-engine group.
    #[must_use]
    pub fn check_scripting_feature(&self, name: &str) -> bool {
        self.check_feature(name, Some(GROUP_SCRIPTING))
    }

    /// Runs the one-time environment detection pass.
    pub fn detect_features(&self) {
        self.inner.features.detect();
    }

    /// Dumps all cached capability flags to the log.
    pub fn log_features(&self) {
        self.inner.features.log();
    }

    /// Direct access to the capability cache.
    #[must_use]
    pub fn features(&self) -> &FeatureCache {
        &self.inner.features
    }

    // --- User-facing messages ---

    /// Routes a message to the display sink registered under the `message`
    /// role. When the sink is absent the message degrades to the logging
    /// sink at the matching level, so the application never fails just
    /// because a UI component did not register.
    pub fn notify(&self, kind: MessageKind, message: &str) {
        let sink = self.resolve(MESSAGE);
        if let Some(sink) = sink.as_ref().and_then(|svc| svc.message_sink()) {
            match kind {
                MessageKind::Error => sink.error(message),
                MessageKind::Warning => sink.warning(message),
                MessageKind::Info => sink.info(message),
                MessageKind::Success => sink.success(message),
            }
            return;
        }
        match kind {
            MessageKind::Error => error!("{message}"),
            MessageKind::Warning => warn!("{message}"),
            MessageKind::Info | MessageKind::Success => info!("{message}"),
        }
    }

    /// Shows an error message over the display sink.
    pub fn show_error(&self, message: &str) {
        self.notify(MessageKind::Error, message);
    }

    /// Shows a warning message over the display sink.
    pub fn show_warning(&self, message: &str) {
        self.notify(MessageKind::Warning, message);
    }

    /// Shows an info message over the display sink.
    pub fn show_info(&self, message: &str) {
        self.notify(MessageKind::Info, message);
    }

    /// Shows a success message over the display sink.
    pub fn show_success(&self, message: &str) {
        self.notify(MessageKind::Success, message);
    }

    // --- Unsaved changes ---

    /// Runs `action` unless the user keeps unsaved changes.
    ///
    /// Resolves the `file` role; when it reports unsaved modifications the
    /// `dialog` role is asked for a yes/no decision first. "Yes" runs the
    /// action, "no" skips it. When the file service is absent or reports no
    /// modifications the action runs immediately. The returned decision is
    /// `true` exactly when the action ran.
    ///
    /// This is the only human-mediated suspension point in the core: the
    /// future stays pending until the dialog service resolves.
    pub async fn confirm_discard_unsaved_changes<A>(&self, action: A) -> bool
    where
        A: FnOnce(),
    {
        let mut title = String::new();
        let mut modified = false;
        let file = self.resolve(FILE);
        if let Some(status) = file.as_ref().and_then(|svc| svc.file_status()) {
            title = status.file_title();
            modified = status.is_modified();
        }

        if !modified {
            action();
            return true;
        }

        let dialog = self.resolve(DIALOG);
        let confirmed = match dialog.as_ref().and_then(|svc| svc.dialog_prompt()) {
            Some(prompt) => {
                prompt
                    .confirm(
                        &format!("Unsaved changes for {title}"),
                        "Changes have not been saved. Discard them?",
                    )
                    .await
            },
            None => {
                warn!(%title, "No dialog service registered, discarding unsaved changes");
                true
            },
        };

        if confirmed {
            action();
        }
        confirmed
    }
}
