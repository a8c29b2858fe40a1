//! Settings feature slice.
//!
//! Persists user settings through the async object store and exposes them as
//! a registered service under the `settings` role. The slice binds back to
//! the registry at registration time so it can resolve peers (e.g. the
//! message sink) lazily at call time.

mod error;

pub use crate::error::{SettingsError, SettingsErrorExt};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::sync::{Arc, OnceLock};
use tpad_domain::config::AppConfig;
use tpad_domain::constants::SETTINGS_STORE;
use tpad_registry::{Bindable, Service, ServiceRegistry};
use tpad_store::ObjectStore;
use tracing::{debug, info};

/// Durable user settings, keyed by plain string names.
#[derive(Debug)]
pub struct Settings {
    store: ObjectStore,
    registry: OnceLock<ServiceRegistry>,
}

impl Settings {
    /// Loads a typed setting; absent keys resolve to `None`.
    ///
    /// # Errors
    /// Returns [`SettingsError::Store`] when the underlying read fails.
    pub async fn get<V>(&self, key: &str) -> Result<Option<V>, SettingsError>
    where
        V: DeserializeOwned,
    {
        self.store.get(key).await.context("Loading setting")
    }

    /// Stores a typed setting, replacing any previous value.
    ///
    /// # Errors
    /// Returns [`SettingsError::Store`] when the underlying write fails.
    pub async fn set<V>(&self, key: &str, value: &V) -> Result<(), SettingsError>
    where
        V: Serialize + ?Sized,
    {
        debug!(%key, "Storing setting");
        self.store.add(key, value).await.context("Storing setting")
    }

    /// Removes a setting; removing an absent key is not an error.
    ///
    /// # Errors
    /// Returns [`SettingsError::Store`] when the underlying write fails.
    pub async fn remove(&self, key: &str) -> Result<(), SettingsError> {
        self.store.delete(key).await.context("Removing setting")
    }

    /// The object store backing this slice.
    #[must_use]
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// The registry handle received through [`Bindable`], once registered.
    #[must_use]
    pub fn registry(&self) -> Option<&ServiceRegistry> {
        self.registry.get()
    }
}

impl Service for Settings {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn bindable(&self) -> Option<&dyn Bindable> {
        Some(self)
    }
}

impl Bindable for Settings {
    fn bind(&self, registry: &ServiceRegistry) {
        // Bind is invoked exactly once per registration; a repeated
        // registration keeps the first handle.
        let _ = self.registry.set(registry.clone());
    }
}

/// Initialize the settings slice: build the store handle from the
/// application config and establish the connection eagerly so schema
/// problems surface during bring-up.
///
/// # Errors
/// Returns [`SettingsError::Store`] when the handle is misconfigured or the
/// store cannot be opened.
pub async fn init(config: &AppConfig) -> Result<Arc<Settings>, SettingsError> {
    let store = ObjectStore::builder()
        .name(SETTINGS_STORE)
        .root(&config.storage.data_dir)
        .version(config.storage.schema_version)
        .build()
        .context("Configuring settings store")?;
    store.open().await.context("Opening settings store")?;

    info!("Settings slice initialized");
    Ok(Arc::new(Settings { store, registry: OnceLock::new() }))
}
