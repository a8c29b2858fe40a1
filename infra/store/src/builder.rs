use crate::engine::{DEFAULT_SCHEMA_VERSION, ObjectStore, ObjectStoreInner};
use crate::error::StoreError;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tokio::sync::Mutex;

/// A fluent builder for configuring an [`ObjectStore`] handle.
///
/// Building performs no I/O; the connection is established by
/// [`ObjectStore::open`] or transparently by the first write.
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ObjectStoreBuilder {
    name: Option<String>,
    object_store_name: Option<String>,
    root: Option<PathBuf>,
    version: Option<u32>,
}

impl ObjectStoreBuilder {
    /// Creates a new [`ObjectStoreBuilder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the logical database name (required).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Overrides the object-store table name; defaults to the store name.
    pub fn object_store_name(mut self, name: impl Into<String>) -> Self {
        self.object_store_name = Some(name.into());
        self
    }

    /// Sets the directory holding the database files.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the target schema version; defaults to
    /// [`DEFAULT_SCHEMA_VERSION`]. Versions start at 1.
    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Consumes the builder and produces the store handle.
    ///
    /// # Errors
    /// * [`StoreError::Validation`] if the store name is missing or the
    ///   requested schema version is zero.
    pub fn build(self) -> Result<ObjectStore, StoreError> {
        let store_name = self.name.ok_or(StoreError::Validation {
            message: "Store name is required".into(),
            context: None,
        })?;
        let version = self.version.unwrap_or(DEFAULT_SCHEMA_VERSION);
        if version == 0 {
            return Err(StoreError::Validation {
                message: "Schema versions start at 1".into(),
                context: Some(store_name.clone().into()),
            });
        }

        let object_store_name = self.object_store_name.unwrap_or_else(|| store_name.clone());
        let root = self.root.unwrap_or_else(crate::engine::default_data_dir);

        Ok(ObjectStore {
            inner: Arc::new(ObjectStoreInner {
                store_name,
                object_store_name: RwLock::new(object_store_name),
                version,
                root,
                connection: Mutex::new(None),
                opened: AtomicBool::new(false),
            }),
        })
    }
}
