//! Core object-store implementation: one versioned redb database per store
//! name, one object-store table per handle, async operations that run the
//! blocking engine work on the blocking thread pool.

use crate::builder::ObjectStoreBuilder;
use crate::error::StoreError;
use parking_lot::RwLock;
use redb::{Database, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tokio::task::spawn_blocking;
use tracing::{debug, info, trace};

/// Internal table tracking the on-disk schema version of a store.
const META_TABLE: TableDefinition<'static, &'static str, u32> = TableDefinition::new("__meta__");
const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Schema version used when a handle does not request one explicitly.
pub const DEFAULT_SCHEMA_VERSION: u32 = 1;

const DB_FILE_SUFFIX: &str = "redb";

/// The internal shared state of an [`ObjectStore`] handle.
#[derive(Debug)]
pub(crate) struct ObjectStoreInner {
    /// Logical database name; also names the file on disk.
    pub(crate) store_name: String,
    /// Name of the single object-store table. Defaults to the store name and
    /// is immutable once a connection is open.
    pub(crate) object_store_name: RwLock<String>,
    /// Target schema version for this handle.
    pub(crate) version: u32,
    /// Directory holding the database files.
    pub(crate) root: PathBuf,
    /// The open connection, if any. At most one per handle.
    pub(crate) connection: Mutex<Option<Arc<Database>>>,
    /// Mirrors `connection.is_some()` for lock-free state checks.
    pub(crate) opened: AtomicBool,
}

/// A promise-style handle to one durable key/value object store.
///
/// Each handle wraps a single versioned redb database holding exactly one
/// object-store table. The handle is created without I/O; the connection is
/// established by [`open`](Self::open) or transparently by the first write.
/// Handles are internally reference-counted and can be cheaply cloned across
/// tasks.
///
/// Operations issued through one handle are observed in program order by the
/// caller, but the wrapper does not serialize concurrent calls beyond what
/// the engine guarantees: two concurrent [`add`](Self::add) calls to the same
/// key race at the engine's transaction isolation, not in this wrapper.
///
/// # Example
///
/// ```rust
/// use tpad_store::{ObjectStore, StoreError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), StoreError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     let store = ObjectStore::builder()
///         .name("settings")
///         .root(tmp.path())
///         .build()?;
///
///     // The first write opens the connection transparently.
///     store.add("theme", &"dark").await?;
///
///     let theme: Option<String> = store.get("theme").await?;
///     assert_eq!(theme.as_deref(), Some("dark"));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ObjectStore {
    pub(crate) inner: Arc<ObjectStoreInner>,
}

impl ObjectStore {
    /// Creates a handle with default configuration: the object-store table is
    /// named after the store, the schema version is
    /// [`DEFAULT_SCHEMA_VERSION`], and files live under `TPAD_DATA_DIR`
    /// (falling back to `data/`).
    #[must_use]
    pub fn new(store_name: impl Into<String>) -> Self {
        let store_name = store_name.into();
        Self {
            inner: Arc::new(ObjectStoreInner {
                object_store_name: RwLock::new(store_name.clone()),
                store_name,
                version: DEFAULT_SCHEMA_VERSION,
                root: default_data_dir(),
                connection: Mutex::new(None),
                opened: AtomicBool::new(false),
            }),
        }
    }

    /// Returns a new [`ObjectStoreBuilder`] to configure a handle.
    #[must_use = "The store handle is not created until you call .build()"]
    pub fn builder() -> ObjectStoreBuilder {
        ObjectStoreBuilder::new()
    }

    /// The logical database name of this handle.
    #[must_use]
    pub fn store_name(&self) -> &str {
        &self.inner.store_name
    }

    /// The current object-store table name.
    #[must_use]
    pub fn object_store_name(&self) -> String {
        self.inner.object_store_name.read().clone()
    }

    /// Renames the object-store table.
    ///
    /// # Errors
    /// Returns [`StoreError::Validation`] once a connection is open: the
    /// table name is part of the open schema and immutable until
    /// [`close`](Self::close).
    pub fn set_object_store_name(&self, name: impl Into<String>) -> Result<(), StoreError> {
        if self.is_open() {
            return Err(StoreError::Validation {
                message: "Object store name is immutable while a connection is open".into(),
                context: Some(self.inner.store_name.clone().into()),
            });
        }
        *self.inner.object_store_name.write() = name.into();
        Ok(())
    }

    /// Whether this handle currently holds an open connection.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.opened.load(Ordering::Acquire)
    }

    /// Establishes the connection, or returns the existing one.
    ///
    /// Idempotent: a second call while a connection is live resolves with the
    /// same connection instead of touching the engine again. On first open
    /// the backing file is created if needed, the schema version is checked
    /// against the on-disk version, and the object-store table is created as
    /// part of the same open sequence.
    ///
    /// # Errors
    /// Returns [`StoreError::Open`] when the engine reports a connection
    /// error or when the on-disk schema version is newer than this handle's
    /// target version (another instance upgraded the store).
    pub async fn open(&self) -> Result<Arc<Database>, StoreError> {
        let mut connection = self.inner.connection.lock().await;
        if let Some(db) = connection.as_ref() {
            trace!(store = %self.inner.store_name, "Reusing open connection");
            return Ok(Arc::clone(db));
        }

        let path = self.db_path();
        let table = self.object_store_name();
        let version = self.inner.version;
        let db = spawn_blocking(move || open_blocking(&path, &table, version))
            .await
            .map_err(|e| StoreError::Internal {
                message: e.to_string().into(),
                context: Some("Open task failed".into()),
            })??;

        let db = Arc::new(db);
        *connection = Some(Arc::clone(&db));
        self.inner.opened.store(true, Ordering::Release);
        info!(
            store = %self.inner.store_name,
            version = self.inner.version,
            "Object store connection established"
        );
        Ok(db)
    }

    /// Stores `value` under `key`, committing one write transaction.
    ///
    /// Opens the connection transparently when none exists, so call sites do
    /// not need to sequence an explicit [`open`](Self::open) first. An
    /// existing record under `key` is replaced; concurrent writes to the same
    /// key are resolved by the engine, last committed writer wins.
    ///
    /// # Errors
    /// Returns [`StoreError::Write`] when the value cannot be encoded or the
    /// transaction cannot commit (e.g., out of disk space).
    pub async fn add<V>(&self, key: impl Into<String>, value: &V) -> Result<(), StoreError>
    where
        V: Serialize + ?Sized,
    {
        let db = self.open().await?;
        let key = key.into();
        let bytes = postcard::to_stdvec(value).map_err(|e| StoreError::Write {
            message: e.to_string().into(),
            context: Some("Encoding value".into()),
        })?;
        let table = self.object_store_name();

        spawn_blocking(move || add_blocking(&db, &table, &key, &bytes)).await.map_err(|e| {
            StoreError::Internal {
                message: e.to_string().into(),
                context: Some("Write task failed".into()),
            }
        })?
    }

    /// Loads the value stored under `key`.
    ///
    /// Resolves with `Ok(None)` for an absent key; [`StoreError::Read`] is
    /// reserved for engine and decoding failures.
    ///
    /// # Errors
    /// Returns [`StoreError::Read`] when the read transaction fails or the
    /// stored bytes cannot be decoded into `V`.
    pub async fn get<V>(&self, key: impl Into<String>) -> Result<Option<V>, StoreError>
    where
        V: DeserializeOwned,
    {
        let db = self.open().await?;
        let key = key.into();
        let table = self.object_store_name();

        let bytes = spawn_blocking(move || get_blocking(&db, &table, &key)).await.map_err(|e| {
            StoreError::Internal {
                message: e.to_string().into(),
                context: Some("Read task failed".into()),
            }
        })??;

        match bytes {
            None => Ok(None),
            Some(bytes) => postcard::from_bytes(&bytes).map(Some).map_err(|e| StoreError::Read {
                message: e.to_string().into(),
                context: Some("Decoding value".into()),
            }),
        }
    }

    /// Removes the record stored under `key`; removing an absent key is not
    /// an error.
    ///
    /// # Errors
    /// Returns [`StoreError::Write`] when the transaction cannot commit.
    pub async fn delete(&self, key: impl Into<String>) -> Result<(), StoreError> {
        let db = self.open().await?;
        let key = key.into();
        let table = self.object_store_name();

        spawn_blocking(move || delete_blocking(&db, &table, &key)).await.map_err(|e| {
            StoreError::Internal {
                message: e.to_string().into(),
                context: Some("Write task failed".into()),
            }
        })?
    }

    /// Releases the connection. A later [`open`](Self::open) re-establishes
    /// it; there is no automatic close on idle.
    pub async fn close(&self) {
        let mut connection = self.inner.connection.lock().await;
        self.inner.opened.store(false, Ordering::Release);
        if connection.take().is_some() {
            debug!(store = %self.inner.store_name, "Object store connection closed");
        }
    }

    fn db_path(&self) -> PathBuf {
        self.inner.root.join(format!("{}.{DB_FILE_SUFFIX}", self.inner.store_name))
    }
}

pub(crate) fn default_data_dir() -> PathBuf {
    std::env::var_os("TPAD_DATA_DIR").map_or_else(|| PathBuf::from("data"), PathBuf::from)
}

fn open_blocking(path: &Path, table: &str, version: u32) -> Result<Database, StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::Open {
            message: e.to_string().into(),
            context: Some(format!("Creating data directory {}", parent.display()).into()),
        })?;
    }

    // Opens an existing database or creates a fresh file.
    let db = Database::create(path).map_err(|e| StoreError::Open {
        message: e.to_string().into(),
        context: Some(format!("Opening {}", path.display()).into()),
    })?;

    let txn = db.begin_write().map_err(|e| StoreError::Open {
        message: e.to_string().into(),
        context: Some("Starting schema transaction".into()),
    })?;
    {
        let mut meta = txn.open_table(META_TABLE).map_err(|e| StoreError::Open {
            message: e.to_string().into(),
            context: Some("Opening meta table".into()),
        })?;

        let on_disk = meta
            .get(SCHEMA_VERSION_KEY)
            .map_err(|e| StoreError::Open {
                message: e.to_string().into(),
                context: Some("Reading schema version".into()),
            })?
            .map(|guard| guard.value());

        match on_disk {
            Some(existing) if existing > version => {
                // Dropping the transaction aborts it; nothing was changed.
                return Err(StoreError::Open {
                    message: format!(
                        "Version conflict: on-disk schema {existing} is newer than requested {version}"
                    )
                    .into(),
                    context: None,
                });
            },
            Some(existing) if existing < version => {
                debug!(from = existing, to = version, "Upgrading object store schema");
                meta.insert(SCHEMA_VERSION_KEY, version).map_err(|e| StoreError::Open {
                    message: e.to_string().into(),
                    context: Some("Writing schema version".into()),
                })?;
            },
            Some(_) => {},
            None => {
                debug!(version, "Creating object store schema");
                meta.insert(SCHEMA_VERSION_KEY, version).map_err(|e| StoreError::Open {
                    message: e.to_string().into(),
                    context: Some("Writing schema version".into()),
                })?;
            },
        }

        // The object store itself is created in the same open sequence.
        let definition = TableDefinition::<&str, &[u8]>::new(table);
        txn.open_table(definition).map_err(|e| StoreError::Open {
            message: e.to_string().into(),
            context: Some("Creating object store table".into()),
        })?;
    }
    txn.commit().map_err(|e| StoreError::Open {
        message: e.to_string().into(),
        context: Some("Committing schema transaction".into()),
    })?;

    Ok(db)
}

fn add_blocking(db: &Database, table: &str, key: &str, value: &[u8]) -> Result<(), StoreError> {
    let definition = TableDefinition::<&str, &[u8]>::new(table);
    let txn = db.begin_write().map_err(|e| StoreError::Write {
        message: e.to_string().into(),
        context: Some("Starting write transaction".into()),
    })?;
    {
        let mut table = txn.open_table(definition).map_err(|e| StoreError::Write {
            message: e.to_string().into(),
            context: Some("Opening object store table".into()),
        })?;
        table.insert(key, value).map_err(|e| StoreError::Write {
            message: e.to_string().into(),
            context: Some("Storing record".into()),
        })?;
    }
    txn.commit().map_err(|e| StoreError::Write {
        message: e.to_string().into(),
        context: Some("Committing write transaction".into()),
    })
}

fn get_blocking(db: &Database, table: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
    let definition = TableDefinition::<&str, &[u8]>::new(table);
    let txn = db.begin_read().map_err(|e| StoreError::Read {
        message: e.to_string().into(),
        context: Some("Starting read transaction".into()),
    })?;
    let table = txn.open_table(definition).map_err(|e| StoreError::Read {
        message: e.to_string().into(),
        context: Some("Opening object store table".into()),
    })?;
    let value = table
        .get(key)
        .map_err(|e| StoreError::Read {
            message: e.to_string().into(),
            context: Some("Loading record".into()),
        })?
        .map(|guard| guard.value().to_vec());
    Ok(value)
}

fn delete_blocking(db: &Database, table: &str, key: &str) -> Result<(), StoreError> {
    let definition = TableDefinition::<&str, &[u8]>::new(table);
    let txn = db.begin_write().map_err(|e| StoreError::Write {
        message: e.to_string().into(),
        context: Some("Starting write transaction".into()),
    })?;
    {
        let mut table = txn.open_table(definition).map_err(|e| StoreError::Write {
            message: e.to_string().into(),
            context: Some("Opening object store table".into()),
        })?;
        table.remove(key).map_err(|e| StoreError::Write {
            message: e.to_string().into(),
            context: Some("Removing record".into()),
        })?;
    }
    txn.commit().map_err(|e| StoreError::Write {
        message: e.to_string().into(),
        context: Some("Committing write transaction".into()),
    })
}
