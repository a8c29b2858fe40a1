//! # Async Object Store
//!
//! Durable, promise-style key/value persistence for application modules,
//! backed by a transactional embedded database ([redb](https://www.redb.org)).
//! Each handle manages exactly one object store inside one versioned database
//! file; values are opaque serde payloads supplied by the caller.
//!
//! # Core Behavior
//!
//! - **Single connection per handle**: [`ObjectStore::open`] is idempotent —
//!   a second call while a connection is live resolves with the same
//!   connection.
//! - **Transparent open-on-write**: [`ObjectStore::add`] and friends open the
//!   connection when none exists, so call sites never sequence an explicit
//!   open first.
//! - **Versioned schema**: the on-disk schema version is verified during
//!   open; the object-store table is created in the same open sequence when
//!   the file is fresh.
//! - **Typed failures**: [`StoreError::Open`] for connection/version
//!   problems, [`StoreError::Write`]/[`StoreError::Read`] for transaction
//!   failures. Storage failures are always surfaced to the caller; a write is
//!   never dropped silently.
//!
//! # Example
//!
//! ```rust
//! use tpad_store::{ObjectStore, StoreError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StoreError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     let store = ObjectStore::builder()
//!         .name("recent_files")
//!         .root(tmp.path())
//!         .build()?;
//!
//!     let connection = store.open().await?;
//!     store.add("last", &"/home/ada/sketch.tp").await?;
//!
//!     let last: Option<String> = store.get("last").await?;
//!     assert_eq!(last.as_deref(), Some("/home/ada/sketch.tp"));
//!
//!     drop(connection);
//!     store.close().await;
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;

pub use builder::ObjectStoreBuilder;
pub use engine::{DEFAULT_SCHEMA_VERSION, ObjectStore};
pub use error::{StoreError, StoreErrorExt};
