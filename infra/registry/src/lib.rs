//! # Service Registry
//!
//! Central wiring point for named application services. Modules register
//! themselves under a role name during bring-up and resolve peers through the
//! registry at call time, so there is no compile-time wiring between feature
//! modules.
//!
//! # Core Behavior
//!
//! - **Lenient vs. strict lookup**: [`ServiceRegistry::resolve`] logs and
//!   returns `None` for absent roles; [`ServiceRegistry::require`] raises
//!   [`RegistryError::MissingService`] for callers that treat absence as a
//!   startup-ordering bug.
//! - **Permissive re-registration**: a conflicting registration is logged but
//!   still replaces the previous instance, so modules can re-register during
//!   live reload.
//! - **Capability interfaces**: services opt into [`Bindable`],
//!   [`MessageSink`], [`FileStatus`], or [`DialogPrompt`] through accessor
//!   methods on [`Service`]; no structural probing.
//! - **Graceful degradation**: the `show_*` helpers fall back to the logging
//!   sink when no display service is registered.
//!
//! # Example
//!
//! ```rust
//! use std::any::Any;
//! use std::sync::Arc;
//! use tpad_registry::{Service, ServiceRegistry};
//!
//! #[derive(Debug)]
//! struct Renderer;
//! impl Service for Renderer {
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//!
//! let registry = ServiceRegistry::new();
//! registry.register("renderer", Arc::new(Renderer), false);
//!
//! let renderer = registry.require("renderer").unwrap();
//! assert!(renderer.as_any().downcast_ref::<Renderer>().is_some());
//! ```

mod error;
mod features;
mod registry;
mod service;

pub use error::{RegistryError, RegistryErrorExt};
pub use features::{FeatureCache, FeatureValue};
pub use registry::{MessageKind, ServiceRegistry};
pub use service::{Bindable, BoxFuture, DialogPrompt, FileStatus, MessageSink, Service};
