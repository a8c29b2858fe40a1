//! Service and capability contracts consumed by the registry.
//!
//! A service is any type-erased object registered under a role name.
//! Capabilities are optional interfaces queried through accessor methods on
//! [`Service`] rather than structural probing; the default implementations
//! return `None`, so a service opts into exactly the capabilities it has.

use crate::registry::ServiceRegistry;
use std::any::Any;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

/// Boxed future used by dyn-compatible async capabilities.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A type-erased application service that can be shared across threads.
pub trait Service: Any + Debug + Send + Sync {
    /// Helper to allow downcasting from the trait object.
    fn as_any(&self) -> &dyn Any;

    /// Bind-back capability, invoked exactly once at registration time.
    fn bindable(&self) -> Option<&dyn Bindable> {
        None
    }

    /// User-facing message display capability.
    fn message_sink(&self) -> Option<&dyn MessageSink> {
        None
    }

    /// Current-file status capability.
    fn file_status(&self) -> Option<&dyn FileStatus> {
        None
    }

    /// Modal yes/no confirmation capability.
    fn dialog_prompt(&self) -> Option<&dyn DialogPrompt> {
        None
    }
}

/// Services implementing this capability receive a registry handle when they
/// are registered, so they can resolve peers lazily at call time.
pub trait Bindable: Send + Sync {
    fn bind(&self, registry: &ServiceRegistry);
}

/// A sink that surfaces messages to the user (status bar, toasts).
pub trait MessageSink: Send + Sync {
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);
    fn success(&self, message: &str);
}

/// Reports the title and dirty state of the currently edited file.
pub trait FileStatus: Send + Sync {
    fn file_title(&self) -> String;
    fn is_modified(&self) -> bool;
}

/// Asks the user a yes/no question and resolves with the decision.
///
/// Implementations typically copy the prompt strings into the returned future
/// before suspending on UI events.
pub trait DialogPrompt: Send + Sync {
    fn confirm(&self, title: &str, message: &str) -> BoxFuture<'_, bool>;
}
