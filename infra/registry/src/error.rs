use std::borrow::Cow;

/// Errors that can occur during strict service resolution.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A required role is absent or has not been initialized yet.
    /// Callers must treat this as a startup-ordering bug, not a recoverable
    /// runtime condition.
    #[error("Missing service{}: {message}", format_context(.context))]
    MissingService { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Attaches static context to registry results.
pub trait RegistryErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, RegistryError>;
}

impl<T> RegistryErrorExt<T> for Result<T, RegistryError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, RegistryError> {
        self.map_err(|mut e| {
            match &mut e {
                RegistryError::MissingService { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

pub(crate) fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
