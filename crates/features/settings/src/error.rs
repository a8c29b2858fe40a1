use std::borrow::Cow;
use tpad_store::StoreError;

/// Settings slice error type.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A persistence operation against the object store failed.
    #[error("Settings storage error{}: {source}", format_context(.context))]
    Store {
        #[source]
        source: StoreError,
        context: Option<Cow<'static, str>>,
    },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Settings error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Attaches static context to settings results.
pub trait SettingsErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, SettingsError>;
}

impl<T> SettingsErrorExt<T> for Result<T, SettingsError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, SettingsError> {
        self.map_err(|mut e| {
            match &mut e {
                SettingsError::Store { context: c, .. }
                | SettingsError::Internal { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> SettingsErrorExt<T> for Result<T, StoreError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, SettingsError> {
        self.map_err(|source| SettingsError::Store { source, context: Some(context.into()) })
    }
}

impl From<StoreError> for SettingsError {
    #[inline]
    fn from(source: StoreError) -> Self {
        Self::Store { source, context: None }
    }
}

pub(crate) fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
