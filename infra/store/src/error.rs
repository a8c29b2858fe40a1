use std::borrow::Cow;

/// A specialized [`StoreError`] enum of this crate.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Invalid handle configuration (missing name, rename after open, ...).
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The connection could not be established (engine failure, version conflict).
    #[error("Object store open failed{}: {message}", format_context(.context))]
    Open { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A write transaction could not be completed.
    #[error("Object store write failed{}: {message}", format_context(.context))]
    Write { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A read transaction could not be completed.
    #[error("Object store read failed{}: {message}", format_context(.context))]
    Read { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal object store error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Attaches static context to store results.
pub trait StoreErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, StoreError>;
}

impl<T> StoreErrorExt<T> for Result<T, StoreError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, StoreError> {
        self.map_err(|mut e| {
            match &mut e {
                StoreError::Validation { context: c, .. }
                | StoreError::Open { context: c, .. }
                | StoreError::Write { context: c, .. }
                | StoreError::Read { context: c, .. }
                | StoreError::Internal { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl From<&'static str> for StoreError {
    #[inline]
    fn from(s: &'static str) -> Self {
        Self::Internal { message: Cow::Borrowed(s), context: None }
    }
}

impl From<String> for StoreError {
    #[inline]
    fn from(s: String) -> Self {
        Self::Internal { message: Cow::Owned(s), context: None }
    }
}

pub(crate) fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
