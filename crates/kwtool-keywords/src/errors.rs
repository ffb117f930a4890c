use thiserror::Error;

#[derive(Error, Debug, Eq, PartialEq)]
pub enum KeywordError {
    #[error("no packages match '{atom}'")]
    NoMatches { atom: String },

    #[error("'{marker}' is not followed by a parenthesized group")]
    MissingGroup { marker: String },
}

/// Failures from a [`PackageQuery`](crate::resolve::PackageQuery) backend are passed through
/// untouched, so the error type stays open. Use `downcast_ref::<KeywordError>()` to tell the
/// conditions above apart.
pub type KeywordResult<T> = anyhow::Result<T>;
