use thiserror::Error;
use tosk_bind::BindError;

/// Errors from version derivation.
#[derive(Debug, Error)]
pub enum VersionError {
    /// Reading the archive stream failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serializing the object through the binder failed.
    #[error(transparent)]
    Bind(#[from] BindError),
}

/// Result alias for versioning operations.
pub type VersionResult<T> = Result<T, VersionError>;
