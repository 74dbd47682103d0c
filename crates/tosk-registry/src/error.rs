use thiserror::Error;

/// Errors from type-registry declaration and resolution.
///
/// All of these are recoverable at registry-population time: the caller may
/// skip the offending declaration, log it, or abort the whole load unit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No type or alias with this name is visible from the starting
    /// namespace.
    #[error("name not found: {name}")]
    NotFound { name: String },

    /// The qualified name is already declared in this namespace.
    #[error("duplicate declaration: {name}")]
    DuplicateDeclaration { name: String },

    /// An alias's target could not be bound to a concrete type.
    #[error("unresolved alias {alias}: target {target} not found")]
    UnresolvedAlias { alias: String, target: String },

    /// The name is not a legal identifier or path.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
