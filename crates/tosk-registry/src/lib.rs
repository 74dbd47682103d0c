//! Runtime type registry for the typed-object storage kernel.
//!
//! The registry is the process-wide mapping from qualified names to type
//! descriptors. Namespaces form a tree with owned child maps; aliases are
//! declared in one phase and bound to concrete types in a second, so
//! forward and mutually-referential declarations within a load unit are
//! legal. The registry owns every descriptor for its whole lifetime;
//! callers hold copyable ids, never the descriptors themselves.
//!
//! # Concurrency
//!
//! Declaration (`declare_*`, `resolve_aliases`) is an initialization phase
//! with a single writer. After it, lookups run under a shared read lock and
//! any number of concurrent readers are safe. A lookup that has to bind a
//! still-unresolved alias briefly upgrades to the write lock.

pub mod error;
pub mod names;
pub mod registry;
pub mod types;

pub use error::{RegistryError, RegistryResult};
pub use names::validate_name;
pub use registry::TypeRegistry;
pub use types::{AliasId, NamespaceId, TypeId, TypeInfo, TypeKind, TypeLayout};
