use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::names::{validate_name, validate_path};
use crate::types::{AliasId, NamespaceId, TypeId, TypeInfo, TypeLayout};

#[derive(Debug)]
struct NamespaceNode {
    name: String,
    parent: Option<NamespaceId>,
    children: HashMap<String, NamespaceId>,
    types: HashMap<String, TypeId>,
    aliases: HashMap<String, AliasId>,
}

#[derive(Debug)]
struct TypeEntry {
    name: String,
    namespace: NamespaceId,
    layout: TypeLayout,
}

#[derive(Debug)]
struct AliasEntry {
    name: String,
    namespace: NamespaceId,
    target: String,
    /// Null until the two-phase resolution binds it.
    resolved: Option<TypeId>,
}

/// Outcome of a scoped name search, before alias binding.
#[derive(Clone, Copy, Debug)]
enum Found {
    Type(TypeId),
    Alias(AliasId),
}

#[derive(Debug, Default)]
struct Inner {
    namespaces: Vec<NamespaceNode>,
    types: Vec<TypeEntry>,
    aliases: Vec<AliasEntry>,
}

impl Inner {
    fn node(&self, id: NamespaceId) -> &NamespaceNode {
        &self.namespaces[id.0 as usize]
    }

    /// Fully qualified dotted name of `name` declared in `ns`.
    fn qualified(&self, ns: NamespaceId, name: &str) -> String {
        let mut parts = Vec::new();
        let mut cursor = Some(ns);
        while let Some(id) = cursor {
            let node = self.node(id);
            if !node.name.is_empty() {
                parts.push(node.name.as_str());
            }
            cursor = node.parent;
        }
        parts.reverse();
        parts.push(name);
        parts.join(".")
    }

    /// Search one namespace: its alias table first, then its types.
    fn find_in(&self, ns: NamespaceId, name: &str) -> Option<Found> {
        let node = self.node(ns);
        if let Some(&alias) = node.aliases.get(name) {
            return Some(Found::Alias(alias));
        }
        node.types.get(name).map(|&t| Found::Type(t))
    }

    /// Find the namespace called `name` visible from `start`: checked as a
    /// direct child of `start`, then of each ancestor.
    fn find_namespace_scoped(&self, start: NamespaceId, name: &str) -> Option<NamespaceId> {
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            let node = self.node(id);
            if let Some(&child) = node.children.get(name) {
                return Some(child);
            }
            cursor = node.parent;
        }
        None
    }

    /// Scoped lookup of a simple or dotted name from `start`.
    ///
    /// Simple names search the starting namespace (aliases, then types) and
    /// walk up through the parents — lexical scoping, failing at the root.
    /// Dotted names locate their first component as a namespace the same
    /// way, descend the rest, and search the final namespace only.
    fn find_scoped(&self, start: NamespaceId, path: &str) -> RegistryResult<Found> {
        let not_found = || RegistryError::NotFound {
            name: path.to_string(),
        };

        let mut components = path.split('.');
        let first = components.next().ok_or_else(not_found)?;
        let rest: Vec<&str> = components.collect();

        if rest.is_empty() {
            let mut cursor = Some(start);
            while let Some(id) = cursor {
                if let Some(found) = self.find_in(id, first) {
                    return Ok(found);
                }
                cursor = self.node(id).parent;
            }
            return Err(not_found());
        }

        let mut ns = self.find_namespace_scoped(start, first).ok_or_else(not_found)?;
        let (last, middle) = rest.split_last().expect("rest is non-empty");
        for component in middle {
            ns = *self.node(ns).children.get(*component).ok_or_else(not_found)?;
        }
        self.find_in(ns, last).ok_or_else(not_found)
    }

    /// Bind one alias to a concrete type, following alias chains.
    ///
    /// A failed binding caches nothing, so declaring the missing target
    /// later and retrying succeeds.
    fn bind_alias(&mut self, id: AliasId, visited: &mut Vec<AliasId>) -> RegistryResult<TypeId> {
        let entry = &self.aliases[id.0 as usize];
        if let Some(resolved) = entry.resolved {
            return Ok(resolved);
        }
        let alias_name = self.qualified(entry.namespace, &entry.name);
        let target = entry.target.clone();
        let namespace = entry.namespace;

        if visited.contains(&id) {
            return Err(RegistryError::UnresolvedAlias {
                alias: alias_name,
                target,
            });
        }
        visited.push(id);

        let resolved = match self.find_scoped(namespace, &target) {
            Ok(Found::Type(t)) => t,
            Ok(Found::Alias(next)) => self.bind_alias(next, visited).map_err(|_| {
                RegistryError::UnresolvedAlias {
                    alias: alias_name.clone(),
                    target: target.clone(),
                }
            })?,
            Err(_) => {
                return Err(RegistryError::UnresolvedAlias {
                    alias: alias_name,
                    target,
                })
            }
        };
        self.aliases[id.0 as usize].resolved = Some(resolved);
        debug!(alias = %alias_name, type_id = ?resolved, "alias bound");
        Ok(resolved)
    }
}

/// The process-wide type registry.
///
/// Owns every namespace, type descriptor, and alias for its lifetime.
/// Lookups after the declaration phase run under a shared read lock;
/// declarations and alias binding take the write lock.
#[derive(Debug)]
pub struct TypeRegistry {
    inner: RwLock<Inner>,
}

impl TypeRegistry {
    /// Create a registry containing only the root namespace.
    pub fn new() -> Self {
        let root = NamespaceNode {
            name: String::new(),
            parent: None,
            children: HashMap::new(),
            types: HashMap::new(),
            aliases: HashMap::new(),
        };
        Self {
            inner: RwLock::new(Inner {
                namespaces: vec![root],
                types: Vec::new(),
                aliases: Vec::new(),
            }),
        }
    }

    /// The root namespace.
    pub fn root(&self) -> NamespaceId {
        NamespaceId(0)
    }

    /// Declare a child namespace of `parent`.
    ///
    /// Reopening an existing child returns its id: namespaces accumulate
    /// declarations across load units, so this is not a duplicate.
    pub fn declare_namespace(
        &self,
        parent: NamespaceId,
        name: &str,
    ) -> RegistryResult<NamespaceId> {
        validate_name(name)?;
        let mut inner = self.inner.write().expect("lock poisoned");
        if let Some(&existing) = inner.node(parent).children.get(name) {
            return Ok(existing);
        }
        let id = NamespaceId(inner.namespaces.len() as u32);
        inner.namespaces.push(NamespaceNode {
            name: name.to_string(),
            parent: Some(parent),
            children: HashMap::new(),
            types: HashMap::new(),
            aliases: HashMap::new(),
        });
        inner.namespaces[parent.0 as usize]
            .children
            .insert(name.to_string(), id);
        debug!(namespace = %inner.qualified(parent, name), "namespace declared");
        Ok(id)
    }

    /// Declare a type in `namespace`.
    pub fn declare_type(
        &self,
        namespace: NamespaceId,
        name: &str,
        layout: TypeLayout,
    ) -> RegistryResult<TypeId> {
        validate_name(name)?;
        let mut inner = self.inner.write().expect("lock poisoned");
        let node = inner.node(namespace);
        if node.types.contains_key(name) || node.aliases.contains_key(name) {
            return Err(RegistryError::DuplicateDeclaration {
                name: inner.qualified(namespace, name),
            });
        }
        let id = TypeId(inner.types.len() as u32);
        inner.types.push(TypeEntry {
            name: name.to_string(),
            namespace,
            layout,
        });
        inner.namespaces[namespace.0 as usize]
            .types
            .insert(name.to_string(), id);
        debug!(name = %inner.qualified(namespace, name), "type declared");
        Ok(id)
    }

    /// Declare an alias in `namespace` pointing at `target`.
    ///
    /// The target may not exist yet; the alias stays unbound until the
    /// resolution pass (or a lazy first lookup) binds it.
    pub fn declare_alias(
        &self,
        namespace: NamespaceId,
        name: &str,
        target: &str,
    ) -> RegistryResult<AliasId> {
        validate_name(name)?;
        validate_path(target)?;
        let mut inner = self.inner.write().expect("lock poisoned");
        let node = inner.node(namespace);
        if node.types.contains_key(name) || node.aliases.contains_key(name) {
            return Err(RegistryError::DuplicateDeclaration {
                name: inner.qualified(namespace, name),
            });
        }
        let id = AliasId(inner.aliases.len() as u32);
        inner.aliases.push(AliasEntry {
            name: name.to_string(),
            namespace,
            target: target.to_string(),
            resolved: None,
        });
        inner.namespaces[namespace.0 as usize]
            .aliases
            .insert(name.to_string(), id);
        debug!(name = %inner.qualified(namespace, name), target, "alias declared");
        Ok(id)
    }

    /// Resolve a simple or dotted name to a concrete type.
    ///
    /// Searches the starting namespace's aliases, then its types, then the
    /// parent chain. Hitting an unbound alias triggers lazy binding under
    /// the write lock; already-bound aliases and plain types resolve under
    /// the read lock.
    pub fn resolve(&self, name: &str, start: NamespaceId) -> RegistryResult<TypeId> {
        validate_path(name).map_err(|_| RegistryError::NotFound {
            name: name.to_string(),
        })?;

        {
            let inner = self.inner.read().expect("lock poisoned");
            match inner.find_scoped(start, name)? {
                Found::Type(t) => return Ok(t),
                Found::Alias(a) => {
                    if let Some(t) = inner.aliases[a.0 as usize].resolved {
                        return Ok(t);
                    }
                }
            }
        }

        // Unbound alias: re-run the search under the write lock and bind.
        let mut inner = self.inner.write().expect("lock poisoned");
        match inner.find_scoped(start, name)? {
            Found::Type(t) => Ok(t),
            Found::Alias(a) => inner.bind_alias(a, &mut Vec::new()),
        }
    }

    /// Explicit resolution pass: bind every still-unbound alias.
    ///
    /// Returns the number of aliases newly bound. The first alias whose
    /// target still cannot be found aborts the pass with
    /// [`RegistryError::UnresolvedAlias`]; bindings made before the failure
    /// are kept, so a later pass can finish the rest.
    pub fn resolve_aliases(&self) -> RegistryResult<usize> {
        let mut inner = self.inner.write().expect("lock poisoned");
        let mut bound = 0;
        for index in 0..inner.aliases.len() {
            if inner.aliases[index].resolved.is_some() {
                continue;
            }
            inner.bind_alias(AliasId(index as u32), &mut Vec::new())?;
            bound += 1;
        }
        Ok(bound)
    }

    /// A copy of the descriptor for `id`, or `None` for an id from another
    /// registry.
    pub fn type_info(&self, id: TypeId) -> Option<TypeInfo> {
        let inner = self.inner.read().expect("lock poisoned");
        let entry = inner.types.get(id.0 as usize)?;
        Some(TypeInfo {
            id,
            qualified_name: inner.qualified(entry.namespace, &entry.name),
            namespace: entry.namespace,
            layout: entry.layout,
        })
    }

    /// Fully qualified name of `id`, or `None` if unknown.
    pub fn qualified_name(&self, id: TypeId) -> Option<String> {
        self.type_info(id).map(|info| info.qualified_name)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeKind;

    fn scalar() -> TypeLayout {
        TypeLayout::scalar(8, 8)
    }

    // -----------------------------------------------------------------------
    // Declaration
    // -----------------------------------------------------------------------

    #[test]
    fn declare_and_resolve_type() {
        let registry = TypeRegistry::new();
        let fs = registry.declare_namespace(registry.root(), "fs").unwrap();
        let id = registry.declare_type(fs, "FileEntry", scalar()).unwrap();

        assert_eq!(registry.resolve("FileEntry", fs).unwrap(), id);
        let info = registry.type_info(id).unwrap();
        assert_eq!(info.qualified_name, "fs.FileEntry");
        assert_eq!(info.layout.kind, TypeKind::Scalar);
        assert_eq!(info.namespace, fs);
    }

    #[test]
    fn reopening_a_namespace_returns_same_id() {
        let registry = TypeRegistry::new();
        let a = registry.declare_namespace(registry.root(), "fs").unwrap();
        let b = registry.declare_namespace(registry.root(), "fs").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn duplicate_type_is_rejected() {
        let registry = TypeRegistry::new();
        let ns = registry.declare_namespace(registry.root(), "fs").unwrap();
        registry.declare_type(ns, "Blob", scalar()).unwrap();
        assert_eq!(
            registry.declare_type(ns, "Blob", scalar()),
            Err(RegistryError::DuplicateDeclaration {
                name: "fs.Blob".into()
            })
        );
    }

    #[test]
    fn type_and_alias_share_one_name_space() {
        let registry = TypeRegistry::new();
        let ns = registry.declare_namespace(registry.root(), "fs").unwrap();
        registry.declare_type(ns, "Blob", scalar()).unwrap();
        assert!(matches!(
            registry.declare_alias(ns, "Blob", "Other"),
            Err(RegistryError::DuplicateDeclaration { .. })
        ));

        registry.declare_alias(ns, "Data", "Blob").unwrap();
        assert!(matches!(
            registry.declare_type(ns, "Data", scalar()),
            Err(RegistryError::DuplicateDeclaration { .. })
        ));
    }

    #[test]
    fn same_name_in_sibling_namespaces_is_fine() {
        let registry = TypeRegistry::new();
        let a = registry.declare_namespace(registry.root(), "a").unwrap();
        let b = registry.declare_namespace(registry.root(), "b").unwrap();
        let ta = registry.declare_type(a, "Node", scalar()).unwrap();
        let tb = registry.declare_type(b, "Node", scalar()).unwrap();
        assert_ne!(ta, tb);
        assert_eq!(registry.qualified_name(ta).unwrap(), "a.Node");
        assert_eq!(registry.qualified_name(tb).unwrap(), "b.Node");
    }

    #[test]
    fn invalid_names_are_rejected() {
        let registry = TypeRegistry::new();
        assert!(matches!(
            registry.declare_namespace(registry.root(), "bad name"),
            Err(RegistryError::InvalidName { .. })
        ));
        assert!(matches!(
            registry.declare_type(registry.root(), "1Bad", scalar()),
            Err(RegistryError::InvalidName { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Lexical scoping
    // -----------------------------------------------------------------------

    #[test]
    fn lookup_walks_up_to_parent_namespaces() {
        let registry = TypeRegistry::new();
        let outer = registry.declare_namespace(registry.root(), "outer").unwrap();
        let inner = registry.declare_namespace(outer, "inner").unwrap();
        let id = registry.declare_type(outer, "Shared", scalar()).unwrap();

        assert_eq!(registry.resolve("Shared", inner).unwrap(), id);
        assert_eq!(registry.resolve("Shared", outer).unwrap(), id);
    }

    #[test]
    fn inner_declaration_shadows_outer() {
        let registry = TypeRegistry::new();
        let outer = registry.declare_namespace(registry.root(), "outer").unwrap();
        let inner = registry.declare_namespace(outer, "inner").unwrap();
        let outer_id = registry.declare_type(outer, "Node", scalar()).unwrap();
        let inner_id = registry.declare_type(inner, "Node", scalar()).unwrap();

        assert_eq!(registry.resolve("Node", inner).unwrap(), inner_id);
        assert_eq!(registry.resolve("Node", outer).unwrap(), outer_id);
    }

    #[test]
    fn lookup_fails_at_the_root() {
        let registry = TypeRegistry::new();
        let ns = registry.declare_namespace(registry.root(), "ns").unwrap();
        assert_eq!(
            registry.resolve("Missing", ns),
            Err(RegistryError::NotFound {
                name: "Missing".into()
            })
        );
    }

    #[test]
    fn dotted_path_resolves_from_visible_namespace() {
        let registry = TypeRegistry::new();
        let fs = registry.declare_namespace(registry.root(), "fs").unwrap();
        let node = registry.declare_namespace(fs, "node").unwrap();
        let id = registry.declare_type(node, "FileEntry", scalar()).unwrap();

        assert_eq!(registry.resolve("fs.node.FileEntry", registry.root()).unwrap(), id);
        assert_eq!(registry.resolve("node.FileEntry", fs).unwrap(), id);
        // A sibling namespace still sees `fs` through the root.
        let other = registry.declare_namespace(registry.root(), "other").unwrap();
        assert_eq!(registry.resolve("fs.node.FileEntry", other).unwrap(), id);
    }

    #[test]
    fn dotted_path_does_not_walk_up_for_the_final_component() {
        let registry = TypeRegistry::new();
        let fs = registry.declare_namespace(registry.root(), "fs").unwrap();
        registry.declare_namespace(fs, "node").unwrap();
        // Declared in `fs`, not in `fs.node`.
        registry.declare_type(fs, "FileEntry", scalar()).unwrap();
        assert!(matches!(
            registry.resolve("fs.node.FileEntry", registry.root()),
            Err(RegistryError::NotFound { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Alias resolution
    // -----------------------------------------------------------------------

    #[test]
    fn alias_resolves_to_its_target() {
        let registry = TypeRegistry::new();
        let ns = registry.declare_namespace(registry.root(), "ns").unwrap();
        let id = registry.declare_type(ns, "Blob", scalar()).unwrap();
        registry.declare_alias(ns, "Data", "Blob").unwrap();

        assert_eq!(registry.resolve("Data", ns).unwrap(), id);
    }

    #[test]
    fn forward_alias_binds_after_target_appears() {
        let registry = TypeRegistry::new();
        let ns = registry.declare_namespace(registry.root(), "ns").unwrap();
        registry.declare_alias(ns, "Data", "Blob").unwrap();

        // Target does not exist yet: lookup reports the unresolved alias.
        assert_eq!(
            registry.resolve("Data", ns),
            Err(RegistryError::UnresolvedAlias {
                alias: "ns.Data".into(),
                target: "Blob".into()
            })
        );

        // Declare the target; the same lookup now binds and succeeds.
        let id = registry.declare_type(ns, "Blob", scalar()).unwrap();
        assert_eq!(registry.resolve("Data", ns).unwrap(), id);
    }

    #[test]
    fn declaration_order_does_not_affect_resolution() {
        // Alias before type.
        let forward = TypeRegistry::new();
        let ns = forward.declare_namespace(forward.root(), "ns").unwrap();
        forward.declare_alias(ns, "Data", "Blob").unwrap();
        forward.declare_type(ns, "Blob", scalar()).unwrap();
        forward.resolve_aliases().unwrap();
        let via_forward = forward.type_info(forward.resolve("Data", ns).unwrap()).unwrap();

        // Type before alias.
        let backward = TypeRegistry::new();
        let ns = backward.declare_namespace(backward.root(), "ns").unwrap();
        backward.declare_type(ns, "Blob", scalar()).unwrap();
        backward.declare_alias(ns, "Data", "Blob").unwrap();
        backward.resolve_aliases().unwrap();
        let via_backward = backward.type_info(backward.resolve("Data", ns).unwrap()).unwrap();

        assert_eq!(via_forward.qualified_name, via_backward.qualified_name);
        assert_eq!(via_forward.layout, via_backward.layout);
    }

    #[test]
    fn alias_chain_binds_to_the_final_type() {
        let registry = TypeRegistry::new();
        let ns = registry.declare_namespace(registry.root(), "ns").unwrap();
        let id = registry.declare_type(ns, "Blob", scalar()).unwrap();
        registry.declare_alias(ns, "A", "B").unwrap();
        registry.declare_alias(ns, "B", "Blob").unwrap();

        assert_eq!(registry.resolve("A", ns).unwrap(), id);
    }

    #[test]
    fn alias_cycle_is_reported_not_looped() {
        let registry = TypeRegistry::new();
        let ns = registry.declare_namespace(registry.root(), "ns").unwrap();
        registry.declare_alias(ns, "A", "B").unwrap();
        registry.declare_alias(ns, "B", "A").unwrap();

        assert!(matches!(
            registry.resolve("A", ns),
            Err(RegistryError::UnresolvedAlias { .. })
        ));
    }

    #[test]
    fn cross_namespace_alias() {
        let registry = TypeRegistry::new();
        let fs = registry.declare_namespace(registry.root(), "fs").unwrap();
        let doc = registry.declare_namespace(registry.root(), "doc").unwrap();
        let id = registry.declare_type(fs, "Blob", scalar()).unwrap();
        registry.declare_alias(doc, "Content", "fs.Blob").unwrap();

        assert_eq!(registry.resolve("Content", doc).unwrap(), id);
    }

    #[test]
    fn explicit_pass_counts_and_keeps_partial_progress() {
        let registry = TypeRegistry::new();
        let ns = registry.declare_namespace(registry.root(), "ns").unwrap();
        registry.declare_type(ns, "Blob", scalar()).unwrap();
        registry.declare_alias(ns, "Good", "Blob").unwrap();
        registry.declare_alias(ns, "Bad", "Missing").unwrap();

        // `Good` binds before the pass hits `Bad` (declaration order).
        assert!(matches!(
            registry.resolve_aliases(),
            Err(RegistryError::UnresolvedAlias { .. })
        ));
        assert!(registry.resolve("Good", ns).is_ok());

        // Supply the missing target; a second pass binds the rest.
        let missing = registry.declare_type(ns, "Missing", scalar()).unwrap();
        assert_eq!(registry.resolve_aliases().unwrap(), 1);
        assert_eq!(registry.resolve("Bad", ns).unwrap(), missing);
    }

    #[test]
    fn explicit_pass_on_fully_bound_registry_is_a_noop() {
        let registry = TypeRegistry::new();
        let ns = registry.declare_namespace(registry.root(), "ns").unwrap();
        registry.declare_type(ns, "Blob", scalar()).unwrap();
        registry.declare_alias(ns, "Data", "Blob").unwrap();
        assert_eq!(registry.resolve_aliases().unwrap(), 1);
        assert_eq!(registry.resolve_aliases().unwrap(), 0);
    }

    #[test]
    fn alias_is_searched_before_type_in_the_same_scope() {
        let registry = TypeRegistry::new();
        let outer = registry.declare_namespace(registry.root(), "outer").unwrap();
        let inner = registry.declare_namespace(outer, "inner").unwrap();
        let outer_node = registry.declare_type(outer, "Node", scalar()).unwrap();
        let other = registry.declare_type(outer, "Other", scalar()).unwrap();
        // In `inner`, the alias `Node` shadows the outer type `Node`.
        registry.declare_alias(inner, "Node", "Other").unwrap();

        assert_eq!(registry.resolve("Node", inner).unwrap(), other);
        assert_eq!(registry.resolve("Node", outer).unwrap(), outer_node);
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_lookups_after_population() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(TypeRegistry::new());
        let ns = registry.declare_namespace(registry.root(), "ns").unwrap();
        let id = registry.declare_type(ns, "Blob", scalar()).unwrap();
        registry.declare_alias(ns, "Data", "Blob").unwrap();
        registry.resolve_aliases().unwrap();

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(registry.resolve("Data", ns).unwrap(), id);
                        assert_eq!(registry.resolve("Blob", ns).unwrap(), id);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().expect("thread should not panic");
        }
    }

    #[test]
    fn type_info_for_foreign_id_is_none() {
        let registry = TypeRegistry::new();
        assert!(registry.type_info(TypeId(42)).is_none());
    }
}
