use std::fmt;

/// Index of a namespace in its registry. Copyable; the registry owns the
/// node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NamespaceId(pub(crate) u32);

/// Index of a type descriptor in its registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeId(pub(crate) u32);

/// Index of an alias entry in its registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AliasId(pub(crate) u32);

/// Broad shape of a registered type, used when interpreting raw blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Fixed-width scalar value.
    Scalar,
    /// Aggregate with a fixed field layout.
    Record,
    /// Variable-length payload (stored externally past a threshold).
    Buffer,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::Record => write!(f, "record"),
            Self::Buffer => write!(f, "buffer"),
        }
    }
}

/// Layout information sufficient to interpret a raw block of this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeLayout {
    /// Size in bytes of the inline representation. Zero for pure
    /// variable-length types.
    pub size: u64,
    /// Required alignment of the inline representation.
    pub align: u32,
    /// Broad shape tag.
    pub kind: TypeKind,
}

impl TypeLayout {
    pub const fn new(size: u64, align: u32, kind: TypeKind) -> Self {
        Self { size, align, kind }
    }

    /// Layout of a fixed-width scalar.
    pub const fn scalar(size: u64, align: u32) -> Self {
        Self::new(size, align, TypeKind::Scalar)
    }

    /// Layout of a variable-length buffer type.
    pub const fn buffer() -> Self {
        Self::new(0, 1, TypeKind::Buffer)
    }
}

/// A snapshot of one type's descriptor, returned by lookups.
///
/// This is a copy; the descriptor itself stays owned by the registry for
/// the registry's whole lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeInfo {
    /// The type's own id.
    pub id: TypeId,
    /// Fully qualified dotted name.
    pub qualified_name: String,
    /// The namespace that declared the type.
    pub namespace: NamespaceId,
    /// Layout of the type's stored representation.
    pub layout: TypeLayout,
}
