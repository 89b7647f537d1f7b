//! Type handles for instance-of, exact-type, subclass and coercion checks.
//!
//! A [`TypeHandle`] is a shared, named node in a small inheritance graph.
//! Handles compare by identity: two classes that happen to share a name are
//! still different types.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

// ============================================================================
// TYPE HANDLE
// ============================================================================

/// A shared handle to a named type and its bases.
///
/// # Examples
///
/// ```rust,ignore
/// use nebula_member::foundation::TypeHandle;
///
/// let shape = TypeHandle::new("Shape");
/// let circle = TypeHandle::with_bases("Circle", [shape.clone()]);
///
/// assert!(circle.is_subclass_of(&shape));
/// assert!(!shape.is_subclass_of(&circle));
/// ```
#[derive(Clone)]
pub struct TypeHandle(Arc<TypeInfo>);

struct TypeInfo {
    name: String,
    bases: Vec<TypeHandle>,
}

impl TypeHandle {
    /// Creates a new type deriving directly from `object`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_bases(name, [builtins().object.clone()])
    }

    /// Creates a new type with the given bases.
    ///
    /// An empty base list creates a root type.
    pub fn with_bases(name: impl Into<String>, bases: impl IntoIterator<Item = TypeHandle>) -> Self {
        Self(Arc::new(TypeInfo {
            name: name.into(),
            bases: bases.into_iter().collect(),
        }))
    }

    fn root(name: &str) -> Self {
        Self::with_bases(name, [])
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns the direct bases of this type.
    #[must_use]
    pub fn bases(&self) -> &[TypeHandle] {
        &self.0.bases
    }

    /// Returns `true` if `self` is `other` or derives from it.
    #[must_use]
    pub fn is_subclass_of(&self, other: &TypeHandle) -> bool {
        self == other || self.bases().iter().any(|base| base.is_subclass_of(other))
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class '{}'>", self.name())
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// BUILT-IN TYPES
// ============================================================================

/// Handles for the built-in value kinds.
///
/// Created once on first use and never mutated afterwards.
#[derive(Debug)]
pub struct Builtins {
    /// Root of every type.
    pub object: TypeHandle,
    /// Type of `Value::None`.
    pub none: TypeHandle,
    /// Type of `Value::Int`.
    pub int: TypeHandle,
    /// Type of `Value::Bool`; derives from `int`.
    pub bool: TypeHandle,
    /// Type of `Value::Float`.
    pub float: TypeHandle,
    /// Type of `Value::Bytes`.
    pub bytes: TypeHandle,
    /// Type of `Value::Str`.
    pub str: TypeHandle,
    /// Type of `Value::Tuple`.
    pub tuple: TypeHandle,
    /// Type of `Value::List`.
    pub list: TypeHandle,
    /// Type of `Value::Dict`.
    pub dict: TypeHandle,
    /// Type of `Value::Type`.
    pub type_: TypeHandle,
    /// Type of `Value::Callable`.
    pub function: TypeHandle,
    /// Type of `Value::Member`.
    pub member: TypeHandle,
}

static BUILTINS: LazyLock<Builtins> = LazyLock::new(|| {
    let object = TypeHandle::root("object");
    let derived = |name: &str| TypeHandle::with_bases(name, [object.clone()]);
    let int = derived("int");
    Builtins {
        none: derived("NoneType"),
        bool: TypeHandle::with_bases("bool", [int.clone()]),
        int,
        float: derived("float"),
        bytes: derived("bytes"),
        str: derived("str"),
        tuple: derived("tuple"),
        list: derived("list"),
        dict: derived("dict"),
        type_: derived("type"),
        function: derived("function"),
        member: derived("Member"),
        object,
    }
});

/// Returns the process-wide built-in type handles.
#[must_use]
pub fn builtins() -> &'static Builtins {
    &BUILTINS
}

// ============================================================================
// TESTS
// ============================================================================
