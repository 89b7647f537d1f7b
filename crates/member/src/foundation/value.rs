//! The dynamic value model validated by members.
//!
//! [`Value`] covers the scalar kinds (bool, int, float, bytes, str), the
//! three container kinds (tuple, list, dict) and the reference kinds that
//! appear in member contexts (types, callables, owners, members).
//!
//! Cloning a value never copies payload data: strings, byte strings, tuples
//! and dicts are reference counted, lists are shared handles.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::foundation::{Atom, AtomRef, Callable, TypeHandle, builtins, same_atom};
use crate::list::{List, Walk};
use crate::member::Member;

/// Insertion-ordered mapping used by `Value::Dict`.
pub type Dict = IndexMap<Value, Value>;

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
    /// The absent value.
    #[default]
    None,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Double precision float.
    Float(f64),
    /// Immutable byte string.
    Bytes(Arc<[u8]>),
    /// Immutable text string.
    Str(Arc<str>),
    /// Immutable fixed-size sequence.
    Tuple(Arc<[Value]>),
    /// Shared mutable sequence.
    List(List),
    /// Insertion-ordered mapping.
    Dict(Arc<Dict>),
    /// A type handle.
    Type(TypeHandle),
    /// A user function.
    Callable(Callable),
    /// An owner object.
    Object(AtomRef),
    /// A member descriptor.
    Member(Arc<Member>),
}

impl Value {
    // ==================== Constructors ====================

    /// Creates a text value.
    pub fn str(s: impl AsRef<str>) -> Self {
        Self::Str(Arc::from(s.as_ref()))
    }

    /// Creates a byte-string value.
    pub fn bytes(b: impl AsRef<[u8]>) -> Self {
        Self::Bytes(Arc::from(b.as_ref()))
    }

    /// Creates a tuple from any sequence of values.
    pub fn tuple<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Creates a two-element tuple.
    pub fn pair(first: impl Into<Value>, second: impl Into<Value>) -> Self {
        Self::Tuple(Arc::from([first.into(), second.into()]))
    }

    /// Creates a plain (unbound) list.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::List(List::new(items.into_iter().map(Into::into).collect()))
    }

    /// Creates a dict from key-value pairs, keeping their order.
    pub fn dict<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::Dict(Arc::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    // ==================== Type queries ====================

    /// Returns the concrete type of this value.
    #[must_use]
    pub fn type_handle(&self) -> TypeHandle {
        let b = builtins();
        match self {
            Self::None => b.none.clone(),
            Self::Bool(_) => b.bool.clone(),
            Self::Int(_) => b.int.clone(),
            Self::Float(_) => b.float.clone(),
            Self::Bytes(_) => b.bytes.clone(),
            Self::Str(_) => b.str.clone(),
            Self::Tuple(_) => b.tuple.clone(),
            Self::List(_) => b.list.clone(),
            Self::Dict(_) => b.dict.clone(),
            Self::Type(_) => b.type_.clone(),
            Self::Callable(_) => b.function.clone(),
            Self::Object(atom) => atom.atom_type().clone(),
            Self::Member(_) => b.member.clone(),
        }
    }

    /// Returns the name of this value's concrete type.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::Object(atom) => atom.atom_type().name().to_owned(),
            other => other.type_handle().name().to_owned(),
        }
    }

    /// Returns `true` if `self` is an instance of `ty` or of a subclass.
    #[must_use]
    pub fn is_instance_of(&self, ty: &TypeHandle) -> bool {
        self.type_handle().is_subclass_of(ty)
    }

    /// Returns `true` if the value can be invoked.
    #[must_use]
    pub fn is_callable(&self) -> bool {
        match self {
            Self::Callable(_) | Self::Type(_) => true,
            Self::Object(atom) => atom.is_callable(),
            _ => false,
        }
    }

    /// Checks if this is `None`.
    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns `true` if the value can serve as a dict key.
    ///
    /// Lists are mutable in place, so a list (or a tuple holding one) would
    /// change its hash while stored as a key.
    #[must_use]
    pub fn is_hashable(&self) -> bool {
        match self {
            Self::List(_) => false,
            Self::Tuple(items) => items.iter().all(Self::is_hashable),
            _ => true,
        }
    }

    // ==================== Accessors ====================

    /// Returns the boolean payload.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer payload.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float payload.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the text payload.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the byte-string payload.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the tuple items.
    #[must_use]
    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the list handle.
    #[must_use]
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the dict entries.
    #[must_use]
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Self::Dict(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the type handle payload.
    #[must_use]
    pub fn as_type(&self) -> Option<&TypeHandle> {
        match self {
            Self::Type(ty) => Some(ty),
            _ => None,
        }
    }

    /// Returns the owner payload.
    #[must_use]
    pub fn as_object(&self) -> Option<&AtomRef> {
        match self {
            Self::Object(atom) => Some(atom),
            _ => None,
        }
    }

    /// Returns the member payload.
    #[must_use]
    pub fn as_member(&self) -> Option<&Arc<Member>> {
        match self {
            Self::Member(member) => Some(member),
            _ => None,
        }
    }

    /// Returns `true` if both values are the same object (not merely equal).
    #[must_use]
    pub fn is_same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Str(a), Self::Str(b)) => Arc::ptr_eq(a, b),
            (Self::Bytes(a), Self::Bytes(b)) => Arc::ptr_eq(a, b),
            (Self::Tuple(a), Self::Tuple(b)) => Arc::ptr_eq(a, b),
            (Self::Dict(a), Self::Dict(b)) => Arc::ptr_eq(a, b),
            (Self::List(a), Self::List(b)) => a.ptr_eq(b),
            (Self::Object(a), Self::Object(b)) => same_atom(a, b),
            (Self::Member(a), Self::Member(b)) => Arc::ptr_eq(a, b),
            (a, b) => a == b && !a.is_container(),
        }
    }

    fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Str(_) | Self::Bytes(_) | Self::Tuple(_) | Self::List(_) | Self::Dict(_)
        )
    }
}

// ============================================================================
// EQUALITY AND HASHING
// ============================================================================

/// Float equality used by `Value`: NaN equals NaN and +0.0 equals -0.0.
fn float_eq(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

fn float_hash<H: Hasher>(f: f64, state: &mut H) {
    if f.is_nan() {
        f64::NAN.to_bits().hash(state);
    } else if f == 0.0 {
        0.0f64.to_bits().hash(state);
    } else {
        f.to_bits().hash(state);
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => float_eq(*a, *b),
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Dict(a), Self::Dict(b)) => a == b,
            (Self::Type(a), Self::Type(b)) => a == b,
            (Self::Callable(a), Self::Callable(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => same_atom(a, b),
            (Self::Member(a), Self::Member(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

/// Lists hash by their current contents. A list used as a `Dict` key and
/// mutated afterwards can no longer be found; see [`Value::is_hashable`].
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::None => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(f) => float_hash(*f, state),
            Self::Bytes(b) => b.hash(state),
            Self::Str(s) => s.hash(state),
            Self::Tuple(items) => items.hash(state),
            Self::List(list) => list.hash(state),
            Self::Dict(map) => {
                // Dict equality ignores order, so the hash must too.
                let mut acc = 0u64;
                for (k, v) in map.iter() {
                    let mut entry = DefaultHasher::new();
                    k.hash(&mut entry);
                    v.hash(&mut entry);
                    acc = acc.wrapping_add(entry.finish());
                }
                map.len().hash(state);
                acc.hash(state);
            }
            Self::Type(ty) => ty.hash(state),
            Self::Callable(c) => c.hash(state),
            Self::Object(atom) => std::ptr::hash(Arc::as_ptr(atom).cast::<()>(), state),
            Self::Member(member) => std::ptr::hash(Arc::as_ptr(member), state),
        }
    }
}

// ============================================================================
// DISPLAY
// ============================================================================

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Renders values the way they appear in diagnostics: `None`, `True`,
/// `'text'`, `b'bytes'`, `(1, 2)`, `[1, 2]`, `{'k': 1}`. A list reached
/// through itself renders as `[...]`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Bytes(b) => write!(f, "b'{}'", b.escape_ascii()),
            Self::Str(s) => write!(f, "'{}'", s.escape_debug()),
            Self::Tuple(items) => {
                f.write_str("(")?;
                write_seq(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Self::List(list) => {
                let Some(_walking) = list.enter(None, Walk::Display) else {
                    return f.write_str("[...]");
                };
                f.write_str("[")?;
                write_seq(f, &list.to_vec())?;
                f.write_str("]")
            }
            Self::Dict(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Self::Type(ty) => write!(f, "{ty:?}"),
            Self::Callable(c) => write!(f, "{c:?}"),
            Self::Object(atom) => write!(f, "<{} object>", atom.atom_type().name()),
            Self::Member(member) => write!(f, "<Member '{}'>", member.name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// ============================================================================
// SERIALIZATION
// ============================================================================

/// Scalars and containers serialize structurally; reference kinds
/// (types, callables, objects, members) serialize as their names.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Bytes(b) => serializer.serialize_bytes(b),
            Self::Str(s) => serializer.serialize_str(s),
            Self::Tuple(items) => serialize_seq(items, serializer),
            Self::List(list) => {
                let Some(_walking) = list.enter(None, Walk::Serialize) else {
                    return Err(S::Error::custom("cannot serialize a list that contains itself"));
                };
                serialize_seq(&list.to_vec(), serializer)
            }
            Self::Dict(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Self::Type(ty) => serializer.serialize_str(ty.name()),
            Self::Callable(c) => serializer.serialize_str(c.name()),
            Self::Object(atom) => serializer.serialize_str(atom.atom_type().name()),
            Self::Member(member) => serializer.serialize_str(member.name()),
        }
    }
}

fn serialize_seq<S: Serializer>(items: &[Value], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(items.len()))?;
    for item in items {
        seq.serialize_element(item)?;
    }
    seq.end()
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::str(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(Arc::from(v))
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(Arc::from(v))
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::bytes(v)
    }
}

impl From<List> for Value {
    fn from(v: List) -> Self {
        Self::List(v)
    }
}

impl From<Dict> for Value {
    fn from(v: Dict) -> Self {
        Self::Dict(Arc::new(v))
    }
}

impl From<TypeHandle> for Value {
    fn from(v: TypeHandle) -> Self {
        Self::Type(v)
    }
}

impl From<Callable> for Value {
    fn from(v: Callable) -> Self {
        Self::Callable(v)
    }
}

impl From<Arc<Member>> for Value {
    fn from(v: Arc<Member>) -> Self {
        Self::Member(v)
    }
}

impl<A: Atom + 'static> From<Arc<A>> for Value {
    fn from(v: Arc<A>) -> Self {
        Self::Object(v)
    }
}

impl From<AtomRef> for Value {
    fn from(v: AtomRef) -> Self {
        Self::Object(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::None, Into::into)
    }
}

/// Bridges JSON documents into values: integral numbers become `Int`,
/// other numbers `Float`, arrays plain lists, objects dicts with text keys.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::None,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::from(s),
            serde_json::Value::Array(items) => Self::list(items),
            serde_json::Value::Object(map) => Self::dict(map),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
