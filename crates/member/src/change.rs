//! Change records handed to observers after a successful write.
//!
//! A [`ChangeRecord`] is an immutable payload describing one change to one
//! member of one owner. Five kinds exist. `create`, `delete` and `event`
//! carry a single value; `update` and `property` carry the old and the new
//! value.
//!
//! The mapping form produced by [`ChangeRecord::to_value`] reuses one set of
//! key strings for every record. They are allocated once, on first use.

use std::fmt;
use std::sync::{Arc, LazyLock};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::foundation::{AtomRef, Dict, Value, same_atom};
use crate::member::Member;

// ============================================================================
// KEYS
// ============================================================================

/// Key under which the record kind is stored.
pub const TYPE_KEY: &str = "type";
/// Key under which the owner is stored.
pub const OBJECT_KEY: &str = "object";
/// Key under which the member name is stored.
pub const NAME_KEY: &str = "name";
/// Key under which the previous value is stored.
pub const OLD_VALUE_KEY: &str = "oldvalue";
/// Key under which the new value is stored.
pub const VALUE_KEY: &str = "value";

struct Keys {
    type_: Value,
    object: Value,
    name: Value,
    old_value: Value,
    value: Value,
    kinds: [Value; 5],
}

static KEYS: LazyLock<Keys> = LazyLock::new(|| Keys {
    type_: Value::str(TYPE_KEY),
    object: Value::str(OBJECT_KEY),
    name: Value::str(NAME_KEY),
    old_value: Value::str(OLD_VALUE_KEY),
    value: Value::str(VALUE_KEY),
    kinds: ChangeKind::ALL.map(|kind| Value::str(kind.as_str())),
});

// ============================================================================
// CHANGE KIND
// ============================================================================

/// What happened to the member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// First value stored.
    Create,
    /// Stored value replaced.
    Update,
    /// Stored value removed.
    Delete,
    /// Event fired; nothing stored.
    Event,
    /// Computed property changed.
    Property,
}

impl ChangeKind {
    const ALL: [ChangeKind; 5] = [
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::Event,
        Self::Property,
    ];

    /// Returns the kind as stored under the `type` key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Event => "event",
            Self::Property => "property",
        }
    }

    /// Returns `true` for the kinds that carry an old value.
    #[must_use]
    pub const fn has_old_value(self) -> bool {
        matches!(self, Self::Update | Self::Property)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CHANGE RECORD
// ============================================================================

/// An immutable description of one change.
#[derive(Debug, Clone)]
pub struct ChangeRecord {
    kind: ChangeKind,
    object: AtomRef,
    name: Arc<str>,
    old_value: Option<Value>,
    value: Value,
}

impl ChangeRecord {
    fn single(kind: ChangeKind, owner: &AtomRef, member: &Member, value: Value) -> Self {
        Self {
            kind,
            object: Arc::clone(owner),
            name: member.name_arc(),
            old_value: None,
            value,
        }
    }

    fn pair(kind: ChangeKind, owner: &AtomRef, member: &Member, old: Value, new: Value) -> Self {
        Self {
            kind,
            object: Arc::clone(owner),
            name: member.name_arc(),
            old_value: Some(old),
            value: new,
        }
    }

    /// A member received its first value.
    #[must_use]
    pub fn create(owner: &AtomRef, member: &Member, value: Value) -> Self {
        Self::single(ChangeKind::Create, owner, member, value)
    }

    /// A member's value was replaced.
    #[must_use]
    pub fn update(owner: &AtomRef, member: &Member, old: Value, new: Value) -> Self {
        Self::pair(ChangeKind::Update, owner, member, old, new)
    }

    /// A member's value was removed.
    #[must_use]
    pub fn delete(owner: &AtomRef, member: &Member, value: Value) -> Self {
        Self::single(ChangeKind::Delete, owner, member, value)
    }

    /// An event member fired.
    #[must_use]
    pub fn event(owner: &AtomRef, member: &Member, value: Value) -> Self {
        Self::single(ChangeKind::Event, owner, member, value)
    }

    /// A property member changed.
    #[must_use]
    pub fn property(owner: &AtomRef, member: &Member, old: Value, new: Value) -> Self {
        Self::pair(ChangeKind::Property, owner, member, old, new)
    }

    // ==================== Accessors ====================

    #[must_use]
    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Returns the owner that changed.
    #[must_use]
    pub fn object(&self) -> &AtomRef {
        &self.object
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the previous value for `update` and `property` records.
    #[must_use]
    pub fn old_value(&self) -> Option<&Value> {
        self.old_value.as_ref()
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the record as a dict keyed by `type`, `object`, `name`,
    /// `oldvalue` (two-value kinds only) and `value`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let keys = &*KEYS;
        let mut map = Dict::with_capacity(5);
        map.insert(keys.type_.clone(), keys.kinds[self.kind as usize].clone());
        map.insert(keys.object.clone(), Value::Object(Arc::clone(&self.object)));
        map.insert(keys.name.clone(), Value::Str(Arc::clone(&self.name)));
        if let Some(old) = &self.old_value {
            map.insert(keys.old_value.clone(), old.clone());
        }
        map.insert(keys.value.clone(), self.value.clone());
        Value::Dict(Arc::new(map))
    }
}

impl PartialEq for ChangeRecord {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && same_atom(&self.object, &other.object)
            && self.name == other.name
            && self.old_value == other.old_value
            && self.value == other.value
    }
}

/// Serializes as a map; the owner is rendered by its type name.
impl Serialize for ChangeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.old_value.is_some() { 5 } else { 4 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(TYPE_KEY, &self.kind)?;
        map.serialize_entry(OBJECT_KEY, self.object.atom_type().name())?;
        map.serialize_entry(NAME_KEY, &*self.name)?;
        if let Some(old) = &self.old_value {
            map.serialize_entry(OLD_VALUE_KEY, old)?;
        }
        map.serialize_entry(VALUE_KEY, &self.value)?;
        map.end()
    }
}

// ============================================================================
// TESTS
// ============================================================================
