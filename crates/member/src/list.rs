//! Observable lists produced by the list validators.
//!
//! A [`List`] is a shared, mutable sequence. Lists created by a member's
//! validator are *bound*: they remember the owner and the item member they
//! were validated with. A bound list built by the [`ConstrainedListFactory`]
//! keeps enforcing the item member on every later in-place mutation.
//!
//! Items are validated before the list lock is taken, so item validators are
//! free to read the list they are being inserted into.
//!
//! A list may contain itself. Rendering, comparison, hashing and
//! serialization track the lists they are inside of on the current thread,
//! so a cycle ends the walk instead of recursing forever.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::foundation::{Atom, AtomRef, ValidationError, Value};
use crate::member::Member;

// ============================================================================
// LIST
// ============================================================================

/// A shared, mutable sequence of values.
#[derive(Clone)]
pub struct List(Arc<ListInner>);

struct ListInner {
    items: RwLock<Vec<Value>>,
    binding: Option<Binding>,
}

struct Binding {
    owner: Weak<dyn Atom>,
    item: Option<Arc<Member>>,
    member: Arc<str>,
    constrained: bool,
}

impl List {
    /// Creates an unbound list.
    #[must_use]
    pub fn new(items: Vec<Value>) -> Self {
        Self(Arc::new(ListInner {
            items: RwLock::new(items),
            binding: None,
        }))
    }

    fn bound(
        member: &Member,
        owner: &AtomRef,
        item: Option<Arc<Member>>,
        size: usize,
        constrained: bool,
    ) -> Self {
        Self(Arc::new(ListInner {
            items: RwLock::new(Vec::with_capacity(size)),
            binding: Some(Binding {
                owner: Arc::downgrade(owner),
                item,
                member: member.name_arc(),
                constrained,
            }),
        }))
    }

    /// Fills a freshly created list. Only used while the list is still
    /// private to the validator that created it.
    pub(crate) fn fill(&self, items: Vec<Value>) {
        *self.0.items.write() = items;
    }

    // ==================== Introspection ====================

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.items.read().len()
    }

    /// Returns `true` if the list has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.items.read().is_empty()
    }

    /// Returns the item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.items.read().get(index).cloned()
    }

    /// Returns a snapshot of the items.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.items.read().clone()
    }

    /// Returns `true` if later mutations are validated.
    #[must_use]
    pub fn is_constrained(&self) -> bool {
        self.0.binding.as_ref().is_some_and(|b| b.constrained)
    }

    /// Returns the item member this list was validated with.
    #[must_use]
    pub fn item_member(&self) -> Option<&Arc<Member>> {
        self.0.binding.as_ref().and_then(|b| b.item.as_ref())
    }

    /// Returns the name of the member that produced this list.
    #[must_use]
    pub fn member_name(&self) -> Option<&str> {
        self.0.binding.as_ref().map(|b| &*b.member)
    }

    /// Returns `true` if both handles share storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    // ==================== Mutation ====================

    /// Validates an incoming item against the standing invariant, if any.
    ///
    /// Items are accepted as-is when the list is not constrained, has no item
    /// member, or its owner has been dropped.
    fn admit(&self, value: Value) -> Result<Value, ValidationError> {
        let Some(binding) = self.0.binding.as_ref().filter(|b| b.constrained) else {
            return Ok(value);
        };
        let (Some(item), Some(owner)) = (binding.item.as_ref(), binding.owner.upgrade()) else {
            return Ok(value);
        };
        item.validate(&owner, &Value::None, value)
    }

    /// Appends an item.
    pub fn push(&self, value: Value) -> Result<(), ValidationError> {
        let value = self.admit(value)?;
        self.0.items.write().push(value);
        Ok(())
    }

    /// Inserts an item, clamping `index` to the list length.
    pub fn insert(&self, index: usize, value: Value) -> Result<(), ValidationError> {
        let value = self.admit(value)?;
        let mut items = self.0.items.write();
        let index = index.min(items.len());
        items.insert(index, value);
        Ok(())
    }

    /// Replaces the item at `index`, returning the previous item.
    pub fn set(&self, index: usize, value: Value) -> Result<Value, ValidationError> {
        let value = self.admit(value)?;
        let mut items = self.0.items.write();
        let len = items.len();
        let slot = items
            .get_mut(index)
            .ok_or_else(|| ValidationError::index_out_of_range(index, len))?;
        Ok(std::mem::replace(slot, value))
    }

    /// Appends every item. Nothing is appended if any item is rejected.
    pub fn extend<I>(&self, values: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = Value>,
    {
        let admitted = values
            .into_iter()
            .map(|value| self.admit(value))
            .collect::<Result<Vec<_>, _>>()?;
        self.0.items.write().extend(admitted);
        Ok(())
    }

    /// Removes and returns the item at `index`.
    pub fn remove(&self, index: usize) -> Result<Value, ValidationError> {
        let mut items = self.0.items.write();
        if index >= items.len() {
            return Err(ValidationError::index_out_of_range(index, items.len()));
        }
        Ok(items.remove(index))
    }

    /// Removes and returns the last item.
    pub fn pop(&self) -> Option<Value> {
        self.0.items.write().pop()
    }

    /// Removes every item.
    pub fn clear(&self) {
        self.0.items.write().clear();
    }
}

impl PartialEq for List {
    /// Structural equality. A pair of lists met again while they are
    /// already being compared counts as equal.
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let Some(_walking) = self.enter(Some(other), Walk::Compare) else {
            return true;
        };
        self.to_vec() == other.to_vec()
    }
}

impl Eq for List {}

impl Hash for List {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let Some(_walking) = self.enter(None, Walk::Hash) else {
            return;
        };
        self.to_vec().hash(state);
    }
}

/// Same rendering as the list's `Value` form, `[...]` for a cycle.
impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Value::List(self.clone()), f)
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ============================================================================
// CYCLE GUARD
// ============================================================================

/// A recursive walk over list contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Walk {
    Display,
    Compare,
    Hash,
    Serialize,
}

type WalkKey = (Walk, usize, usize);

thread_local! {
    static WALKING: RefCell<Vec<WalkKey>> = const { RefCell::new(Vec::new()) };
}

/// Marks a list as being walked on this thread until dropped.
pub(crate) struct Walking(WalkKey);

impl Drop for Walking {
    fn drop(&mut self) {
        WALKING.with_borrow_mut(|active| {
            if let Some(pos) = active.iter().rposition(|key| *key == self.0) {
                active.swap_remove(pos);
            }
        });
    }
}

impl List {
    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).addr()
    }

    /// Enters a `walk` over this list (paired with `other` for comparisons).
    ///
    /// Returns `None` when this thread is already inside the same walk, i.e.
    /// the list was reached through itself.
    pub(crate) fn enter(&self, other: Option<&Self>, walk: Walk) -> Option<Walking> {
        let key = (walk, self.addr(), other.map_or(0, Self::addr));
        WALKING.with_borrow_mut(|active| {
            if active.contains(&key) {
                None
            } else {
                active.push(key);
                Some(Walking(key))
            }
        })
    }
}

// ============================================================================
// FACTORIES
// ============================================================================

/// Builds the result container for the list validators.
///
/// List members use [`ObservableListFactory`] or [`ConstrainedListFactory`]
/// by default; [`MemberBuilder::list_factory`](crate::member::MemberBuilder::list_factory)
/// installs another one. The validator fills the returned list in order.
pub trait ListFactory: Send + Sync {
    /// Creates an empty list with room for `size` items, bound to `owner`.
    fn make(
        &self,
        member: &Member,
        owner: &AtomRef,
        item: Option<Arc<Member>>,
        size: usize,
    ) -> List;
}

/// Plain observable lists: items are validated on assignment only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObservableListFactory;

impl ListFactory for ObservableListFactory {
    fn make(
        &self,
        member: &Member,
        owner: &AtomRef,
        item: Option<Arc<Member>>,
        size: usize,
    ) -> List {
        List::bound(member, owner, item, size, false)
    }
}

/// Constrained lists: the item member keeps guarding in-place mutation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstrainedListFactory;

impl ListFactory for ConstrainedListFactory {
    fn make(
        &self,
        member: &Member,
        owner: &AtomRef,
        item: Option<Arc<Member>>,
        size: usize,
    ) -> List {
        List::bound(member, owner, item, size, true)
    }
}

// ============================================================================
// TESTS
// ============================================================================
