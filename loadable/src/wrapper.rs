//! The transparent wrapper representation.
//!
//! A [`Wrapped`] value behaves, to outside observers, like the item it
//! wraps: field and method access pass through [`Deref`], display
//! formatting delegates to the item, and serialization produces exactly
//! what the bare item would produce - the attached status never leaks
//! into serialized output. The status and item are reachable only
//! through the accessor methods, which cannot collide with anything the
//! item defines as data.
//!
//! Wrappers are immutable from the outside: there is no `DerefMut` and
//! no public mutator; every "update" builds a new wrapper.

use std::any::TypeId;
use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;
use std::sync::{LazyLock, RwLock};

use serde::{Serialize, Serializer};

use crate::errors::ConstructError;
use crate::status::Status;

// Every `Wrapped<T>` type ever constructed registers itself here, so a
// construction attempt can recognize an item that is already a wrapper.
// The set only ever grows and holds one entry per wrapped item type.
static WRAPPER_TYPES: LazyLock<RwLock<HashSet<TypeId>>> =
    LazyLock::new(|| RwLock::new(HashSet::new()));

/// Whether `value` is itself a transparent wrapper.
///
/// Generic code can use this to special-case wrapped values; the
/// constructor uses it to reject double-wrapping.
pub fn is_wrapped<T: 'static>(_value: &T) -> bool {
    WRAPPER_TYPES
        .read()
        .expect("wrapper type registry lock poisoned")
        .contains(&TypeId::of::<T>())
}

/// An item with an invisibly attached [`Status`].
///
/// `Wrapped<T>` dereferences to `T`, displays as `T`, and serializes as
/// `T`. The status rides along unseen until asked for via
/// [`Wrapped::status`].
///
/// ```
/// use loadable::{Status, Wrapped};
///
/// let wrapped = Wrapped::new(42_i32, Status::pending()).unwrap();
/// assert_eq!(*wrapped + 1, 43);
/// assert!(!wrapped.status().ready);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapped<T> {
    item: T,
    status: Status,
}

impl<T: 'static> Wrapped<T> {
    /// Attaches `status` to `item`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError::AlreadyWrapped`] if `item` is itself a
    /// `Wrapped<_>`: nested wrappers would carry ambiguous status
    /// metadata, so the guard favors failing loudly over silently
    /// overriding. Callers that really do want a fresh status on an
    /// existing wrapper should unwrap it first via
    /// [`Wrapped::into_parts`].
    pub fn new(item: T, status: Status) -> Result<Self, ConstructError> {
        if is_wrapped(&item) {
            return Err(ConstructError::AlreadyWrapped);
        }
        WRAPPER_TYPES
            .write()
            .expect("wrapper type registry lock poisoned")
            .insert(TypeId::of::<Self>());
        Ok(Self { item, status })
    }
}

impl<T> Wrapped<T> {
    /// The wrapped item.
    pub const fn item(&self) -> &T {
        &self.item
    }

    /// The attached status.
    pub const fn status(&self) -> &Status {
        &self.status
    }

    /// Consumes the wrapper, returning the bare item.
    pub fn into_inner(self) -> T {
        self.item
    }

    /// Consumes the wrapper, returning the item and its status.
    pub fn into_parts(self) -> (T, Status) {
        (self.item, self.status)
    }

    // Rebuilds without the double-wrap check: the item type was already
    // vetted when the wrapper was first constructed.
    pub(crate) fn with_status(self, status: Status) -> Self {
        Self {
            item: self.item,
            status,
        }
    }

    pub(crate) fn with_item(self, item: T) -> Self {
        Self {
            item,
            status: self.status,
        }
    }
}

impl<T> Deref for Wrapped<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T> AsRef<T> for Wrapped<T> {
    fn as_ref(&self) -> &T {
        &self.item
    }
}

impl<T: fmt::Display> fmt::Display for Wrapped<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.item.fmt(f)
    }
}

// Serialization shows only the item: the status accessor is invisible
// to enumeration of the wrapped value.
impl<T: Serialize> Serialize for Wrapped<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.item.serialize(serializer)
    }
}

impl<T: PartialEq> PartialEq<T> for Wrapped<T> {
    fn eq(&self, other: &T) -> bool {
        self.item == *other
    }
}
