//! The resource abstraction: an item paired with its loading status.
//!
//! A [`Loadable`] bundles a data payload (the *item*, possibly absent)
//! with a [`Status`] describing its loading lifecycle. Two concrete
//! representations exist, closed over by the enum:
//!
//! - **Record**: item and status stored as plain fields; the item may be
//!   absent, so this representation covers every lifecycle state.
//! - **Wrapper**: a [`Wrapped`] shim that behaves like the item itself
//!   with the status attached invisibly; the item is always present.
//!
//! The transition methods ([`Loadable::as_loading`],
//! [`Loadable::as_ready`], ...) are pure: each consumes the resource and
//! produces a new one of the same representation. The single invariant
//! they all enforce is *ready implies item*: a resource whose status is
//! ready always holds an item.

use serde::{Serialize, Serializer};

use crate::errors::ConstructError;
use crate::status::{FailureReason, Status, StatusPatch};
use crate::wrapper::Wrapped;

/// The record representation: item and status as plain fields.
///
/// Fields are private so the ready-implies-item invariant cannot be
/// bypassed; construct through [`Loadable::record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record<T> {
    item: Option<T>,
    status: Status,
}

impl<T> Record<T> {
    /// The item, if present.
    pub const fn item(&self) -> Option<&T> {
        self.item.as_ref()
    }

    /// The loading status.
    pub const fn status(&self) -> &Status {
        &self.status
    }
}

/// A resource: an item paired with a loading [`Status`].
///
/// ```
/// use loadable::Loadable;
///
/// let pending: Loadable<String> = Loadable::pending();
/// let loading = pending.as_loading();
/// assert!(loading.status().loading);
///
/// let ready = loading.as_ready(Some(String::from("hello"))).unwrap();
/// assert!(ready.status().ready);
/// assert_eq!(ready.item(), Some(&String::from("hello")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loadable<T> {
    /// Plain record of item and status.
    Record(Record<T>),
    /// Transparent wrapper around a present item.
    Wrapper(Wrapped<T>),
}

impl<T> Loadable<T> {
    /// A record resource that has never been loaded: no item, default
    /// status.
    pub const fn pending() -> Self {
        Self::Record(Record {
            item: None,
            status: Status::pending(),
        })
    }

    /// Builds a record resource from an optional item and a status
    /// patch merged over the default (pending) status.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError::ReadyWithoutItem`] when the merged
    /// status is ready but no item was given.
    pub fn record(item: Option<T>, patch: StatusPatch) -> Result<Self, ConstructError> {
        let status = Status::pending().merge(patch);
        if status.ready && item.is_none() {
            return Err(ConstructError::ReadyWithoutItem);
        }
        Ok(Self::Record(Record { item, status }))
    }

    /// The item, if present.
    pub const fn item(&self) -> Option<&T> {
        match self {
            Self::Record(record) => record.item(),
            Self::Wrapper(wrapped) => Some(wrapped.item()),
        }
    }

    /// The loading status.
    pub const fn status(&self) -> &Status {
        match self {
            Self::Record(record) => record.status(),
            Self::Wrapper(wrapped) => wrapped.status(),
        }
    }

    /// Whether the resource holds usable data.
    pub const fn is_ready(&self) -> bool {
        self.status().ready
    }

    /// Whether a load is currently in progress.
    pub const fn is_loading(&self) -> bool {
        self.status().loading
    }

    /// The failure recorded by the last load attempt, if any.
    pub const fn error(&self) -> Option<&FailureReason> {
        self.status().error.as_ref()
    }

    /// Consumes the resource, returning the item if present.
    pub fn into_item(self) -> Option<T> {
        match self {
            Self::Record(record) => record.item,
            Self::Wrapper(wrapped) => Some(wrapped.into_inner()),
        }
    }

    /// Replaces the item and merges `patch` over the current status,
    /// producing a new resource of the same representation.
    ///
    /// # Errors
    ///
    /// [`ConstructError::ReadyWithoutItem`] when the merged status is
    /// ready but the new item is absent;
    /// [`ConstructError::AbsentNotRepresentable`] when an absent item is
    /// given for the wrapper representation.
    pub fn update(self, item: Option<T>, patch: StatusPatch) -> Result<Self, ConstructError> {
        match self {
            Self::Record(record) => {
                let status = record.status.merge(patch);
                if status.ready && item.is_none() {
                    return Err(ConstructError::ReadyWithoutItem);
                }
                Ok(Self::Record(Record { item, status }))
            }
            Self::Wrapper(wrapped) => {
                let Some(item) = item else {
                    return Err(ConstructError::AbsentNotRepresentable);
                };
                let status = wrapped.status().clone().merge(patch);
                Ok(Self::Wrapper(wrapped.with_item(item).with_status(status)))
            }
        }
    }

    /// Replaces the item, keeping the current status.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Loadable::update`].
    pub fn update_item(self, item: Option<T>) -> Result<Self, ConstructError> {
        self.update(item, StatusPatch::new())
    }

    /// Merges `patch` over the current status, keeping the item.
    ///
    /// # Errors
    ///
    /// [`ConstructError::ReadyWithoutItem`] when the merged status is
    /// ready but the resource holds no item.
    pub fn update_status(self, patch: StatusPatch) -> Result<Self, ConstructError> {
        match self {
            Self::Record(record) => {
                let status = record.status.merge(patch);
                if status.ready && record.item.is_none() {
                    return Err(ConstructError::ReadyWithoutItem);
                }
                Ok(Self::Record(Record {
                    item: record.item,
                    status,
                }))
            }
            Self::Wrapper(wrapped) => {
                let status = wrapped.status().clone().merge(patch);
                Ok(Self::Wrapper(wrapped.with_status(status)))
            }
        }
    }

    /// Resets the resource to its never-loaded state: no item, default
    /// status.
    ///
    /// # Errors
    ///
    /// [`ConstructError::AbsentNotRepresentable`] on the wrapper
    /// representation, which cannot hold an absent item.
    pub fn as_pending(self) -> Result<Self, ConstructError> {
        match self {
            Self::Record(_) => Ok(Self::pending()),
            Self::Wrapper(_) => Err(ConstructError::AbsentNotRepresentable),
        }
    }

    /// Marks a load as in progress: sets `loading`, preserves the item,
    /// the `ready` flag, and any recorded failure.
    ///
    /// A previous error is deliberately *not* cleared: a UI may want to
    /// show stale data, the standing error, and a loading indicator all
    /// at once. Clear it explicitly via
    /// [`Loadable::update_status`] if that is not wanted.
    #[must_use]
    pub fn as_loading(self) -> Self {
        match self {
            Self::Record(record) => {
                let status = record.status.merge(StatusPatch::new().loading(true));
                Self::Record(Record {
                    item: record.item,
                    status,
                })
            }
            Self::Wrapper(wrapped) => {
                let status = wrapped
                    .status()
                    .clone()
                    .merge(StatusPatch::new().loading(true));
                Self::Wrapper(wrapped.with_status(status))
            }
        }
    }

    /// Marks a load as complete: status becomes
    /// `{ ready: true, loading: false, error: None }`.
    ///
    /// With `Some(item)` the item is replaced; with `None` the existing
    /// item is retained.
    ///
    /// # Errors
    ///
    /// [`ConstructError::ReadyWithoutItem`] when no item was given and
    /// the resource holds none.
    pub fn as_ready(self, item: Option<T>) -> Result<Self, ConstructError> {
        let ready = Status {
            ready: true,
            loading: false,
            error: None,
        };
        match self {
            Self::Record(record) => {
                let item = item.or(record.item);
                if item.is_none() {
                    return Err(ConstructError::ReadyWithoutItem);
                }
                Ok(Self::Record(Record {
                    item,
                    status: ready,
                }))
            }
            Self::Wrapper(wrapped) => {
                let wrapped = match item {
                    Some(item) => wrapped.with_item(item),
                    None => wrapped,
                };
                Ok(Self::Wrapper(wrapped.with_status(ready)))
            }
        }
    }

    /// Records a load failure: clears `loading` and sets the error.
    ///
    /// The `ready` flag and the item are left untouched, so stale data
    /// stays visible alongside the failure.
    #[must_use]
    pub fn as_failed(self, reason: FailureReason) -> Self {
        let patch = StatusPatch::new().loading(false).error(Some(reason));
        match self {
            Self::Record(record) => {
                let status = record.status.merge(patch);
                Self::Record(Record {
                    item: record.item,
                    status,
                })
            }
            Self::Wrapper(wrapped) => {
                let status = wrapped.status().clone().merge(patch);
                Self::Wrapper(wrapped.with_status(status))
            }
        }
    }
}

impl<T: 'static> Loadable<T> {
    /// Builds a transparent-wrapper resource from a present item and a
    /// status patch merged over the default (pending) status.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError::AlreadyWrapped`] when `item` is itself
    /// a [`Wrapped`] value.
    pub fn wrapper(item: T, patch: StatusPatch) -> Result<Self, ConstructError> {
        let status = Status::pending().merge(patch);
        Ok(Self::Wrapper(Wrapped::new(item, status)?))
    }
}

// Serializes as the representation does: the record as `{item, status}`,
// the wrapper as the bare item.
impl<T: Serialize> Serialize for Loadable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Record(record) => record.serialize(serializer),
            Self::Wrapper(wrapped) => wrapped.serialize(serializer),
        }
    }
}
