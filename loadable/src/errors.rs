//! Error types for the loadable resource lifecycle.
//!
//! Three kinds of failure exist, with very different audiences:
//!
//! - **[`ConstructError`]**: a resource construction invariant was
//!   violated. Fatal to the call; the caller must fix the call site.
//! - **[`TransitionError`]**: a resource was handed to the async
//!   transition helper in a state that does not match the expected
//!   transition. Signals a programming mistake in a loader.
//! - **[`LoadError`]**: the data-level failure path. This is the only
//!   error kind application code is expected to handle in steady-state
//!   operation; it carries both the failure reason and the resource in
//!   its failed state so a UI can keep showing the last-good item.
//!
//! Construction and transition errors propagate immediately and are
//! never caught inside the library.

use std::fmt;

use thiserror::Error;

use crate::resource::Loadable;
use crate::status::{FailureReason, Status};

/// Errors raised when a resource construction invariant is violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructError {
    /// A ready resource must hold an item; `ready: true` with an absent
    /// item is rejected.
    #[error("a ready resource requires an item, but none was given")]
    ReadyWithoutItem,

    /// The value being wrapped is itself already a transparent wrapper.
    /// Nested wrappers would carry ambiguous status metadata.
    #[error("cannot wrap a value that is already a transparent wrapper")]
    AlreadyWrapped,

    /// The transparent wrapper representation cannot hold an absent
    /// item; use the record representation for that case.
    #[error("the wrapper representation cannot hold an absent item")]
    AbsentNotRepresentable,
}

/// Errors raised when the async transition helper receives a resource
/// whose status does not match the expected transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The helper requires a resource that is currently loading.
    #[error("expected a resource with status loading, got {status:?}")]
    NotLoading {
        /// The status the resource actually had.
        status: Status,
    },

    /// Resolving requires a resource whose status is ready.
    #[error("expected a resource with status ready, got {status:?}")]
    NotReady {
        /// The status the resource actually had.
        status: Status,
    },

    /// Rejecting requires a resource with a recorded failure.
    #[error("expected a resource with a recorded failure, got {status:?}")]
    NotFailed {
        /// The status the resource actually had.
        status: Status,
    },

    /// The helper already settled; ready and failed are terminal.
    #[error("the load has already settled")]
    AlreadySettled,
}

/// The failure outcome of an asynchronous load.
///
/// Carries the original failure reason plus the resource in its failed
/// state, so callers can render a failed UI without losing the
/// last-known item or status.
#[derive(Clone, PartialEq, Eq)]
pub struct LoadError<T> {
    reason: FailureReason,
    resource: Loadable<T>,
}

impl<T> LoadError<T> {
    /// Pairs a failure reason with the resource in its failed state.
    pub const fn new(reason: FailureReason, resource: Loadable<T>) -> Self {
        Self { reason, resource }
    }

    /// The underlying failure reason.
    pub const fn reason(&self) -> &FailureReason {
        &self.reason
    }

    /// The resource in its failed state.
    pub const fn resource(&self) -> &Loadable<T> {
        &self.resource
    }

    /// Consumes the error, returning the failed resource.
    pub fn into_resource(self) -> Loadable<T> {
        self.resource
    }

    /// Consumes the error, returning the reason and the failed resource.
    pub fn into_parts(self) -> (FailureReason, Loadable<T>) {
        (self.reason, self.resource)
    }
}

// Manual impls keep `T` free of Display bounds: the message never shows
// the item, only the reason.
impl<T> fmt::Display for LoadError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loading failed: {}", self.reason)
    }
}

impl<T: fmt::Debug> fmt::Debug for LoadError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadError")
            .field("reason", &self.reason)
            .field("resource", &self.resource)
            .finish()
    }
}

impl<T: fmt::Debug> std::error::Error for LoadError<T> {}
