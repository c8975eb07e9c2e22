//! `Loadable` - resources that know their own loading lifecycle
//!
//! This library pairs a data payload (the *item*) with metadata
//! describing its loading lifecycle (the *status*: ready / loading /
//! error), so applications tracking asynchronous fetches never conflate
//! the loaded value with its loading state.
//!
//! The pieces, leaf to root:
//!
//! - [`Status`]: three independent lifecycle flags; all eight
//!   combinations are legal and meaningful.
//! - [`Loadable`]: an item paired with a status, in one of two
//!   representations (plain record, or transparent wrapper), with a
//!   pure transition algebra (`as_loading`, `as_ready`, `as_failed`,
//!   ...). Resources are immutable values; transitions build new ones.
//! - [`Wrapped`]: the transparent wrapper - dereferences, displays,
//!   and serializes exactly like the item it wraps, with the status
//!   attached invisibly.
//! - [`LoadablePromise`]: a promise-like handle that runs one
//!   asynchronous load, enforcing the legal status transitions and
//!   supporting subscribe-style observation of the intermediate
//!   (loading) and final (ready / failed) states.
//! - [`Loader`]: the contract for asynchronous sources of resource
//!   state; concrete loaders live outside this crate.
//!
//! ```
//! use loadable::{Loadable, LoadablePromise};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let resource: Loadable<String> = Loadable::pending().as_loading();
//! let promise = LoadablePromise::new(resource.clone())?;
//!
//! promise.subscribe(|r| {
//!     // First called with the loading resource, then once settled.
//!     println!("loading={} ready={}", r.is_loading(), r.is_ready());
//! });
//!
//! promise.resolve(resource.as_ready(Some(String::from("hello")))?)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::significant_drop_tightening)]

pub mod errors;
pub mod loader;
pub mod promise;
pub mod resource;
pub mod status;
pub mod wrapper;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use errors::{ConstructError, LoadError, TransitionError};
pub use loader::{loader_fn, LoadResult, Loader, LoaderFn};
pub use promise::LoadablePromise;
pub use resource::{Loadable, Record};
pub use status::{FailureReason, Status, StatusPatch};
pub use wrapper::{is_wrapped, Wrapped};
