//! The loader contract.
//!
//! A *loader* takes the current state of a resource and asynchronously
//! produces its next state: a ready resource on success, or a
//! [`LoadError`] carrying the failed resource. The library does not
//! dictate how a loader fetches data, only the shape of what it returns
//! and the transition vocabulary it should use to build that return
//! value ([`Loadable::as_ready`], [`Loadable::as_failed`], ...).
//!
//! Retry, backoff, and cancellation policies are loader concerns, built
//! on top of these primitives.

use async_trait::async_trait;

use crate::errors::LoadError;
use crate::resource::Loadable;

/// The outcome of a load: the next resource state, or the failure with
/// the failed resource attached.
pub type LoadResult<T> = Result<Loadable<T>, LoadError<T>>;

/// An asynchronous source of resource state.
///
/// Implementations receive the resource as the caller last saw it
/// (typically in loading state) and may use its current item and status
/// to decide what to do, e.g. skip a fetch when the resource is already
/// ready.
#[async_trait]
pub trait Loader<T>: Send + Sync {
    /// Loads the next state of `current`.
    async fn load(&self, current: Loadable<T>) -> LoadResult<T>;
}

/// A [`Loader`] backed by a plain async function; see [`loader_fn`].
#[derive(Debug, Clone)]
pub struct LoaderFn<F> {
    f: F,
}

/// Adapts an async function into a [`Loader`].
///
/// ```
/// use loadable::{loader_fn, LoadError, Loadable, Loader};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let loader = loader_fn(|current: Loadable<u32>| async move {
///     Ok::<_, LoadError<u32>>(current.as_ready(Some(1)).unwrap())
/// });
/// let loaded = loader.load(Loadable::pending().as_loading()).await.unwrap();
/// assert!(loaded.is_ready());
/// # }
/// ```
pub const fn loader_fn<F>(f: F) -> LoaderFn<F> {
    LoaderFn { f }
}

#[async_trait]
impl<T, F, Fut> Loader<T> for LoaderFn<F>
where
    T: Send + 'static,
    F: Fn(Loadable<T>) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = LoadResult<T>> + Send,
{
    async fn load(&self, current: Loadable<T>) -> LoadResult<T> {
        (self.f)(current).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{FailureReason, StatusPatch};

    #[tokio::test]
    async fn closures_are_loaders() {
        let loader = loader_fn(|current: Loadable<u32>| async move {
            let ready = current.as_ready(Some(99)).unwrap();
            Ok::<_, LoadError<u32>>(ready)
        });
        let loaded = loader.load(Loadable::pending().as_loading()).await.unwrap();
        assert_eq!(loaded.item(), Some(&99));
        assert!(loaded.is_ready());
    }

    #[tokio::test]
    async fn failing_loaders_surface_the_failed_resource() {
        let loader = loader_fn(|current: Loadable<u32>| async move {
            let reason = FailureReason::try_new("no route to host").unwrap();
            let failed = current.as_failed(reason.clone());
            Err::<Loadable<u32>, _>(LoadError::new(reason, failed))
        });
        let current = Loadable::record(Some(7), StatusPatch::new())
            .unwrap()
            .as_loading();
        let error = loader.load(current).await.unwrap_err();
        assert_eq!(error.resource().item(), Some(&7));
        assert!(!error.resource().is_loading());
    }
}
