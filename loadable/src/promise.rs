//! The async transition helper: a promise-like handle for one load.
//!
//! A [`LoadablePromise`] is associated with exactly one resource and
//! tracks a single asynchronous load as an explicit three-state machine
//! (loading, ready, failed). It gates every transition on the status of
//! the resource it is handed:
//!
//! - construction requires a resource that is currently *loading*;
//! - [`LoadablePromise::resolve`] accepts only a *ready* resource;
//! - [`LoadablePromise::reject`] accepts only a resource with a
//!   recorded failure.
//!
//! Violations are programmer errors and surface immediately as
//! [`TransitionError`]s; they are never deferred into the rejection
//! channel. Ready and failed are terminal: the first settlement wins
//! and later attempts report [`TransitionError::AlreadySettled`].
//!
//! Cancellation is not supported. A loader that wants it must build it
//! on top, e.g. by ignoring the settlement of a superseded promise.

use std::future::IntoFuture;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::errors::{LoadError, TransitionError};
use crate::loader::Loader;
use crate::resource::Loadable;
use crate::status::FailureReason;

type Subscriber<T> = Box<dyn FnMut(&Loadable<T>) + Send>;
type Outcome<T> = Result<Loadable<T>, LoadError<T>>;

enum State<T> {
    Loading,
    Ready(Loadable<T>),
    Failed(LoadError<T>),
}

struct Shared<T> {
    /// The resource as it looked when the promise was created (loading).
    resource: Loadable<T>,
    state: State<T>,
    subscribers: Vec<Subscriber<T>>,
    waiters: Vec<oneshot::Sender<Outcome<T>>>,
}

/// A promise-like handle tracking one asynchronous load of a resource.
///
/// Cloning the handle is cheap and every clone observes the same
/// settlement. Await it (via [`LoadablePromise::wait`] or `.await` on
/// the handle itself) to obtain the final resource, or use
/// [`LoadablePromise::subscribe`] to observe the intermediate loading
/// state as well.
pub struct LoadablePromise<T> {
    shared: Arc<Mutex<Shared<T>>>,
}

impl<T> Clone for LoadablePromise<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> LoadablePromise<T> {
    /// Creates a promise for `resource`, which must be in loading state.
    ///
    /// # Errors
    ///
    /// [`TransitionError::NotLoading`] when the resource's status does
    /// not have `loading` set. This is a fail-fast check: a promise for
    /// a resource nobody marked as loading is a loader bug.
    pub fn new(resource: Loadable<T>) -> Result<Self, TransitionError> {
        if !resource.is_loading() {
            return Err(TransitionError::NotLoading {
                status: resource.status().clone(),
            });
        }
        debug!(status = ?resource.status(), "load tracked");
        Ok(Self {
            shared: Arc::new(Mutex::new(Shared {
                resource,
                state: State::Loading,
                subscribers: Vec::new(),
                waiters: Vec::new(),
            })),
        })
    }

    /// Whether the promise has settled (resolved or rejected).
    pub fn is_settled(&self) -> bool {
        !matches!(self.lock().state, State::Loading)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shared<T>> {
        self.shared.lock().expect("promise state lock poisoned")
    }
}

impl<T: Clone> LoadablePromise<T> {
    /// The resource associated with this promise, as of creation
    /// (loading state).
    pub fn resource(&self) -> Loadable<T> {
        self.lock().resource.clone()
    }

    /// Settles the promise with a successfully loaded resource.
    ///
    /// # Errors
    ///
    /// [`TransitionError::NotReady`] when the resource's status is not
    /// ready; [`TransitionError::AlreadySettled`] when the promise has
    /// already settled.
    pub fn resolve(&self, resource: Loadable<T>) -> Result<(), TransitionError> {
        let (mut subscribers, waiters) = {
            let mut shared = self.lock();
            if !matches!(shared.state, State::Loading) {
                return Err(TransitionError::AlreadySettled);
            }
            if !resource.is_ready() {
                return Err(TransitionError::NotReady {
                    status: resource.status().clone(),
                });
            }
            shared.state = State::Ready(resource.clone());
            (
                std::mem::take(&mut shared.subscribers),
                std::mem::take(&mut shared.waiters),
            )
        };
        debug!("load resolved");
        for subscriber in &mut subscribers {
            subscriber(&resource);
        }
        for waiter in waiters {
            let _ = waiter.send(Ok(resource.clone()));
        }
        Ok(())
    }

    /// Settles the promise with a failed resource.
    ///
    /// The rejection is delivered as a [`LoadError`] carrying the
    /// resource's recorded failure reason together with the failed
    /// resource itself, so consumers can recover the last-known item
    /// and status.
    ///
    /// # Errors
    ///
    /// [`TransitionError::NotFailed`] when the resource carries no
    /// recorded failure; [`TransitionError::AlreadySettled`] when the
    /// promise has already settled.
    pub fn reject(&self, resource: Loadable<T>) -> Result<(), TransitionError> {
        let (error, mut subscribers, waiters) = {
            let mut shared = self.lock();
            if !matches!(shared.state, State::Loading) {
                return Err(TransitionError::AlreadySettled);
            }
            let Some(reason) = resource.error().cloned() else {
                return Err(TransitionError::NotFailed {
                    status: resource.status().clone(),
                });
            };
            let error = LoadError::new(reason, resource);
            shared.state = State::Failed(error.clone());
            (
                error,
                std::mem::take(&mut shared.subscribers),
                std::mem::take(&mut shared.waiters),
            )
        };
        debug!(reason = %error.reason(), "load rejected");
        for subscriber in &mut subscribers {
            subscriber(error.resource());
        }
        for waiter in waiters {
            let _ = waiter.send(Err(error.clone()));
        }
        Ok(())
    }

    /// Observes the loading state and the settlement with one callback.
    ///
    /// If the promise has not settled, `subscriber` is invoked
    /// synchronously once with the current (loading) resource, and then
    /// exactly once more when the promise settles, with the final
    /// resource. If the promise has already settled, `subscriber` is
    /// invoked once with the final resource. The callback does not
    /// branch on outcome; inspect the resource's status instead.
    ///
    /// The loading-state invocation happens while internal state is
    /// locked: the callback must not call back into this promise.
    ///
    /// Returns `&self` so calls can be chained.
    pub fn subscribe<F>(&self, mut subscriber: F) -> &Self
    where
        F: FnMut(&Loadable<T>) + Send + 'static,
    {
        let resource = {
            let mut shared = self.lock();
            match &shared.state {
                State::Loading => {
                    subscriber(&shared.resource);
                    shared.subscribers.push(Box::new(subscriber));
                    return self;
                }
                State::Ready(resource) => resource.clone(),
                State::Failed(error) => error.resource().clone(),
            }
        };
        subscriber(&resource);
        self
    }

    /// Waits for the settlement, yielding the final resource or the
    /// [`LoadError`] describing the failure.
    ///
    /// Every caller observes the same outcome; chaining further work
    /// happens on plain futures, never by reconstructing a promise.
    pub async fn wait(&self) -> Outcome<T> {
        let receiver = {
            let mut shared = self.lock();
            match &shared.state {
                State::Ready(resource) => return Ok(resource.clone()),
                State::Failed(error) => return Err(error.clone()),
                State::Loading => {
                    let (sender, receiver) = oneshot::channel();
                    shared.waiters.push(sender);
                    receiver
                }
            }
        };
        match receiver.await {
            Ok(outcome) => outcome,
            Err(_) => {
                // Every handle was dropped before the load settled.
                let abandoned = FailureReason::from_display("load abandoned before settling");
                let resource = self.resource().as_failed(abandoned.clone());
                Err(LoadError::new(abandoned, resource))
            }
        }
    }
}

impl<T: Clone + Send + Sync + 'static> LoadablePromise<T> {
    /// Runs `loader` on a background task and returns the promise
    /// tracking it.
    ///
    /// The given resource is marked loading first; the loader receives
    /// that loading resource and its outcome settles the promise. A
    /// loader outcome that violates the settlement preconditions is
    /// logged rather than returned: by then the spawning call site is
    /// gone.
    pub fn spawn<L>(loader: Arc<L>, resource: Loadable<T>) -> Self
    where
        L: Loader<T> + 'static,
    {
        let loading = resource.as_loading();
        let promise =
            Self::new(loading.clone()).expect("a freshly loading resource satisfies the precondition");
        let handle = promise.clone();
        tokio::spawn(async move {
            let settlement = match loader.load(loading).await {
                Ok(ready) => handle.resolve(ready),
                Err(error) => handle.reject(error.into_resource()),
            };
            if let Err(error) = settlement {
                warn!(%error, "loader produced a resource that cannot settle its promise");
            }
        });
        promise
    }
}

impl<T: Clone + Send + 'static> IntoFuture for LoadablePromise<T> {
    type Output = Outcome<T>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.wait().await })
    }
}

impl<T> std::fmt::Debug for LoadablePromise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.lock().state {
            State::Loading => "loading",
            State::Ready(_) => "ready",
            State::Failed(_) => "failed",
        };
        f.debug_struct("LoadablePromise")
            .field("state", &state)
            .finish()
    }
}
