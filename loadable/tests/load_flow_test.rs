//! End-to-end load flows: loader -> promise -> subscriber/await.

use std::sync::{Arc, Mutex};

use loadable::{FailureReason, LoadError, Loadable, LoadablePromise, Loader, StatusPatch};

struct FlakyLoader {
    /// Outcomes to play back, oldest first. `Ok` carries the item to
    /// resolve with, `Err` the failure reason.
    script: Mutex<Vec<Result<u32, String>>>,
}

#[async_trait::async_trait]
impl Loader<u32> for FlakyLoader {
    async fn load(&self, current: Loadable<u32>) -> Result<Loadable<u32>, LoadError<u32>> {
        let step = self
            .script
            .lock()
            .unwrap()
            .pop()
            .expect("script exhausted");
        match step {
            Ok(item) => Ok(current.as_ready(Some(item)).unwrap()),
            Err(text) => {
                let reason = FailureReason::try_new(text).unwrap();
                let failed = current.as_failed(reason.clone());
                Err(LoadError::new(reason, failed))
            }
        }
    }
}

#[tokio::test]
async fn successful_load_reaches_subscribers_in_order() {
    let loader = Arc::new(FlakyLoader {
        script: Mutex::new(vec![Ok(42)]),
    });
    let promise = LoadablePromise::spawn(loader, Loadable::pending());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    promise.subscribe(move |resource| {
        sink.lock().unwrap().push(resource.clone());
    });

    let final_resource = promise.wait().await.unwrap();
    assert_eq!(final_resource.item(), Some(&42));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].is_loading());
    assert!(!seen[0].is_ready());
    assert!(seen[1].is_ready());
    assert!(!seen[1].is_loading());
}

#[tokio::test]
async fn failed_load_keeps_stale_data_for_the_ui() {
    // Start from a resource that already holds usable data.
    let current = Loadable::record(Some(7_u32), StatusPatch::new().ready(true)).unwrap();
    let loader = Arc::new(FlakyLoader {
        script: Mutex::new(vec![Err(String::from("gateway timeout"))]),
    });

    let promise = LoadablePromise::spawn(loader, current);
    let error = promise.wait().await.unwrap_err();

    assert_eq!(error.reason().to_string(), "gateway timeout");
    let failed = error.resource();
    // Stale item and ready flag survive the failure.
    assert_eq!(failed.item(), Some(&7));
    assert!(failed.is_ready());
    assert!(!failed.is_loading());
    assert!(failed.error().is_some());
}

#[tokio::test]
async fn retry_after_failure_clears_the_error_on_success() {
    let loader = Arc::new(FlakyLoader {
        // Popped back to front: first a failure, then a success.
        script: Mutex::new(vec![Ok(9), Err(String::from("boom"))]),
    });

    let first = LoadablePromise::spawn(Arc::clone(&loader), Loadable::pending());
    let failed = first.wait().await.unwrap_err().into_resource();
    assert!(failed.error().is_some());

    // Retrying marks the failed resource as loading; the error stays
    // visible during the retry.
    let second = LoadablePromise::spawn(loader, failed);
    assert!(second.resource().is_loading());
    assert!(second.resource().error().is_some());

    let recovered = second.wait().await.unwrap();
    assert!(recovered.is_ready());
    assert_eq!(recovered.error(), None);
    assert_eq!(recovered.item(), Some(&9));
}

#[tokio::test]
async fn every_clone_of_a_promise_observes_the_same_outcome() {
    let resource = Loadable::<u32>::pending().as_loading();
    let promise = LoadablePromise::new(resource).unwrap();

    let a = promise.clone();
    let b = promise.clone();
    let ready = Loadable::pending().as_ready(Some(1)).unwrap();
    promise.resolve(ready.clone()).unwrap();

    assert_eq!(a.wait().await.unwrap(), ready);
    assert_eq!(b.wait().await.unwrap(), ready);
}
