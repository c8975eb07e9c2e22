//! Proptest strategies for lifecycle types.
//!
//! Available to downstream crates via the `testing` feature.

use proptest::prelude::*;

use crate::status::{FailureReason, Status, StatusPatch};

/// Strategy producing arbitrary non-empty failure reasons.
pub fn arb_failure_reason() -> impl Strategy<Value = FailureReason> {
    "[a-zA-Z0-9 ]{1,32}".prop_map(|text| {
        FailureReason::try_new(text).unwrap_or_else(|_| FailureReason::from_display("generated"))
    })
}

/// Strategy producing every legal status combination.
pub fn arb_status() -> impl Strategy<Value = Status> {
    (
        any::<bool>(),
        any::<bool>(),
        prop::option::of(arb_failure_reason()),
    )
        .prop_map(|(ready, loading, error)| Status {
            ready,
            loading,
            error,
        })
}

/// Strategy producing arbitrary partial status updates.
pub fn arb_status_patch() -> impl Strategy<Value = StatusPatch> {
    (
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
        prop::option::of(prop::option::of(arb_failure_reason())),
    )
        .prop_map(|(ready, loading, error)| StatusPatch {
            ready,
            loading,
            error,
        })
}
