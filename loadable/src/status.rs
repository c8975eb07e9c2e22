//! The status model: three independent loading-lifecycle flags.
//!
//! A [`Status`] describes the loading state of a resource. The three flags
//! are deliberately independent rather than a linear progression
//! (pending -> loading -> ready): a resource can be ready *and* loading
//! (a refresh of usable data), or failed *and* ready (stale data plus an
//! error banner). All eight combinations are legal:
//!
//! | ready | loading | error | Meaning |
//! |-------|---------|-------|---------|
//! | no    | no      | none  | pending: never attempted |
//! | no    | yes     | none  | first load in progress, no data yet |
//! | yes   | no      | none  | idle: usable data, not loading |
//! | yes   | yes     | none  | reloading: usable data, refresh in progress |
//! | no    | no      | some  | failed, no retry attempted, no data |
//! | no    | yes     | some  | failed, retry in progress, no data |
//! | yes   | no      | some  | failed, not retrying, stale data available |
//! | yes   | yes     | some  | failed, retry in progress, stale data available |

use nutype::nutype;
use serde::{Deserialize, Serialize};

/// A human-readable description of why a load failed.
///
/// `FailureReason` values are guaranteed to be non-empty after trimming.
/// Once constructed, a reason is always displayable - no further
/// validation needed.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 1024),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct FailureReason(String);

impl FailureReason {
    /// Builds a reason from any displayable error value.
    ///
    /// Falls back to a generic message when the rendered error is empty,
    /// so this conversion never fails.
    pub fn from_display(error: &(impl std::fmt::Display + ?Sized)) -> Self {
        Self::try_new(error.to_string()).unwrap_or_else(|_| {
            Self::try_new("unknown failure").expect("static reason is never empty")
        })
    }
}

/// The loading-lifecycle state of a resource.
///
/// Each flag is independent of the others; see the module docs for the
/// meaning of every combination. Statuses are plain immutable values:
/// all updates go through [`Status::merge`] or the resource transition
/// methods, producing a new `Status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Whether the resource holds data that can be used safely.
    pub ready: bool,
    /// Whether a load for this resource is currently in progress.
    pub loading: bool,
    /// The failure recorded by the last load attempt, if any.
    pub error: Option<FailureReason>,
}

impl Status {
    /// The status of a resource that has never been loaded:
    /// `{ ready: false, loading: false, error: None }`.
    pub const fn pending() -> Self {
        Self {
            ready: false,
            loading: false,
            error: None,
        }
    }

    /// Returns a new status with every field set in `patch` replacing the
    /// corresponding field of `self`. Unset patch fields are preserved.
    #[must_use]
    pub fn merge(self, patch: StatusPatch) -> Self {
        Self {
            ready: patch.ready.unwrap_or(self.ready),
            loading: patch.loading.unwrap_or(self.loading),
            error: patch.error.unwrap_or(self.error),
        }
    }

    /// Whether the last load attempt recorded a failure.
    pub const fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// A partial status update.
///
/// Each field is optional; merging a patch over a [`Status`] replaces
/// only the fields that are set. This is how callers express "set
/// loading, leave everything else alone".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusPatch {
    /// New value for the `ready` flag, if any.
    pub ready: Option<bool>,
    /// New value for the `loading` flag, if any.
    pub loading: Option<bool>,
    /// New value for the `error` field, if any. `Some(None)` clears a
    /// recorded failure.
    pub error: Option<Option<FailureReason>>,
}

impl StatusPatch {
    /// An empty patch: merging it leaves the status unchanged.
    pub const fn new() -> Self {
        Self {
            ready: None,
            loading: None,
            error: None,
        }
    }

    /// Sets the `ready` flag.
    #[must_use]
    pub const fn ready(mut self, ready: bool) -> Self {
        self.ready = Some(ready);
        self
    }

    /// Sets the `loading` flag.
    #[must_use]
    pub const fn loading(mut self, loading: bool) -> Self {
        self.loading = Some(loading);
        self
    }

    /// Sets or clears the recorded failure.
    #[must_use]
    pub fn error(mut self, error: Option<FailureReason>) -> Self {
        self.error = Some(error);
        self
    }
}

impl From<Status> for StatusPatch {
    fn from(status: Status) -> Self {
        Self {
            ready: Some(status.ready),
            loading: Some(status.loading),
            error: Some(status.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_status_is_pending() {
        let status = Status::default();
        assert!(!status.ready);
        assert!(!status.loading);
        assert_eq!(status.error, None);
        assert_eq!(status, Status::pending());
    }

    #[test]
    fn empty_patch_preserves_status() {
        let status = Status {
            ready: true,
            loading: true,
            error: Some(FailureReason::try_new("boom").unwrap()),
        };
        assert_eq!(status.clone().merge(StatusPatch::new()), status);
    }

    #[test]
    fn patch_replaces_only_set_fields() {
        let status = Status {
            ready: true,
            loading: false,
            error: Some(FailureReason::try_new("boom").unwrap()),
        };
        let merged = status.merge(StatusPatch::new().loading(true));
        assert!(merged.ready);
        assert!(merged.loading);
        assert_eq!(merged.error, Some(FailureReason::try_new("boom").unwrap()));
    }

    #[test]
    fn patch_can_clear_an_error() {
        let status = Status {
            ready: false,
            loading: false,
            error: Some(FailureReason::try_new("boom").unwrap()),
        };
        let merged = status.merge(StatusPatch::new().error(None));
        assert_eq!(merged.error, None);
    }

    #[test]
    fn failure_reason_rejects_empty_and_blank() {
        assert!(FailureReason::try_new("").is_err());
        assert!(FailureReason::try_new("   ").is_err());
    }

    #[test]
    fn failure_reason_trims_input() {
        let reason = FailureReason::try_new("  timed out  ").unwrap();
        assert_eq!(reason.into_inner(), "timed out");
    }

    #[test]
    fn from_display_never_fails() {
        let reason = FailureReason::from_display("");
        assert_eq!(reason.into_inner(), "unknown failure");
        let reason = FailureReason::from_display("connection reset");
        assert_eq!(reason.into_inner(), "connection reset");
    }

    #[test]
    fn status_serializes_with_null_error() {
        let json = serde_json::to_string(&Status::pending()).unwrap();
        assert_eq!(json, r#"{"ready":false,"loading":false,"error":null}"#);
    }

    fn arb_reason() -> impl Strategy<Value = FailureReason> {
        "[a-z]{1,16}".prop_map(|s| FailureReason::try_new(s).unwrap())
    }

    fn arb_status() -> impl Strategy<Value = Status> {
        (any::<bool>(), any::<bool>(), prop::option::of(arb_reason())).prop_map(
            |(ready, loading, error)| Status {
                ready,
                loading,
                error,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_full_patch_overwrites_everything(
            base in arb_status(),
            replacement in arb_status(),
        ) {
            let merged = base.merge(StatusPatch::from(replacement.clone()));
            prop_assert_eq!(merged, replacement);
        }

        #[test]
        fn prop_merge_is_last_write_wins(
            base in arb_status(),
            ready in any::<bool>(),
        ) {
            let merged = base
                .clone()
                .merge(StatusPatch::new().ready(!ready))
                .merge(StatusPatch::new().ready(ready));
            prop_assert_eq!(merged.ready, ready);
            prop_assert_eq!(merged.loading, base.loading);
            prop_assert_eq!(merged.error, base.error);
        }
    }
}
