//! Issue tracker port: the two HTTP calls the lock run makes.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::model::{Credential, Issue};

/// Boxed future type alias used by [`IssueTracker`] to keep the trait dyn-compatible.
pub type TrackerFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, TrackerError>> + Send + 'a>>;

/// One page of the closed-issue listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssuePage {
    /// Issues on this page, in response order.
    pub issues: Vec<Issue>,
    /// The `rel="next"` continuation URL, verbatim. `None` on the last page.
    pub next: Option<String>,
}

/// Transport to the remote issue tracker.
///
/// URLs are built by the caller (first page, lock endpoint) or taken verbatim
/// from a previous page (continuation), so implementations never construct
/// endpoints themselves. The credential is passed per call rather than held
/// as ambient session state.
pub trait IssueTracker: Send + Sync {
    /// Fetches one page of issues from `url`.
    ///
    /// # Errors
    ///
    /// Returns an error on any non-success status, transport failure or
    /// undecodable body.
    fn list_issues<'a>(
        &'a self,
        url: &'a str,
        credential: Option<&'a Credential>,
    ) -> TrackerFuture<'a, IssuePage>;

    /// Locks the issue addressed by `url`. Locking an already-locked issue
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error on any non-success status or transport failure.
    fn lock_issue<'a>(
        &'a self,
        url: &'a str,
        credential: Option<&'a Credential>,
    ) -> TrackerFuture<'a, ()>;
}
