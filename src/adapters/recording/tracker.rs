//! Recording adapter for the `IssueTracker` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::model::Credential;
use crate::ports::{IssuePage, IssueTracker, TrackerFuture};

/// Records tracker calls while delegating to an inner implementation.
///
/// Only whether a credential was sent is recorded, never the token itself.
pub struct RecordingIssueTracker {
    inner: Box<dyn IssueTracker>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingIssueTracker {
    /// Creates a new recording tracker wrapping the given implementation.
    pub fn new(inner: Box<dyn IssueTracker>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct RequestInput<'a> {
    url: &'a str,
    authenticated: bool,
}

impl IssueTracker for RecordingIssueTracker {
    fn list_issues<'a>(
        &'a self,
        url: &'a str,
        credential: Option<&'a Credential>,
    ) -> TrackerFuture<'a, IssuePage> {
        Box::pin(async move {
            let result = self.inner.list_issues(url, credential).await;
            let input = RequestInput { url, authenticated: credential.is_some() };
            record_result(&self.recorder, "tracker", "list_issues", &input, &result);
            result
        })
    }

    fn lock_issue<'a>(
        &'a self,
        url: &'a str,
        credential: Option<&'a Credential>,
    ) -> TrackerFuture<'a, ()> {
        Box::pin(async move {
            let result = self.inner.lock_issue(url, credential).await;
            let input = RequestInput { url, authenticated: credential.is_some() };
            record_result(&self.recorder, "tracker", "lock_issue", &input, &result);
            result
        })
    }
}
