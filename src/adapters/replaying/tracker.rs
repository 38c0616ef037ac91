//! Replaying adapter for the `IssueTracker` port.

use std::sync::Mutex;

use super::{extract_result, next_interaction};
use crate::cassette::format::Interaction;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::TrackerError;
use crate::model::Credential;
use crate::ports::{IssuePage, IssueTracker, TrackerFuture};

/// Serves recorded tracker responses from a cassette.
///
/// Each call must request exactly the URL that was recorded, so a replay
/// fails loudly if pagination stops following continuation links verbatim
/// or lock calls go out in a different order.
pub struct ReplayingIssueTracker {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingIssueTracker {
    /// Create a replaying tracker backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn next(&self, method: &str, url: &str) -> Interaction {
        let interaction = next_interaction(&self.replayer, "tracker", method);
        if let Some(recorded) = interaction.input.get("url").and_then(serde_json::Value::as_str) {
            assert_eq!(
                recorded, url,
                "tracker::{method} replay out of order: recorded seq={} for a different URL",
                interaction.seq
            );
        }
        interaction
    }
}

impl IssueTracker for ReplayingIssueTracker {
    fn list_issues<'a>(
        &'a self,
        url: &'a str,
        _credential: Option<&'a Credential>,
    ) -> TrackerFuture<'a, IssuePage> {
        let output = self.next("list_issues", url).output;
        Box::pin(async move {
            extract_result::<IssuePage, TrackerError>(output, "tracker::list_issues")
        })
    }

    fn lock_issue<'a>(
        &'a self,
        url: &'a str,
        _credential: Option<&'a Credential>,
    ) -> TrackerFuture<'a, ()> {
        let output = self.next("lock_issue", url).output;
        Box::pin(async move { extract_result::<(), TrackerError>(output, "tracker::lock_issue") })
    }
}
