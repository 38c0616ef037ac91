//! Recording adapter for the `GitRepo` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use super::redact::strip_userinfo;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{GitRemote, GitRepo};

/// Records git interactions while delegating to an inner implementation.
pub struct RecordingGitRepo {
    inner: Box<dyn GitRepo>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGitRepo {
    /// Creates a new recording git repo wrapping the given implementation.
    pub fn new(inner: Box<dyn GitRepo>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl GitRepo for RecordingGitRepo {
    fn remotes(&self) -> Result<Vec<GitRemote>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.remotes();
        let recorded = result
            .as_ref()
            .map(|remotes| {
                remotes
                    .iter()
                    .map(|r| GitRemote { name: r.name.clone(), url: strip_userinfo(&r.url) })
                    .collect::<Vec<_>>()
            })
            .map_err(ToString::to_string);
        record_result(&self.recorder, "git", "remotes", &(), &recorded);
        result
    }
}
