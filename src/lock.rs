//! Dry-run or committed locking of the selected candidates.

use std::fmt;
use std::io::Write;

use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::endpoints;
use crate::error::LockifyError;
use crate::filter::Candidate;
use crate::model::{Credential, LockReason, LockRequest};
use crate::ports::IssueTracker;

/// Whether lock calls are actually issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Only report what would be locked.
    DryRun,
    /// Issue one lock call per candidate.
    Commit,
}

impl LockMode {
    /// Commit mode requires both the explicit request and a credential.
    ///
    /// Asking to commit without a credential degrades to a dry run with a
    /// warning instead of failing.
    #[must_use]
    pub fn resolve(commit: bool, credential: Option<&Credential>) -> Self {
        match (commit, credential) {
            (true, Some(_)) => Self::Commit,
            (true, None) => {
                warn!("--do-it needs a token to lock issues; falling back to a dry run");
                Self::DryRun
            }
            (false, _) => Self::DryRun,
        }
    }
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DryRun => "dry-run",
            Self::Commit => "commit",
        })
    }
}

/// Outcome of a completed lock stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockSummary {
    /// The mode that actually ran.
    pub mode: LockMode,
    /// How many candidates were selected.
    pub candidates: usize,
    /// How many lock calls succeeded.
    pub locked: usize,
}

/// Builds one request per candidate, in candidate order.
#[must_use]
pub fn lock_requests(candidates: &[Candidate], reason: LockReason) -> Vec<LockRequest> {
    candidates.iter().map(|c| LockRequest { number: c.issue.number, reason }).collect()
}

/// Runs the lock stage against a tracker.
pub struct LockExecutor<'a> {
    tracker: &'a dyn IssueTracker,
    config: &'a RunConfig,
}

impl<'a> LockExecutor<'a> {
    /// Creates an executor using `tracker` for transport.
    #[must_use]
    pub fn new(tracker: &'a dyn IssueTracker, config: &'a RunConfig) -> Self {
        Self { tracker, config }
    }

    /// Locks every candidate sequentially, or reports a dry run.
    ///
    /// Stops at the first failed lock call; issues locked before it stay
    /// locked and the progress lines written so far show how far it got.
    ///
    /// # Errors
    ///
    /// Returns the first lock failure, or an output error.
    pub async fn execute<W: Write>(
        &self,
        candidates: &[Candidate],
        out: &mut W,
    ) -> Result<LockSummary, LockifyError> {
        let credential = self.config.credential.as_ref();
        let mode = LockMode::resolve(self.config.commit, credential);
        let mut summary = LockSummary { mode, candidates: candidates.len(), locked: 0 };

        if mode == LockMode::DryRun {
            writeln!(out, "Dry run complete. Rerun with --token and --do-it to actually lock issues.")?;
            return Ok(summary);
        }

        info!(count = candidates.len(), reason = %self.config.lock_reason, "locking issues");
        for (candidate, request) in candidates.iter().zip(lock_requests(candidates, self.config.lock_reason)) {
            let url = endpoints::lock_url(&self.config.api_base, &self.config.owner, &self.config.repo, &request);
            write!(out, "Locking issue #{} (\"{}\")...", request.number, candidate.issue.title)?;
            out.flush()?;
            debug!(%url, "PUT");

            if let Err(err) = self.tracker.lock_issue(url.as_str(), credential).await {
                writeln!(out, " FAILED")?;
                return Err(err.into());
            }
            writeln!(out, " LOCKED")?;
            summary.locked += 1;
        }

        writeln!(out, "Done. Locked {} issues.", summary.locked)?;
        Ok(summary)
    }
}
