//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::git::LiveGitRepo;
use crate::adapters::live::github::GithubTracker;
use crate::adapters::recording::{
    RecordingClock, RecordingFileSystem, RecordingGitRepo, RecordingIssueTracker,
};
use crate::adapters::replaying::{
    ReplayingClock, ReplayingFileSystem, ReplayingGitRepo, ReplayingIssueTracker,
};
use crate::cassette::config::CassetteConfig;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::model::Credential;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::git::{GitRemote, GitRepo};
use crate::ports::tracker::{IssuePage, IssueTracker, TrackerFuture};

/// Bundles all port trait objects into a single context.
///
/// The context is passed explicitly through every stage of a run; nothing
/// in the pipeline reaches for ambient global state. Constructors wire up
/// live, recording or replaying adapters.
pub struct ServiceContext {
    /// Clock for "now" in age calculations.
    pub clock: Box<dyn Clock>,
    /// Transport to the remote issue tracker.
    pub tracker: Box<dyn IssueTracker>,
    /// Git repository for remote discovery.
    pub git: Box<dyn GitRepo>,
    /// Filesystem for reading local configuration.
    pub fs: Box<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a live context with real adapters for every port.
    #[must_use]
    pub fn live() -> Self {
        Self {
            clock: Box::new(LiveClock),
            tracker: Box::new(GithubTracker::new()),
            git: Box::new(LiveGitRepo),
            fs: Box::new(LiveFileSystem),
        }
    }

    /// Creates a live context whose port traffic is captured by `session`.
    #[must_use]
    pub fn recording(session: &RecordingSession) -> Self {
        Self {
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&session.clock))),
            tracker: Box::new(RecordingIssueTracker::new(
                Box::new(GithubTracker::new()),
                Arc::clone(&session.tracker),
            )),
            git: Box::new(RecordingGitRepo::new(Box::new(LiveGitRepo), Arc::clone(&session.git))),
            fs: Box::new(RecordingFileSystem::new(
                Box::new(LiveFileSystem),
                Arc::clone(&session.fs),
            )),
        }
    }

    /// Starts a recording session under `base` and returns a context wired to it.
    ///
    /// Drop the context before calling [`RecordingSession::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(base: &Path) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(base)?;
        Ok((Self::recording(&session), session))
    }

    /// Creates a replaying context from a monolithic cassette file.
    ///
    /// Each port gets its own replayer over the same cassette so that
    /// per-port cursors are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = CassetteConfig::load_cassette(path)?;
        Ok(Self {
            clock: Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
            tracker: Box::new(ReplayingIssueTracker::new(CassetteReplayer::new(&cassette))),
            git: Box::new(ReplayingGitRepo::new(CassetteReplayer::new(&cassette))),
            fs: Box::new(ReplayingFileSystem::new(CassetteReplayer::new(&cassette))),
        })
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette use an adapter that panics with
    /// a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        Ok(Self {
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => Box::new(PanickingClock),
            },
            tracker: match replayers.tracker {
                Some(r) => Box::new(ReplayingIssueTracker::new(r)),
                None => Box::new(PanickingIssueTracker),
            },
            git: match replayers.git {
                Some(r) => Box::new(ReplayingGitRepo::new(r)),
                None => Box::new(PanickingGitRepo),
            },
            fs: match replayers.fs {
                Some(r) => Box::new(ReplayingFileSystem::new(r)),
                None => Box::new(PanickingFileSystem),
            },
        })
    }
}

// --- Panicking adapters for unconfigured ports ---

fn unconfigured(port: &str) -> ! {
    panic!("{port} port not configured in CassetteConfig: no cassette loaded for it");
}

struct PanickingClock;
impl Clock for PanickingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        unconfigured("clock")
    }
}

struct PanickingIssueTracker;
impl IssueTracker for PanickingIssueTracker {
    fn list_issues<'a>(
        &'a self,
        _url: &'a str,
        _credential: Option<&'a Credential>,
    ) -> TrackerFuture<'a, IssuePage> {
        unconfigured("tracker")
    }

    fn lock_issue<'a>(
        &'a self,
        _url: &'a str,
        _credential: Option<&'a Credential>,
    ) -> TrackerFuture<'a, ()> {
        unconfigured("tracker")
    }
}

struct PanickingGitRepo;
impl GitRepo for PanickingGitRepo {
    fn remotes(&self) -> Result<Vec<GitRemote>, Box<dyn std::error::Error + Send + Sync>> {
        unconfigured("git")
    }
}

struct PanickingFileSystem;
impl FileSystem for PanickingFileSystem {
    fn read_to_string(
        &self,
        _path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        unconfigured("fs")
    }

    fn exists(&self, _path: &Path) -> bool {
        unconfigured("fs")
    }
}
