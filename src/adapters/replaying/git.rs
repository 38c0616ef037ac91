//! Replaying adapter for the `GitRepo` port.

use std::sync::Mutex;

use super::{boxed_error, extract_result, next_interaction};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::git::{GitRemote, GitRepo};

/// Replays recorded git queries from a cassette.
pub struct ReplayingGitRepo {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingGitRepo {
    /// Creates a new replaying git repo from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl GitRepo for ReplayingGitRepo {
    fn remotes(&self) -> Result<Vec<GitRemote>, Box<dyn std::error::Error + Send + Sync>> {
        let interaction = next_interaction(&self.replayer, "git", "remotes");
        extract_result(interaction.output, "git::remotes").map_err(boxed_error)
    }
}
