//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;

use super::{boxed_error, extract_result, extract_value, next_interaction};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::filesystem::FileSystem;

/// Replays recorded filesystem reads from a cassette.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a new replaying filesystem from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(
        &self,
        _path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let interaction = next_interaction(&self.replayer, "fs", "read_to_string");
        extract_result(interaction.output, "fs::read_to_string").map_err(boxed_error)
    }

    fn exists(&self, _path: &Path) -> bool {
        let interaction = next_interaction(&self.replayer, "fs", "exists");
        extract_value(interaction.output, "fs::exists")
    }
}
