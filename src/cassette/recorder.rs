//! Builds a cassette in memory and writes it out once a session ends.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, Interaction};

/// Accumulates interactions for a single cassette file.
///
/// Sequence numbers count every interaction in the file regardless of port,
/// so a cassette read back in `seq` order shows the original call order.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    cassette: Cassette,
}

impl CassetteRecorder {
    /// Starts an empty cassette destined for `path`.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let cassette = Cassette {
            name: name.into(),
            recorded_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            interactions: Vec::new(),
        };
        Self { path: path.into(), cassette }
    }

    /// Number of interactions captured so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cassette.interactions.len()
    }

    /// Whether nothing has been captured yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cassette.interactions.is_empty()
    }

    /// Appends one call and its outcome.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        let seq = self.len() as u64;
        self.cassette.interactions.push(Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
    }

    /// Stamps the finish time and writes the YAML file, returning its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn finish(mut self) -> io::Result<PathBuf> {
        self.cassette.recorded_at = Utc::now();
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_yaml::to_writer(&mut writer, &self.cassette).map_err(io::Error::other)?;
        writer.flush()?;
        Ok(self.path)
    }
}
