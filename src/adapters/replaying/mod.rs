//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod filesystem;
pub mod git;
pub mod tracker;

pub use clock::ReplayingClock;
pub use filesystem::ReplayingFileSystem;
pub use git::ReplayingGitRepo;
pub use tracker::ReplayingIssueTracker;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::format::Interaction;
use crate::cassette::replayer::CassetteReplayer;

/// Take the next recorded interaction for `port::method`.
pub(crate) fn next_interaction(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Interaction {
    replayer.lock().expect("replayer lock poisoned").next_interaction(port, method)
}

/// Decode a recorded plain value.
pub(crate) fn extract_value<T: DeserializeOwned>(output: serde_json::Value, context: &str) -> T {
    serde_json::from_value(output)
        .unwrap_or_else(|e| panic!("{context}: recorded output does not decode: {e}"))
}

/// Decode a recorded `{"ok": …}` / `{"err": …}` output.
pub(crate) fn extract_result<T, E>(mut output: serde_json::Value, context: &str) -> Result<T, E>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    if let Some(err) = output.get_mut("err") {
        return Err(extract_value(err.take(), context));
    }
    let value = output.get_mut("ok").map_or(serde_json::Value::Null, serde_json::Value::take);
    Ok(extract_value(value, context))
}

/// Boxes a replayed error message so it fits the `Box<dyn Error>` ports.
pub(crate) fn boxed_error(message: String) -> Box<dyn std::error::Error + Send + Sync> {
    message.into()
}
