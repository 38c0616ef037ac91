//! Recording adapters that capture interactions to cassettes.

pub mod clock;
pub mod filesystem;
pub mod git;
mod redact;
pub mod tracker;

pub use clock::RecordingClock;
pub use filesystem::RecordingFileSystem;
pub use git::RecordingGitRepo;
pub use tracker::RecordingIssueTracker;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

/// Record an interaction with a plain (non-Result) return value.
///
/// Mirror of `replaying::extract_value`.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");
    let output_json = serde_json::to_value(output).expect("failed to serialize recording output");

    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, input_json, output_json);
}

/// Record a `Result<T, E>` interaction.
///
/// Mirror of `replaying::extract_result`. `Ok(v)` is stored as `{"ok": v}`
/// and `Err(e)` as `{"err": e}`.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: Serialize,
    I: Serialize,
{
    let output = match result {
        Ok(v) => serde_json::json!({ "ok": v }),
        Err(e) => serde_json::json!({ "err": e }),
    };
    record_interaction(recorder, port, method, input, &output);
}
