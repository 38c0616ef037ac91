//! The fetch, filter and lock stages wired together.

use std::io::Write;

use tracing::info;

use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::error::LockifyError;
use crate::fetch::IssueFetcher;
use crate::filter::{write_preview, FilterEngine};
use crate::lock::{LockExecutor, LockSummary};

/// Runs one lock pass over the configured repository.
///
/// All issues are fetched before any is evaluated, and the full preview is
/// written before the first lock call goes out.
///
/// # Errors
///
/// Returns the first fetch or lock failure, or an output error.
pub async fn run_with_context<W: Write>(
    ctx: &ServiceContext,
    config: &RunConfig,
    out: &mut W,
) -> Result<LockSummary, LockifyError> {
    info!(owner = %config.owner, repo = %config.repo, "fetching closed issues");
    let issues = IssueFetcher::new(ctx.tracker.as_ref(), config).fetch_all().await?;

    let now = ctx.clock.now();
    let candidates = FilterEngine::new(&config.criteria, now).select(issues);
    write_preview(&candidates, out)?;

    let summary = LockExecutor::new(ctx.tracker.as_ref(), config).execute(&candidates, out).await?;
    info!(mode = %summary.mode, candidates = summary.candidates, locked = summary.locked, "run complete");
    Ok(summary)
}
