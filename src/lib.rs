//! Core library entry for the `github-lockify` CLI.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod config;
pub mod context;
pub mod endpoints;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod lock;
pub mod model;
pub mod pipeline;
pub mod ports;

use std::env;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cassette::session::RecordingSession;
use crate::config::Resolver;
use crate::context::ServiceContext;
use crate::error::LockifyError;

/// Environment variable naming a directory to record port cassettes into.
pub const RECORD_ENV: &str = "LOCKIFY_RECORD";

/// Run the CLI with the provided arguments.
///
/// When `LOCKIFY_RECORD` is set to a directory path, all port interactions
/// are recorded to per-port cassette files under that directory.
///
/// # Errors
///
/// Returns an error string when argument parsing, configuration or the lock
/// run fails.
pub async fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => return Err(err.to_string()),
        Err(err) => {
            // --help and --version
            err.print().map_err(|e| e.to_string())?;
            return Ok(());
        }
    };
    init_tracing(cli.log_level());

    let (ctx, session) = match env::var_os(RECORD_ENV) {
        Some(path) => {
            let (ctx, session) = ServiceContext::recording_at(&PathBuf::from(path))?;
            (ctx, Some(session))
        }
        None => (ServiceContext::live(), None),
    };

    let result = run_with_context(&ctx, &cli).await;

    if let Some(session) = session {
        // The recording adapters hold the recorders until the context goes.
        drop(ctx);
        finish_recording(session)?;
    }

    result.map_err(|err| format!("error: {err}"))
}

/// Resolves configuration and runs the pipeline, reporting to stdout.
///
/// # Errors
///
/// Returns the first configuration, fetch or lock failure.
pub async fn run_with_context(ctx: &ServiceContext, cli: &cli::Cli) -> Result<(), LockifyError> {
    let config = Resolver::new(ctx).resolve(cli)?;
    let mut out = io::stdout();
    pipeline::run_with_context(ctx, &config, &mut out).await?;
    Ok(())
}

/// Logs go to stderr so stdout carries only the report. `RUST_LOG`
/// overrides the level chosen by `-v`/`-q`.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,github_lockify={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
