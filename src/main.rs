//! Binary entrypoint for the `github-lockify` CLI.

use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A .env file may supply GITHUB_TOKEN; a missing one is fine.
    let _ = dotenvy::dotenv();

    // Recording is handled in github_lockify::run via LOCKIFY_RECORD=<dir>.
    match github_lockify::run(std::env::args_os()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err.trim_end());
            ExitCode::FAILURE
        }
    }
}
