//! CLI argument definitions.

use clap::{ArgAction, Parser};

use crate::endpoints::DEFAULT_API_URL;
use crate::filter::AssigneeFilter;
use crate::model::LockReason;

const SELECTION: &str = "Issue selection";

/// Top-level CLI parser for `github-lockify`.
#[derive(Debug, Parser)]
#[command(
    name = "github-lockify",
    version,
    about = "Lock closed GitHub issues en masse",
    long_about = "Lock closed GitHub issues en masse.\n\n\
                  Without --do-it only a preview of the issues that would be locked is printed."
)]
pub struct Cli {
    /// Repository owner, or OWNER/REPO [default: inferred from git remotes or hub config]
    pub owner: Option<String>,

    /// Repository name [default: inferred from git remotes]
    pub repo: Option<String>,

    /// Actually lock the issues instead of only listing them
    #[arg(long)]
    pub do_it: bool,

    /// Reason recorded on each lock
    #[arg(short = 'r', long, value_enum, default_value_t = LockReason::Resolved)]
    pub lock_reason: LockReason,

    /// GitHub API token [default: hub config]
    #[arg(short = 't', long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Only issues not updated for at least DAYS days
    #[arg(short = 'U', long, value_name = "DAYS", help_heading = SELECTION)]
    pub updated_age: Option<u32>,

    /// Only issues closed for at least DAYS days
    #[arg(short = 'C', long, value_name = "DAYS", help_heading = SELECTION)]
    pub closed_age: Option<u32>,

    /// Only issues opened at least DAYS days ago
    #[arg(long, value_name = "DAYS", help_heading = SELECTION)]
    pub created_age: Option<u32>,

    /// Only issues carrying LABEL; repeat to require several
    #[arg(short = 'l', long = "label", value_name = "LABEL", action = ArgAction::Append, help_heading = SELECTION)]
    pub labels: Vec<String>,

    /// Only issues assigned to USERNAME, or `none` for unassigned issues
    #[arg(short = 'a', long, value_name = "USERNAME", help_heading = SELECTION)]
    pub assignee: Option<AssigneeFilter>,

    /// Only issues opened by USERNAME
    #[arg(short = 'c', long, value_name = "USERNAME", help_heading = SELECTION)]
    pub creator: Option<String>,

    /// API root, for GitHub Enterprise installations
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Default log directive for the crate's own events.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}
