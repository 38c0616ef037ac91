//! Selection of lock candidates from the fetched issues.
//!
//! Label, assignee and creator constraints travel to the server as query
//! parameters (see [`crate::fetch::ListQuery`]); what is left for the client
//! is the pull-request marker, the three age thresholds and the lock state,
//! none of which the listing endpoint can filter on.

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::model::Issue;

/// Assignee the server should filter on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeFilter {
    /// Only issues nobody is assigned to.
    Unassigned,
    /// Only issues assigned to this login.
    User(String),
}

impl AssigneeFilter {
    /// Value of the `assignee` query parameter.
    #[must_use]
    pub fn query_value(&self) -> &str {
        match self {
            Self::Unassigned => "none",
            Self::User(login) => login,
        }
    }
}

impl FromStr for AssigneeFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "none" { Self::Unassigned } else { Self::User(s.to_string()) })
    }
}

/// Which closed issues qualify for locking. All present constraints must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Minimum time since the last update.
    pub updated_age_min: Option<TimeDelta>,
    /// Minimum time since the issue was closed.
    pub closed_age_min: Option<TimeDelta>,
    /// Minimum time since the issue was opened.
    pub created_age_min: Option<TimeDelta>,
    /// Labels that must all be present. Empty means no label constraint.
    pub labels: BTreeSet<String>,
    /// Required assignee, if any.
    pub assignee: Option<AssigneeFilter>,
    /// Required creator login, if any.
    pub creator: Option<String>,
}

/// Converts a whole-day count into an age threshold.
#[must_use]
pub fn days(count: u32) -> TimeDelta {
    TimeDelta::days(i64::from(count))
}

/// Why an issue was left out of the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The entry is a pull request.
    PullRequest,
    /// Updated more recently than the threshold allows.
    UpdatedTooRecently,
    /// Carries no close timestamp, so it is not actually closed.
    NotClosed,
    /// Closed more recently than the threshold allows.
    ClosedTooRecently,
    /// Opened more recently than the threshold allows.
    CreatedTooRecently,
    /// Conversation is already locked.
    AlreadyLocked,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PullRequest => "is a pull request",
            Self::UpdatedTooRecently => "updated too recently",
            Self::NotClosed => "has no close date",
            Self::ClosedTooRecently => "closed too recently",
            Self::CreatedTooRecently => "created too recently",
            Self::AlreadyLocked => "already locked",
        })
    }
}

/// An issue selected for locking, with its ages in whole days at selection time.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The selected issue.
    pub issue: Issue,
    /// Days since the issue was opened.
    pub created_days: i64,
    /// Days since the issue last changed.
    pub updated_days: i64,
    /// Days since the issue was closed.
    pub closed_days: i64,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.issue.label_names().collect();
        let labels =
            if labels.is_empty() { "unlabeled".to_string() } else { format!("labels {}", labels.join(",")) };
        write!(
            f,
            "Will lock issue #{} (created {}, updated {}, closed {} days ago; {})\n\t\"{}\"",
            self.issue.number,
            self.created_days,
            self.updated_days,
            self.closed_days,
            labels,
            self.issue.title,
        )
    }
}

/// Evaluates the client-side predicate chain against a fixed "now".
#[derive(Debug)]
pub struct FilterEngine<'a> {
    criteria: &'a FilterCriteria,
    now: DateTime<Utc>,
}

impl<'a> FilterEngine<'a> {
    /// Creates an engine measuring ages from `now`.
    #[must_use]
    pub fn new(criteria: &'a FilterCriteria, now: DateTime<Utc>) -> Self {
        Self { criteria, now }
    }

    fn older_than(&self, at: DateTime<Utc>, min: Option<TimeDelta>) -> bool {
        min.is_none_or(|min| self.now - at >= min)
    }

    /// Checks one issue, stopping at the first failed predicate.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] that excluded the issue.
    pub fn evaluate(&self, issue: &Issue) -> Result<(), Rejection> {
        if issue.is_pull_request() {
            return Err(Rejection::PullRequest);
        }
        if !self.older_than(issue.updated_at, self.criteria.updated_age_min) {
            return Err(Rejection::UpdatedTooRecently);
        }
        let Some(closed_at) = issue.closed_at else {
            return Err(Rejection::NotClosed);
        };
        if !self.older_than(closed_at, self.criteria.closed_age_min) {
            return Err(Rejection::ClosedTooRecently);
        }
        if !self.older_than(issue.created_at, self.criteria.created_age_min) {
            return Err(Rejection::CreatedTooRecently);
        }
        if issue.locked {
            return Err(Rejection::AlreadyLocked);
        }
        Ok(())
    }

    /// Keeps the issues that pass every predicate, in their original order.
    pub fn select(&self, issues: impl IntoIterator<Item = Issue>) -> Vec<Candidate> {
        issues
            .into_iter()
            .filter_map(|issue| match self.evaluate(&issue) {
                Ok(()) => Some(self.candidate(issue)),
                Err(reason) => {
                    debug!(number = issue.number, %reason, "skipping issue");
                    None
                }
            })
            .collect()
    }

    fn candidate(&self, issue: Issue) -> Candidate {
        let age = |at: DateTime<Utc>| (self.now - at).num_days();
        Candidate {
            created_days: age(issue.created_at),
            updated_days: age(issue.updated_at),
            closed_days: issue.closed_at.map_or(0, age),
            issue,
        }
    }
}

/// Prints one preview entry per candidate followed by the candidate count.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_preview<W: Write>(candidates: &[Candidate], out: &mut W) -> std::io::Result<()> {
    for candidate in candidates {
        writeln!(out, "{candidate}")?;
    }
    writeln!(out, "Found {} issues to lock.", candidates.len())
}
