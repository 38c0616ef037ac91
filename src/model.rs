//! Domain types shared by the fetch, filter and lock stages.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A label attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// The label name.
    pub name: String,
}

/// A GitHub account reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The account's login name.
    pub login: String,
}

/// A closed issue as returned by the issue listing endpoint.
///
/// Only the fields the lock pipeline reads are modelled; everything else in
/// the payload is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number, unique within the repository.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// When the issue was opened.
    pub created_at: DateTime<Utc>,
    /// When the issue last changed.
    pub updated_at: DateTime<Utc>,
    /// When the issue was closed. Absent only for issues that are not closed.
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    /// Whether conversation on the issue is already locked.
    #[serde(default)]
    pub locked: bool,
    /// Labels applied to the issue.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// The assigned user, if any.
    #[serde(default)]
    pub assignee: Option<User>,
    /// The user who opened the issue.
    pub user: User,
    /// Present only when the listing entry is really a pull request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    /// Returns `true` when this listing entry is a pull request.
    #[must_use]
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Returns the label names in the order the API reported them.
    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|l| l.name.as_str())
    }
}

/// Why an issue's conversation is being locked.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum LockReason {
    /// The conversation drifted off topic.
    OffTopic,
    /// The conversation became too heated.
    #[value(alias = "too heated")]
    TooHeated,
    /// The issue has been resolved.
    #[default]
    Resolved,
    /// The conversation is spam.
    Spam,
}

impl LockReason {
    /// The spelling the lock endpoint expects for `lock_reason`.
    #[must_use]
    pub fn api_value(self) -> &'static str {
        match self {
            Self::OffTopic => "off-topic",
            Self::TooHeated => "too heated",
            Self::Resolved => "resolved",
            Self::Spam => "spam",
        }
    }
}

impl fmt::Display for LockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_value())
    }
}

/// A single lock call to issue: which issue, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRequest {
    /// The issue number to lock.
    pub number: u64,
    /// The reason sent with the lock call.
    pub reason: LockReason,
}

/// An API token. The secret never appears in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token, for use in the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
