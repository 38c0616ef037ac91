//! Live git adapter using the `git` CLI.

use std::process::Command;

use crate::ports::git::{GitRemote, GitRepo};

/// Live git adapter that shells out to `git remote -v`.
pub struct LiveGitRepo;

impl GitRepo for LiveGitRepo {
    fn remotes(&self) -> Result<Vec<GitRemote>, Box<dyn std::error::Error + Send + Sync>> {
        let output = Command::new("git").args(["remote", "-v"]).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("git remote -v failed: {}", stderr.trim()).into());
        }
        Ok(parse_remote_listing(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parses `git remote -v` output, keeping each remote's fetch URL once.
fn parse_remote_listing(listing: &str) -> Vec<GitRemote> {
    let mut remotes: Vec<GitRemote> = Vec::new();
    for line in listing.lines() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(url)) = (fields.next(), fields.next()) else {
            continue;
        };
        if fields.next() == Some("(push)") || remotes.iter().any(|r| r.name == name) {
            continue;
        }
        remotes.push(GitRemote { name: name.to_string(), url: url.to_string() });
    }
    remotes
}
