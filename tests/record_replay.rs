//! Whole-pipeline tests driven by replayed cassettes.
//!
//! Each test writes per-port cassettes for the clock and the tracker, replays
//! them through `ServiceContext::replaying_from`, and checks both the report
//! written to the output stream and which tracker calls were made. A replayed
//! tracker panics on any call that was not recorded, so an unexpected lock
//! call fails the test.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use clap::Parser;
use serde_json::{json, Value};

use github_lockify::adapters::live::filesystem::LiveFileSystem;
use github_lockify::adapters::live::git::LiveGitRepo;
use github_lockify::adapters::recording::{RecordingClock, RecordingIssueTracker};
use github_lockify::adapters::replaying::{ReplayingClock, ReplayingIssueTracker};
use github_lockify::cassette::config::CassetteConfig;
use github_lockify::cassette::recorder::CassetteRecorder;
use github_lockify::cassette::session::RecordingSession;
use github_lockify::cli::Cli;
use github_lockify::config::{Resolver, RunConfig};
use github_lockify::context::ServiceContext;
use github_lockify::endpoints::{parse_api_base, DEFAULT_API_URL};
use github_lockify::error::LockifyError;
use github_lockify::filter::{days, FilterCriteria};
use github_lockify::lock::LockMode;
use github_lockify::model::{Credential, LockReason};
use github_lockify::pipeline::run_with_context;

const FIRST: &str =
    "https://api.github.com/repos/octo/hello/issues?state=closed&direction=asc&per_page=100";
const SECOND: &str = "https://api.github.com/repositories/42/issues?state=closed&direction=asc&per_page=100&page=2";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn ago(d: i64) -> String {
    (now() - TimeDelta::days(d)).to_rfc3339()
}

fn issue(number: u64, created: i64, updated: i64, closed: i64) -> Value {
    json!({
        "number": number,
        "title": format!("Issue {number}"),
        "state": "closed",
        "created_at": ago(created),
        "updated_at": ago(updated),
        "closed_at": ago(closed),
        "locked": false,
        "labels": [],
        "assignee": null,
        "user": {"login": "octocat"}
    })
}

/// Page one: a pull request, a locked issue, #3 closed 40 days ago and #4
/// closed 5 days ago. Page two: #5, labelled, closed 100 days ago.
fn listing() -> (Value, Value) {
    let mut pr = issue(1, 300, 300, 300);
    pr["pull_request"] = json!({"url": "https://api.github.com/repos/octo/hello/pulls/1"});
    let mut locked = issue(2, 300, 300, 300);
    locked["locked"] = json!(true);
    let mut labelled = issue(5, 250, 100, 100);
    labelled["labels"] = json!([{"name": "wontfix"}]);

    (
        json!({"issues": [pr, locked, issue(3, 40, 40, 40), issue(4, 5, 5, 5)], "next": SECOND}),
        json!({"issues": [labelled], "next": null}),
    )
}

fn lock_url(number: u64) -> String {
    format!("https://api.github.com/repos/octo/hello/issues/{number}/lock?lock_reason=resolved")
}

fn config(commit: bool) -> RunConfig {
    RunConfig {
        api_base: parse_api_base(DEFAULT_API_URL).unwrap(),
        owner: "octo".into(),
        repo: "hello".into(),
        credential: commit.then(|| Credential::new("ghp_test")),
        criteria: FilterCriteria { closed_age_min: Some(days(30)), ..FilterCriteria::default() },
        lock_reason: LockReason::Resolved,
        commit,
    }
}

/// Writes clock and tracker cassettes into `dir` and returns their config.
fn write_cassettes(dir: &Path, locks: &[(u64, Value)]) -> CassetteConfig {
    let _ = std::fs::remove_dir_all(dir);
    std::fs::create_dir_all(dir).unwrap();

    let clock_path = dir.join("clock.cassette.yaml");
    let mut clock = CassetteRecorder::new(&clock_path, "clock");
    clock.record("clock", "now", json!(null), json!(now().to_rfc3339()));
    clock.finish().unwrap();

    let (first, second) = listing();
    let tracker_path = dir.join("tracker.cassette.yaml");
    let mut tracker = CassetteRecorder::new(&tracker_path, "tracker");
    tracker.record("tracker", "list_issues", json!({"url": FIRST, "authenticated": !locks.is_empty()}), json!({"ok": first}));
    tracker.record("tracker", "list_issues", json!({"url": SECOND, "authenticated": !locks.is_empty()}), json!({"ok": second}));
    for (number, output) in locks {
        tracker.record("tracker", "lock_issue", json!({"url": lock_url(*number), "authenticated": true}), output.clone());
    }
    tracker.finish().unwrap();

    CassetteConfig { clock: Some(clock_path), tracker: Some(tracker_path), ..CassetteConfig::default() }
}

const PREVIEW: &str = "\
Will lock issue #3 (created 40, updated 40, closed 40 days ago; unlabeled)
\t\"Issue 3\"
Will lock issue #5 (created 250, updated 100, closed 100 days ago; labels wontfix)
\t\"Issue 5\"
Found 2 issues to lock.
";

#[tokio::test]
async fn dry_run_previews_across_pages_without_locking() {
    let dir = std::env::temp_dir().join("lockify_replay_dry_run");
    let ctx = ServiceContext::replaying_from(&write_cassettes(&dir, &[])).unwrap();
    let mut out = Vec::new();

    let summary = run_with_context(&ctx, &config(false), &mut out).await.unwrap();

    assert_eq!(summary.mode, LockMode::DryRun);
    assert_eq!((summary.candidates, summary.locked), (2, 0));
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("{PREVIEW}Dry run complete. Rerun with --token and --do-it to actually lock issues.\n")
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn commit_locks_every_candidate_in_listing_order() {
    let dir = std::env::temp_dir().join("lockify_replay_commit");
    let ctx = ServiceContext::replaying_from(&write_cassettes(
        &dir,
        &[(3, json!({"ok": null})), (5, json!({"ok": null}))],
    ))
    .unwrap();
    let mut out = Vec::new();

    let summary = run_with_context(&ctx, &config(true), &mut out).await.unwrap();

    assert_eq!(summary.mode, LockMode::Commit);
    assert_eq!(summary.locked, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!(
            "{PREVIEW}\
             Locking issue #3 (\"Issue 3\")... LOCKED\n\
             Locking issue #5 (\"Issue 5\")... LOCKED\n\
             Done. Locked 2 issues.\n"
        )
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn forbidden_lock_stops_the_run() {
    let dir = std::env::temp_dir().join("lockify_replay_forbidden");
    let forbidden = json!({"err": {
        "kind": "http",
        "method": "PUT",
        "url": lock_url(3),
        "status": 403,
        "message": "Must have admin rights to Repository."
    }});
    // Only the first lock call is recorded; a second call would panic.
    let ctx = ServiceContext::replaying_from(&write_cassettes(&dir, &[(3, forbidden)])).unwrap();
    let mut out = Vec::new();

    let err = run_with_context(&ctx, &config(true), &mut out).await.unwrap_err();

    assert!(matches!(err, LockifyError::Tracker(ref e) if e.status() == Some(403)), "{err}");
    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with("Locking issue #3 (\"Issue 3\")... FAILED\n"), "{text}");
    assert!(!text.contains("Done."));
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn failed_page_fetch_reports_nothing() {
    let dir = std::env::temp_dir().join("lockify_replay_fetch_error");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let tracker_path = dir.join("tracker.cassette.yaml");
    let mut tracker = CassetteRecorder::new(&tracker_path, "tracker");
    tracker.record(
        "tracker",
        "list_issues",
        json!({"url": FIRST, "authenticated": false}),
        json!({"err": {"kind": "http", "method": "GET", "url": FIRST, "status": 404, "message": "Not Found"}}),
    );
    tracker.finish().unwrap();
    let ctx = ServiceContext::replaying_from(&CassetteConfig {
        tracker: Some(tracker_path),
        ..CassetteConfig::default()
    })
    .unwrap();
    let mut out = Vec::new();

    let err = run_with_context(&ctx, &config(false), &mut out).await.unwrap_err();

    assert!(err.to_string().contains("404"));
    assert!(out.is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn every_page_is_fetched_before_filtering() {
    let dir = std::env::temp_dir().join("lockify_replay_pagination");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let clock_path = dir.join("clock.cassette.yaml");
    let mut clock = CassetteRecorder::new(&clock_path, "clock");
    clock.record("clock", "now", json!(null), json!(now().to_rfc3339()));
    clock.finish().unwrap();

    let page = |range: std::ops::Range<u64>| range.map(|n| issue(n, 60, 60, 60)).collect::<Vec<_>>();
    let tracker_path = dir.join("tracker.cassette.yaml");
    let mut tracker = CassetteRecorder::new(&tracker_path, "tracker");
    tracker.record(
        "tracker",
        "list_issues",
        json!({"url": FIRST, "authenticated": false}),
        json!({"ok": {"issues": page(1..101), "next": SECOND}}),
    );
    tracker.record(
        "tracker",
        "list_issues",
        json!({"url": SECOND, "authenticated": false}),
        json!({"ok": {"issues": page(101..141), "next": null}}),
    );
    tracker.finish().unwrap();

    let ctx = ServiceContext::replaying_from(&CassetteConfig {
        clock: Some(clock_path),
        tracker: Some(tracker_path),
        ..CassetteConfig::default()
    })
    .unwrap();
    let mut out = Vec::new();

    let summary = run_with_context(&ctx, &config(false), &mut out).await.unwrap();

    assert_eq!(summary.candidates, 140);
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("Will lock issue #").count(), 140);
    assert!(text.contains("Found 140 issues to lock."));
    let _ = std::fs::remove_dir_all(&dir);
}

/// Runs the commit scenario through recording adapters and returns the report
/// together with the session's output directory.
async fn record_commit_run(source: &CassetteConfig, base: &Path) -> (String, PathBuf) {
    let replayers = source.load_all().unwrap();
    let session = RecordingSession::new(base).unwrap();
    let ctx = ServiceContext {
        clock: Box::new(RecordingClock::new(
            Box::new(ReplayingClock::new(replayers.clock.unwrap())),
            Arc::clone(&session.clock),
        )),
        tracker: Box::new(RecordingIssueTracker::new(
            Box::new(ReplayingIssueTracker::new(replayers.tracker.unwrap())),
            Arc::clone(&session.tracker),
        )),
        git: Box::new(LiveGitRepo),
        fs: Box::new(LiveFileSystem),
    };
    let mut out = Vec::new();
    run_with_context(&ctx, &config(true), &mut out).await.unwrap();
    drop(ctx);
    let output_dir = session.finish().unwrap();
    (String::from_utf8(out).unwrap(), output_dir)
}

#[tokio::test]
async fn recorded_session_replays_identically() {
    let dir = std::env::temp_dir().join("lockify_replay_roundtrip");
    let source = write_cassettes(&dir.join("source"), &[(3, json!({"ok": null})), (5, json!({"ok": null}))]);
    let (recorded_report, session_dir) = record_commit_run(&source, &dir.join("sessions")).await;

    let tracker_yaml = std::fs::read_to_string(session_dir.join("tracker.cassette.yaml")).unwrap();
    assert!(!tracker_yaml.contains("ghp_test"), "token leaked into cassette");
    assert!(tracker_yaml.contains("authenticated: true"));

    let replayed = CassetteConfig {
        clock: Some(session_dir.join("clock.cassette.yaml")),
        tracker: Some(session_dir.join("tracker.cassette.yaml")),
        ..CassetteConfig::default()
    };
    for _ in 0..2 {
        let ctx = ServiceContext::replaying_from(&replayed).unwrap();
        let mut out = Vec::new();
        run_with_context(&ctx, &config(true), &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), recorded_report);
    }
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn hub_token_is_masked_in_recorded_cassettes() {
    let dir = std::env::temp_dir().join("lockify_record_hub_token");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let hub = dir.join("hub");
    std::fs::write(&hub, "github.com:\n- user: octocat\n  oauth_token: ghp_from_hub_file\n").unwrap();

    let mut cli = Cli::try_parse_from(["github-lockify", "octo", "hello"]).unwrap();
    cli.token = None;

    let (ctx, session) = ServiceContext::recording_at(&dir.join("sessions")).unwrap();
    let config = Resolver::new(&ctx).with_hub_path(Some(hub.clone())).resolve(&cli).unwrap();
    assert_eq!(config.credential, Some(Credential::new("ghp_from_hub_file")));
    drop(ctx);
    let session_dir = session.finish().unwrap();

    for entry in std::fs::read_dir(&session_dir).unwrap() {
        let path = entry.unwrap().path();
        let yaml = std::fs::read_to_string(&path).unwrap();
        assert!(!yaml.contains("ghp_from_hub_file"), "token leaked into {}:\n{yaml}", path.display());
    }

    // The masked file still replays as an authenticated configuration.
    let replayed = CassetteConfig { fs: Some(session_dir.join("fs.cassette.yaml")), ..CassetteConfig::default() };
    let ctx = ServiceContext::replaying_from(&replayed).unwrap();
    let config = Resolver::new(&ctx).with_hub_path(Some(hub)).resolve(&cli).unwrap();
    assert!(config.credential.is_some());
    assert_ne!(config.credential, Some(Credential::new("ghp_from_hub_file")));
    let _ = std::fs::remove_dir_all(&dir);
}
