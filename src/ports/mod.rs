//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the lock pipeline and an
//! external system (time, the issue tracker, git, the filesystem).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod git;
pub mod tracker;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use git::{GitRemote, GitRepo};
pub use tracker::{IssuePage, IssueTracker, TrackerFuture};
