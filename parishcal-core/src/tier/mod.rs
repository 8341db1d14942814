//! Persistence tiers.
//!
//! Events live in up to three places, in decreasing order of trust:
//! the remote document store (shared across devices), the deploy-time
//! snapshot, and the local cache on this machine.

pub mod cache;
pub mod github;
pub mod remote;
pub mod snapshot;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use cache::{FileCache, LocalCache, MemoryCache};
pub use github::GithubContents;
pub use remote::{RemoteDocument, RemoteStore, VersionToken};
pub use snapshot::{FileSnapshot, HttpSnapshot, SnapshotSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Remote,
    Snapshot,
    LocalCache,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Remote => write!(f, "remote"),
            Tier::Snapshot => write!(f, "snapshot"),
            Tier::LocalCache => write!(f, "local cache"),
        }
    }
}
