//! Manual-sync artifact.
//!
//! When the remote store can't take a write, the full collection is handed
//! to the admin as `events.json` to commit into the site by hand.

use std::path::{Path, PathBuf};

use crate::collection::EventCollection;
use crate::error::{CalError, CalResult};

pub const ARTIFACT_FILE_NAME: &str = "events.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualSyncArtifact {
    events: EventCollection,
}

impl ManualSyncArtifact {
    pub fn new(events: EventCollection) -> Self {
        ManualSyncArtifact { events }
    }

    pub fn file_name(&self) -> &'static str {
        ARTIFACT_FILE_NAME
    }

    pub fn events(&self) -> &EventCollection {
        &self.events
    }

    /// Document contents in the snapshot wire format.
    pub fn contents(&self) -> CalResult<String> {
        self.events.to_json()
    }

    /// Write `events.json` into `dir`, returning its path.
    pub fn write_into(&self, dir: &Path) -> CalResult<PathBuf> {
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.contents()?)
            .map_err(|e| CalError::PersistenceDegraded(format!("{}: {}", path.display(), e)))?;
        Ok(path)
    }
}
