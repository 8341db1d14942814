//! Write propagation: local cache first, then the remote store.

use std::fmt;

use chrono::{DateTime, Local};

use crate::artifact::ManualSyncArtifact;
use crate::collection::EventCollection;
use crate::error::{CalError, CalResult};
use crate::store::EventStore;
use crate::tier::RemoteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    SavingLocal,
    SavingRemote,
    /// The last write did not reach every tier it should have.
    Degraded,
}

impl fmt::Display for SaveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveState::Idle => write!(f, "idle"),
            SaveState::SavingLocal => write!(f, "saving locally"),
            SaveState::SavingRemote => write!(f, "saving to remote"),
            SaveState::Degraded => write!(f, "degraded"),
        }
    }
}

/// Outcome of propagating the collection after a mutation.
#[derive(Debug)]
pub enum SaveReport {
    /// Written to the remote store.
    Remote,
    /// No remote configured; the local cache holds the change.
    LocalOnly,
    /// A tier rejected the write. In-memory state is intact; `artifact`
    /// carries the full collection for a manual upload.
    Degraded {
        warning: CalError,
        artifact: ManualSyncArtifact,
    },
}

impl SaveReport {
    pub fn is_degraded(&self) -> bool {
        matches!(self, SaveReport::Degraded { .. })
    }
}

impl EventStore {
    pub(super) fn persist_local(&mut self) {
        self.save_state = SaveState::SavingLocal;
        self.unsynced = true;

        match self.cache.store(&self.events) {
            Ok(()) => {
                self.cache_error = None;
                self.save_state = if self.remote_failed {
                    SaveState::Degraded
                } else {
                    SaveState::Idle
                };
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not update local cache");
                self.cache_error = Some(e.to_string());
                self.save_state = SaveState::Degraded;
            }
        }
    }

    /// Push the current collection to the remote store.
    ///
    /// The version token is read fresh right before writing. A stale token,
    /// or any other remote failure, is not retried or merged: the store
    /// goes `Degraded` and hands back the manual-sync artifact.
    pub async fn sync_remote(&mut self) -> SaveReport {
        let Some(remote) = self.remote.as_deref() else {
            if let Some(err) = self.cache_error.clone() {
                return self.degraded(CalError::PersistenceDegraded(format!(
                    "local cache write failed: {err}"
                )));
            }
            return SaveReport::LocalOnly;
        };

        self.save_state = SaveState::SavingRemote;
        let note = change_note(Local::now());

        match push(remote, &self.events, &note).await {
            Ok(()) => {
                tracing::info!(count = self.events.len(), "saved events to remote store");
                self.unsynced = false;
                self.remote_failed = false;
                match self.cache_error.clone() {
                    Some(err) => self.degraded(CalError::PersistenceDegraded(format!(
                        "saved remotely but the local cache write failed: {err}"
                    ))),
                    None => {
                        self.save_state = SaveState::Idle;
                        SaveReport::Remote
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "remote save failed, offering manual download");
                self.remote_failed = true;
                self.degraded(CalError::PersistenceDegraded(e.to_string()))
            }
        }
    }

    fn degraded(&mut self, warning: CalError) -> SaveReport {
        self.save_state = SaveState::Degraded;
        SaveReport::Degraded {
            warning,
            artifact: self.export(),
        }
    }
}

async fn push(remote: &dyn RemoteStore, events: &EventCollection, note: &str) -> CalResult<()> {
    let content = events.to_json()?;
    let current = remote.read().await?;
    remote
        .write(&content, current.version.as_ref(), note)
        .await?;
    Ok(())
}

fn change_note(now: DateTime<Local>) -> String {
    format!(
        "Update calendar events - {}",
        now.format("%-m/%-d/%Y, %-I:%M:%S %p")
    )
}
