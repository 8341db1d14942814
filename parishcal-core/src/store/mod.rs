//! The event store.
//!
//! Owns the canonical in-memory collection. Mutations apply in memory,
//! then to the local cache immediately; remote propagation happens in
//! [`EventStore::sync_remote`]. Every mutating method takes `&mut self`, so
//! at most one write is in flight and each remote write publishes the
//! latest collection.

mod load;
mod save;

#[cfg(test)]
pub(crate) mod fakes;

use chrono::Utc;

use crate::artifact::ManualSyncArtifact;
use crate::collection::{EventCollection, IdAllocator};
use crate::error::{CalError, CalResult};
use crate::event::{Event, EventDraft};
use crate::tier::{LocalCache, RemoteStore, SnapshotSource};

pub use load::{LoadReport, LoadState};
pub use save::{SaveReport, SaveState};

pub struct EventStore {
    events: EventCollection,
    ids: IdAllocator,
    remote: Option<Box<dyn RemoteStore>>,
    snapshot: Option<Box<dyn SnapshotSource>>,
    cache: Box<dyn LocalCache>,
    load_state: LoadState,
    save_state: SaveState,
    cache_error: Option<String>,
    remote_failed: bool,
    unsynced: bool,
}

impl EventStore {
    pub fn new(cache: impl LocalCache + 'static) -> Self {
        EventStore {
            events: EventCollection::new(),
            ids: IdAllocator::default(),
            remote: None,
            snapshot: None,
            cache: Box::new(cache),
            load_state: LoadState::Unloaded,
            save_state: SaveState::Idle,
            cache_error: None,
            remote_failed: false,
            unsynced: false,
        }
    }

    pub fn with_snapshot(mut self, snapshot: Box<dyn SnapshotSource>) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Use `remote` without probing it first. Prefer [`EventStore::connect_remote`]
    /// for a freshly supplied credential.
    pub fn with_remote(mut self, remote: Box<dyn RemoteStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Probe `remote` and only trust it for reads and writes if the probe
    /// succeeds.
    pub async fn connect_remote(&mut self, remote: Box<dyn RemoteStore>) -> CalResult<()> {
        remote.probe().await?;
        self.remote = Some(remote);
        Ok(())
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn save_state(&self) -> SaveState {
        self.save_state
    }

    /// True when local changes haven't reached the remote store yet.
    pub fn has_unsynced_changes(&self) -> bool {
        self.unsynced
    }

    pub fn events(&self) -> &EventCollection {
        &self.events
    }

    pub fn get(&self, id: i64) -> Option<&Event> {
        self.events.get(id)
    }

    /// Validate `draft`, give it a fresh id and append it.
    pub fn create(&mut self, draft: EventDraft) -> CalResult<Event> {
        let id = self.ids.next(Utc::now().timestamp_millis())?;
        let event = draft.into_event(id)?;

        self.events.insert(event.clone())?;
        tracing::debug!(id, title = %event.title, "created event");

        self.persist_local();
        Ok(event)
    }

    /// Replace the fields of event `id`, keeping its id.
    pub fn update(&mut self, id: i64, draft: EventDraft) -> CalResult<Event> {
        if !self.events.contains(id) {
            return Err(CalError::NotFound(id));
        }
        let event = draft.into_event(id)?;

        self.events.replace(event.clone())?;
        tracing::debug!(id, title = %event.title, "updated event");

        self.persist_local();
        Ok(event)
    }

    /// Remove event `id`. Returns false (and writes nothing) if it wasn't there.
    pub fn delete(&mut self, id: i64) -> bool {
        match self.events.remove(id) {
            Some(event) => {
                tracing::debug!(id, title = %event.title, "deleted event");
                self.persist_local();
                true
            }
            None => false,
        }
    }

    /// The full collection packaged for a manual upload.
    pub fn export(&self) -> ManualSyncArtifact {
        ManualSyncArtifact::new(self.events.clone())
    }

    fn adopt(&mut self, events: EventCollection) {
        if let Some(max) = events.max_id() {
            self.ids.observe(max);
        }
        self.events = events;
        self.unsynced = false;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::error::RemoteError;
    use crate::event::EventType;
    use crate::store::fakes::{FakeRemote, events};
    use crate::tier::{LocalCache, MemoryCache};

    async fn loaded(cache: MemoryCache) -> EventStore {
        let mut store = EventStore::new(cache);
        store.load().await;
        store
    }

    #[tokio::test]
    async fn test_create_then_get_is_equal() {
        let mut store = loaded(MemoryCache::new()).await;

        let created = store
            .create(
                EventDraft::new("Potluck", "2025-03-09")
                    .with_time("12:30")
                    .with_location("Parish hall")
                    .with_type("fellowship")
                    .with_description("Bring a dish"),
            )
            .unwrap();

        let found = store.get(created.id).unwrap();
        assert_eq!(*found, created);
        assert_eq!(found.event_type, EventType::Fellowship);
    }

    #[tokio::test]
    async fn test_invalid_create_changes_nothing() {
        let cache = MemoryCache::new();
        let mut store = loaded(cache.clone()).await;

        let result = store.create(EventDraft::new("", "2025-03-09"));

        assert!(matches!(result, Err(CalError::Validation { field: "title", .. })));
        assert!(store.events().is_empty());
        assert!(cache.load().unwrap().is_none());
        assert!(!store.has_unsynced_changes());
    }

    #[tokio::test]
    async fn test_ids_are_unique_after_loaded_ids() {
        let far_future = 9_000_000_000_000;
        let cache = MemoryCache::with_events(&events(&[(far_future, "2025-03-09")])).unwrap();
        let mut store = loaded(cache).await;

        let a = store.create(EventDraft::new("A", "2025-03-10")).unwrap();
        let b = store.create(EventDraft::new("B", "2025-03-10")).unwrap();

        assert_eq!(a.id, far_future + 1);
        assert_eq!(b.id, far_future + 2);
    }

    #[tokio::test]
    async fn test_create_after_max_id_is_rejected() {
        let cache = MemoryCache::with_events(&events(&[(i64::MAX, "2025-03-09")])).unwrap();
        let mut store = loaded(cache).await;

        let result = store.create(EventDraft::new("Vespers", "2025-03-10"));

        assert!(matches!(result, Err(CalError::Validation { field: "id", .. })));
        assert_eq!(store.events().len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_position() {
        let cache = MemoryCache::with_events(&events(&[(1, "2025-03-09"), (2, "2025-03-10")]));
        let mut store = loaded(cache.unwrap()).await;

        let updated = store
            .update(1, EventDraft::new("Renamed", "2025-03-16").with_type("service"))
            .unwrap();

        assert_eq!(updated.id, 1);
        assert_eq!(store.events().as_slice()[0].title, "Renamed");
        assert_eq!(store.events().len(), 2);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let mut store = loaded(MemoryCache::new()).await;
        assert!(matches!(
            store.update(99, EventDraft::new("Ghost", "2025-03-09")),
            Err(CalError::NotFound(99))
        ));
    }

    #[tokio::test]
    async fn test_invalid_update_keeps_original() {
        let cache = MemoryCache::with_events(&events(&[(1, "2025-03-09")]));
        let mut store = loaded(cache.unwrap()).await;

        assert!(store.update(1, EventDraft::new("Event 1", "someday")).is_err());
        assert_eq!(store.get(1).unwrap().title, "Event 1");
    }

    #[tokio::test]
    async fn test_delete_absent_is_noop() {
        let cache = MemoryCache::new();
        let mut store = loaded(cache.clone()).await;

        assert!(!store.delete(42));
        assert!(cache.load().unwrap().is_none());
        assert!(!store.has_unsynced_changes());
    }

    #[tokio::test]
    async fn test_ids_stay_unique_across_mutations() {
        let mut store = loaded(MemoryCache::new()).await;
        let mut live = Vec::new();

        for round in 0..20 {
            let event = store
                .create(EventDraft::new(format!("Event {round}"), "2025-03-09"))
                .unwrap();
            live.push(event.id);
            if round % 3 == 0 {
                let id = live.remove(0);
                assert!(store.delete(id));
            }
            if round % 4 == 0 {
                if let Some(&id) = live.last() {
                    store
                        .update(id, EventDraft::new("Edited", "2025-03-10"))
                        .unwrap();
                }
            }

            let ids: HashSet<_> = store.events().iter().map(|e| e.id).collect();
            assert_eq!(ids.len(), store.events().len());
        }
    }

    #[tokio::test]
    async fn test_connect_remote_requires_probe() {
        let mut store = EventStore::new(MemoryCache::new());
        let remote = FakeRemote::default();
        remote.reject_probe(RemoteError::Unauthorized);

        let result = store.connect_remote(Box::new(remote)).await;

        assert!(matches!(
            result,
            Err(CalError::RemoteUnavailable(RemoteError::Unauthorized))
        ));
        assert!(!store.has_remote());

        store.connect_remote(Box::new(FakeRemote::default())).await.unwrap();
        assert!(store.has_remote());
    }
}
