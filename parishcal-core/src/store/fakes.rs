//! In-memory tier doubles for store tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::collection::EventCollection;
use crate::error::{CalError, CalResult, RemoteError};
use crate::event::EventDraft;
use crate::tier::{LocalCache, RemoteDocument, RemoteStore, SnapshotSource, VersionToken};

/// Build a collection of `(id, date)` events titled "Event {id}".
pub fn events(specs: &[(i64, &str)]) -> EventCollection {
    EventCollection::from_events(specs.iter().map(|(id, date)| {
        EventDraft::new(format!("Event {}", id), *date)
            .into_event(*id)
            .unwrap()
    }))
}

#[derive(Default)]
struct RemoteInner {
    document: RemoteDocument,
    revision: u32,
    read_error: Option<RemoteError>,
    write_error: Option<RemoteError>,
    probe_error: Option<RemoteError>,
    writes: Vec<Option<VersionToken>>,
}

/// Versioned document store that enforces optimistic concurrency.
#[derive(Clone, Default)]
pub struct FakeRemote {
    inner: Arc<Mutex<RemoteInner>>,
}

impl FakeRemote {
    /// A remote holding `events`; an empty collection means "not found".
    pub fn with_events(events: EventCollection) -> Self {
        let remote = FakeRemote::default();
        {
            let mut inner = remote.inner.lock().unwrap();
            if !events.is_empty() {
                inner.revision = 1;
                inner.document.version = Some(VersionToken("rev-1".into()));
            }
            inner.document.events = events;
        }
        remote
    }

    pub fn failing_reads(error: RemoteError) -> Self {
        let remote = FakeRemote::default();
        remote.inner.lock().unwrap().read_error = Some(error);
        remote
    }

    pub fn reject_writes(&self, error: RemoteError) {
        self.inner.lock().unwrap().write_error = Some(error);
    }

    pub fn accept_writes(&self) {
        self.inner.lock().unwrap().write_error = None;
    }

    pub fn reject_probe(&self, error: RemoteError) {
        self.inner.lock().unwrap().probe_error = Some(error);
    }

    /// Simulate an edit made elsewhere.
    pub fn bump_version(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.revision += 1;
        inner.document.version = Some(VersionToken(format!("rev-{}", inner.revision)));
    }

    pub fn document(&self) -> RemoteDocument {
        self.inner.lock().unwrap().document.clone()
    }

    /// Version tokens presented by each accepted write.
    pub fn writes(&self) -> Vec<Option<VersionToken>> {
        self.inner.lock().unwrap().writes.clone()
    }
}

#[async_trait]
impl RemoteStore for FakeRemote {
    async fn read(&self) -> Result<RemoteDocument, RemoteError> {
        let inner = self.inner.lock().unwrap();
        match &inner.read_error {
            Some(e) => Err(e.clone()),
            None => Ok(inner.document.clone()),
        }
    }

    async fn write(
        &self,
        content: &str,
        prior: Option<&VersionToken>,
        _message: &str,
    ) -> Result<VersionToken, RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(e) = &inner.write_error {
            return Err(e.clone());
        }
        if prior != inner.document.version.as_ref() {
            return Err(RemoteError::Conflict);
        }

        let events =
            EventCollection::from_json(content).map_err(|e| RemoteError::Decode(e.to_string()))?;
        inner.writes.push(prior.cloned());
        inner.revision += 1;
        let version = VersionToken(format!("rev-{}", inner.revision));
        inner.document = RemoteDocument {
            events,
            version: Some(version.clone()),
        };
        Ok(version)
    }

    async fn probe(&self) -> Result<(), RemoteError> {
        match &self.inner.lock().unwrap().probe_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

pub struct FakeSnapshot {
    events: Option<EventCollection>,
}

impl FakeSnapshot {
    pub fn ok(events: EventCollection) -> Self {
        FakeSnapshot {
            events: Some(events),
        }
    }

    pub fn failing() -> Self {
        FakeSnapshot { events: None }
    }
}

#[async_trait]
impl SnapshotSource for FakeSnapshot {
    async fn fetch(&self) -> CalResult<EventCollection> {
        self.events
            .clone()
            .ok_or_else(|| CalError::Snapshot("404 Not Found".into()))
    }
}

/// A cache whose disk is always full.
pub struct FailingCache;

impl LocalCache for FailingCache {
    fn load(&self) -> CalResult<Option<EventCollection>> {
        Err(CalError::Cache("read failed".into()))
    }

    fn store(&self, _events: &EventCollection) -> CalResult<()> {
        Err(CalError::Cache("no space left on device".into()))
    }
}
