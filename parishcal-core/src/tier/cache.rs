//! Local cache tier: the last-known-good event list on this machine.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::collection::EventCollection;
use crate::error::{CalError, CalResult};

/// Key-value slot holding the JSON-encoded event array.
pub trait LocalCache: Send + Sync {
    /// `Ok(None)` when nothing has been cached yet.
    fn load(&self) -> CalResult<Option<EventCollection>>;

    fn store(&self, events: &EventCollection) -> CalResult<()>;
}

/// One JSON file per cache key inside the data directory.
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(data_dir: &Path, key: &str) -> Self {
        FileCache {
            path: data_dir.join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocalCache for FileCache {
    fn load(&self) -> CalResult<Option<EventCollection>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| CalError::Cache(format!("{}: {}", self.path.display(), e)))?;
        EventCollection::from_json(&content).map(Some)
    }

    fn store(&self, events: &EventCollection) -> CalResult<()> {
        let json = events.to_json()?;

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| CalError::Cache(format!("{}: {}", dir.display(), e)))?;
        }

        let temp = self.path.with_extension("json.tmp");
        std::fs::write(&temp, json)
            .and_then(|_| std::fs::rename(&temp, &self.path))
            .map_err(|e| CalError::Cache(format!("{}: {}", self.path.display(), e)))?;

        tracing::debug!(path = %self.path.display(), count = events.len(), "cached events");
        Ok(())
    }
}

/// In-process cache. Clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryCache {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: &EventCollection) -> CalResult<Self> {
        let cache = MemoryCache::new();
        cache.store(events)?;
        Ok(cache)
    }
}

impl LocalCache for MemoryCache {
    fn load(&self) -> CalResult<Option<EventCollection>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| CalError::Cache("cache lock poisoned".into()))?;
        slot.as_deref().map(EventCollection::from_json).transpose()
    }

    fn store(&self, events: &EventCollection) -> CalResult<()> {
        let json = events.to_json()?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| CalError::Cache("cache lock poisoned".into()))?;
        *slot = Some(json);
        Ok(())
    }
}
