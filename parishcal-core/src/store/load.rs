//! Startup resolution of the authoritative event list.
//!
//! Tiers are tried once each, in order of trust: remote (when a credential
//! is present), snapshot, then local cache. The first success wins and is
//! mirrored into the cache. Failures only demote to the next tier.

use std::fmt;

use crate::collection::EventCollection;
use crate::error::CalError;
use crate::store::EventStore;
use crate::tier::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    LoadingRemote,
    LoadingSnapshot,
    LoadingCache,
    Ready(Tier),
}

impl LoadState {
    /// First loading state for a store with or without a remote.
    pub fn begin(has_remote: bool) -> LoadState {
        if has_remote {
            LoadState::LoadingRemote
        } else {
            LoadState::LoadingSnapshot
        }
    }

    /// Transition after the current tier's single attempt.
    pub fn advance(self, succeeded: bool) -> LoadState {
        match (self, succeeded) {
            (LoadState::LoadingRemote, true) => LoadState::Ready(Tier::Remote),
            (LoadState::LoadingRemote, false) => LoadState::LoadingSnapshot,
            (LoadState::LoadingSnapshot, true) => LoadState::Ready(Tier::Snapshot),
            (LoadState::LoadingSnapshot, false) => LoadState::LoadingCache,
            (LoadState::LoadingCache, _) => LoadState::Ready(Tier::LocalCache),
            (state, _) => state,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Unloaded => write!(f, "unloaded"),
            LoadState::LoadingRemote => write!(f, "loading remote"),
            LoadState::LoadingSnapshot => write!(f, "loading snapshot"),
            LoadState::LoadingCache => write!(f, "loading local cache"),
            LoadState::Ready(tier) => write!(f, "ready ({})", tier),
        }
    }
}

/// Where the events came from and what went wrong on the way.
#[derive(Debug)]
pub struct LoadReport {
    pub source: Tier,
    pub warnings: Vec<CalError>,
}

impl EventStore {
    /// Resolve the authoritative collection. Never fails: the worst case is
    /// an empty collection from an empty local cache.
    pub async fn load(&mut self) -> LoadReport {
        let mut warnings = Vec::new();
        self.load_state = LoadState::begin(self.remote.is_some());

        loop {
            tracing::debug!(state = %self.load_state, "load");

            let fetched = match self.load_state {
                LoadState::Ready(source) => return LoadReport { source, warnings },
                LoadState::Unloaded => {
                    self.load_state = LoadState::begin(self.remote.is_some());
                    continue;
                }
                LoadState::LoadingRemote => self.fetch_remote(&mut warnings).await,
                LoadState::LoadingSnapshot => self.fetch_snapshot(&mut warnings).await,
                LoadState::LoadingCache => Some(self.fetch_cache(&mut warnings)),
            };

            let succeeded = fetched.is_some();
            let mirror = matches!(
                self.load_state,
                LoadState::LoadingRemote | LoadState::LoadingSnapshot
            );

            if let Some(events) = fetched {
                self.adopt(events);
                if mirror {
                    self.mirror_to_cache(&mut warnings);
                }
            }

            self.load_state = self.load_state.advance(succeeded);
        }
    }

    async fn fetch_remote(&self, warnings: &mut Vec<CalError>) -> Option<EventCollection> {
        let remote = self.remote.as_ref()?;
        match remote.read().await {
            Ok(document) => Some(document.events),
            Err(e) => {
                tracing::warn!(error = %e, "remote store unavailable, falling back to snapshot");
                warnings.push(CalError::RemoteUnavailable(e));
                None
            }
        }
    }

    async fn fetch_snapshot(&self, warnings: &mut Vec<CalError>) -> Option<EventCollection> {
        let Some(snapshot) = self.snapshot.as_ref() else {
            tracing::debug!("no snapshot configured");
            return None;
        };
        match snapshot.fetch().await {
            Ok(events) => Some(events),
            Err(e) => {
                tracing::warn!(error = %e, "snapshot unavailable, falling back to local cache");
                warnings.push(e);
                None
            }
        }
    }

    fn fetch_cache(&self, warnings: &mut Vec<CalError>) -> EventCollection {
        match self.cache.load() {
            Ok(events) => events.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "local cache unreadable, starting empty");
                warnings.push(e);
                EventCollection::new()
            }
        }
    }

    fn mirror_to_cache(&mut self, warnings: &mut Vec<CalError>) {
        if let Err(e) = self.cache.store(&self.events) {
            tracing::warn!(error = %e, "could not mirror events into local cache");
            warnings.push(e);
        }
    }
}
