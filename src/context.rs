//! Per-invocation state: config, session, and a loaded event store.

use anyhow::{Context as _, Result};
use chrono::{Local, Utc};
use owo_colors::OwoColorize;
use parishcal_core::config::CalendarConfig;
use parishcal_core::grid::Viewer;
use parishcal_core::CalResult;
use parishcal_core::session::{Credential, Session, SessionFile};
use parishcal_core::store::EventStore;
use parishcal_core::tier::snapshot;
use parishcal_core::tier::{FileCache, GithubContents, Tier};

use crate::render::Render;
use crate::utils::tui::spin_while;

pub struct Context {
    pub config: CalendarConfig,
    pub session_file: SessionFile,
    pub session: Session,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = CalendarConfig::load().context("Failed to load config")?;
        let session_file = SessionFile::default_location();
        let session = session_file.load(Utc::now());

        Ok(Context {
            config,
            session_file,
            session,
        })
    }

    pub fn viewer(&self) -> Viewer {
        Viewer {
            admin: self.session.is_admin(),
            today: Local::now().date_naive(),
        }
    }

    pub fn require_admin(&self) -> Result<()> {
        if !self.session.is_admin() {
            anyhow::bail!(
                "Admin login required.\n\n\
                Log in first with:\n  \
                parishcal login"
            );
        }
        Ok(())
    }

    pub fn save_session(&self) -> Result<()> {
        self.session_file
            .save(&self.session)
            .context("Failed to save session")
    }

    /// Store over the local cache and the configured snapshot, with no remote.
    pub fn base_store(&self) -> EventStore {
        let cache = FileCache::new(&self.config.data_path(), &self.config.cache_key);
        let store = EventStore::new(cache);

        match &self.config.snapshot {
            Some(location) => store.with_snapshot(snapshot::from_location(location)),
            None => store,
        }
    }

    /// Check `credential` against the configured repository and attach it.
    pub async fn connect(&self, store: &mut EventStore, credential: Credential) -> CalResult<()> {
        let remote = GithubContents::new(self.config.remote.clone(), credential)?;
        spin_while("Checking token...", store.connect_remote(Box::new(remote))).await
    }

    /// Build the store from config and session, then resolve the event list.
    /// A session token that no longer works is reported and skipped.
    pub async fn open_store(&self) -> Result<EventStore> {
        let mut store = self.base_store();

        if let Some(credential) = self.session.credential() {
            if let Err(e) = self.connect(&mut store, credential.clone()).await {
                eprintln!("{}", e.render());
            }
        }

        let report = spin_while("Loading events...", store.load()).await;
        tracing::debug!(source = %report.source, events = store.events().len(), "events loaded");

        for warning in &report.warnings {
            eprintln!("{}", warning.render());
        }
        if report.source != Tier::Remote && !report.warnings.is_empty() {
            eprintln!(
                "{}",
                format!("  Showing events from the {}", report.source).dimmed()
            );
        }

        Ok(store)
    }
}
