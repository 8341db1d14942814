//! The deploy-time snapshot document.
//!
//! A read-only `events.json` served alongside the site. It is the baseline
//! whenever the remote store can't be reached.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::collection::EventCollection;
use crate::error::{CalError, CalResult};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> CalResult<EventCollection>;
}

/// Snapshot served over HTTP.
pub struct HttpSnapshot {
    url: String,
}

impl HttpSnapshot {
    pub fn new(url: impl Into<String>) -> Self {
        HttpSnapshot { url: url.into() }
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshot {
    async fn fetch(&self) -> CalResult<EventCollection> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| CalError::Snapshot(e.to_string()))?;

        let response = client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CalError::Snapshot(format!("{}: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(CalError::Snapshot(format!(
                "{} returned {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CalError::Snapshot(e.to_string()))?;

        EventCollection::from_json(&body)
    }
}

/// Snapshot checked out next to the site sources.
pub struct FileSnapshot {
    path: PathBuf,
}

impl FileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSnapshot { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshot {
    async fn fetch(&self) -> CalResult<EventCollection> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CalError::Snapshot(format!("{}: {}", self.path.display(), e)))?;

        EventCollection::from_json(&body)
    }
}

/// Pick the snapshot implementation for a configured location.
pub fn from_location(location: &str) -> Box<dyn SnapshotSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSnapshot::new(location))
    } else {
        let expanded = shellexpand::tilde(location).into_owned();
        Box::new(FileSnapshot::new(expanded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_snapshot_reads_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(
            &path,
            r#"[{"id": 3, "title": "Easter Vigil", "date": "2025-04-19", "time": "20:00"}]"#,
        )
        .unwrap();

        let events = FileSnapshot::new(&path).fetch().await.unwrap();
        assert_eq!(events.get(3).unwrap().title, "Easter Vigil");
    }

    #[tokio::test]
    async fn test_file_snapshot_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileSnapshot::new(dir.path().join("nope.json")).fetch().await;
        assert!(matches!(result, Err(CalError::Snapshot(_))));
    }
}
