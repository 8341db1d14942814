//! Remote document store interface.
//!
//! The remote tier is treated as a single versioned document: reads return
//! the content plus an opaque version token, and writes must present the
//! token they were based on. A stale token is rejected as a conflict.

use async_trait::async_trait;

use crate::collection::EventCollection;
use crate::error::RemoteError;

/// Opaque revision marker returned by reads and required by updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken(pub String);

impl VersionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The remote event document at one point in time.
#[derive(Debug, Clone, Default)]
pub struct RemoteDocument {
    pub events: EventCollection,
    /// `None` when the document does not exist yet.
    pub version: Option<VersionToken>,
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the current document. A missing document is an empty
    /// collection with no version, not an error.
    async fn read(&self) -> Result<RemoteDocument, RemoteError>;

    /// Write `content`, conditioned on `prior` (omit to create).
    async fn write(
        &self,
        content: &str,
        prior: Option<&VersionToken>,
        message: &str,
    ) -> Result<VersionToken, RemoteError>;

    /// Read-only check that the configured credential is accepted.
    async fn probe(&self) -> Result<(), RemoteError>;
}
