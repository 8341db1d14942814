//! Ephemeral login session: the admin flag and the remote credential.
//!
//! Nothing here is written to the config or the event cache. The session
//! file lives in the runtime directory, which is wiped on logout or reboot,
//! and stops being honored once `expires_at` has passed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CalError, CalResult};

const SESSION_FILE: &str = "parishcal-session.json";

/// A remote-store access token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into().trim().to_string())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(****)")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    admin: bool,
    #[serde(default)]
    credential: Option<Credential>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Mark the viewer as admin and restart the expiry clock.
    pub fn grant_admin(&mut self, now: DateTime<Utc>, ttl: Duration) {
        self.admin = true;
        self.touch(now, ttl);
    }

    pub fn set_credential(&mut self, credential: Credential, now: DateTime<Utc>, ttl: Duration) {
        self.credential = Some(credential);
        self.touch(now, ttl);
    }

    pub fn clear_credential(&mut self) {
        self.credential = None;
    }

    fn touch(&mut self, now: DateTime<Utc>, ttl: Duration) {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::hours(12));
        self.expires_at = Some(now + ttl);
    }
}

/// Session persisted between invocations for one login session.
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionFile { path: path.into() }
    }

    /// Session file in the user's runtime directory (temp dir fallback).
    pub fn default_location() -> Self {
        let dir = dirs::runtime_dir().unwrap_or_else(std::env::temp_dir);
        SessionFile::new(dir.join(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the session. Missing, unreadable or expired sessions read as
    /// empty; an expired file is removed.
    pub fn load(&self, now: DateTime<Utc>) -> Session {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            return Session::default();
        };

        let session: Session = match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable session");
                return Session::default();
            }
        };

        if session.is_expired(now) {
            tracing::debug!("admin session expired");
            if let Err(e) = self.clear() {
                tracing::warn!(path = %self.path.display(), error = %e, "could not remove expired session");
            }
            return Session::default();
        }

        session
    }

    pub fn save(&self, session: &Session) -> CalResult<()> {
        let json = serde_json::to_string(session)
            .map_err(|e| CalError::Serialization(e.to_string()))?;
        write_private(&self.path, json.as_bytes())?;
        Ok(())
    }

    /// End the session.
    pub fn clear(&self) -> CalResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(bytes)
}

#[cfg(not(unix))]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TTL: Duration = Duration::from_secs(3600);

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 9, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("ghp_secret ");
        assert_eq!(format!("{:?}", credential), "Credential(****)");
        assert_eq!(credential.expose(), "ghp_secret");
    }

    #[test]
    fn test_session_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::new(dir.path().join(SESSION_FILE));

        let mut session = Session::default();
        session.grant_admin(now(), TTL);
        session.set_credential(Credential::new("ghp_test"), now(), TTL);
        file.save(&session).unwrap();

        let loaded = file.load(now() + chrono::Duration::minutes(5));
        assert!(loaded.is_admin());
        assert_eq!(loaded.credential().unwrap().expose(), "ghp_test");
    }

    #[test]
    fn test_expired_session_reads_empty_and_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::new(dir.path().join(SESSION_FILE));

        let mut session = Session::default();
        session.grant_admin(now(), TTL);
        file.save(&session).unwrap();

        let later = now() + chrono::Duration::hours(2);
        assert_eq!(file.load(later), Session::default());
        assert!(!file.path().exists());
    }

    #[test]
    fn test_missing_or_corrupt_session_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::new(dir.path().join(SESSION_FILE));
        assert_eq!(file.load(now()), Session::default());

        std::fs::write(file.path(), "garbage").unwrap();
        assert_eq!(file.load(now()), Session::default());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::new(dir.path().join(SESSION_FILE));
        file.clear().unwrap();
        file.save(&Session::default()).unwrap();
        file.clear().unwrap();
        assert!(!file.path().exists());
    }
}
