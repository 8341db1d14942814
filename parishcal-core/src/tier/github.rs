//! GitHub contents API as the remote document store.
//!
//! `events.json` lives in the website repository. Reads return the file
//! base64-encoded alongside its blob `sha`, which doubles as the version
//! token for conditional writes.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

use crate::collection::EventCollection;
use crate::config::RemoteConfig;
use crate::error::RemoteError;
use crate::session::Credential;
use crate::tier::remote::{RemoteDocument, RemoteStore, VersionToken};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("parishcal/", env!("CARGO_PKG_VERSION"));

pub struct GithubContents {
    client: Client,
    config: RemoteConfig,
    credential: Credential,
}

#[derive(Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Serialize)]
struct PutContents<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Deserialize)]
struct PutResponse {
    content: PutContent,
}

#[derive(Deserialize)]
struct PutContent {
    sha: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl GithubContents {
    pub fn new(config: RemoteConfig, credential: Credential) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(GithubContents {
            client,
            config,
            credential,
        })
    }

    fn repo_url(&self) -> String {
        format!(
            "{}/repos/{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.owner,
            self.config.repo
        )
    }

    fn contents_url(&self) -> String {
        format!("{}/contents/{}", self.repo_url(), self.config.path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("token {}", self.credential.expose()))
            .header("Accept", ACCEPT)
    }
}

#[async_trait]
impl RemoteStore for GithubContents {
    async fn read(&self) -> Result<RemoteDocument, RemoteError> {
        let response = self
            .authorized(self.client.get(self.contents_url()))
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(path = %self.config.path, "remote document does not exist yet");
            return Ok(RemoteDocument::default());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let file: ContentsResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        Ok(RemoteDocument {
            events: decode_content(&file.content)?,
            version: Some(VersionToken(file.sha)),
        })
    }

    async fn write(
        &self,
        content: &str,
        prior: Option<&VersionToken>,
        message: &str,
    ) -> Result<VersionToken, RemoteError> {
        let body = PutContents {
            message,
            content: STANDARD.encode(content.as_bytes()),
            branch: &self.config.branch,
            sha: prior.map(VersionToken::as_str),
        };

        let response = self
            .authorized(self.client.put(self.contents_url()))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let written: PutResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        Ok(VersionToken(written.content.sha))
    }

    async fn probe(&self) -> Result<(), RemoteError> {
        let response = self
            .authorized(self.client.get(self.repo_url()))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(status_error(status, &body))
        }
    }
}

/// Decode the base64 `content` field (GitHub wraps it at 60 columns).
fn decode_content(content: &str) -> Result<EventCollection, RemoteError> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| RemoteError::Decode(e.to_string()))?;
    let json = String::from_utf8(bytes).map_err(|e| RemoteError::Decode(e.to_string()))?;

    EventCollection::from_json(&json).map_err(|e| RemoteError::Decode(e.to_string()))
}

fn status_error(status: StatusCode, body: &str) -> RemoteError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Unauthorized,
        StatusCode::CONFLICT => RemoteError::Conflict,
        _ => {
            let message = serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.message)
                .or_else(|| status.canonical_reason().map(String::from))
                .unwrap_or_default();
            RemoteError::Status(status.as_u16(), message)
        }
    }
}
