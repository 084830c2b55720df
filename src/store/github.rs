use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    license::License,
    store::{LicenseDocument, LicenseStore, RevisionToken, StoreError, StoreResult},
};

/// Relevant subset of the GitHub contents API response.
#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: Option<String>,
    sha: String,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// License store backed by a JSON file in a GitHub repository,
/// accessed through the contents API. The file's blob `sha` serves as
/// the revision token; GitHub rejects a PUT carrying a stale sha, which
/// surfaces here as [`StoreError::Conflict`].
pub struct GithubStore {
    client: Client,
    contents_url: String,
}

impl GithubStore {
    /// Creates a store for `path` inside `owner/repo`, authenticating
    /// with `token`. `api_url` is the API root, normally
    /// `https://api.github.com`.
    pub fn new(
        token: &str,
        api_url: &str,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> StoreResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| StoreError::Api(format!("invalid token: {e}")))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("license-bot"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        debug!("HTTP client built successfully.");

        let contents_url =
            format!("{}/repos/{owner}/{repo}/contents/{path}", api_url.trim_end_matches('/'));

        Ok(Self { client, contents_url })
    }
}

#[async_trait]
impl LicenseStore for GithubStore {
    async fn load(&self) -> StoreResult<(Vec<License>, Option<RevisionToken>)> {
        debug!("Loading license document from {}", self.contents_url);
        let response = self
            .client
            .get(&self.contents_url)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        // A repository without the file yet: start from an empty list
        // and let the first save create it.
        if response.status() == StatusCode::NOT_FOUND {
            debug!("License document not found, starting empty");
            return Ok((Vec::new(), None));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api(format!("GET returned HTTP {status}: {body}")));
        }

        let contents: ContentsResponse =
            response.json().await.map_err(|e| StoreError::Transport(e.to_string()))?;

        // GitHub wraps base64 content at 60 columns.
        let encoded: String =
            contents.content.unwrap_or_default().chars().filter(|c| !c.is_whitespace()).collect();
        let raw = BASE64
            .decode(encoded)
            .map_err(|e| StoreError::Api(format!("invalid base64 content: {e}")))?;

        let document: LicenseDocument = serde_json::from_slice(&raw)?;
        Ok((document.licenses, Some(RevisionToken(contents.sha))))
    }

    async fn save(
        &self,
        licenses: Vec<License>,
        expected_revision: Option<RevisionToken>,
        message: &str,
    ) -> StoreResult<()> {
        let document = LicenseDocument { licenses };
        let json = serde_json::to_vec_pretty(&document)?;

        let body = UpdateRequest {
            message,
            content: BASE64.encode(&json),
            sha: expected_revision.as_ref().map(|token| token.0.as_str()),
        };

        debug!("Saving license document: {message}");
        let response = self
            .client
            .put(&self.contents_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            // 409 for a stale sha; 422 also covers a missing sha when
            // the file was created out-of-band since our load.
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => Err(StoreError::Conflict),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(StoreError::Api(format!("PUT returned HTTP {status}: {body}")))
            }
        }
    }
}
