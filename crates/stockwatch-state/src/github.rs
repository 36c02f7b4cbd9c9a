//! GitHub Actions repository variable as fingerprint storage.
//!
//! Uses the REST endpoints under `/repos/{owner}/{repo}/actions/variables`.
//! The token needs write access to repository variables.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::store::FingerprintStore;

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct VariableResponse {
    value: String,
}

#[derive(Debug, Serialize)]
struct VariableBody<'a> {
    name: &'a str,
    value: &'a str,
}

/// Stores the fingerprint in a repository variable (by default `UPDATE_HASH`).
pub struct GithubVariableStore {
    client: Client,
    token: String,
    variable: String,
    /// `.../actions/variables`
    collection_url: Url,
    /// `.../actions/variables/{variable}`
    variable_url: Url,
}

impl std::fmt::Debug for GithubVariableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubVariableStore")
            .field("token", &"[redacted]")
            .field("variable", &self.variable)
            .field("variable_url", &self.variable_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GithubVariableStore {
    /// Creates a store pointed at the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        token: &str,
        owner: &str,
        repo: &str,
        variable: &str,
        timeout_secs: u64,
    ) -> Result<Self, StateError> {
        Self::with_base_url(token, owner, repo, variable, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a store with a custom API base URL (GitHub Enterprise, or a
    /// mock server in tests).
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Http`] if the client cannot be constructed, or
    /// [`StateError::InvalidBaseUrl`] if `base_url` is not a usable URL.
    pub fn with_base_url(
        token: &str,
        owner: &str,
        repo: &str,
        variable: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, StateError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("stockwatch/0.1 (state-store)")
            .build()?;

        let base =
            Url::parse(base_url).map_err(|_| StateError::InvalidBaseUrl(base_url.to_string()))?;
        let collection_url = with_segments(&base, &["repos", owner, repo, "actions", "variables"])
            .ok_or_else(|| StateError::InvalidBaseUrl(base_url.to_string()))?;
        let variable_url = with_segments(&collection_url, &[variable])
            .ok_or_else(|| StateError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self {
            client,
            token: token.to_owned(),
            variable: variable.to_owned(),
            collection_url,
            variable_url,
        })
    }

    fn request(&self, method: reqwest::Method, url: &Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url.clone())
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Create the variable when it does not exist yet.
    async fn create(&self, fingerprint: &str) -> Result<(), StateError> {
        let body = VariableBody {
            name: &self.variable,
            value: fingerprint,
        };
        let response = self
            .request(reqwest::Method::POST, &self.collection_url)
            .json(&body)
            .send()
            .await?;
        match response.status() {
            StatusCode::CREATED => {
                tracing::info!(variable = %self.variable, "created repository variable");
                Ok(())
            }
            status => Err(StateError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.collection_url.to_string(),
            }),
        }
    }
}

impl FingerprintStore for GithubVariableStore {
    async fn load(&self) -> Result<Option<String>, StateError> {
        let response = self
            .request(reqwest::Method::GET, &self.variable_url)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.text().await?;
                let variable: VariableResponse =
                    serde_json::from_str(&body).map_err(|e| StateError::Deserialize {
                        context: format!("repository variable {}", self.variable),
                        source: e,
                    })?;
                Ok(Some(variable.value.trim().to_string()).filter(|s| !s.is_empty()))
            }
            status => Err(StateError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.variable_url.to_string(),
            }),
        }
    }

    async fn save(&self, fingerprint: &str) -> Result<(), StateError> {
        let body = VariableBody {
            name: &self.variable,
            value: fingerprint,
        };
        let response = self
            .request(reqwest::Method::PATCH, &self.variable_url)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => self.create(fingerprint).await,
            status if status.is_success() => {
                tracing::info!(variable = %self.variable, "updated repository variable");
                Ok(())
            }
            status => Err(StateError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.variable_url.to_string(),
            }),
        }
    }
}

/// Append path segments to `base`, percent-encoding each one. Returns `None`
/// for URLs that cannot have a path (e.g. `mailto:`).
fn with_segments(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    url.path_segments_mut().ok()?.pop_if_empty().extend(segments);
    Some(url)
}
