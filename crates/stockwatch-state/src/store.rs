use std::future::Future;

use stockwatch_core::StateBackend;

use crate::error::StateError;
use crate::file::FileStore;
use crate::github::GithubVariableStore;

/// Read/write access to the last-notified fingerprint.
pub trait FingerprintStore {
    /// The stored fingerprint, or `None` if nothing has been recorded.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if the backend cannot be read.
    fn load(&self) -> impl Future<Output = Result<Option<String>, StateError>> + Send;

    /// Record `fingerprint` as the last-notified value.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if the backend cannot be written.
    fn save(&self, fingerprint: &str) -> impl Future<Output = Result<(), StateError>> + Send;
}

/// Fingerprint supplied through the environment (`UPDATE_HASH`).
///
/// Saving is a no-op: the job runner that set the variable is expected to
/// persist the fingerprint the CLI prints.
#[derive(Debug, Clone, Default)]
pub struct EnvStore {
    previous: String,
}

impl EnvStore {
    #[must_use]
    pub fn new(previous: &str) -> Self {
        Self {
            previous: previous.trim().to_string(),
        }
    }
}

impl FingerprintStore for EnvStore {
    async fn load(&self) -> Result<Option<String>, StateError> {
        Ok(Some(self.previous.clone()).filter(|s| !s.is_empty()))
    }

    async fn save(&self, fingerprint: &str) -> Result<(), StateError> {
        tracing::info!(
            fingerprint,
            "env state backend: leaving fingerprint persistence to the job runner"
        );
        Ok(())
    }
}

/// The configured backend, chosen at runtime.
#[derive(Debug)]
pub enum StateStore {
    Env(EnvStore),
    File(FileStore),
    Github(GithubVariableStore),
}

impl StateStore {
    /// Build the store described by `backend`.
    ///
    /// `env_previous` is the `UPDATE_HASH` value, used by the env backend.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if the GitHub client cannot be constructed.
    pub fn from_backend(
        backend: &StateBackend,
        env_previous: &str,
        timeout_secs: u64,
    ) -> Result<Self, StateError> {
        Ok(match backend {
            StateBackend::Env => StateStore::Env(EnvStore::new(env_previous)),
            StateBackend::File { path } => StateStore::File(FileStore::new(path.clone())),
            StateBackend::Github {
                api_url,
                token,
                owner,
                repo,
                variable,
            } => StateStore::Github(GithubVariableStore::with_base_url(
                token,
                owner,
                repo,
                variable,
                timeout_secs,
                api_url,
            )?),
        })
    }
}

impl FingerprintStore for StateStore {
    async fn load(&self) -> Result<Option<String>, StateError> {
        match self {
            StateStore::Env(store) => store.load().await,
            StateStore::File(store) => store.load().await,
            StateStore::Github(store) => store.load().await,
        }
    }

    async fn save(&self, fingerprint: &str) -> Result<(), StateError> {
        match self {
            StateStore::Env(store) => store.save(fingerprint).await,
            StateStore::File(store) => store.save(fingerprint).await,
            StateStore::Github(store) => store.save(fingerprint).await,
        }
    }
}
