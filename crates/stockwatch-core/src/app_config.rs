use std::path::PathBuf;

/// Output flavour for the notification body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadFormat {
    /// `<br>`-separated lines, suitable for an HTML email body.
    #[default]
    Html,
    /// Newline-separated plain text.
    Text,
}

impl std::fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadFormat::Html => write!(f, "html"),
            PayloadFormat::Text => write!(f, "text"),
        }
    }
}

/// Where the last-notified fingerprint lives between runs.
#[derive(Clone, PartialEq, Eq)]
pub enum StateBackend {
    /// Previous value comes from `UPDATE_HASH`; writing back is left to the
    /// job runner.
    Env,
    /// A single-line file on local disk.
    File { path: PathBuf },
    /// A GitHub Actions repository variable.
    Github {
        api_url: String,
        token: String,
        owner: String,
        repo: String,
        variable: String,
    },
}

impl std::fmt::Debug for StateBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateBackend::Env => f.write_str("Env"),
            StateBackend::File { path } => f.debug_struct("File").field("path", path).finish(),
            StateBackend::Github {
                api_url,
                owner,
                repo,
                variable,
                ..
            } => f
                .debug_struct("Github")
                .field("api_url", api_url)
                .field("token", &"[redacted]")
                .field("owner", owner)
                .field("repo", repo)
                .field("variable", variable)
                .finish(),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub targets: Vec<String>,
    pub preferred_store_ids: Vec<i64>,
    /// Value of `UPDATE_HASH`; empty when no fingerprint has been recorded.
    pub previous_fingerprint: String,
    pub log_level: String,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_targets: usize,
    pub results_path: PathBuf,
    pub payload_format: PayloadFormat,
    pub state_backend: StateBackend,
}

impl AppConfig {
    /// Narrow the application config to the inputs of one check run.
    ///
    /// `previous_fingerprint` is whatever the configured state backend
    /// returned, which for [`StateBackend::Env`] is `self.previous_fingerprint`.
    #[must_use]
    pub fn watch_config(&self, previous_fingerprint: String) -> WatchConfig {
        WatchConfig {
            targets: self.targets.clone(),
            preferred_store_ids: self.preferred_store_ids.clone(),
            previous_fingerprint,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("targets", &self.targets)
            .field("preferred_store_ids", &self.preferred_store_ids)
            .field("previous_fingerprint", &self.previous_fingerprint)
            .field("log_level", &self.log_level)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_concurrent_targets", &self.max_concurrent_targets)
            .field("results_path", &self.results_path)
            .field("payload_format", &self.payload_format)
            .field("state_backend", &self.state_backend)
            .finish()
    }
}

/// The explicit inputs of a single check run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchConfig {
    /// Product page URLs, in the order their results are reported.
    pub targets: Vec<String>,
    /// Store ids of interest. Duplicates and ids that never match are harmless.
    pub preferred_store_ids: Vec<i64>,
    /// Fingerprint of the last notified snapshot, or `""`.
    pub previous_fingerprint: String,
}
