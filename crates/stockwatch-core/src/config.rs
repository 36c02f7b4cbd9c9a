use std::path::PathBuf;

use crate::app_config::{AppConfig, PayloadFormat, StateBackend};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`
/// lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let targets = split_list(&or_default("STOCK_AVAILABILITY_URLS", ""))
        .map(str::to_string)
        .collect();
    let preferred_store_ids = parse_store_ids(&or_default("PREFERRED_STORE_IDS", ""))?;
    let previous_fingerprint = or_default("UPDATE_HASH", "").trim().to_string();

    let log_level = or_default("STOCKWATCH_LOG_LEVEL", "info");
    let fetch_timeout_secs = parse_u64("STOCKWATCH_FETCH_TIMEOUT_SECS", "10")?;
    if fetch_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOCKWATCH_FETCH_TIMEOUT_SECS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let user_agent = or_default("STOCKWATCH_USER_AGENT", DEFAULT_USER_AGENT);

    let max_concurrent_targets = parse_usize("STOCKWATCH_MAX_CONCURRENT_TARGETS", "1")?;
    if max_concurrent_targets == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOCKWATCH_MAX_CONCURRENT_TARGETS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let results_path = PathBuf::from(or_default("STOCKWATCH_RESULTS_PATH", "results.txt"));
    let payload_format = parse_payload_format(&or_default("STOCKWATCH_PAYLOAD_FORMAT", "html"))?;

    let state_backend = match or_default("STOCKWATCH_STATE_BACKEND", "env").as_str() {
        "env" => StateBackend::Env,
        "file" => StateBackend::File {
            path: PathBuf::from(or_default(
                "STOCKWATCH_STATE_FILE",
                ".stockwatch/fingerprint",
            )),
        },
        "github" => {
            let token = require("GH_TOKEN")?;
            let (owner, repo) = parse_repository(&require("GITHUB_REPOSITORY")?)?;
            StateBackend::Github {
                api_url: or_default("GITHUB_API_URL", DEFAULT_GITHUB_API_URL),
                token,
                owner,
                repo,
                variable: or_default("STOCKWATCH_STATE_VARIABLE", "UPDATE_HASH"),
            }
        }
        other => {
            return Err(ConfigError::InvalidEnvVar {
                var: "STOCKWATCH_STATE_BACKEND".to_string(),
                reason: format!("unknown backend '{other}' (expected env, file or github)"),
            })
        }
    };

    Ok(AppConfig {
        targets,
        preferred_store_ids,
        previous_fingerprint,
        log_level,
        fetch_timeout_secs,
        user_agent,
        max_concurrent_targets,
        results_path,
        payload_format,
        state_backend,
    })
}

/// Comma-separated list with blank segments dropped.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_store_ids(raw: &str) -> Result<Vec<i64>, ConfigError> {
    split_list(raw)
        .map(|s| {
            s.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: "PREFERRED_STORE_IDS".to_string(),
                reason: format!("'{s}': {e}"),
            })
        })
        .collect()
}

fn parse_payload_format(s: &str) -> Result<PayloadFormat, ConfigError> {
    match s {
        "html" => Ok(PayloadFormat::Html),
        "text" => Ok(PayloadFormat::Text),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOCKWATCH_PAYLOAD_FORMAT".to_string(),
            reason: format!("unknown format '{other}' (expected html or text)"),
        }),
    }
}

/// Split `owner/repo` into its two halves.
fn parse_repository(s: &str) -> Result<(String, String), ConfigError> {
    match s.trim().split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ConfigError::InvalidEnvVar {
            var: "GITHUB_REPOSITORY".to_string(),
            reason: format!("expected 'owner/repo', got '{s}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
