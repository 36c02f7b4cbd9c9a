//! Handlers for the `check` and `fingerprint` commands.
//!
//! The scraper crate decides; this module carries the decision out. On a
//! notify decision the results file is always written before the state
//! backend is updated.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use stockwatch_core::AppConfig;
use stockwatch_scraper::{run_check, CheckOptions, CheckReport, Decision, HttpPageSource};
use stockwatch_state::{FingerprintStore, StateStore};

/// Exit status for runs that found nothing worth sending. Schedulers treat it
/// as a neutral, non-failing stop.
pub(crate) const NOTHING_TO_SEND_EXIT: u8 = 78;

/// How a command finished, mapped onto the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Notified,
    NoStock,
    Unchanged,
    /// Diagnostics printed; no decision was acted on.
    Reported,
}

impl Outcome {
    pub(crate) fn code(self) -> u8 {
        match self {
            Outcome::Notified | Outcome::Reported => 0,
            Outcome::NoStock | Outcome::Unchanged => NOTHING_TO_SEND_EXIT,
        }
    }

    pub(crate) fn exit_code(self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

/// Run a check against the configured targets and act on the decision.
///
/// # Errors
///
/// Returns an error if the state backend cannot be built or read, the HTTP
/// client cannot be constructed, the snapshot cannot be fingerprinted, or a
/// notify decision cannot be persisted.
pub(crate) async fn run_check_command(
    config: &AppConfig,
    dry_run: bool,
) -> anyhow::Result<Outcome> {
    let store = StateStore::from_backend(
        &config.state_backend,
        &config.previous_fingerprint,
        config.fetch_timeout_secs,
    )
    .context("failed to build state store")?;

    let previous = store
        .load()
        .await
        .context("failed to load previous fingerprint")?
        .unwrap_or_default();
    tracing::debug!(
        previous = %previous,
        backend = ?config.state_backend,
        "previous fingerprint loaded"
    );

    let report = collect_report(config, previous).await?;
    apply_decision(report.decision, &config.results_path, &store, dry_run).await
}

/// Print the current snapshot, its fingerprint and the stock flag.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed or the snapshot
/// cannot be serialized.
pub(crate) async fn print_fingerprint(config: &AppConfig) -> anyhow::Result<()> {
    let report = collect_report(config, config.previous_fingerprint.clone()).await?;
    let snapshot = serde_json::to_string_pretty(&report.snapshot)
        .context("failed to serialize snapshot")?;

    println!("{snapshot}");
    println!("fingerprint:  {}", report.fingerprint);
    println!("any in stock: {}", report.any_in_stock);
    Ok(())
}

async fn collect_report(config: &AppConfig, previous: String) -> anyhow::Result<CheckReport> {
    let source = HttpPageSource::new(config.fetch_timeout_secs, &config.user_agent)
        .context("failed to build HTTP client")?;
    let watch = config.watch_config(previous);
    let options = CheckOptions {
        max_concurrent_targets: config.max_concurrent_targets,
        payload_format: config.payload_format,
    };

    run_check(&source, &watch, options)
        .await
        .context("check run failed")
}

/// Carry out `decision`: nothing for the no-send cases, results file then
/// state write for a notification.
pub(crate) async fn apply_decision<S>(
    decision: Decision,
    results_path: &Path,
    store: &S,
    dry_run: bool,
) -> anyhow::Result<Outcome>
where
    S: FingerprintStore + Sync,
{
    match decision {
        Decision::NoStock => {
            tracing::info!("no stock found");
            Ok(Outcome::NoStock)
        }
        Decision::Unchanged => {
            tracing::info!("no stock change");
            Ok(Outcome::Unchanged)
        }
        Decision::Notify {
            payload,
            fingerprint,
        } => {
            if dry_run {
                tracing::info!(
                    fingerprint = %fingerprint,
                    "dry run: skipping results file and state write"
                );
                println!("{payload}");
                println!("{fingerprint}");
                return Ok(Outcome::Notified);
            }

            write_results(results_path, &payload).await?;
            store
                .save(fingerprint.as_str())
                .await
                .context("failed to save fingerprint")?;

            tracing::info!(
                fingerprint = %fingerprint,
                path = %results_path.display(),
                "stock changed; notification written"
            );
            println!("{fingerprint}");
            Ok(Outcome::Notified)
        }
    }
}

/// Write `{"emailBody": payload}` to `path`, creating parent directories.
pub(crate) async fn write_results(path: &Path, payload: &str) -> anyhow::Result<()> {
    let body = serde_json::json!({ "emailBody": payload }).to_string();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("failed to write results to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "check_test.rs"]
mod tests;
