//! Check pipeline orchestration.

use stockwatch_core::{PayloadFormat, WatchConfig};

use crate::aggregate::{collect_snapshot, Aggregation};
use crate::detect::{detect_change, Change};
use crate::error::ScraperError;
use crate::fetch::PageSource;
use crate::filter::PreferredStores;
use crate::fingerprint::{fingerprint, Fingerprint};
use crate::render::render_payload;
use crate::types::StockSnapshot;

/// What the caller should do after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No preferred store has stock. Send nothing, persist nothing.
    NoStock,
    /// Stock is unchanged since the last notification. Send nothing,
    /// persist nothing.
    Unchanged,
    /// Send `payload`, then persist `fingerprint` as the new previous value.
    Notify {
        payload: String,
        fingerprint: Fingerprint,
    },
}

impl Decision {
    /// The notification body, only present for [`Decision::Notify`].
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        match self {
            Decision::Notify { payload, .. } => Some(payload),
            Decision::NoStock | Decision::Unchanged => None,
        }
    }
}

/// Tunables that do not change what a run means, only how it is carried out
/// and presented.
#[derive(Debug, Clone, Copy)]
pub struct CheckOptions {
    pub max_concurrent_targets: usize,
    pub payload_format: PayloadFormat,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            max_concurrent_targets: 1,
            payload_format: PayloadFormat::Html,
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub snapshot: StockSnapshot,
    pub any_in_stock: bool,
    pub fingerprint: Fingerprint,
    pub decision: Decision,
}

/// Fingerprint a finished aggregation and decide what to do with it.
///
/// The payload is rendered only when the decision is to notify.
///
/// # Errors
///
/// Returns [`ScraperError::Fingerprint`] if the snapshot cannot be
/// serialized. Callers should treat this as fatal and write no state.
pub fn evaluate(
    aggregation: Aggregation,
    previous_fingerprint: &str,
    format: PayloadFormat,
) -> Result<CheckReport, ScraperError> {
    let Aggregation {
        snapshot,
        any_in_stock,
    } = aggregation;

    let current = fingerprint(&snapshot)?;
    let decision = match detect_change(any_in_stock, current.clone(), previous_fingerprint) {
        Change::NoStock => Decision::NoStock,
        Change::Unchanged => Decision::Unchanged,
        Change::Changed(fingerprint) => Decision::Notify {
            payload: render_payload(&snapshot, format),
            fingerprint,
        },
    };

    Ok(CheckReport {
        snapshot,
        any_in_stock,
        fingerprint: current,
        decision,
    })
}

/// Run one full check: fetch every target, build the snapshot, and decide.
///
/// Per-target failures are absorbed into default entries; only a
/// fingerprinting failure aborts the run.
///
/// # Errors
///
/// Returns [`ScraperError::Fingerprint`] if the snapshot cannot be
/// serialized.
pub async fn run_check<S>(
    source: &S,
    config: &WatchConfig,
    options: CheckOptions,
) -> Result<CheckReport, ScraperError>
where
    S: PageSource + Sync,
{
    let preferred = PreferredStores::new(&config.preferred_store_ids);
    if config.targets.is_empty() {
        tracing::info!("no targets configured");
    }
    if preferred.is_empty() {
        tracing::info!("no preferred stores configured; every product will report no stores");
    }

    let aggregation = collect_snapshot(
        source,
        &config.targets,
        &preferred,
        options.max_concurrent_targets,
    )
    .await;

    tracing::info!(
        targets = config.targets.len(),
        any_in_stock = aggregation.any_in_stock,
        "stock snapshot collected"
    );

    evaluate(
        aggregation,
        &config.previous_fingerprint,
        options.payload_format,
    )
}
