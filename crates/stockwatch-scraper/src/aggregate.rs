//! Aggregator: turns per-target results into one ordered [`StockSnapshot`].

use futures::stream::{self, StreamExt};

use crate::error::ScraperError;
use crate::extract::extract_page;
use crate::fetch::PageSource;
use crate::filter::{filter_stores, PreferredStores};
use crate::types::{PageContent, ProductStock, StockSnapshot};

/// The snapshot for a run plus whether any preferred store has stock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub snapshot: StockSnapshot,
    pub any_in_stock: bool,
}

/// Extract and filter one fetched page.
#[must_use]
pub fn product_stock(
    url: &str,
    content: &PageContent,
    preferred: &PreferredStores,
) -> ProductStock {
    let page = extract_page(url, content);
    ProductStock {
        product_title: page.title,
        store_data: filter_stores(&page.entries, preferred),
    }
}

/// Fold per-target results into a snapshot, one entry per input, in input
/// order. Failed targets are logged and reported as [`ProductStock::default`].
#[must_use]
pub fn aggregate<'a, I>(results: I) -> Aggregation
where
    I: IntoIterator<Item = (&'a str, Result<ProductStock, ScraperError>)>,
{
    let snapshot: StockSnapshot = results
        .into_iter()
        .enumerate()
        .map(|(index, (url, result))| {
            result.unwrap_or_else(|e| {
                tracing::warn!(index, url, error = %e, "target check failed; reporting defaults");
                ProductStock::default()
            })
        })
        .collect();

    let any_in_stock = snapshot.any_in_stock();
    Aggregation {
        snapshot,
        any_in_stock,
    }
}

/// Fetch, extract and filter every target, then aggregate.
///
/// Up to `max_concurrent` fetches run at once; results keep target order
/// regardless of completion order. A failing target never stops the others.
pub async fn collect_snapshot<S>(
    source: &S,
    targets: &[String],
    preferred: &PreferredStores,
    max_concurrent: usize,
) -> Aggregation
where
    S: PageSource + Sync,
{
    let results: Vec<(&str, Result<ProductStock, ScraperError>)> = stream::iter(targets)
        .map(|url| async move {
            tracing::debug!(url = %url, "checking target");
            let result = source
                .fetch(url)
                .await
                .map(|content| product_stock(url, &content, preferred));
            (url.as_str(), result)
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    aggregate(results)
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
