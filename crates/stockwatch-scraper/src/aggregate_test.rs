use std::collections::HashMap;
use std::time::Duration;

use super::*;
use crate::types::FilteredStoreEntry;

/// In-memory page source; unknown URLs fail with a 404.
#[derive(Default)]
struct FakeSource {
    pages: HashMap<String, PageContent>,
    delays_ms: HashMap<String, u64>,
}

impl FakeSource {
    fn with_page(mut self, url: &str, body: &str, title: Option<&str>) -> Self {
        self.pages.insert(
            url.to_string(),
            PageContent {
                body: body.to_string(),
                title: title.map(str::to_string),
            },
        );
        self
    }

    fn with_delay(mut self, url: &str, ms: u64) -> Self {
        self.delays_ms.insert(url.to_string(), ms);
        self
    }
}

impl PageSource for FakeSource {
    async fn fetch(&self, url: &str) -> Result<PageContent, ScraperError> {
        if let Some(ms) = self.delays_ms.get(url) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScraperError::UnexpectedStatus {
                status: 404,
                url: url.to_owned(),
            })
    }
}

fn store_page(stores: &str) -> String {
    format!("<script>window.storeFinder({stores}, 'AU', {{}});</script>")
}

fn targets(urls: &[&str]) -> Vec<String> {
    urls.iter().map(|u| (*u).to_string()).collect()
}

#[test]
fn aggregate_replaces_failures_with_defaults_in_place() {
    let ok = ProductStock {
        product_title: "Tent".to_string(),
        store_data: vec![FilteredStoreEntry {
            id: 10,
            name: "A".to_string(),
            in_stock: true,
        }],
    };
    let results = vec![
        (
            "u1",
            Err(ScraperError::UnexpectedStatus {
                status: 500,
                url: "u1".to_string(),
            }),
        ),
        ("u2", Ok(ok.clone())),
    ];
    let aggregation = aggregate(results);
    assert_eq!(
        aggregation.snapshot,
        StockSnapshot::from(vec![ProductStock::default(), ok])
    );
    assert!(aggregation.any_in_stock);
}

#[test]
fn aggregate_of_nothing_is_empty_and_out_of_stock() {
    let aggregation = aggregate(Vec::<(&str, Result<ProductStock, ScraperError>)>::new());
    assert!(aggregation.snapshot.is_empty());
    assert!(!aggregation.any_in_stock);
}

#[tokio::test]
async fn single_target_keeps_only_preferred_stores() {
    let source = FakeSource::default().with_page(
        "url1",
        &store_page(
            r#"[{"Id":10,"Name":"A","SearchedProductIsInStock":true},{"Id":30,"Name":"B","SearchedProductIsInStock":true}]"#,
        ),
        Some("Tent"),
    );
    let aggregation = collect_snapshot(
        &source,
        &targets(&["url1"]),
        &PreferredStores::new(&[10, 20]),
        1,
    )
    .await;

    assert_eq!(
        aggregation.snapshot.products(),
        &[ProductStock {
            product_title: "Tent".to_string(),
            store_data: vec![FilteredStoreEntry {
                id: 10,
                name: "A".to_string(),
                in_stock: true,
            }],
        }]
    );
    assert!(aggregation.any_in_stock);
}

#[tokio::test]
async fn out_of_stock_preferred_store_is_not_stock() {
    let source = FakeSource::default().with_page(
        "url1",
        &store_page(
            r#"[{"Id":10,"Name":"A","SearchedProductIsInStock":false},{"Id":30,"Name":"B","SearchedProductIsInStock":true}]"#,
        ),
        Some("Tent"),
    );
    let aggregation = collect_snapshot(
        &source,
        &targets(&["url1"]),
        &PreferredStores::new(&[10, 20]),
        1,
    )
    .await;
    assert!(!aggregation.any_in_stock);
    assert_eq!(aggregation.snapshot.products()[0].store_data.len(), 1);
}

#[tokio::test]
async fn snapshot_length_matches_targets_with_mixed_failures() {
    let source = FakeSource::default()
        .with_page("ok", &store_page(r#"[{"Id":1,"Name":"A"}]"#), Some("One"))
        .with_page("no-pattern", "<html>Sold out</html>", None)
        .with_page("bad-json", "window.storeFinder([{,}], 'AU')", Some("Three"));
    let urls = targets(&["ok", "missing", "no-pattern", "bad-json"]);

    let aggregation = collect_snapshot(&source, &urls, &PreferredStores::new(&[1]), 2).await;
    let products = aggregation.snapshot.products();

    assert_eq!(products.len(), urls.len());
    assert_eq!(products[0].product_title, "One");
    assert_eq!(products[0].store_data.len(), 1);
    assert_eq!(products[1], ProductStock::default());
    assert_eq!(products[2], ProductStock::default());
    assert_eq!(products[3].product_title, "Three");
    assert!(products[3].store_data.is_empty());
    assert!(!aggregation.any_in_stock);
}

#[tokio::test]
async fn concurrent_fetches_preserve_target_order() {
    let source = FakeSource::default()
        .with_page(
            "slow",
            &store_page(r#"[{"Id":1,"Name":"A","SearchedProductIsInStock":true}]"#),
            Some("Slow"),
        )
        .with_page("fast", &store_page("[]"), Some("Fast"))
        .with_delay("slow", 50);

    let aggregation = collect_snapshot(
        &source,
        &targets(&["slow", "fast"]),
        &PreferredStores::new(&[1]),
        4,
    )
    .await;

    let titles: Vec<&str> = aggregation
        .snapshot
        .products()
        .iter()
        .map(|p| p.product_title.as_str())
        .collect();
    assert_eq!(titles, vec!["Slow", "Fast"]);
    assert!(aggregation.any_in_stock);
}

#[tokio::test]
async fn zero_concurrency_is_treated_as_sequential() {
    let source = FakeSource::default().with_page("u", &store_page("[]"), Some("T"));
    let aggregation =
        collect_snapshot(&source, &targets(&["u"]), &PreferredStores::new(&[1]), 0).await;
    assert_eq!(aggregation.snapshot.len(), 1);
}
