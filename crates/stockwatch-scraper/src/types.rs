//! Domain types for store-level stock extraction.
//!
//! ## Embedded store data
//!
//! Product pages hand their store list to the page script as
//! `window.storeFinder([...], 'AU', ...)`. Each array element is an object
//! with PascalCase keys, of which only three are read:
//!
//! - `Id`: numeric store id. Integral floats such as `10.0` or `1e1` are
//!   read as integers. Strings and fractional numbers are treated as absent,
//!   which means the store never matches a preferred id.
//! - `Name`: display name.
//! - `SearchedProductIsInStock`: `true`/`false`, occasionally `null` or
//!   missing for stores that do not range the product.
//!
//! Every other key (address, opening hours, coordinates, ...) is ignored.
//!
//! ## Snapshot serialization
//!
//! The serialized shape of [`StockSnapshot`] is what gets fingerprinted, so
//! field order and key names are part of the contract:
//! `[{"productTitle": .., "storeData": [{"id": .., "name": .., "itemInStock": ..}]}]`.

use serde::{Deserialize, Deserializer, Serialize};

/// Title used when a page has no product-title element.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// One store record decoded from the embedded page data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawStoreEntry {
    #[serde(rename = "Id", default, deserialize_with = "lenient_integer")]
    pub id: Option<i64>,

    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    /// `None` covers `null`, a missing key, and any non-boolean value.
    #[serde(
        rename = "SearchedProductIsInStock",
        default,
        deserialize_with = "lenient_bool"
    )]
    pub in_stock: Option<bool>,
}

/// A store retained because its id is in the preferred set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredStoreEntry {
    pub id: i64,
    pub name: String,
    #[serde(rename = "itemInStock")]
    pub in_stock: bool,
}

/// Stock picture for one target page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStock {
    pub product_title: String,
    pub store_data: Vec<FilteredStoreEntry>,
}

impl Default for ProductStock {
    /// The entry reported for a target whose page could not be fetched or
    /// parsed.
    fn default() -> Self {
        Self {
            product_title: UNKNOWN_TITLE.to_string(),
            store_data: Vec::new(),
        }
    }
}

impl ProductStock {
    /// `true` when any retained store reports stock.
    #[must_use]
    pub fn any_in_stock(&self) -> bool {
        self.store_data.iter().any(|s| s.in_stock)
    }
}

/// Ordered per-target results for one run. Position `i` always describes
/// target `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StockSnapshot(Vec<ProductStock>);

impl StockSnapshot {
    #[must_use]
    pub fn products(&self) -> &[ProductStock] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// OR-reduction over every retained store in every product.
    #[must_use]
    pub fn any_in_stock(&self) -> bool {
        self.0.iter().any(ProductStock::any_in_stock)
    }
}

impl From<Vec<ProductStock>> for StockSnapshot {
    fn from(products: Vec<ProductStock>) -> Self {
        Self(products)
    }
}

impl FromIterator<ProductStock> for StockSnapshot {
    fn from_iter<I: IntoIterator<Item = ProductStock>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What the fetch layer hands the extractor for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    /// Raw response body.
    pub body: String,
    /// Text of the product-title element, `None` when the element is absent.
    pub title: Option<String>,
}

fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(integral))
}

/// Whole-number JSON values as `i64`, including float spellings like `10.0`.
#[allow(clippy::cast_possible_truncation)]
fn integral(value: &serde_json::Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        let f = value.as_f64()?;
        // 2^63 is exactly representable; i64::MAX is not.
        let bound = 2f64.powi(63);
        (f.fract() == 0.0 && f >= -bound && f < bound).then_some(f as i64)
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    }))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_bool()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_entry_reads_known_keys_and_ignores_the_rest() {
        let entry: RawStoreEntry = serde_json::from_str(
            r#"{"Id": 10, "Name": "Richmond", "SearchedProductIsInStock": true, "Suburb": "x"}"#,
        )
        .unwrap();
        assert_eq!(entry.id, Some(10));
        assert_eq!(entry.name.as_deref(), Some("Richmond"));
        assert_eq!(entry.in_stock, Some(true));
    }

    #[test]
    fn raw_entry_treats_wrongly_typed_fields_as_absent() {
        let entry: RawStoreEntry = serde_json::from_str(
            r#"{"Id": "10", "Name": 5, "SearchedProductIsInStock": "yes"}"#,
        )
        .unwrap();
        assert_eq!(entry, RawStoreEntry::default());
    }

    #[test]
    fn raw_entry_reads_integral_float_ids() {
        for raw in [r#"{"Id": 10.0}"#, r#"{"Id": 1e1}"#, r#"{"Id": 1.0e1}"#] {
            let entry: RawStoreEntry = serde_json::from_str(raw).unwrap();
            assert_eq!(entry.id, Some(10), "input {raw}");
        }
    }

    #[test]
    fn raw_entry_rejects_fractional_and_out_of_range_ids() {
        for raw in [r#"{"Id": 10.5}"#, r#"{"Id": 1e19}"#, r#"{"Id": 18446744073709551615}"#] {
            let entry: RawStoreEntry = serde_json::from_str(raw).unwrap();
            assert_eq!(entry.id, None, "input {raw}");
        }
    }

    #[test]
    fn raw_entry_null_stock_flag_is_absent() {
        let entry: RawStoreEntry =
            serde_json::from_str(r#"{"Id": 3, "SearchedProductIsInStock": null}"#).unwrap();
        assert_eq!(entry.id, Some(3));
        assert_eq!(entry.in_stock, None);
    }

    #[test]
    fn default_product_stock_uses_unknown_title() {
        let stock = ProductStock::default();
        assert_eq!(stock.product_title, "Unknown");
        assert!(stock.store_data.is_empty());
        assert!(!stock.any_in_stock());
    }

    #[test]
    fn snapshot_serializes_with_stable_key_names() {
        let snapshot = StockSnapshot::from(vec![ProductStock {
            product_title: "Tent".to_string(),
            store_data: vec![FilteredStoreEntry {
                id: 10,
                name: "A".to_string(),
                in_stock: true,
            }],
        }]);
        assert_eq!(
            serde_json::to_string(&snapshot).unwrap(),
            r#"[{"productTitle":"Tent","storeData":[{"id":10,"name":"A","itemInStock":true}]}]"#
        );
    }
}
