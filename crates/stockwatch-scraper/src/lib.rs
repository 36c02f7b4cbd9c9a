//! Store-level stock extraction and change detection.
//!
//! A check run fetches each product page, pulls the embedded `storeFinder`
//! data out of it, keeps the preferred stores, fingerprints the resulting
//! snapshot and decides whether the caller should send a notification. See
//! [`run_check`] for the entry point.

pub mod aggregate;
pub mod detect;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod fingerprint;
pub mod pipeline;
pub mod render;
pub mod types;

pub use aggregate::{aggregate, collect_snapshot, Aggregation};
pub use detect::{detect_change, Change};
pub use error::{ExtractError, ScraperError};
pub use fetch::{HttpPageSource, PageSource};
pub use filter::{filter_stores, PreferredStores};
pub use fingerprint::{fingerprint, Fingerprint};
pub use pipeline::{evaluate, run_check, CheckOptions, CheckReport, Decision};
pub use render::render_payload;
pub use types::{FilteredStoreEntry, PageContent, ProductStock, RawStoreEntry, StockSnapshot};
