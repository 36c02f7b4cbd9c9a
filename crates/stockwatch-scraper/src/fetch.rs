//! Page fetching for the check pipeline.
//!
//! [`PageSource`] is the seam between the pipeline and whatever retrieves
//! product pages. [`HttpPageSource`] is the plain-HTTP implementation used by
//! the CLI; tests substitute in-memory sources.

use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;

use crate::error::ScraperError;
use crate::types::PageContent;

/// CSS class of the element holding the product name.
pub const TITLE_CLASS: &str = "store-product-title";

static TITLE_OPEN_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?is)<([a-z][a-z0-9]*)\b[^>]*\bclass\s*=\s*["'](?:[^"']*\s)?{}(?:\s[^"']*)?["'][^>]*>"#,
        regex::escape(TITLE_CLASS)
    ))
    .expect("valid regex")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static ELEMENT_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(/?)([A-Za-z][A-Za-z0-9]*)\b[^>]*>").expect("valid regex")
});
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([A-Za-z][A-Za-z0-9]*));")
        .expect("valid regex")
});

/// Source of raw page content for a target URL.
pub trait PageSource {
    /// Fetch one product page.
    ///
    /// # Errors
    ///
    /// Implementations return a [`ScraperError`] for any failure; the
    /// pipeline degrades that target to its default entry.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<PageContent, ScraperError>> + Send;
}

/// Fetches pages over HTTP and reads the title element out of the HTML.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    /// Creates a source whose every request is bounded by `timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &str) -> Result<PageContent, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        let title = extract_title(&body);
        Ok(PageContent { body, title })
    }
}

/// Text content of the first element carrying the product-title class.
///
/// Inner tags are dropped, entities decoded, and whitespace trimmed.
/// Returns `None` when no such element exists or it is never closed.
#[must_use]
pub fn extract_title(html: &str) -> Option<String> {
    let cap = TITLE_OPEN_TAG_RE.captures(html)?;
    let tag = cap.get(1)?.as_str();
    let rest = &html[cap.get(0)?.end()..];
    let close = element_end(rest, tag)?;
    let text = TAG_RE.replace_all(&rest[..close], "");
    Some(decode_entities(&text).trim().to_string())
}

/// Byte offset of the tag closing the element whose content starts `rest`.
///
/// Same-name elements nested inside it are balanced; self-closing tags are
/// not counted.
fn element_end(rest: &str, tag: &str) -> Option<usize> {
    let mut depth = 0usize;
    for cap in ELEMENT_TAG_RE.captures_iter(rest) {
        if !cap[2].eq_ignore_ascii_case(tag) {
            continue;
        }
        let whole = cap.get(0)?;
        let closing = !cap[1].is_empty();
        if closing {
            if depth == 0 {
                return Some(whole.start());
            }
            depth -= 1;
        } else if !whole.as_str().ends_with("/>") {
            depth += 1;
        }
    }
    None
}

/// Decode numeric character references and the named entities that show up
/// in product names. Unknown names are left as written.
fn decode_entities(s: &str) -> String {
    ENTITY_RE
        .replace_all(s, |cap: &regex::Captures<'_>| {
            let decoded = if let Some(dec) = cap.get(1) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = cap.get(2) {
                u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32)
            } else {
                cap.get(3).and_then(|name| named_entity(name.as_str()))
            };
            decoded.map_or_else(|| cap[0].to_string(), String::from)
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "hellip" => '\u{2026}',
        "copy" => '\u{00A9}',
        "reg" => '\u{00AE}',
        "trade" => '\u{2122}',
        "deg" => '\u{00B0}',
        "times" => '\u{00D7}',
        _ => return None,
    })
}
