//! SEO content gap extraction: fetch a page, clean its DOM, extract
//! comparable structure (meta, headings, sections, schema, links, FAQ
//! pairs) and normalize section headings into a fixed bucket taxonomy.
//!
//! The pipeline is synchronous and per-page independent; batch callers
//! space their requests through [`fetch::RateGate`]. Extraction never
//! fails once HTML text is in hand; only the fetch boundary returns
//! errors.

pub mod analyze;
pub mod fetch;
pub mod normalize;
pub mod page;
pub mod parser;
pub mod utils;

pub use fetch::{FetchError, HttpClient, RateGate};
pub use normalize::Bucket;
pub use page::{FaqPair, Headings, InternalLink, Page, PageMeta, SchemaBlock, Section};

/// Fetch one URL and run the full extraction pipeline on its HTML.
///
/// Callers with a different HTML source (a rendering fetcher, a cache)
/// skip this and call [`parser::extract_from_html`] directly.
pub fn fetch_page(client: &HttpClient, url: &str) -> Result<Page, FetchError> {
    let html = client.fetch(url)?;
    Ok(parser::extract_from_html(url, &html))
}
