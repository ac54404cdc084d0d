pub mod clean;
pub mod extract;
pub mod sections;

use scraper::Html;

use crate::normalize;
use crate::page::Page;
use crate::utils::{element_text, tokenize};

/// Full extraction pipeline: markup text → cleaned DOM → field extractors →
/// segmenter → bucketed page model.
///
/// Agnostic to how the HTML was obtained; callers with a rendering-capable
/// fetcher feed its output here unchanged. Never fails: malformed markup
/// degrades to an emptier `Page`, not an error.
pub fn extract_from_html(url: &str, html: &str) -> Page {
    let mut document = Html::parse_document(html);

    // JSON-LD comes off the pristine tree; the cleaner drops every script
    // node, including structured-data ones.
    let schema_jsonld = extract::schema::extract(&document);

    clean::strip_noise(&mut document);

    let meta = extract::meta::extract(&document);
    let headings = extract::headings::extract(&document);

    let mut sections = sections::segment(&document);
    normalize::assign_buckets(&mut sections);

    let internal_links = extract::links::extract(&document, url);
    let image_alt_texts = extract::images::extract(&document);
    let faq_pairs = extract::faq::extract(&document);

    let raw_text = element_text(document.root_element());
    let word_count = tokenize(&raw_text).len();

    Page {
        url: url.to_string(),
        meta,
        headings,
        sections,
        schema_jsonld,
        internal_links,
        image_alt_texts,
        faq_pairs,
        raw_text,
        word_count,
    }
}
