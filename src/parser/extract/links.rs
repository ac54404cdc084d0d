use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use crate::page::InternalLink;
use crate::utils::{element_text, host_of};

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("anchor selector must parse"));

/// Internal links: every anchor with a non-empty href, resolved against the
/// page URL and kept only when the resolved host matches the page host.
/// Hrefs that fail to resolve fall back to the raw href (and then simply
/// fail the host test) rather than erroring.
pub fn extract(document: &Html, base_url: &str) -> Vec<InternalLink> {
    let base = Url::parse(base_url).ok();
    let base_host = host_of(base_url);
    if base_host.is_empty() {
        return Vec::new();
    }

    let mut links = Vec::new();
    for anchor in document.select(&ANCHOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if href.is_empty() {
            continue;
        }

        let resolved = base
            .as_ref()
            .and_then(|b| b.join(href).ok())
            .map(|u| u.to_string())
            .unwrap_or_else(|| href.to_string());

        if host_of(&resolved) != base_host {
            continue;
        }

        links.push(InternalLink {
            url: resolved,
            anchor: element_text(anchor),
        });
    }
    links
}
