use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::utils::clean_text;

static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("img selector must parse"));

/// Normalized alt text of every image; images without alt (or with
/// whitespace-only alt) are excluded.
pub fn extract(document: &Html) -> Vec<String> {
    document
        .select(&IMG)
        .filter_map(|img| img.value().attr("alt"))
        .map(clean_text)
        .filter(|alt| !alt.is_empty())
        .collect()
}
