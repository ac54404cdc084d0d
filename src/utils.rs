use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::ElementRef;
use url::Url;

/// Process-wide stopword set, loaded once and never mutated.
pub static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    "a an the and or but if then else when while for to of in on at by with from as is are was \
     were be been being this that these those it its you your we our they their i me my he she \
     them his her can could should would may might will just"
        .split_whitespace()
        .collect()
});

/// Collapse whitespace runs to single spaces and trim.
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_ws_lower(s: &str) -> String {
    clean_text(s).to_lowercase()
}

/// Space-joined, whitespace-normalized text content of an element subtree.
pub fn element_text(el: ElementRef) -> String {
    clean_text(&el.text().collect::<Vec<_>>().join(" "))
}

/// Lowercased host of a URL; empty when the URL has none or does not parse.
pub fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default()
}

/// Tokenizer for keyword density: lowercase, keep [a-z0-9-], drop stopwords
/// and tokens of 2 chars or fewer.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = normalize_ws_lower(text);
    let cleaned: String = lowered
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned
        .split_whitespace()
        .filter(|t| t.len() > 2 && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}
