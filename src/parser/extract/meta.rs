use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::page::PageMeta;
use crate::utils::{clean_text, element_text};

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector must parse"));
static META: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("meta selector must parse"));
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("link").expect("link selector must parse"));

/// Title, meta description and canonical URL. Attribute values are matched
/// case-insensitively; every missing field degrades to an empty string.
pub fn extract(document: &Html) -> PageMeta {
    let title = document
        .select(&TITLE)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let description = document
        .select(&META)
        .find(|m| {
            m.value()
                .attr("name")
                .is_some_and(|n| n.eq_ignore_ascii_case("description"))
        })
        .and_then(|m| m.value().attr("content"))
        .map(clean_text)
        .unwrap_or_default();

    let canonical = document
        .select(&LINK)
        .find(|l| {
            l.value().attr("rel").is_some_and(|rel| {
                rel.to_lowercase()
                    .split_whitespace()
                    .any(|token| token.contains("canonical"))
            })
        })
        .and_then(|l| l.value().attr("href"))
        .map(clean_text)
        .unwrap_or_default();

    PageMeta {
        title,
        description,
        canonical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_all_three_fields() {
        let document = Html::parse_document(
            r#"<head>
               <title>  Gentle   Dental </title>
               <meta name="Description" content="Best dental care">
               <link rel="Canonical" href="https://site.com/page/">
               </head>"#,
        );
        let meta = extract(&document);
        assert_eq!(meta.title, "Gentle Dental");
        assert_eq!(meta.description, "Best dental care");
        assert_eq!(meta.canonical, "https://site.com/page/");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let meta = extract(&Html::parse_document("<body><p>no head data</p></body>"));
        assert_eq!(meta, PageMeta::default());
    }

    #[test]
    fn unrelated_meta_tags_are_ignored() {
        let document = Html::parse_document(
            r#"<head><meta name="viewport" content="width=device-width"></head>"#,
        );
        assert_eq!(extract(&document).description, "");
    }
}
