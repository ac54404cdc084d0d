use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::page::SchemaBlock;
use crate::utils::element_text;

static LD_JSON: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("ld+json selector must parse")
});

/// Every JSON-LD script body, parsed when possible. Malformed JSON (trailing
/// commas, concatenated objects) is kept as a raw fallback block instead of
/// being dropped. Runs against the pristine tree: the cleaner removes all
/// script nodes, so this extractor goes first in the pipeline.
pub fn extract(document: &Html) -> Vec<SchemaBlock> {
    let mut blocks = Vec::new();
    for script in document.select(&LD_JSON) {
        let text = element_text(script);
        if text.is_empty() {
            continue;
        }
        match serde_json::from_str(&text) {
            Ok(value) => blocks.push(SchemaBlock::Parsed(value)),
            Err(_) => blocks.push(SchemaBlock::Raw { raw: text }),
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_blocks_and_keeps_invalid_raw() {
        let document = Html::parse_document(
            r#"<head>
               <script type="application/ld+json">{"@type": "Organization", "name": "Clinic"}</script>
               <script type="application/ld+json">{"@type": "FAQPage",}</script>
               <script type="text/javascript">var x = 1;</script>
               </head>"#,
        );
        let blocks = extract(&document);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].has_type("Organization"));
        assert!(blocks[1].is_raw());
        match &blocks[1] {
            SchemaBlock::Raw { raw } => assert!(raw.contains("FAQPage")),
            other => panic!("expected raw fallback, got {:?}", other),
        }
    }

    #[test]
    fn empty_script_bodies_are_skipped() {
        let document = Html::parse_document(
            r#"<head><script type="application/ld+json">   </script></head>"#,
        );
        assert!(extract(&document).is_empty());
    }
}
