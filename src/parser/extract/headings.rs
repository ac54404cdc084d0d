use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::page::Headings;
use crate::utils::element_text;

static LEVELS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    (1..=6)
        .map(|n| Selector::parse(&format!("h{n}")).expect("heading selector must parse"))
        .collect()
});

/// Ordered, normalized heading texts for levels 1-6; empty headings excluded.
pub fn extract(document: &Html) -> Headings {
    let texts = |level: usize| -> Vec<String> {
        document
            .select(&LEVELS[level - 1])
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect()
    };

    Headings {
        h1: texts(1),
        h2: texts(2),
        h3: texts(3),
        h4: texts(4),
        h5: texts(5),
        h6: texts(6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_levels_in_document_order() {
        let document = Html::parse_document(
            "<body><h1>Main</h1><h2>First</h2><p>x</p><h2>  Second\n Heading </h2><h3></h3></body>",
        );
        let headings = extract(&document);
        assert_eq!(headings.h1, vec!["Main"]);
        assert_eq!(headings.h2, vec!["First", "Second Heading"]);
        assert!(headings.h3.is_empty());
        assert!(headings.h6.is_empty());
    }
}
