use scraper::node::Element;
use scraper::Html;

const NOISE_TAGS: &[&str] = &["script", "style", "noscript", "svg", "canvas"];

/// Detach noise elements from the tree in place: script/style/noscript/svg/
/// canvas plus anything inline-styled as hidden. Runs before text, heading
/// and section extraction so invisible content is never counted. Idempotent.
pub fn strip_noise(document: &mut Html) {
    let mut doomed = Vec::new();
    for node in document.tree.nodes() {
        let Some(element) = node.value().as_element() else {
            continue;
        };
        if NOISE_TAGS.contains(&element.name()) || is_hidden(element) {
            doomed.push(node.id());
        }
    }
    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn is_hidden(element: &Element) -> bool {
    let Some(style) = element.attr("style") else {
        return false;
    };
    // "display: none" and "display:none" both count
    let style: String = style
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    style.contains("display:none") || style.contains("visibility:hidden")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::element_text;

    const HTML: &str = r#"
        <html><head><style>p { color: red }</style></head><body>
        <p>Visible paragraph text.</p>
        <script>var tracking = "junk";</script>
        <div style="display: none">hidden spam keywords</div>
        <span style="VISIBILITY:hidden">also hidden</span>
        <svg><title>decorative</title></svg>
        <noscript>enable javascript</noscript>
        </body></html>"#;

    #[test]
    fn removes_noise_and_hidden_elements() {
        let mut document = Html::parse_document(HTML);
        strip_noise(&mut document);
        let text = element_text(document.root_element());
        assert_eq!(text, "Visible paragraph text.");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let mut document = Html::parse_document(HTML);
        strip_noise(&mut document);
        let once = document.root_element().html();
        strip_noise(&mut document);
        let twice = document.root_element().html();
        assert_eq!(once, twice);
    }
}
