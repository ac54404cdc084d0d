use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::normalize::Bucket;
use crate::page::Section;
use crate::utils::{clean_text, element_text};

const MAX_SECTIONS: usize = 80;
const MIN_FRAGMENT_CHARS: usize = 20;

static HEADINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3").expect("heading selector must parse"));

/// Partition the cleaned body into heading-anchored content blocks.
///
/// Walks every h1-h3 in document order and accumulates following sibling
/// text (elements or bare text nodes, each fragment > 20 chars) until the
/// next h1-h3 sibling. Heading-anchored on purpose: it tolerates the
/// inconsistent wrapper markup of competitor sites better than
/// `<section>`-tag boundaries would. Thin sections are dropped, output is
/// capped at 80. Buckets are assigned by the normalizer afterwards.
pub fn segment(document: &Html) -> Vec<Section> {
    let mut sections = Vec::new();

    for heading in document.select(&HEADINGS) {
        let heading_text = element_text(heading);
        if heading_text.is_empty() {
            continue;
        }

        let mut parts: Vec<String> = Vec::new();
        for sibling in heading.next_siblings() {
            if let Some(element) = ElementRef::wrap(sibling) {
                if is_section_heading(element) {
                    break;
                }
                let text = element_text(element);
                if text.chars().count() > MIN_FRAGMENT_CHARS {
                    parts.push(text);
                }
            } else if let Some(text) = sibling.value().as_text() {
                let text = clean_text(text);
                if text.chars().count() > MIN_FRAGMENT_CHARS {
                    parts.push(text);
                }
            }
        }

        sections.push(Section {
            level: heading_level(heading),
            heading: heading_text,
            text: clean_text(&parts.join(" ")),
            bucket: Bucket::Other,
        });
    }

    // Thin sections carry no comparable signal
    sections.retain(|s| s.text.chars().count() > 60 || s.heading.chars().count() > 10);
    sections.truncate(MAX_SECTIONS);
    sections
}

fn is_section_heading(element: ElementRef) -> bool {
    matches!(element.value().name(), "h1" | "h2" | "h3")
}

fn heading_level(element: ElementRef) -> u8 {
    match element.value().name() {
        "h1" => 1,
        "h2" => 2,
        _ => 3,
    }
}
