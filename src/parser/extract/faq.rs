use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::page::FaqPair;
use crate::utils::element_text;

const MAX_CANDIDATES: usize = 5;
const MAX_PAIRS: usize = 30;
const MIN_QUESTION_CHARS: usize = 6;
const MIN_ANSWER_CHARS: usize = 20;

const ACCORDION_MARKERS: &[&str] = &["accordion", "toggle", "collapse"];

static ANY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("*").expect("universal selector must parse"));
static PANEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section, div").expect("panel selector must parse"));
static QUESTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3, h4, button").expect("question selector must parse"));

/// Best-effort FAQ detection from DOM markup. Deliberately heuristic: it
/// trades recall for precision and determinism, and identical HTML always
/// yields identical pairs.
///
/// Candidates are elements marked "faq" in id or class, falling back to
/// accordion-style panels; the first five candidates are scanned for
/// h3/h4/button questions whose answer is the next element sibling (or the
/// parent's next element sibling when the question is wrapped).
pub fn extract(document: &Html) -> Vec<FaqPair> {
    let mut candidates: Vec<ElementRef> = document
        .select(&ANY)
        .filter(|el| attr_contains(*el, "class", "faq") || attr_contains(*el, "id", "faq"))
        .collect();

    if candidates.is_empty() {
        candidates = document
            .select(&PANEL)
            .filter(|el| {
                ACCORDION_MARKERS
                    .iter()
                    .any(|marker| attr_contains(*el, "class", marker))
            })
            .collect();
    }
    candidates.truncate(MAX_CANDIDATES);

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut pairs = Vec::new();

    for container in candidates {
        for question in container.select(&QUESTION) {
            let question_text = element_text(question);
            if question_text.chars().count() < MIN_QUESTION_CHARS {
                continue;
            }

            let mut answer_text = next_element_sibling_text(question);
            if answer_text.is_empty() {
                // wrapped question: the answer follows the wrapper instead
                answer_text = question
                    .parent()
                    .and_then(|parent| parent.next_siblings().find_map(ElementRef::wrap))
                    .map(element_text)
                    .unwrap_or_default();
            }
            if answer_text.is_empty() {
                continue;
            }

            let key = (
                question_text.to_lowercase(),
                answer_text.to_lowercase().chars().take(60).collect::<String>(),
            );
            if !seen.insert(key) {
                continue;
            }
            pairs.push(FaqPair {
                question: question_text,
                answer: answer_text,
            });
        }
    }

    pairs.retain(|p| p.answer.chars().count() > MIN_ANSWER_CHARS);
    pairs.truncate(MAX_PAIRS);
    pairs
}

fn attr_contains(el: ElementRef, attr: &str, needle: &str) -> bool {
    el.value()
        .attr(attr)
        .is_some_and(|v| v.to_lowercase().contains(needle))
}

fn next_element_sibling_text(el: ElementRef) -> String {
    el.next_siblings()
        .find_map(ElementRef::wrap)
        .map(element_text)
        .unwrap_or_default()
}
