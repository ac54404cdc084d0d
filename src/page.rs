use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::Bucket;

/// Canonical representation of one extracted page. Built once per fetch,
/// never mutated afterwards; owns all nested data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub url: String,
    pub meta: PageMeta,
    pub headings: Headings,
    pub sections: Vec<Section>,
    pub schema_jsonld: Vec<SchemaBlock>,
    pub internal_links: Vec<InternalLink>,
    pub image_alt_texts: Vec<String>,
    pub faq_pairs: Vec<FaqPair>,
    pub raw_text: String,
    pub word_count: usize,
}

/// Head metadata. Missing fields are empty strings, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical: String,
}

/// Ordered, whitespace-normalized heading texts per level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
    pub h6: Vec<String>,
}

/// A heading-anchored content block.
///
/// Invariant: `text` longer than 60 chars or `heading` longer than 10 chars;
/// thinner sections are discarded by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub level: u8,
    pub heading: String,
    pub text: String,
    pub bucket: Bucket,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalLink {
    pub url: String,
    pub anchor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqPair {
    pub question: String,
    pub answer: String,
}

/// One JSON-LD script body: parsed when valid, otherwise the raw text is kept
/// as a `{"_raw": ...}` fallback record rather than dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaBlock {
    Parsed(Value),
    Raw {
        #[serde(rename = "_raw")]
        raw: String,
    },
}

impl SchemaBlock {
    pub fn is_raw(&self) -> bool {
        matches!(self, SchemaBlock::Raw { .. })
    }

    /// Whether this block declares the given `@type`, case-insensitively.
    /// Covers string and array `@type` values, `@graph` members and
    /// top-level arrays. Raw fallback blocks never match.
    pub fn has_type(&self, type_name: &str) -> bool {
        match self {
            SchemaBlock::Parsed(value) => value_has_type(value, type_name),
            SchemaBlock::Raw { .. } => false,
        }
    }

    pub fn has_any_type(&self, type_names: &[&str]) -> bool {
        type_names.iter().any(|t| self.has_type(t))
    }
}

fn value_has_type(value: &Value, type_name: &str) -> bool {
    match value {
        Value::Object(map) => {
            match map.get("@type") {
                Some(Value::String(s)) if s.eq_ignore_ascii_case(type_name) => return true,
                Some(Value::Array(items))
                    if items
                        .iter()
                        .any(|t| t.as_str().is_some_and(|s| s.eq_ignore_ascii_case(type_name))) =>
                {
                    return true
                }
                _ => {}
            }
            map.get("@graph")
                .and_then(Value::as_array)
                .is_some_and(|graph| graph.iter().any(|v| value_has_type(v, type_name)))
        }
        Value::Array(items) => items.iter().any(|v| value_has_type(v, type_name)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn has_type_on_plain_and_array_types() {
        let block = SchemaBlock::Parsed(json!({"@type": "FAQPage"}));
        assert!(block.has_type("faqpage"));
        assert!(!block.has_type("Organization"));

        let multi = SchemaBlock::Parsed(json!({"@type": ["Dentist", "LocalBusiness"]}));
        assert!(multi.has_type("LocalBusiness"));
    }

    #[test]
    fn has_type_recurses_into_graph_and_lists() {
        let graph = SchemaBlock::Parsed(json!({
            "@context": "https://schema.org",
            "@graph": [{"@type": "Organization"}, {"@type": "WebSite"}]
        }));
        assert!(graph.has_type("organization"));

        let list = SchemaBlock::Parsed(json!([{"@type": "FAQPage"}]));
        assert!(list.has_type("FAQPage"));
    }

    #[test]
    fn raw_block_never_matches_and_serializes_as_fallback() {
        let raw = SchemaBlock::Raw {
            raw: "{\"@type\": \"FAQPage\",}".to_string(),
        };
        assert!(!raw.has_type("FAQPage"));
        let json = serde_json::to_value(&raw).unwrap();
        assert_eq!(json["_raw"], "{\"@type\": \"FAQPage\",}");
    }
}
