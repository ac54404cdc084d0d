use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::page::Section;
use crate::utils::normalize_ws_lower;

/// Fixed taxonomy of semantic section buckets.
///
/// `Other` is the fallback for unmatched headings and never counts as a
/// presence signal during comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    AboutTeam,
    Testimonials,
    Services,
    Faq,
    Pricing,
    WhyChooseUs,
    Contact,
    Other,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::AboutTeam => "about_team",
            Bucket::Testimonials => "testimonials",
            Bucket::Services => "services",
            Bucket::Faq => "faq",
            Bucket::Pricing => "pricing",
            Bucket::WhyChooseUs => "why_choose_us",
            Bucket::Contact => "contact",
            Bucket::Other => "other",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Ordered rule list, first match wins. Order is significant: "questions about
// pricing" must land in faq, not pricing.
static BUCKET_RULES: LazyLock<Vec<(Bucket, Vec<Regex>)>> = LazyLock::new(|| {
    let table: &[(Bucket, &[&str])] = &[
        (
            Bucket::AboutTeam,
            &[
                r"meet (the|our) (doctor|dentist|dentists|team)",
                r"about (the )?team",
                r"our team",
                r"who we are",
            ],
        ),
        (
            Bucket::Testimonials,
            &[
                r"testimonials",
                r"reviews",
                r"patient stories",
                r"client stories",
                r"what (clients|patients) say",
            ],
        ),
        (
            Bucket::Services,
            &[
                r"services",
                r"what we offer",
                r"treatments",
                r"solutions",
                r"service areas?",
            ],
        ),
        (Bucket::Faq, &[r"faq", r"frequently asked", r"questions"]),
        (Bucket::Pricing, &[r"pricing", r"fees", r"cost", r"plans"]),
        (
            Bucket::WhyChooseUs,
            &[r"why choose us", r"why us", r"our difference", r"what makes us"],
        ),
        (
            Bucket::Contact,
            &[r"contact", r"book (now|online)", r"get in touch", r"request (a )?quote"],
        ),
    ];
    table
        .iter()
        .map(|(bucket, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| Regex::new(p).expect("bucket pattern must compile"))
                .collect();
            (*bucket, compiled)
        })
        .collect()
});

/// Map free-form heading text to a bucket. Unmatched headings get `Other`.
pub fn bucket_for(heading: &str) -> Bucket {
    let h = normalize_ws_lower(heading);
    for (bucket, patterns) in BUCKET_RULES.iter() {
        if patterns.iter().any(|p| p.is_match(&h)) {
            return *bucket;
        }
    }
    Bucket::Other
}

/// Assign a bucket to every section from its heading text.
pub fn assign_buckets(sections: &mut [Section]) {
    for section in sections.iter_mut() {
        section.bucket = bucket_for(&section.heading);
    }
}

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 88.0;

/// Approximate heading-to-heading equivalence on a 0-100 token-set scale.
///
/// Supplementary signal for callers comparing headings outside the fixed
/// taxonomy; the primary bucketing path never consults it.
pub fn fuzzy_equivalent(a: &str, b: &str, threshold: f64) -> bool {
    let a = normalize_ws_lower(a);
    let b = normalize_ws_lower(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    token_set_ratio(&a, &b) >= threshold
}

// Token-set ratio: compare the sorted token intersection against each side's
// intersection + remainder, score the best pairing. Shared-token subsets
// ("our team" vs "our team members") score 100.
fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let common = tokens_a
        .intersection(&tokens_b)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let only_a = tokens_a
        .difference(&tokens_b)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let only_b = tokens_b
        .difference(&tokens_a)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    let combined_a = join_nonempty(&common, &only_a);
    let combined_b = join_nonempty(&common, &only_b);

    let ratio = |x: &str, y: &str| strsim::normalized_levenshtein(x, y) * 100.0;
    ratio(&common, &combined_a)
        .max(ratio(&common, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

fn join_nonempty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{} {}", head, tail),
    }
}
