//! Mechanical aggregation over extracted pages: structure summaries,
//! competitor averages, rule-based gap detection and keyword density.
//! Read-only consumer of the `Page` model.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use crate::normalize::Bucket;
use crate::page::Page;
use crate::utils::{normalize_ws_lower, tokenize};

const LOCALBIZ_TYPES: &[&str] = &["LocalBusiness", "Dentist", "Plumber", "ProfessionalService"];

// Gap rule thresholds
const BUCKET_PRESENCE_AVG: f64 = 0.8;
const SCHEMA_PRESENCE_SHARE: f64 = 0.6;
const DEPTH_RATIO: f64 = 0.65;

#[derive(Debug, Clone, Serialize)]
pub struct StructureSummary {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub canonical: String,
    pub h1_count: usize,
    pub h2_count: usize,
    pub h3_count: usize,
    pub bucket_counts: BTreeMap<Bucket, usize>,
    pub word_count: usize,
    pub internal_links_count: usize,
    pub image_alt_count: usize,
    pub faq_count: usize,
    pub has_faq_schema: bool,
    pub has_org_schema: bool,
    pub has_localbiz_schema: bool,
}

pub fn summarize_structure(page: &Page) -> StructureSummary {
    let mut bucket_counts: BTreeMap<Bucket, usize> = BTreeMap::new();
    for section in &page.sections {
        *bucket_counts.entry(section.bucket).or_default() += 1;
    }

    let has_type = |name: &str| page.schema_jsonld.iter().any(|b| b.has_type(name));

    StructureSummary {
        url: page.url.clone(),
        title: page.meta.title.clone(),
        meta_description: page.meta.description.clone(),
        canonical: page.meta.canonical.clone(),
        h1_count: page.headings.h1.len(),
        h2_count: page.headings.h2.len(),
        h3_count: page.headings.h3.len(),
        bucket_counts,
        word_count: page.word_count,
        internal_links_count: page.internal_links.len(),
        image_alt_count: page.image_alt_texts.len(),
        faq_count: page.faq_pairs.len(),
        has_faq_schema: has_type("FAQPage"),
        has_org_schema: has_type("Organization"),
        has_localbiz_schema: page
            .schema_jsonld
            .iter()
            .any(|b| b.has_any_type(LOCALBIZ_TYPES)),
    }
}

/// Mean counts and schema shares across competitor summaries, rounded to two
/// decimals. Boolean fields become the share of competitors carrying them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompetitorAverage {
    pub h1_count: f64,
    pub h2_count: f64,
    pub h3_count: f64,
    pub word_count: f64,
    pub internal_links_count: f64,
    pub image_alt_count: f64,
    pub faq_count: f64,
    pub has_faq_schema: f64,
    pub has_org_schema: f64,
    pub has_localbiz_schema: f64,
    pub bucket_counts_avg: BTreeMap<Bucket, f64>,
}

pub fn competitor_average(summaries: &[StructureSummary]) -> CompetitorAverage {
    if summaries.is_empty() {
        return CompetitorAverage::default();
    }
    let n = summaries.len() as f64;
    let mean = |f: fn(&StructureSummary) -> f64| round2(summaries.iter().map(f).sum::<f64>() / n);

    let mut bucket_totals: BTreeMap<Bucket, usize> = BTreeMap::new();
    for summary in summaries {
        for (bucket, count) in &summary.bucket_counts {
            *bucket_totals.entry(*bucket).or_default() += count;
        }
    }
    let bucket_counts_avg = bucket_totals
        .into_iter()
        .map(|(bucket, total)| (bucket, round2(total as f64 / n)))
        .collect();

    CompetitorAverage {
        h1_count: mean(|s| s.h1_count as f64),
        h2_count: mean(|s| s.h2_count as f64),
        h3_count: mean(|s| s.h3_count as f64),
        word_count: mean(|s| s.word_count as f64),
        internal_links_count: mean(|s| s.internal_links_count as f64),
        image_alt_count: mean(|s| s.image_alt_count as f64),
        faq_count: mean(|s| s.faq_count as f64),
        has_faq_schema: mean(|s| s.has_faq_schema as u8 as f64),
        has_org_schema: mean(|s| s.has_org_schema as u8 as f64),
        has_localbiz_schema: mean(|s| s.has_localbiz_schema as u8 as f64),
        bucket_counts_avg,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Gap {
    pub gap_type: String,
    pub gap: String,
    pub why_it_matters: String,
    pub recommended_action: String,
    pub competitor_avg: Option<f64>,
    pub yours: Option<f64>,
    pub confidence: String,
}

/// Deterministic, rule-based gap table: structural bucket gaps, technical
/// schema gaps and content-depth gaps, each against the competitor average.
pub fn identify_gaps(yours: &Page, competitors: &[Page]) -> Vec<Gap> {
    let your_sum = summarize_structure(yours);
    let comp_sums: Vec<StructureSummary> = competitors.iter().map(summarize_structure).collect();
    let comp_avg = competitor_average(&comp_sums);

    let mut gaps = Vec::new();

    for (bucket, avg_count) in &comp_avg.bucket_counts_avg {
        let your_count = your_sum.bucket_counts.get(bucket).copied().unwrap_or(0);
        if *avg_count >= BUCKET_PRESENCE_AVG && your_count == 0 && *bucket != Bucket::Other {
            gaps.push(Gap {
                gap_type: "Structural".to_string(),
                gap: format!("Missing section bucket: {}", bucket),
                why_it_matters: "Competitors commonly include this section; it often improves \
                                 relevance, trust, or conversions."
                    .to_string(),
                recommended_action: action_for_bucket(*bucket).to_string(),
                competitor_avg: Some(*avg_count),
                yours: Some(your_count as f64),
                confidence: "High".to_string(),
            });
        }
    }

    let schema_checks: [(f64, bool, &str); 3] = [
        (comp_avg.has_faq_schema, your_sum.has_faq_schema, "FAQ schema"),
        (comp_avg.has_org_schema, your_sum.has_org_schema, "Organization schema"),
        (
            comp_avg.has_localbiz_schema,
            your_sum.has_localbiz_schema,
            "LocalBusiness/Service schema",
        ),
    ];
    for (share, yours_has, label) in schema_checks {
        if share >= SCHEMA_PRESENCE_SHARE && !yours_has {
            gaps.push(Gap {
                gap_type: "Technical".to_string(),
                gap: format!("Missing {}", label),
                why_it_matters: "If most competitors implement it, adding it can strengthen \
                                 entity signals and eligibility for rich results (where \
                                 applicable)."
                    .to_string(),
                recommended_action: format!(
                    "Add {} in JSON-LD (validate with Schema.org validator).",
                    label
                ),
                competitor_avg: Some(share),
                yours: Some(if yours_has { 1.0 } else { 0.0 }),
                confidence: "High".to_string(),
            });
        }
    }

    let depth_checks: [(f64, f64, &str, &str); 3] = [
        (
            your_sum.word_count as f64,
            comp_avg.word_count,
            "Content depth (word count)",
            "Expand content with niche-relevant explanations, processes, and location intent.",
        ),
        (
            your_sum.internal_links_count as f64,
            comp_avg.internal_links_count,
            "Internal links",
            "Add relevant internal links to supporting service pages, location pages, and proof \
             pages (reviews/case studies).",
        ),
        (
            your_sum.faq_count as f64,
            comp_avg.faq_count,
            "FAQ coverage",
            "Add 4-8 FAQs matching high-intent queries (pricing, timeline, emergency, insurance, \
             service areas).",
        ),
    ];
    for (your_v, comp_v, label, action) in depth_checks {
        if comp_v > 0.0 && your_v < comp_v * DEPTH_RATIO {
            gaps.push(Gap {
                gap_type: "Depth".to_string(),
                gap: format!("Below competitor average: {}", label),
                why_it_matters: "Competitors provide more supporting content; this often \
                                 correlates with better topical coverage and rankings."
                    .to_string(),
                recommended_action: action.to_string(),
                competitor_avg: Some(comp_v),
                yours: Some(your_v),
                confidence: "Medium".to_string(),
            });
        }
    }

    if gaps.is_empty() {
        gaps.push(Gap {
            gap_type: "None detected (basic)".to_string(),
            gap: "No major structural/technical gaps detected by baseline rules.".to_string(),
            why_it_matters: "This baseline is rule-based; consider adding keyword/intent gaps \
                             for deeper results."
                .to_string(),
            recommended_action: "Add keyword + intent gap module (density + semantic phrases)."
                .to_string(),
            competitor_avg: None,
            yours: None,
            confidence: String::new(),
        });
    }
    gaps
}

fn action_for_bucket(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::AboutTeam => {
            "Add an About/Team section. Include credentials, experience, approach, and photos. \
             Use niche + location terms naturally."
        }
        Bucket::Testimonials => {
            "Add Reviews/Testimonials. Include short snippets, star ratings (without review \
             schema abuse), and outcomes."
        }
        Bucket::Services => {
            "Add a Services/What We Offer section with clear sub-services and internal links to \
             dedicated pages."
        }
        Bucket::Faq => {
            "Add an FAQ section and expand accordions. Target long-tail questions users search \
             before booking."
        }
        Bucket::Pricing => {
            "Add Pricing/Fees guidance (even ranges) + what affects price. Users and Google love \
             clarity."
        }
        Bucket::WhyChooseUs => {
            "Add Why Choose Us with 5-7 differentiators tied to outcomes, trust, and process."
        }
        Bucket::Contact => {
            "Improve conversion block: clear CTA, phone, booking link, service area coverage, \
             opening hours (if relevant)."
        }
        Bucket::Other => "Add/Improve this section based on competitor patterns and search intent.",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordStat {
    pub keyword: String,
    pub count: usize,
    pub density_pct: f64,
}

/// Phrase counts over stopword-filtered token text, in input order.
pub fn keyword_density(text: &str, keywords: &[String]) -> Vec<KeywordStat> {
    let tokens = tokenize(text);
    let total = tokens.len().max(1);
    let joined = tokens.join(" ");

    keywords
        .iter()
        .filter_map(|keyword| {
            let needle = normalize_ws_lower(keyword);
            if needle.is_empty() {
                return None;
            }
            let count = joined.matches(&needle).count();
            Some(KeywordStat {
                keyword: keyword.clone(),
                count,
                density_pct: round4(count as f64 / total as f64 * 100.0),
            })
        })
        .collect()
}

/// Most frequent tokens across competitor text; count-descending with an
/// alphabetical tie-break so output is stable run to run.
pub fn semantic_terms(competitors: &[Page], top_n: usize) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for page in competitors {
        for token in tokenize(&page.raw_text) {
            *counts.entry(token).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .take(top_n)
        .collect()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{FaqPair, Headings, PageMeta, SchemaBlock, Section};
    use serde_json::json;

    fn page(sections: Vec<(&str, Bucket)>, word_count: usize, schema: Vec<SchemaBlock>) -> Page {
        Page {
            url: "https://site.com/".to_string(),
            meta: PageMeta::default(),
            headings: Headings::default(),
            sections: sections
                .into_iter()
                .map(|(heading, bucket)| Section {
                    level: 2,
                    heading: heading.to_string(),
                    text: "body text long enough to matter for comparisons".to_string(),
                    bucket,
                })
                .collect(),
            schema_jsonld: schema,
            internal_links: Vec::new(),
            image_alt_texts: Vec::new(),
            faq_pairs: vec![FaqPair {
                question: "q".to_string(),
                answer: "a".to_string(),
            }],
            raw_text: String::new(),
            word_count,
        }
    }

    fn faq_schema() -> SchemaBlock {
        SchemaBlock::Parsed(json!({"@type": "FAQPage"}))
    }

    #[test]
    fn structural_gap_fires_for_common_missing_bucket() {
        let yours = page(vec![("Our Services", Bucket::Services)], 1000, vec![faq_schema()]);
        let competitors = vec![
            page(
                vec![("Our Services", Bucket::Services), ("Meet Our Team", Bucket::AboutTeam)],
                1000,
                vec![faq_schema()],
            ),
            page(vec![("Meet the Dentists", Bucket::AboutTeam)], 1000, vec![faq_schema()]),
        ];
        let gaps = identify_gaps(&yours, &competitors);
        assert!(gaps
            .iter()
            .any(|g| g.gap_type == "Structural" && g.gap.contains("about_team")));
        // Services is present on your page, so no gap for it.
        assert!(!gaps.iter().any(|g| g.gap.contains("services")));
    }

    #[test]
    fn other_bucket_never_flags_a_gap() {
        let yours = page(vec![], 1000, vec![faq_schema()]);
        let competitors = vec![page(vec![("Misc", Bucket::Other)], 1000, vec![faq_schema()])];
        let gaps = identify_gaps(&yours, &competitors);
        assert!(!gaps.iter().any(|g| g.gap.contains("other")));
    }

    #[test]
    fn technical_gap_fires_when_most_competitors_have_schema() {
        let yours = page(vec![], 1000, vec![]);
        let competitors = vec![
            page(vec![], 1000, vec![faq_schema()]),
            page(vec![], 1000, vec![faq_schema()]),
            page(vec![], 1000, vec![]),
        ];
        let gaps = identify_gaps(&yours, &competitors);
        assert!(gaps
            .iter()
            .any(|g| g.gap_type == "Technical" && g.gap.contains("FAQ schema")));
    }

    #[test]
    fn depth_gap_fires_below_two_thirds_of_average() {
        let yours = page(vec![], 500, vec![faq_schema()]);
        let competitors = vec![page(vec![], 1000, vec![faq_schema()])];
        let gaps = identify_gaps(&yours, &competitors);
        assert!(gaps
            .iter()
            .any(|g| g.gap_type == "Depth" && g.gap.contains("word count")));
    }

    #[test]
    fn placeholder_row_when_nothing_fires() {
        let yours = page(vec![("Meet Our Team", Bucket::AboutTeam)], 1000, vec![faq_schema()]);
        let competitors = vec![page(
            vec![("Meet Our Team", Bucket::AboutTeam)],
            1000,
            vec![faq_schema()],
        )];
        let gaps = identify_gaps(&yours, &competitors);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].gap_type, "None detected (basic)");
        assert!(gaps[0].competitor_avg.is_none());
    }

    #[test]
    fn averages_round_to_two_decimals() {
        let summaries: Vec<StructureSummary> = [
            page(vec![], 100, vec![faq_schema()]),
            page(vec![], 101, vec![]),
            page(vec![], 101, vec![]),
        ]
        .iter()
        .map(summarize_structure)
        .collect();
        let avg = competitor_average(&summaries);
        assert_eq!(avg.word_count, 100.67);
        assert_eq!(avg.has_faq_schema, 0.33);
    }

    #[test]
    fn keyword_density_counts_phrases() {
        let text = "Dental implants restore smiles. Dental implants last decades.";
        let stats = keyword_density(text, &["dental implants".to_string(), "".to_string()]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].count, 2);
        // all 8 tokens survive the stopword filter
        assert_eq!(stats[0].density_pct, 25.0);
    }

    #[test]
    fn semantic_terms_are_deterministic() {
        let mut a = page(vec![], 0, vec![]);
        a.raw_text = "implants implants crowns veneers crowns braces".to_string();
        let terms = semantic_terms(&[a], 3);
        assert_eq!(
            terms,
            vec![
                ("crowns".to_string(), 2),
                ("implants".to_string(), 2),
                ("braces".to_string(), 1),
            ]
        );
    }
}
