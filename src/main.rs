use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use seogap::analyze;
use seogap::fetch::{HttpClient, RateGate, DEFAULT_TIMEOUT_SECS};
use seogap::{parser, Page};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

const DEFAULT_DELAY_MS: u64 = 1000;

#[derive(Parser)]
#[command(name = "seogap", about = "SEO content gap analyzer (competitors vs yours)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one page and print its JSON model
    Extract {
        /// Page URL (http/https)
        #[arg(long)]
        url: String,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Compare your page against competitor pages
    Analyze {
        /// Your page URL
        #[arg(long)]
        url: String,
        /// Competitor page URL (repeatable)
        #[arg(short = 'c', long = "competitor", required = true)]
        competitors: Vec<String>,
        /// Target keyword for density reporting (repeatable)
        #[arg(short = 'k', long = "keyword")]
        keywords: Vec<String>,
        /// Minimum delay between outbound requests, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
        /// How many competitor terms to list
        #[arg(long, default_value = "20")]
        terms: usize,
    },
}

struct Settings {
    timeout_secs: u64,
    min_delay_ms: Option<u64>,
}

fn load_settings() -> Settings {
    let config = Config::builder()
        .add_source(config::Environment::with_prefix("SEOGAP"))
        .build()
        .unwrap_or_default();
    Settings {
        timeout_secs: config
            .get_int("timeout_secs")
            .ok()
            .map(|v| v as u64)
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
        min_delay_ms: config.get_int("min_delay_ms").ok().map(|v| v as u64),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let settings = load_settings();
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { url, pretty } => {
            let client = HttpClient::new(Duration::from_secs(settings.timeout_secs))?;
            let page = seogap::fetch_page(&client, &url)?;
            let json = if pretty {
                serde_json::to_string_pretty(&page)?
            } else {
                serde_json::to_string(&page)?
            };
            println!("{json}");
            Ok(())
        }
        Commands::Analyze {
            url,
            competitors,
            keywords,
            delay_ms,
            terms,
        } => {
            let delay = delay_ms
                .or(settings.min_delay_ms)
                .unwrap_or(DEFAULT_DELAY_MS);
            let client = HttpClient::new(Duration::from_secs(settings.timeout_secs))?;
            run_analyze(&client, &url, &competitors, &keywords, delay, terms)
        }
    }
}

fn run_analyze(
    client: &HttpClient,
    your_url: &str,
    competitor_urls: &[String],
    keywords: &[String],
    delay_ms: u64,
    terms: usize,
) -> anyhow::Result<()> {
    let mut gate = RateGate::new(Duration::from_millis(delay_ms));

    // Phase 1: fetch sequentially, politely spaced. Your page is fatal on
    // failure; a competitor failure only drops that competitor.
    gate.wait();
    let your_html = client
        .fetch(your_url)
        .with_context(|| format!("failed to fetch your page {your_url}"))?;

    let pb = ProgressBar::new(competitor_urls.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} competitor pages")?
            .progress_chars("=> "),
    );

    let mut fetched: Vec<(String, String)> = Vec::new();
    for url in competitor_urls {
        gate.wait();
        match client.fetch(url) {
            Ok(html) => fetched.push((url.clone(), html)),
            Err(e) => warn!("skipping competitor {url}: {e}"),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if fetched.is_empty() {
        anyhow::bail!("no competitor page could be fetched");
    }

    // Phase 2: extract (CPU-bound, fetches are already done)
    let your_page = parser::extract_from_html(your_url, &your_html);
    let competitor_pages = extract_pages(fetched);
    info!(
        competitors = competitor_pages.len(),
        "extracted all pages"
    );

    print_summaries(&your_page, &competitor_pages);
    print_gaps(&analyze::identify_gaps(&your_page, &competitor_pages));
    if !keywords.is_empty() {
        print_density(&your_page, keywords);
    }
    print_semantic_terms(&competitor_pages, terms);
    Ok(())
}

#[cfg(feature = "rayon")]
fn extract_pages(fetched: Vec<(String, String)>) -> Vec<Page> {
    fetched
        .into_par_iter()
        .map(|(url, html)| parser::extract_from_html(&url, &html))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn extract_pages(fetched: Vec<(String, String)>) -> Vec<Page> {
    fetched
        .into_iter()
        .map(|(url, html)| parser::extract_from_html(&url, &html))
        .collect()
}

fn print_summaries(yours: &Page, competitors: &[Page]) {
    println!(
        "{:<44} | {:>6} | {:>8} | {:>5} | {:>4} | {:>4} | {:<5}",
        "Page", "Words", "Sections", "Links", "Alts", "FAQs", "Schema"
    );
    println!("{}", "-".repeat(96));
    for (label, page) in std::iter::once(("yours", yours))
        .chain(competitors.iter().map(|p| ("comp", p)))
    {
        let summary = analyze::summarize_structure(page);
        let mut schema_flags = String::new();
        if summary.has_faq_schema {
            schema_flags.push('F');
        }
        if summary.has_org_schema {
            schema_flags.push('O');
        }
        if summary.has_localbiz_schema {
            schema_flags.push('L');
        }
        println!(
            "{:<44} | {:>6} | {:>8} | {:>5} | {:>4} | {:>4} | {:<5}",
            truncate(&format!("[{label}] {}", page.url), 44),
            summary.word_count,
            page.sections.len(),
            summary.internal_links_count,
            summary.image_alt_count,
            summary.faq_count,
            schema_flags,
        );
    }
    println!();
}

fn print_gaps(gaps: &[analyze::Gap]) {
    println!(
        "{:<22} | {:<48} | {:>9} | {:>7} | {:<6}",
        "Type", "Gap", "Comp avg", "Yours", "Conf"
    );
    println!("{}", "-".repeat(104));
    for gap in gaps {
        println!(
            "{:<22} | {:<48} | {:>9} | {:>7} | {:<6}",
            truncate(&gap.gap_type, 22),
            truncate(&gap.gap, 48),
            fmt_opt(gap.competitor_avg),
            fmt_opt(gap.yours),
            gap.confidence,
        );
    }
    println!("\nRecommended actions:");
    for gap in gaps {
        println!("  - {}: {}", truncate(&gap.gap, 48), gap.recommended_action);
    }
    println!();
}

fn print_density(yours: &Page, keywords: &[String]) {
    println!("Keyword density (your page):");
    for stat in analyze::keyword_density(&yours.raw_text, keywords) {
        println!(
            "  {:<36} {:>5}x  {:>8.4}%",
            truncate(&stat.keyword, 36),
            stat.count,
            stat.density_pct
        );
    }
    println!();
}

fn print_semantic_terms(competitors: &[Page], top_n: usize) {
    let terms = analyze::semantic_terms(competitors, top_n);
    if terms.is_empty() {
        return;
    }
    println!("Top competitor terms:");
    for (term, count) in terms {
        println!("  {:<28} {:>5}", term, count);
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".into())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
