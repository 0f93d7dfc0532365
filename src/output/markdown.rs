//! Markdown report generation
//!
//! This module renders an extraction report as human-readable markdown,
//! including run information, the source breakdown, page categories and the
//! discovered URLs.

use crate::output::ExtractionReport;
use crate::state::UrlSource;

/// Longest URL list printed in full
const URL_LIST_LIMIT: usize = 500;

/// Formats an extraction report as markdown
///
/// # Arguments
///
/// * `report` - The extraction report
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(report: &ExtractionReport) -> String {
    let result = &report.result;
    let mut md = String::new();

    // Title
    md.push_str("# Site Discovery Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Site**: {}\n", result.base_url));
    md.push_str(&format!(
        "- **Extracted**: {}\n",
        result.extracted_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Duration**: {} ms ({:.2} seconds)\n",
        result.elapsed_ms,
        result.elapsed_ms as f64 / 1000.0
    ));
    md.push_str(&format!(
        "- **Status**: {}\n",
        if result.partial { "partial" } else { "complete" }
    ));
    if let Some(hash) = &report.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total URLs**: {}\n", result.total_urls));
    md.push_str(&format!(
        "- **robots.txt**: {}\n",
        if result.robots_found { "found" } else { "not found" }
    ));
    md.push_str(&format!(
        "- **Sitemap**: {}\n\n",
        if result.sitemap_found { "found" } else { "not found" }
    ));

    // Source breakdown
    md.push_str("## Source Breakdown\n\n");
    md.push_str("| Source | URLs |\n");
    md.push_str("|--------|------|\n");
    for source in [UrlSource::Sitemap, UrlSource::Crawl] {
        md.push_str(&format!("| {} | {} |\n", source, result.source_count(source)));
    }
    md.push('\n');

    // Categories
    if let Some(categories) = &report.categories {
        md.push_str("## Page Categories\n\n");
        if categories.is_empty() {
            md.push_str("No categorized pages.\n\n");
        }
        for (category, urls) in categories {
            md.push_str(&format!("### {} ({})\n\n", category, urls.len()));
            for url in urls {
                md.push_str(&format!("- {}\n", url));
            }
            md.push('\n');
        }
    }

    // URL list
    if !result.urls.is_empty() {
        md.push_str("## Discovered URLs\n\n");
        for url in result.urls.iter().take(URL_LIST_LIMIT) {
            md.push_str(&format!("- {}\n", url));
        }
        if result.urls.len() > URL_LIST_LIMIT {
            md.push_str(&format!(
                "\n... and {} more\n",
                result.urls.len() - URL_LIST_LIMIT
            ));
        }
        md.push('\n');
    }

    md
}
