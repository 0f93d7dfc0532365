//! Output module for rendering extraction reports
//!
//! This module handles:
//! - Bundling a result with its optional page categories
//! - Rendering as plain text, JSON, or a markdown report
//! - Writing the rendered report to a file

mod markdown;

pub use markdown::format_markdown_report;

use crate::categorize::{categorize_urls, PageCategory};
use crate::state::{ExtractionResult, UrlSource};
use crate::DiscoveryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Report formats
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Short header followed by one URL per line
    #[default]
    Text,
    /// Pretty-printed JSON document
    Json,
    /// Markdown report
    Markdown,
}

/// One extraction result plus everything rendered alongside it
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    #[serde(flatten)]
    pub result: ExtractionResult,

    /// Page categories, when categorization was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<BTreeMap<PageCategory, Vec<String>>>,

    /// SHA-256 of the config file the run was configured from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,
}

impl ExtractionReport {
    pub fn new(result: ExtractionResult) -> Self {
        Self {
            result,
            categories: None,
            config_hash: None,
        }
    }

    /// Categorizes the result's URLs into the report
    pub fn with_categories(mut self) -> Self {
        self.categories = Some(categorize_urls(&self.result.urls));
        self
    }

    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }
}

/// Renders a report in the requested format
pub fn render(report: &ExtractionReport, format: OutputFormat) -> Result<String, DiscoveryError> {
    match format {
        OutputFormat::Text => Ok(format_text_report(report)),
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| DiscoveryError::Output(format!("Failed to serialize report: {}", e))),
        OutputFormat::Markdown => Ok(format_markdown_report(report)),
    }
}

/// Renders a report and writes it to `output_path`
pub fn write_report(
    report: &ExtractionReport,
    format: OutputFormat,
    output_path: &Path,
) -> Result<(), DiscoveryError> {
    let rendered = render(report, format)?;

    let mut file = File::create(output_path)?;
    file.write_all(rendered.as_bytes())?;

    Ok(())
}

fn format_text_report(report: &ExtractionReport) -> String {
    let result = &report.result;
    let mut out = String::new();

    out.push_str(&format!("# {}\n", result.base_url));
    out.push_str(&format!(
        "# {} URLs ({} sitemap, {} crawl){}\n",
        result.total_urls,
        result.source_count(UrlSource::Sitemap),
        result.source_count(UrlSource::Crawl),
        if result.partial { ", partial" } else { "" }
    ));

    for url in &result.urls {
        out.push_str(url);
        out.push('\n');
    }

    if let Some(categories) = &report.categories {
        for (category, urls) in categories {
            out.push_str(&format!("\n# {} ({})\n", category, urls.len()));
            for url in urls {
                out.push_str(url);
                out.push('\n');
            }
        }
    }

    out
}
