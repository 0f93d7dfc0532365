//! Crawler module for page fetching and traversal
//!
//! This module contains the network side of an extraction, including:
//! - HTTP fetching under a hard body cap
//! - Canonical redirect resolution
//! - HTML link extraction
//! - Breadth-first crawl scheduling with a politeness delay
//! - Overall extraction coordination

mod coordinator;
mod deadline;
mod fetcher;
mod parser;
mod redirect;
mod scheduler;

pub use coordinator::{extract_urls, Extractor};
pub use deadline::Deadline;
pub use fetcher::{build_http_client, fetch_url, FetchedPage, MAX_BODY_BYTES, MAX_REDIRECTS};
pub use parser::extract_links;
pub use redirect::{resolve_canonical, Resolution};
pub use scheduler::{CrawlOutcome, CrawlStop, Scheduler};
