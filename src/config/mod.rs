//! Configuration module for Site-Discovery
//!
//! This module handles the per-call [`ExtractionRequest`] as well as loading,
//! parsing, and validating optional TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use site_discovery::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("discovery.toml")).unwrap();
//! println!("Will discover at most {} URLs", config.extraction.max_urls);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, ExtractionRequest, ExtractionSettings, OutputSettings, DEFAULT_DELAY_MS,
    DEFAULT_MAX_URLS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate_request, DELAY_MS_RANGE, MAX_URLS_RANGE, TIMEOUT_SECS_RANGE};
