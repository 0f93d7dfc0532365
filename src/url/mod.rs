//! URL handling module for Site-Discovery
//!
//! This module provides seed normalization, host comparison, the shared
//! domain/robots admission filter, and the private-network guard.

mod domain;
mod normalize;
mod ssrf;

pub use domain::{extract_domain, same_site, strip_www, DomainFilter};
pub use normalize::{normalize_seed, origin_of, without_fragment};
pub use ssrf::{check_target, check_target_within, is_restricted_ip, is_safe_discovered_target};
