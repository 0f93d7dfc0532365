//! Private-network guard
//!
//! Refuses seeds that resolve into loopback, link-local, RFC1918 or IPv6
//! unique-local space. A failed DNS lookup is not a rejection: the
//! subsequent request fails on its own.

use crate::DiscoveryError;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;
use url::{Host, Url};

/// Upper bound on the guard's own DNS lookup
const DNS_TIMEOUT: Duration = Duration::from_secs(10);

/// Checks that a normalized URL does not target private network space
///
/// # Returns
///
/// * `Ok(())` - The target is public, or its name could not be resolved
/// * `Err(DiscoveryError::UnsafeTarget)` - The target is private
pub async fn check_target(url: &Url) -> Result<(), DiscoveryError> {
    check_target_within(url, DNS_TIMEOUT).await
}

/// Like [`check_target`], with the DNS lookup bounded by `budget` as well
///
/// A lookup that outlives the budget counts as a failed lookup and defers.
pub async fn check_target_within(url: &Url, budget: Duration) -> Result<(), DiscoveryError> {
    let host = match url.host() {
        Some(host) => host,
        None => {
            return Err(DiscoveryError::InvalidInput(
                "Missing host in URL".to_string(),
            ))
        }
    };

    match host {
        Host::Ipv4(ip) => reject_if_restricted(&ip.to_string(), IpAddr::V4(ip)),
        Host::Ipv6(ip) => reject_if_restricted(&ip.to_string(), IpAddr::V6(ip)),
        Host::Domain(name) => {
            let port = url.port_or_known_default().unwrap_or(443);
            check_domain(name, port, budget.min(DNS_TIMEOUT)).await
        }
    }
}

/// Vets a URL the site itself pointed at before anything fetches it
///
/// URLs on `trusted_host` were checked along with the seed. Any other host
/// is checked afresh; a rejection is logged and yields false.
pub async fn is_safe_discovered_target(url: &Url, trusted_host: &str, budget: Duration) -> bool {
    match url.host_str() {
        Some(host) if host.eq_ignore_ascii_case(trusted_host) => return true,
        Some(_) => {}
        None => return false,
    }

    match check_target_within(url, budget).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Refusing to fetch {}: {}", url, e);
            false
        }
    }
}

async fn check_domain(name: &str, port: u16, timeout: Duration) -> Result<(), DiscoveryError> {
    if name.trim_end_matches('.').eq_ignore_ascii_case("localhost") {
        return Err(DiscoveryError::UnsafeTarget {
            host: name.to_string(),
            reason: "localhost is not allowed".to_string(),
        });
    }

    let lookup = tokio::time::timeout(timeout, tokio::net::lookup_host((name, port))).await;
    let addrs = match lookup {
        Ok(Ok(addrs)) => addrs,
        Ok(Err(e)) => {
            tracing::debug!("DNS lookup for {} failed ({}); deferring to request", name, e);
            return Ok(());
        }
        Err(_) => {
            tracing::debug!("DNS lookup for {} timed out; deferring to request", name);
            return Ok(());
        }
    };

    for addr in addrs {
        reject_if_restricted(name, addr.ip())?;
    }

    Ok(())
}

fn reject_if_restricted(host: &str, ip: IpAddr) -> Result<(), DiscoveryError> {
    if is_restricted_ip(ip) {
        return Err(DiscoveryError::UnsafeTarget {
            host: host.to_string(),
            reason: format!("resolves to restricted address {}", ip),
        });
    }
    Ok(())
}

/// Returns true for addresses a public-facing fetcher must never contact
pub fn is_restricted_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_restricted_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_restricted_v4(v4),
            None => is_restricted_v6(v6),
        },
    }
}

fn is_restricted_v4(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        // 224.0.0.0/24, link-local multicast
        || (octets[0] == 224 && octets[1] == 0 && octets[2] == 0)
}

fn is_restricted_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        // fe80::/10
        || (first & 0xffc0) == 0xfe80
        // ff02::/16
        || (first & 0xff0f) == 0xff02
        // fc00::/7
        || (first & 0xfe00) == 0xfc00
}
