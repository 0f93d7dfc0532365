//! Robots.txt parser implementation
//!
//! A line scanner that tracks the active `User-agent` group and keeps only
//! the directives that apply to the configured user agent.

use std::time::Duration;

/// Robots directives that apply to one user agent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsRules {
    /// Disallowed path prefixes, in file order, without duplicates
    pub disallowed: Vec<String>,

    /// Sitemap URLs as written in the file
    pub sitemaps: Vec<String>,

    /// Largest applicable `Crawl-delay`, in whole seconds
    pub crawl_delay_secs: Option<u64>,
}

impl RobotsRules {
    /// Parses robots.txt content for a specific user agent
    ///
    /// # Group Rules
    ///
    /// - Consecutive `User-agent:` lines form one group
    /// - A group applies if any of its agents is `*` or a case-insensitive
    ///   substring of `user_agent`
    /// - `Disallow:`, `Sitemap:` and `Crawl-delay:` are kept only inside
    ///   applicable groups; `Sitemap:` lines before the first group are kept
    ///   as well
    /// - Empty `Disallow:` values and non-integer `Crawl-delay:` values are
    ///   ignored
    ///
    /// # Example
    ///
    /// ```
    /// use site_discovery::robots::RobotsRules;
    ///
    /// let rules = RobotsRules::parse("User-agent: *\nDisallow: /admin/\n", "MyBot/1.0");
    /// assert_eq!(rules.disallowed, vec!["/admin/".to_string()]);
    /// ```
    pub fn parse(content: &str, user_agent: &str) -> Self {
        let mut rules = Self::default();
        let agent = user_agent.to_lowercase();

        let mut group: Vec<String> = Vec::new();
        let mut collecting_agents = false;
        let mut seen_group = false;

        for line in content.lines() {
            // Strip comments
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let (key, value) = match line.split_once(':') {
                Some((key, value)) => (key.trim().to_lowercase(), value.trim()),
                None => continue,
            };

            if key == "user-agent" {
                if !collecting_agents {
                    group.clear();
                }
                group.push(value.to_lowercase());
                collecting_agents = true;
                seen_group = true;
                continue;
            }

            collecting_agents = false;
            let applies = group
                .iter()
                .any(|ua| ua == "*" || (!ua.is_empty() && agent.contains(ua.as_str())));

            match key.as_str() {
                "disallow" if applies => {
                    if !value.is_empty() && !rules.disallowed.iter().any(|d| d == value) {
                        rules.disallowed.push(value.to_string());
                    }
                }
                "sitemap" if applies || !seen_group => {
                    if !value.is_empty() {
                        rules.sitemaps.push(value.to_string());
                    }
                }
                "crawl-delay" if applies => {
                    if let Ok(secs) = value.parse::<u64>() {
                        rules.crawl_delay_secs =
                            Some(rules.crawl_delay_secs.map_or(secs, |d| d.max(secs)));
                    }
                }
                _ => {}
            }
        }

        rules
    }

    /// Crawl delay as a duration, if one applies
    pub fn crawl_delay(&self) -> Option<Duration> {
        self.crawl_delay_secs
            .map(|secs| Duration::from_millis(secs.saturating_mul(1000)))
    }
}
