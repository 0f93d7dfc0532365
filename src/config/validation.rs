use crate::config::types::{Config, ExtractionRequest, ExtractionSettings};
use crate::ConfigError;
use std::ops::RangeInclusive;

/// Accepted range for the URL cap
pub const MAX_URLS_RANGE: RangeInclusive<usize> = 1..=10_000;

/// Accepted range for the overall timeout (seconds)
pub const TIMEOUT_SECS_RANGE: RangeInclusive<u64> = 1..=600;

/// Accepted range for the inter-request delay (milliseconds)
pub const DELAY_MS_RANGE: RangeInclusive<u64> = 0..=5_000;

/// Validates the entire configuration file
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_extraction_settings(&config.extraction)?;
    Ok(())
}

/// Validates the `[extraction]` section
fn validate_extraction_settings(settings: &ExtractionSettings) -> Result<(), ConfigError> {
    check_max_urls(settings.max_urls)?;
    check_timeout_secs(settings.timeout_secs)?;
    check_delay_ms(settings.delay_ms)?;
    check_user_agent(&settings.user_agent)?;
    Ok(())
}

/// Validates a single extraction request
pub fn validate_request(request: &ExtractionRequest) -> Result<(), ConfigError> {
    check_max_urls(request.max_urls)?;
    // Sub-second timeouts round down to zero and are rejected with the rest.
    check_timeout_secs(request.timeout.as_secs())?;
    check_delay_ms(request.delay_ms)?;
    check_user_agent(&request.user_agent)?;
    Ok(())
}

fn check_max_urls(max_urls: usize) -> Result<(), ConfigError> {
    if !MAX_URLS_RANGE.contains(&max_urls) {
        return Err(ConfigError::Validation(format!(
            "max_urls must be between {} and {}, got {}",
            MAX_URLS_RANGE.start(),
            MAX_URLS_RANGE.end(),
            max_urls
        )));
    }
    Ok(())
}

fn check_timeout_secs(timeout_secs: u64) -> Result<(), ConfigError> {
    if !TIMEOUT_SECS_RANGE.contains(&timeout_secs) {
        return Err(ConfigError::Validation(format!(
            "timeout must be between {}s and {}s, got {}s",
            TIMEOUT_SECS_RANGE.start(),
            TIMEOUT_SECS_RANGE.end(),
            timeout_secs
        )));
    }
    Ok(())
}

fn check_delay_ms(delay_ms: u64) -> Result<(), ConfigError> {
    if !DELAY_MS_RANGE.contains(&delay_ms) {
        return Err(ConfigError::Validation(format!(
            "delay_ms must be between {}ms and {}ms, got {}ms",
            DELAY_MS_RANGE.start(),
            DELAY_MS_RANGE.end(),
            delay_ms
        )));
    }
    Ok(())
}

/// User agents end up in a request header, so control characters are refused
fn check_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user_agent contains control characters: {:?}",
            user_agent
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_request_is_valid() {
        let request = ExtractionRequest::new("example.com");
        assert!(validate_request(&request).is_ok());
    }

    #[test]
    fn test_max_urls_bounds() {
        assert!(check_max_urls(1).is_ok());
        assert!(check_max_urls(10_000).is_ok());
        assert!(check_max_urls(0).is_err());
        assert!(check_max_urls(10_001).is_err());
    }

    #[test]
    fn test_timeout_bounds() {
        let request = ExtractionRequest::new("example.com").with_timeout(Duration::from_secs(600));
        assert!(validate_request(&request).is_ok());

        let request = ExtractionRequest::new("example.com").with_timeout(Duration::from_secs(601));
        assert!(validate_request(&request).is_err());

        let request =
            ExtractionRequest::new("example.com").with_timeout(Duration::from_millis(500));
        assert!(validate_request(&request).is_err());
    }

    #[test]
    fn test_delay_bounds() {
        assert!(check_delay_ms(0).is_ok());
        assert!(check_delay_ms(5_000).is_ok());
        assert!(check_delay_ms(5_001).is_err());
    }

    #[test]
    fn test_user_agent_validation() {
        assert!(check_user_agent("MyBot/1.0").is_ok());
        assert!(check_user_agent("").is_err());
        assert!(check_user_agent("   ").is_err());
        assert!(check_user_agent("Bot\r\nX-Injected: 1").is_err());
    }

    #[test]
    fn test_validate_config_file_settings() {
        let mut config = Config::default();
        assert!(validate(&config).is_ok());

        config.extraction.max_urls = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}
