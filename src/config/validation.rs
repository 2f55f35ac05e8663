//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees. Validation is a
//! pure function over `ProxyConfig` and reports every violation it finds,
//! not just the first.

use url::Url;

use crate::config::schema::ProxyConfig;

const KNOWN_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic violation in the configuration.
#[derive(Debug)]
pub enum ValidationError {
    /// The upstream base URL did not parse.
    InvalidUpstreamUrl(String),
    /// The upstream base URL uses a scheme other than http/https.
    UnsupportedScheme(String),
    /// The request timeout is zero.
    ZeroTimeout,
    /// The outbound connection limit is zero.
    ZeroConnectionLimit,
    /// More idle connections configured than the concurrency cap allows.
    IdleExceedsMax { idle: usize, max: usize },
    /// The configured log level is not one tracing understands.
    UnknownLogLevel(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidUpstreamUrl(e) => {
                write!(f, "upstream base_url is not a valid URL: {}", e)
            }
            ValidationError::UnsupportedScheme(s) => {
                write!(f, "upstream base_url scheme '{}' is not http or https", s)
            }
            ValidationError::ZeroTimeout => write!(f, "request_timeout_secs must be greater than 0"),
            ValidationError::ZeroConnectionLimit => {
                write!(f, "max_connections must be greater than 0")
            }
            ValidationError::IdleExceedsMax { idle, max } => write!(
                f,
                "max_idle_connections ({}) exceeds max_connections ({})",
                idle, max
            ),
            ValidationError::UnknownLogLevel(l) => write!(f, "unknown log level '{}'", l),
        }
    }
}

/// Validate a configuration, collecting all semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.upstream.base_url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
            }
        }
        Err(e) => errors.push(ValidationError::InvalidUpstreamUrl(e.to_string())),
    }

    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.upstream.max_connections == 0 {
        errors.push(ValidationError::ZeroConnectionLimit);
    }
    if config.upstream.max_idle_connections > config.upstream.max_connections {
        errors.push(ValidationError::IdleExceedsMax {
            idle: config.upstream.max_idle_connections,
            max: config.upstream.max_connections,
        });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !KNOWN_LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(level));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
