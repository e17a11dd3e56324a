//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::UtilConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<UtilConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<UtilConfig, ConfigError> {
    let config: UtilConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TrustMode;
    use crate::http::body::ContentTypeMatch;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.forwarded.trust, TrustMode::Always);
        assert!(config.forwarded.trusted_proxies.is_empty());
        assert_eq!(config.body.content_type_match, ContentTypeMatch::Exact);
        assert_eq!(config.body.max_bytes, 10 * 1024 * 1024);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_full_document() {
        let config = parse_config(
            r#"
            [server]
            bind_address = "0.0.0.0:9000"

            [forwarded]
            trust = "peers"
            trusted_proxies = ["10.0.0.1", "10.0.0.2"]

            [body]
            content_type_match = "essence"
            max_bytes = 4096

            [observability]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind_address, "0.0.0.0:9000");
        assert_eq!(config.forwarded.trust, TrustMode::Peers);
        assert_eq!(config.forwarded.trusted_proxies.len(), 2);
        assert_eq!(config.body.content_type_match, ContentTypeMatch::Essence);
        assert_eq!(config.body.max_bytes, 4096);
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[forwarded]\ntrust = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error() {
        let err = parse_config("[body]\nmax_bytes = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert_eq!(
            err.to_string(),
            "invalid config: body.max_bytes must be greater than zero"
        );
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/web-util.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
