//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Read a TOML file into a configuration.
///
/// Missing sections and keys fall back to their defaults. The result is not
/// validated yet, since command-line overrides are applied on top of it.
pub fn read_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_file() {
        let file = write_temp(
            r#"
            [listener]
            bind_address = "127.0.0.1:9090"
            mount = "/status"

            [backend]
            base_uri = "https://10.0.0.5:8501"
            ca_certificate = "/etc/consul/ca.pem"

            [timeouts]
            connect_secs = 2
            request_secs = 10

            [observability]
            debug = true
            "#,
        );

        let config = read_config(file.path()).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9090");
        assert_eq!(config.listener.mount, "/status");
        assert_eq!(config.backend.ca_certificate.as_deref(), Some("/etc/consul/ca.pem"));
        assert_eq!(config.timeouts.connect_secs, 2);
        assert!(config.observability.debug);
        assert_eq!(config.limits.max_body_bytes, 8 * 1024 * 1024);
    }

    #[test]
    fn test_missing_file() {
        let err = read_config(Path::new("/nonexistent/strongbox.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let file = write_temp("[listener\nbind_address = 1");
        let err = read_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error: "));
    }

    #[test]
    fn test_read_does_not_validate() {
        let file = write_temp("[listener]\nmount = \"status\"\n");
        let config = read_config(file.path()).unwrap();
        assert_eq!(config.listener.mount, "status");
    }

    #[test]
    fn test_validation_error_lists_every_problem() {
        let err = ConfigError::Validation(vec![
            ValidationError::MountNotAbsolute("status".into()),
            ValidationError::ZeroBodyLimit,
        ]);
        assert!(err
            .to_string()
            .starts_with("Validation failed: mount path 'status' must start with '/', "));
    }
}
