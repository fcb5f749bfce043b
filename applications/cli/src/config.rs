/// CLI configuration
use crate::error::{CliError, Result};
use cinevault_client::{ClientConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "cinevault.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_api")]
    pub api: ApiSettings,

    #[serde(default = "default_session")]
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSettings {
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

impl AppConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist; the default `cinevault.toml` is
    /// optional. `CINEVAULT_*` variables override both.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path).required(true)),
            None => settings
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false)),
        };

        // Override with environment variables (prefixed with CINEVAULT_)
        settings = settings.add_source(
            config::Environment::with_prefix("CINEVAULT")
                .separator("_")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.api.url.trim();
        if url.is_empty() {
            return Err(CliError::Config(
                "API URL is required (set CINEVAULT_API_URL)".to_string(),
            ));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CliError::Config(format!(
                "API URL must start with http:// or https://, got {:?}",
                url
            )));
        }

        if self.api.timeout == Some(0) {
            return Err(CliError::Config(
                "API timeout must be at least one second".to_string(),
            ));
        }

        if self.session.path.as_os_str().is_empty() {
            return Err(CliError::Config(
                "Session path is required (set CINEVAULT_SESSION_PATH)".to_string(),
            ));
        }

        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.api.url.trim());
        match self.api.timeout {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

// Default values
fn default_api() -> ApiSettings {
    ApiSettings {
        url: default_url(),
        timeout: None,
    }
}

fn default_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_session() -> SessionSettings {
    SessionSettings {
        path: default_session_path(),
    }
}

fn default_session_path() -> PathBuf {
    PathBuf::from(".cinevault").join("session.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: default_api(),
            session: default_session(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout, None);
        assert_eq!(config.session.path, PathBuf::from(".cinevault/session.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
[api]
url = "http://localhost:8080"
timeout = 15

[session]
path = "/tmp/cinevault-test/session.json"
"#,
        );

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.api.url, "http://localhost:8080");
        assert_eq!(config.api.timeout, Some(15));
        assert_eq!(
            config.session.path,
            PathBuf::from("/tmp/cinevault-test/session.json")
        );

        let client = config.client_config();
        assert_eq!(client.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("[api]\nurl = \"http://localhost:9000\"\n");

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.api.url, "http://localhost:9000");
        assert_eq!(config.session.path, default_session_path());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.api.url = "ftp://example.com".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.api.timeout = Some(0);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.session.path = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
