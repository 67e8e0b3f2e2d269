//! Repository configuration file support.
//!
//! This module reads the repository backend selection from a TOML file:
//!
//! ```toml
//! [repository]
//! type = "remote"
//!
//! [remote]
//! url = "https://project.example.co"
//! api_key = "service-role-key"
//! timeout_secs = 10
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use super::factory::RepositoryType;
use super::repository::RepositoryError;
use crate::config::BackendSettings;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub remote: RemoteSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// Hosted backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load repository configuration from the default location.
    ///
    /// Searches for `repository.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("repository.toml"),
            PathBuf::from("backend/repository.toml"),
            PathBuf::from("../repository.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No repository.toml found in standard locations",
        ))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Backend settings when this is a remote configuration, `None` for local.
    pub fn to_backend_settings(&self) -> Result<Option<BackendSettings>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::Remote {
            return Ok(None);
        }

        if self.remote.url.trim().is_empty() {
            return Err(RepositoryError::configuration(
                "Remote repository requires 'remote.url' setting",
            ));
        }
        if self.remote.api_key.trim().is_empty() {
            return Err(RepositoryError::configuration(
                "Remote repository requires 'remote.api_key' setting",
            ));
        }

        let mut settings = BackendSettings::new(self.remote.url.trim(), self.remote.api_key.trim());
        settings.timeout = Duration::from_secs(self.remote.timeout_secs);
        Ok(Some(settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_local_config() {
        let toml = r#"
[repository]
type = "local"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert!(config.to_backend_settings().unwrap().is_none());
    }

    #[test]
    fn test_parse_remote_config() {
        let toml = r#"
[repository]
type = "remote"

[remote]
url = "https://proj.example.co/"
api_key = "secret"
timeout_secs = 4
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Remote);

        let settings = config.to_backend_settings().unwrap().unwrap();
        assert_eq!(settings.url, "https://proj.example.co");
        assert_eq!(settings.api_key, "secret");
        assert_eq!(settings.timeout, Duration::from_secs(4));
    }

    #[test]
    fn test_remote_requires_url_and_key() {
        let toml = r#"
[repository]
type = "remote"

[remote]
api_key = "secret"
"#;
        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert!(config.to_backend_settings().is_err());

        let toml = r#"
[repository]
type = "remote"

[remote]
url = "https://proj.example.co"
"#;
        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert!(config.to_backend_settings().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[repository]\ntype = \"memory\"").unwrap();

        let config = RepositoryConfig::from_file(file.path()).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert_eq!(config.remote.timeout_secs, 10);
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[repository\ntype = ").unwrap();

        let err = RepositoryConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
