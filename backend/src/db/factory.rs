//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating repository instances (and the
//! auth provider that belongs to the same backend) from runtime configuration.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "remote-backend")]
use super::repositories::RemoteRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::auth::{AuthProvider, LocalAuthProvider};
use crate::config::{AppConfig, BackendSettings};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Hosted store over REST
    Remote,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("remote", "rest", "local", "memory").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" | "rest" => Ok(Self::Remote),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from the process environment.
    ///
    /// Reads `REPOSITORY_TYPE`. Defaults to Remote if a backend URL is
    /// present, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if crate::config::BACKEND_URL
            .resolve(&|name: &str| std::env::var(name).ok())
            .is_some()
        {
            Self::Remote
        } else {
            Self::Local
        }
    }
}

/// Repository plus the auth provider of the same backend.
#[derive(Clone)]
pub struct Backend {
    pub repository: Arc<dyn FullRepository>,
    pub auth: Arc<dyn AuthProvider>,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend").finish_non_exhaustive()
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use coachtrack::config::AppConfig;
/// use coachtrack::db::RepositoryFactory;
///
/// let config = AppConfig::from_env()?;
/// let backend = RepositoryFactory::from_config(&config)?;
/// let healthy = backend.repository.health_check().await?;
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `backend` - Hosted backend settings (required for Remote)
    pub fn create(
        repo_type: RepositoryType,
        backend: Option<&BackendSettings>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        Ok(Self::create_backend(repo_type, backend)?.repository)
    }

    /// Create repository and auth provider for the given backend type.
    pub fn create_backend(
        repo_type: RepositoryType,
        backend: Option<&BackendSettings>,
    ) -> RepositoryResult<Backend> {
        match repo_type {
            RepositoryType::Remote => {
                #[cfg(feature = "remote-backend")]
                {
                    let settings = backend.ok_or_else(|| {
                        RepositoryError::configuration(
                            "Remote repository requires backend settings",
                        )
                    })?;
                    Self::create_remote(settings)
                }
                #[cfg(not(feature = "remote-backend"))]
                {
                    let _ = backend;
                    Err(RepositoryError::configuration(
                        "Remote repository feature not enabled",
                    ))
                }
            }
            RepositoryType::Local => Ok(Self::create_local_backend()),
        }
    }

    /// Create the hosted-store repository and auth provider sharing one client.
    #[cfg(feature = "remote-backend")]
    pub fn create_remote(settings: &BackendSettings) -> RepositoryResult<Backend> {
        let client = crate::remote::RemoteClient::new(settings)
            .map_err(|e| RepositoryError::configuration(e.to_string()))?;
        Ok(Backend {
            repository: Arc::new(RemoteRepository::from_client(client.clone())),
            auth: Arc::new(crate::auth::RemoteAuthProvider::new(client)),
        })
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create an in-memory repository with an in-memory auth provider.
    pub fn create_local_backend() -> Backend {
        Backend {
            repository: Self::create_local(),
            auth: Arc::new(LocalAuthProvider::new()),
        }
    }

    /// Create the backend selected by a resolved [`AppConfig`].
    pub fn from_config(config: &AppConfig) -> RepositoryResult<Backend> {
        log::info!("Using {:?} repository", config.repository_type);
        Self::create_backend(config.repository_type, config.backend.as_ref())
    }

    /// Create the backend from a TOML configuration file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the repository.toml configuration file
    pub fn from_config_file<P: AsRef<Path>>(config_path: P) -> RepositoryResult<Backend> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config)
    }

    /// Create the backend from the default configuration file location.
    pub fn from_default_config() -> RepositoryResult<Backend> {
        let config = RepositoryConfig::from_default_location()?;
        Self::from_repository_config(&config)
    }

    fn from_repository_config(config: &RepositoryConfig) -> RepositoryResult<Backend> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        let settings = config.to_backend_settings()?;
        Self::create_backend(repo_type, settings.as_ref())
    }
}

/// Builder for configuring repository creation.
///
/// # Example
/// ```ignore
/// use coachtrack::db::{RepositoryBuilder, RepositoryType};
///
/// let backend = RepositoryBuilder::new()
///     .repository_type(RepositoryType::Local)
///     .build()?;
/// ```
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
    backend: Option<BackendSettings>,
}

impl RepositoryBuilder {
    /// Create a new builder. Defaults to Remote if a backend URL is set,
    /// otherwise Local.
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::from_env(),
            backend: None,
        }
    }

    /// Set the repository type.
    pub fn repository_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    /// Set the hosted backend settings.
    pub fn backend_settings(mut self, settings: BackendSettings) -> Self {
        self.backend = Some(settings);
        self
    }

    /// Take type and backend settings from a resolved [`AppConfig`].
    pub fn app_config(mut self, config: &AppConfig) -> Self {
        self.repo_type = config.repository_type;
        self.backend = config.backend.clone();
        self
    }

    /// Load type and backend settings from a TOML file.
    pub fn from_config_file<P: AsRef<Path>>(mut self, config_path: P) -> RepositoryResult<Self> {
        let repo_config = RepositoryConfig::from_file(config_path)?;

        self.repo_type = repo_config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        self.backend = repo_config.to_backend_settings()?;

        Ok(self)
    }

    /// Build the repository and its auth provider.
    pub fn build(self) -> RepositoryResult<Backend> {
        RepositoryFactory::create_backend(self.repo_type, self.backend.as_ref())
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
