//! Process configuration.
//!
//! Configuration is resolved once at start-up into an [`AppConfig`] and passed by
//! reference to the collaborators that need it. Every setting names an ordered
//! list of environment variables; the first one holding a non-empty value wins.
//! A required setting without any value fails fast with a [`ConfigError`] that
//! lists every source that was tried.
//!
//! # Environment Variables
//!
//! - `HOST` / `PORT`: bind address (default `0.0.0.0:8080`)
//! - `REPOSITORY_TYPE`: `local` or `remote` (default: `remote` when a backend URL
//!   is present, otherwise `local`)
//! - backend URL: `COACHTRACK_BACKEND_URL`, `SUPABASE_URL`, `NEXT_PUBLIC_SUPABASE_URL`
//! - backend key: `COACHTRACK_BACKEND_KEY`, `SUPABASE_SERVICE_ROLE_KEY`,
//!   `SUPABASE_ANON_KEY`, `NEXT_PUBLIC_SUPABASE_ANON_KEY`
//! - `BACKEND_TIMEOUT_SECS` (default 10)
//! - `GEOLOCATION_ENDPOINT` (default `https://ipapi.co`), `GEOLOCATION_TIMEOUT_SECS` (default 3)
//! - fallback timezone: `COACHTRACK_FALLBACK_TIMEZONE`, `TZ` (default `UTC`)

use std::str::FromStr;
use std::time::Duration;

use crate::db::factory::RepositoryType;

/// Error raised while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting '{key}': none of [{}] is set", .sources.join(", "))]
    Missing {
        key: &'static str,
        sources: Vec<&'static str>,
    },

    #[error("invalid value for '{key}' (from {origin}): {message}")]
    Invalid {
        key: &'static str,
        origin: String,
        message: String,
    },
}

/// A named setting and the ordered environment variables it may come from.
#[derive(Debug, Clone, Copy)]
pub struct Setting {
    pub key: &'static str,
    pub sources: &'static [&'static str],
}

/// A setting value together with the source that supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub origin: &'static str,
}

impl Setting {
    pub const fn new(key: &'static str, sources: &'static [&'static str]) -> Self {
        Self { key, sources }
    }

    /// First non-empty value among the sources, in order.
    pub fn resolve<F>(&self, lookup: &F) -> Option<Resolved>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.sources.iter().find_map(|&name| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|value| Resolved {
                    value,
                    origin: name,
                })
        })
    }

    /// Like [`Setting::resolve`] but fails when no source has a value.
    pub fn require<F>(&self, lookup: &F) -> Result<Resolved, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.resolve(lookup).ok_or_else(|| self.missing())
    }

    fn missing(&self) -> ConfigError {
        ConfigError::Missing {
            key: self.key,
            sources: self.sources.to_vec(),
        }
    }

    /// Resolve and parse, falling back to `default` when unset.
    pub fn parse_or<F, T>(&self, lookup: &F, default: T) -> Result<T, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.resolve(lookup) {
            Some(resolved) => resolved.value.parse().map_err(|e: T::Err| ConfigError::Invalid {
                key: self.key,
                origin: resolved.origin.to_string(),
                message: e.to_string(),
            }),
            None => Ok(default),
        }
    }
}

pub const HOST: Setting = Setting::new("server.host", &["HOST"]);
pub const PORT: Setting = Setting::new("server.port", &["PORT"]);
pub const REPOSITORY_TYPE: Setting = Setting::new("repository.type", &["REPOSITORY_TYPE"]);
pub const BACKEND_URL: Setting = Setting::new(
    "backend.url",
    &[
        "COACHTRACK_BACKEND_URL",
        "SUPABASE_URL",
        "NEXT_PUBLIC_SUPABASE_URL",
    ],
);
pub const BACKEND_KEY: Setting = Setting::new(
    "backend.api_key",
    &[
        "COACHTRACK_BACKEND_KEY",
        "SUPABASE_SERVICE_ROLE_KEY",
        "SUPABASE_ANON_KEY",
        "NEXT_PUBLIC_SUPABASE_ANON_KEY",
    ],
);
pub const BACKEND_TIMEOUT: Setting =
    Setting::new("backend.timeout_secs", &["BACKEND_TIMEOUT_SECS"]);
pub const GEOLOCATION_ENDPOINT: Setting =
    Setting::new("geolocation.endpoint", &["GEOLOCATION_ENDPOINT"]);
pub const GEOLOCATION_TIMEOUT: Setting =
    Setting::new("geolocation.timeout_secs", &["GEOLOCATION_TIMEOUT_SECS"]);
pub const FALLBACK_TIMEZONE: Setting = Setting::new(
    "geolocation.fallback_timezone",
    &["COACHTRACK_FALLBACK_TIMEZONE", "TZ"],
);

pub const DEFAULT_GEOLOCATION_ENDPOINT: &str = "https://ipapi.co";
pub const DEFAULT_FALLBACK_TIMEZONE: &str = "UTC";

/// HTTP bind settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Connection settings for the hosted backend (REST tables + auth API).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    /// Project base URL without trailing slash
    pub url: String,
    /// Service or anon key sent as `apikey` and bearer token
    pub api_key: String,
    pub timeout: Duration,
}

impl BackendSettings {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// IP geolocation lookup settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeolocationSettings {
    pub endpoint: String,
    pub timeout: Duration,
    pub fallback_timezone: String,
}

impl Default for GeolocationSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEOLOCATION_ENDPOINT.to_string(),
            timeout: Duration::from_secs(3),
            fallback_timezone: DEFAULT_FALLBACK_TIMEZONE.to_string(),
        }
    }
}

/// Complete process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub repository_type: RepositoryType,
    /// Set for `remote`; `None` for `local`.
    pub backend: Option<BackendSettings>,
    pub geolocation: GeolocationSettings,
}

impl AppConfig {
    /// Configuration for an in-memory deployment with default settings.
    pub fn local() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            repository_type: RepositoryType::Local,
            backend: None,
            geolocation: GeolocationSettings::default(),
        }
    }

    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = HOST
            .resolve(&lookup)
            .map(|r| r.value)
            .unwrap_or_else(|| "0.0.0.0".to_string());
        let port = PORT.parse_or(&lookup, 8080u16)?;

        let backend_url = BACKEND_URL.resolve(&lookup);
        let repository_type = match REPOSITORY_TYPE.resolve(&lookup) {
            Some(resolved) => {
                resolved
                    .value
                    .parse::<RepositoryType>()
                    .map_err(|message| ConfigError::Invalid {
                        key: REPOSITORY_TYPE.key,
                        origin: resolved.origin.to_string(),
                        message,
                    })?
            }
            None if backend_url.is_some() => RepositoryType::Remote,
            None => RepositoryType::Local,
        };

        let backend = match repository_type {
            RepositoryType::Remote => {
                let url = backend_url.ok_or_else(|| BACKEND_URL.missing())?;
                let api_key = BACKEND_KEY.require(&lookup)?;
                let timeout_secs = BACKEND_TIMEOUT.parse_or(&lookup, 10u64)?;
                let mut settings = BackendSettings::new(url.value, api_key.value);
                settings.timeout = Duration::from_secs(timeout_secs);
                Some(settings)
            }
            RepositoryType::Local => None,
        };

        let geolocation = GeolocationSettings {
            endpoint: GEOLOCATION_ENDPOINT
                .resolve(&lookup)
                .map(|r| r.value.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GEOLOCATION_ENDPOINT.to_string()),
            timeout: Duration::from_secs(GEOLOCATION_TIMEOUT.parse_or(&lookup, 3u64)?),
            fallback_timezone: FALLBACK_TIMEZONE
                .resolve(&lookup)
                .map(|r| r.value)
                .unwrap_or_else(|| DEFAULT_FALLBACK_TIMEZONE.to_string()),
        };

        Ok(Self {
            server: ServerSettings { host, port },
            repository_type,
            backend,
            geolocation,
        })
    }
}
