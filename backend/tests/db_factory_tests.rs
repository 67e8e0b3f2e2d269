//! Tests for backend selection: repository type parsing, environment
//! resolution, TOML configuration and the factory/builder.

mod support;

use std::io::Write;
use std::str::FromStr;

use coachtrack::auth::AuthProvider;
use coachtrack::config::{AppConfig, BackendSettings, ConfigError};
use coachtrack::db::factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
use coachtrack::db::models::Role;
use coachtrack::db::{RepositoryError, ScheduleRepository};
use support::scoped_env;

const BACKEND_VARS: [&str; 11] = [
    "HOST",
    "PORT",
    "COACHTRACK_BACKEND_URL",
    "SUPABASE_URL",
    "NEXT_PUBLIC_SUPABASE_URL",
    "COACHTRACK_BACKEND_KEY",
    "SUPABASE_SERVICE_ROLE_KEY",
    "SUPABASE_ANON_KEY",
    "NEXT_PUBLIC_SUPABASE_ANON_KEY",
    "BACKEND_TIMEOUT_SECS",
    "GEOLOCATION_TIMEOUT_SECS",
];

fn cleared_backend_env(extra: &[(&'static str, Option<&'static str>)]) -> support::EnvGuard {
    let mut changes: Vec<(&str, Option<&str>)> =
        BACKEND_VARS.iter().map(|k| (*k, None)).collect();
    changes.push(("REPOSITORY_TYPE", None));
    changes.extend_from_slice(extra);
    scoped_env(&changes)
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_repository_type_from_str() {
    assert_eq!(RepositoryType::from_str("remote").unwrap(), RepositoryType::Remote);
    assert_eq!(RepositoryType::from_str("REST").unwrap(), RepositoryType::Remote);
    assert_eq!(RepositoryType::from_str(" Local ").unwrap(), RepositoryType::Local);
    assert_eq!(RepositoryType::from_str("memory").unwrap(), RepositoryType::Local);

    let err = RepositoryType::from_str("postgres").unwrap_err();
    assert!(err.contains("Unknown repository type"));
}

#[test]
fn test_repository_type_from_env_default() {
    let _env = cleared_backend_env(&[]);
    assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
}

#[test]
fn test_repository_type_from_env_with_backend_url() {
    let _env = cleared_backend_env(&[("SUPABASE_URL", Some("https://proj.example.co"))]);
    assert_eq!(RepositoryType::from_env(), RepositoryType::Remote);
}

#[test]
fn test_repository_type_from_env_explicit_wins() {
    let _env = cleared_backend_env(&[
        ("REPOSITORY_TYPE", Some("local")),
        ("COACHTRACK_BACKEND_URL", Some("https://proj.example.co")),
    ]);
    assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
}

#[test]
fn test_app_config_from_process_env() {
    let _env = cleared_backend_env(&[
        ("NEXT_PUBLIC_SUPABASE_URL", Some("https://proj.example.co/")),
        ("SUPABASE_SERVICE_ROLE_KEY", Some("service")),
        ("SUPABASE_ANON_KEY", Some("anon")),
        ("PORT", Some("9090")),
    ]);
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.repository_type, RepositoryType::Remote);
    assert_eq!(config.server.bind_address(), "0.0.0.0:9090");

    let backend = config.backend.unwrap();
    assert_eq!(backend.url, "https://proj.example.co");
    // The service key is listed before the anon key.
    assert_eq!(backend.api_key, "service");
}

#[test]
fn test_app_config_remote_requires_url() {
    let _env = cleared_backend_env(&[("REPOSITORY_TYPE", Some("remote"))]);
    let err = AppConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Missing { key: "backend.url", .. }));
    assert!(err.to_string().contains("NEXT_PUBLIC_SUPABASE_URL"));
}

#[tokio::test]
async fn test_local_backend_round_trip() {
    let backend = RepositoryFactory::create_local_backend();
    assert!(backend.repository.health_check().await.unwrap());

    let registration = backend
        .auth
        .sign_up(
            "solo@example.com",
            "secret-pass",
            &coachtrack::auth::SignUpMetadata {
                full_name: "Solo".to_string(),
                role: Role::Athlete,
            },
        )
        .await
        .unwrap();
    let token = registration.session.unwrap().access_token;
    let user = backend.auth.current_session(&token).await.unwrap().unwrap();
    assert_eq!(user.id, registration.user.id);
}

#[test]
fn test_create_remote_without_settings_fails() {
    let result = RepositoryFactory::create(RepositoryType::Remote, None);
    assert!(matches!(
        result,
        Err(RepositoryError::ConfigurationError { .. })
    ));
}

#[test]
fn test_from_config_selects_backend() {
    let backend = RepositoryFactory::from_config(&AppConfig::local()).unwrap();
    assert!(format!("{:?}", backend).contains("Backend"));

    let mut remote = AppConfig::local();
    remote.repository_type = RepositoryType::Remote;
    remote.backend = Some(BackendSettings::new("https://proj.example.co", "key"));
    assert!(RepositoryFactory::from_config(&remote).is_ok());

    remote.backend = None;
    assert!(RepositoryFactory::from_config(&remote).is_err());
}

#[test]
fn test_from_config_file() {
    let local = write_config("[repository]\ntype = \"local\"\n");
    assert!(RepositoryFactory::from_config_file(local.path()).is_ok());

    let remote = write_config(
        r#"
[repository]
type = "remote"

[remote]
url = "https://proj.example.co"
api_key = "service-role-key"
timeout_secs = 4
"#,
    );
    assert!(RepositoryFactory::from_config_file(remote.path()).is_ok());

    let incomplete = write_config("[repository]\ntype = \"remote\"\n");
    let err = RepositoryFactory::from_config_file(incomplete.path()).unwrap_err();
    assert!(err.to_string().contains("remote.url"));

    let unknown = write_config("[repository]\ntype = \"sqlite\"\n");
    assert!(RepositoryFactory::from_config_file(unknown.path()).is_err());

    assert!(RepositoryFactory::from_config_file("/definitely/not/here.toml").is_err());
}

#[test]
fn test_builder() {
    let _env = cleared_backend_env(&[]);

    assert!(RepositoryBuilder::new().build().is_ok());
    assert!(RepositoryBuilder::default()
        .repository_type(RepositoryType::Remote)
        .build()
        .is_err());
    assert!(RepositoryBuilder::new()
        .repository_type(RepositoryType::Remote)
        .backend_settings(BackendSettings::new("https://proj.example.co", "key"))
        .build()
        .is_ok());
    assert!(RepositoryBuilder::new()
        .app_config(&AppConfig::local())
        .build()
        .is_ok());

    let file = write_config("[repository]\ntype = \"memory\"\n");
    let builder = RepositoryBuilder::new().from_config_file(file.path()).unwrap();
    assert!(builder.build().is_ok());
}
