//! Data access for profiles, schedules, sessions and progress.
//!
//! This module provides abstractions for store operations via the Repository
//! pattern, allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (HTTP handlers, domain services)     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - validation, logging      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!        ┌────────────┴─────────────┐
//!        ▼                          ▼
//!  LocalRepository           RemoteRepository
//!   (in-memory)             (hosted REST store)
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use coachtrack::config::AppConfig;
//! use coachtrack::db::{services, RepositoryFactory};
//!
//! let config = AppConfig::from_env()?;
//! let backend = RepositoryFactory::from_config(&config)?;
//! let rules = services::list_schedule_rules(backend.repository.as_ref(), athlete_id).await?;
//! ```

pub mod factory;
pub mod models;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

pub use services::{
    create_schedule_rule, delete_schedule_rule, health_check, list_schedule_rules, list_sessions,
    validate_schedule_rule,
};

pub use repo_config::RepositoryConfig;

pub use factory::{Backend, RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "remote-backend")]
pub use repositories::RemoteRepository;
pub use repository::{
    ErrorContext, FullRepository, ProfileRepository, ProgressRepository, RepositoryError,
    RepositoryResult, ScheduleRepository, SessionRepository,
};
