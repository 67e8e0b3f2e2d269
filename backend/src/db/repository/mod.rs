//! Repository trait definitions for store operations.
//!
//! This module provides a collection of focused repository traits that abstract
//! the hosted store. By splitting responsibilities across multiple traits,
//! implementations can be more focused and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`profile`]: Profiles, user codes and coach links
//! - [`schedule`]: Weekly schedule rules and store health
//! - [`session`]: Dated training sessions
//! - [`progress`]: Progress measurements
//!
//! # Convenience Trait Bound
//!
//! For functions that need all repository capabilities, use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R, athlete_id: UserId) -> RepositoryResult<()> {
//!     let rules = repo.list_schedule_rules(athlete_id).await?;
//!     let sessions = repo.list_sessions(athlete_id, None).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod profile;
pub mod progress;
pub mod schedule;
pub mod session;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use profile::ProfileRepository;
pub use progress::ProgressRepository;
pub use schedule::ScheduleRepository;
pub use session::SessionRepository;

/// Composite trait bound for a complete repository implementation.
///
/// This trait is automatically implemented for any type that implements
/// all four repository traits.
pub trait FullRepository:
    ProfileRepository + ScheduleRepository + SessionRepository + ProgressRepository
{
}

// Blanket implementation: any type implementing all four traits automatically implements FullRepository
impl<T> FullRepository for T where
    T: ProfileRepository + ScheduleRepository + SessionRepository + ProgressRepository
{
}
