//! Session materialization.
//!
//! This module expands weekly [`ScheduleRule`](crate::models::ScheduleRule)s into
//! dated [`SessionRecord`](crate::models::SessionRecord)s over an inclusive
//! [`DateRange`](crate::models::DateRange). It is a pure calendar computation:
//! no I/O, no shared state, no timezone handling beyond the date components.
//!
//! # Example
//!
//! ```rust
//! use coachtrack::models::{DateRange, ScheduleRule};
//! use coachtrack::scheduler::materialize;
//!
//! let rules = vec![ScheduleRule {
//!     day_of_week: 3,
//!     start_time: "18:00".parse().unwrap(),
//!     end_time: "19:30".parse().unwrap(),
//!     session_type: "practice".to_string(),
//! }];
//! let range = DateRange::parse("2024-01-01", "2024-01-10").unwrap();
//!
//! let sessions = materialize(&rules, &range);
//! assert_eq!(sessions.len(), 2);
//! assert_eq!(sessions[0].scheduled_date.to_string(), "2024-01-03");
//! ```

pub mod materializer;

pub use materializer::*;
