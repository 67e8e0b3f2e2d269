//! # CoachTrack Backend
//!
//! Coaching and athlete progress-tracking backend.
//!
//! This crate provides the server side of the CoachTrack application: account
//! management against a hosted auth service, typed access to the training tables
//! of a hosted data store, recurring-schedule session generation, dashboards and
//! timezone detection. The backend exposes a REST API via Axum.
//!
//! ## Features
//!
//! - **Session Materialization**: Expand weekly schedule rules into dated sessions
//! - **Accounts**: Sign up, sign in, user codes and coach/athlete linking
//! - **Tracking**: Session status updates, progress entries and dashboards
//! - **Timezone Detection**: IP geolocation with a configured fallback
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Schedule rules, date ranges, session records and identifiers
//! - [`scheduler`]: The session materializer
//! - [`config`]: Process configuration resolved from ordered sources
//! - [`db`]: Repository traits, implementations and the persistence service layer
//! - [`auth`]: Authentication collaborator trait and implementations
//! - [`services`]: Domain orchestration (generation, accounts, dashboards, timezone)
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod scheduler;

#[cfg(feature = "remote-backend")]
pub mod remote;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
