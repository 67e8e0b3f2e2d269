//! Repository implementations module.
//!
//! This module contains the implementations of the repository traits:
//! - `local`: In-memory implementation for unit testing and local development
//! - `remote`: Hosted store over its REST interface
pub mod local;
#[cfg(feature = "remote-backend")]
pub mod remote;

pub use local::LocalRepository;
#[cfg(feature = "remote-backend")]
pub use remote::RemoteRepository;
