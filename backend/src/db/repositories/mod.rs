//! Repository implementations module.
//!
//! - `local`: In-memory implementation for unit testing and local development
//! - `rest`: Hosted backend reached through its table API
pub mod local;
#[cfg(feature = "rest-repo")]
pub mod rest;

pub use local::LocalRepository;
#[cfg(feature = "rest-repo")]
pub use rest::RestRepository;
