//! Container engine boundary.
//!
//! The rest of the crate talks to a container runtime only through the
//! [`ContainerEngine`] trait.
//!
//! # Submodules
//!
//! - [`docker`] - Engine backed by a Docker-compatible command line
//! - `mock` - In-memory engine that records calls, for tests (`testing` feature)

pub mod docker;
#[cfg(any(test, feature = "testing"))]
pub mod mock;
mod types;

pub use types::*;
