//! Projects.
//!
//! A [`Project`] ties a declarative definition (name, build type, packages,
//! options) to a backing container and the builder for its build type.
//! Building synchronizes the container first, then builds inside it; running
//! always builds first.
//!
//! # Submodules
//!
//! - [`store`] - Reading and writing project files

pub mod store;
mod types;

pub use types::*;
