//! Build system dispatch.
//!
//! A [`Builder`] turns "build" and "run" into commands executed inside a
//! project's backing container. Which commands depends on the project's build
//! type, resolved through [`registry::resolve`].
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──build──► Built ◄──build──┐
//!        │                   │             │
//!        └──build──► Failed ─┴─────────────┘
//! ```
//!
//! `run` is only accepted in the `Built` state.
//!
//! # Submodules
//!
//! - [`registry`] - Build type lookup
//! - [`systems`] - Commands for each build system

pub mod registry;
pub mod systems;
mod types;

pub use types::*;
