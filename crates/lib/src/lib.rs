//! coalide-lib: Container-backed build environments
//!
//! This crate keeps a project's backing container in step with its declared
//! package set and dispatches build/run requests to the right build system:
//! - `Project`: declarative definition plus build/run orchestration
//! - `sync`: create, reuse or recreate the backing container
//! - `builder`: build type registry and per-build-system commands
//! - `engine`: the container runtime boundary and its Docker CLI adapter

pub mod builder;
pub mod config;
pub mod consts;
pub mod engine;
pub mod packages;
pub mod project;
pub mod sync;

pub use builder::{Builder, BuilderError, Options};
pub use config::EngineConfig;
pub use engine::{ContainerEngine, EngineError, ExecOutput};
pub use project::{Project, ProjectError};
pub use sync::{SyncOutcome, ensure_container};
