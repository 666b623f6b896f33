//! Build type lookup.
//!
//! The set of build types is closed: adding a build system means adding a
//! [`BuildSystem`] variant, its commands in `systems.rs`, and an entry here.
//! Neither the synchronizer nor [`crate::project::Project`] changes.

use tracing::debug;

use super::systems::{CMAKE, MAKEFILE, QMAKE};
use super::types::{BuildSystem, Builder, BuilderError, Options};

/// Every registered build type identifier.
pub const BUILD_TYPES: [&str; 3] = [MAKEFILE, CMAKE, QMAKE];

/// Map a build type identifier to its build system.
pub fn lookup(build_type: &str) -> Option<BuildSystem> {
  match build_type {
    MAKEFILE => Some(BuildSystem::Makefile),
    CMAKE => Some(BuildSystem::CMake),
    QMAKE => Some(BuildSystem::Qmake),
    _ => None,
  }
}

pub fn is_registered(build_type: &str) -> bool {
  lookup(build_type).is_some()
}

/// Create a fresh builder for `build_type`.
///
/// Fails with [`BuilderError::UnrecognizedBuildType`] for anything outside
/// [`BUILD_TYPES`]. Never touches a container engine.
pub fn resolve(build_type: &str, options: &Options) -> Result<Builder, BuilderError> {
  let system = lookup(build_type).ok_or_else(|| BuilderError::UnrecognizedBuildType(build_type.to_string()))?;
  debug!(build_type = %build_type, "resolved builder");
  Ok(Builder::new(system, options))
}
