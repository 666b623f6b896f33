//! Container lifecycle synchronization.
//!
//! Reconciles a backing container with a project's declared package set. The
//! container is never patched in place: if the packages it holds differ from
//! the declared ones it is removed and created again from scratch.
//!
//! ```text
//!   exists? ──no──────────────────────────────► create ──► Created
//!     │yes
//!     ▼
//!   packages == declared? ──yes──► Reused
//!     │no
//!     ▼
//!   remove ──► create ──► Recreated
//! ```
//!
//! The sequence is not atomic. A failed create after a successful remove
//! leaves no container; calling [`ensure_container`] again converges.

use std::fmt;

use tracing::{debug, info};

use crate::engine::{ContainerEngine, EngineError};
use crate::packages::packages_equal;

/// What [`ensure_container`] did to reach the declared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
  /// The existing container already held the declared packages.
  Reused,
  /// No container existed; one was created.
  Created,
  /// The existing container was stale and has been replaced.
  Recreated,
}

impl SyncOutcome {
  pub fn as_str(&self) -> &'static str {
    match self {
      SyncOutcome::Reused => "reused",
      SyncOutcome::Created => "created",
      SyncOutcome::Recreated => "recreated",
    }
  }
}

impl fmt::Display for SyncOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Make sure container `name` exists and holds exactly `declared`.
///
/// Container state is read fresh from the engine on every call. Engine errors
/// are returned as-is at the first failing step.
pub async fn ensure_container<E: ContainerEngine>(
  engine: &E,
  name: &str,
  declared: &[String],
) -> Result<SyncOutcome, EngineError> {
  let mut replaced = false;

  if engine.container_exists(name).await? {
    let observed = engine.container_packages(name).await?;

    if packages_equal(&observed, declared) {
      debug!(container = %name, "container is up to date");
      return Ok(SyncOutcome::Reused);
    }

    info!(
      container = %name,
      observed = ?observed,
      declared = ?declared,
      "package set changed, removing stale container"
    );
    engine.remove_container(name).await?;
    replaced = true;
  }

  info!(container = %name, packages = ?declared, "creating container");
  engine.create_container(name, declared).await?;

  Ok(if replaced {
    SyncOutcome::Recreated
  } else {
    SyncOutcome::Created
  })
}
