//! Implementation of the `coalide destroy` command.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use coalide_lib::ContainerEngine;

use super::{Workspace, runtime};
use crate::output::{print_info, print_success, print_warning};
use crate::prompts::confirm;

/// Remove the project's container. The project file is left untouched.
pub fn cmd_destroy(file: Option<&Path>, force: bool) -> Result<()> {
  let Workspace { project, engine, .. } = Workspace::open(file)?;
  let container = project.container_name();

  let rt = runtime()?;
  if !rt.block_on(engine.container_exists(&container))? {
    print_warning(&format!("Container {} does not exist; nothing to destroy", container));
    return Ok(());
  }

  if !confirm(&format!("Remove container {}?", container), force)? {
    print_info("Aborted");
    return Ok(());
  }

  rt.block_on(engine.remove_container(&container))
    .with_context(|| format!("Failed to remove container {}", container))?;
  info!(container = %container, "container removed");

  print_success(&format!("Removed container {}", container));
  Ok(())
}
