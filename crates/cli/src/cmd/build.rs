//! Implementation of the `coalide build` command.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use coalide_lib::SyncOutcome;

use super::{Workspace, forward_step_stdout, runtime};
use crate::output::{format_duration, print_info, print_success};

/// Synchronize the project's container with its package list, then build.
pub fn cmd_build(file: Option<&Path>) -> Result<()> {
  let Workspace {
    path,
    mut project,
    engine,
  } = Workspace::open(file)?;
  info!(path = %path.display(), name = %project.name(), "building project");

  let start = Instant::now();
  let rt = runtime()?;
  let result = rt.block_on(project.build(&engine));
  forward_step_stdout(&result)?;
  let outcome = result.with_context(|| format!("Build of '{}' failed", project.name()))?;

  let container = project.container_name();
  match outcome {
    SyncOutcome::Reused => print_info(&format!("Reusing container {}", container)),
    SyncOutcome::Created => print_info(&format!("Created container {}", container)),
    SyncOutcome::Recreated => print_info(&format!("Recreated container {} (packages changed)", container)),
  }
  print_success(&format!(
    "Built {} ({}) in {}",
    project.name(),
    project.build_type(),
    format_duration(start.elapsed())
  ));

  Ok(())
}
