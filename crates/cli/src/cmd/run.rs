//! Implementation of the `coalide run` command.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::{Workspace, forward_step_stdout, runtime};

/// Build the project, then run its executable and forward the output.
pub fn cmd_run(file: Option<&Path>) -> Result<()> {
  let Workspace {
    path,
    mut project,
    engine,
  } = Workspace::open(file)?;
  info!(path = %path.display(), name = %project.name(), "running project");

  let rt = runtime()?;
  let result = rt.block_on(project.run(&engine));
  forward_step_stdout(&result)?;
  let output = result.with_context(|| format!("Run of '{}' failed", project.name()))?;

  std::io::stdout().write_all(output.stdout.as_bytes())?;
  std::io::stderr().write_all(output.stderr.as_bytes())?;

  Ok(())
}
