mod build;
mod destroy;
mod init;
mod run;
mod status;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tokio::runtime::Runtime;

use coalide_lib::{BuilderError, Project, ProjectError};
use coalide_lib::config::EngineConfig;
use coalide_lib::consts::PROJECT_FILENAME;
use coalide_lib::engine::docker::DockerEngine;
use coalide_lib::project::store::{find_project_file, load_project};

pub use build::cmd_build;
pub use destroy::cmd_destroy;
pub use init::{InitArgs, cmd_init};
pub use run::cmd_run;
pub use status::cmd_status;

/// A loaded project together with the engine that serves it.
pub(crate) struct Workspace {
  pub path: PathBuf,
  pub project: Project,
  pub engine: DockerEngine,
}

impl Workspace {
  /// Load the project at `file`, or the nearest `coalide.json` above the current directory.
  pub fn open(file: Option<&Path>) -> Result<Self> {
    let path = match file {
      Some(file) => file.to_path_buf(),
      None => {
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        match find_project_file(&cwd) {
          Some(path) => path,
          None => bail!(
            "no {} found in {} or any parent directory; run 'coalide init' first",
            PROJECT_FILENAME,
            cwd.display()
          ),
        }
      }
    };

    let project = load_project(&path)?;
    let config = EngineConfig::from_env().context("Invalid engine configuration")?;

    let mut engine = DockerEngine::new(config);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
      let dir = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
      engine = engine.with_source_dir(dir);
    }

    Ok(Self { path, project, engine })
  }
}

pub(crate) fn runtime() -> Result<Runtime> {
  Runtime::new().context("Failed to create async runtime")
}

/// Echo the stdout of a failed build or run step; its stderr is part of the error message.
pub(crate) fn forward_step_stdout<T>(result: &Result<T, ProjectError>) -> Result<()> {
  if let Err(ProjectError::Builder(BuilderError::StepFailed { stdout, .. })) = result {
    std::io::stdout().write_all(stdout.as_bytes())?;
  }
  Ok(())
}
