//! Container engine backed by a Docker-compatible command line.
//!
//! Works with `docker` and `podman`. Each backing container is a long-lived
//! `sleep infinity` process started from the configured base image. A stopped
//! container still counts as existing and is started again before each exec. The
//! package set a container was created with is stored as a JSON label, so it
//! can be read back without querying the package manager inside it.

use std::path::PathBuf;
use std::process::Output;

use tokio::process::Command;
use tracing::{debug, info, warn};

use super::types::{ContainerEngine, EngineError, ExecOutput};
use crate::config::EngineConfig;
use crate::consts::PACKAGES_LABEL;

/// What `docker inspect` prints for a label that was never set.
const NO_VALUE: &str = "<no value>";

#[derive(Debug, Clone)]
pub struct DockerEngine {
  config: EngineConfig,
  source_dir: Option<PathBuf>,
}

impl DockerEngine {
  pub fn new(config: EngineConfig) -> Self {
    Self {
      config,
      source_dir: None,
    }
  }

  /// Bind-mount `dir` at the configured workdir in containers created from now on.
  pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.source_dir = Some(dir.into());
    self
  }

  fn exists_args(name: &str) -> Vec<String> {
    vec![
      "ps".to_string(),
      "-a".to_string(),
      "--filter".to_string(),
      format!("name=^{}$", name),
      "--format".to_string(),
      "{{.Names}}".to_string(),
    ]
  }

  fn packages_args(name: &str) -> Vec<String> {
    vec![
      "container".to_string(),
      "inspect".to_string(),
      "--format".to_string(),
      format!("{{{{ index .Config.Labels \"{}\" }}}}", PACKAGES_LABEL),
      name.to_string(),
    ]
  }

  fn run_args(&self, name: &str, packages: &[String]) -> Result<Vec<String>, EngineError> {
    let label = serde_json::to_string(packages).map_err(EngineError::EncodeLabel)?;

    let mut args = vec![
      "run".to_string(),
      "-d".to_string(),
      "--name".to_string(),
      name.to_string(),
      "--label".to_string(),
      format!("{}={}", PACKAGES_LABEL, label),
    ];
    if let Some(dir) = &self.source_dir {
      args.push("-v".to_string());
      args.push(format!("{}:{}", dir.display(), self.config.workdir));
    }
    args.extend([
      "-w".to_string(),
      self.config.workdir.clone(),
      self.config.image.clone(),
      "sleep".to_string(),
      "infinity".to_string(),
    ]);
    Ok(args)
  }

  fn install_script(&self, packages: &[String]) -> String {
    let quoted: Vec<String> = packages.iter().map(|p| shell_quote(p)).collect();
    format!("{} {}", self.config.install_command, quoted.join(" "))
  }

  fn start_args(name: &str) -> Vec<String> {
    vec!["start".to_string(), name.to_string()]
  }

  fn exec_args(&self, name: &str, command: &str) -> Vec<String> {
    vec![
      "exec".to_string(),
      "-w".to_string(),
      self.config.workdir.clone(),
      name.to_string(),
      "sh".to_string(),
      "-c".to_string(),
      command.to_string(),
    ]
  }

  /// Run the engine program and return its raw output.
  async fn invoke(&self, args: &[String]) -> Result<Output, EngineError> {
    debug!(program = %self.config.program, ?args, "invoking engine");
    Command::new(&self.config.program)
      .args(args)
      .output()
      .await
      .map_err(|source| EngineError::Spawn {
        program: self.config.program.clone(),
        source,
      })
  }

  /// Run the engine program, failing on a non-zero exit. Returns trimmed stdout.
  async fn invoke_checked(&self, args: &[String]) -> Result<String, EngineError> {
    let output = self.invoke(args).await?;
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
      return Err(EngineError::CommandFailed {
        command: format!("{} {}", self.config.program, args.join(" ")),
        code: output.status.code(),
        stderr,
      });
    }

    if !stderr.is_empty() {
      debug!(stderr = %stderr, "engine stderr");
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

impl ContainerEngine for DockerEngine {
  async fn container_exists(&self, name: &str) -> Result<bool, EngineError> {
    let stdout = self.invoke_checked(&Self::exists_args(name)).await?;
    Ok(stdout.lines().any(|line| line.trim() == name))
  }

  async fn container_packages(&self, name: &str) -> Result<Vec<String>, EngineError> {
    let stdout = self.invoke_checked(&Self::packages_args(name)).await?;
    parse_packages_label(name, &stdout)
  }

  async fn create_container(&self, name: &str, packages: &[String]) -> Result<(), EngineError> {
    info!(container = %name, image = %self.config.image, "starting container");
    self.invoke_checked(&self.run_args(name, packages)?).await?;

    if packages.is_empty() {
      return Ok(());
    }

    info!(container = %name, count = packages.len(), "installing packages");
    let script = self.install_script(packages);
    let result = self.exec(name, &script).await;
    let installed = match result {
      Ok(output) if output.success => Ok(()),
      Ok(output) => Err(EngineError::CommandFailed {
        command: script,
        code: output.exit_code,
        stderr: output.stderr,
      }),
      Err(e) => Err(e),
    };

    if let Err(e) = installed {
      // never leave a container whose label lists packages it lacks
      warn!(container = %name, error = %e, "package installation failed, removing container");
      if let Err(cleanup) = self.remove_container(name).await {
        warn!(container = %name, error = %cleanup, "failed to remove half-created container");
      }
      return Err(e);
    }

    Ok(())
  }

  async fn remove_container(&self, name: &str) -> Result<(), EngineError> {
    let args = vec!["rm".to_string(), "-f".to_string(), name.to_string()];
    self.invoke_checked(&args).await?;
    Ok(())
  }

  async fn exec(&self, name: &str, command: &str) -> Result<ExecOutput, EngineError> {
    // a container that was stopped, e.g. by a daemon restart, must be running before exec
    self.invoke_checked(&Self::start_args(name)).await?;

    let output = self.invoke(&self.exec_args(name, command)).await?;
    let result = ExecOutput {
      success: output.status.success(),
      exit_code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).to_string(),
      stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    };

    if !result.stdout.is_empty() {
      debug!(stdout = %result.stdout.trim_end(), "exec stdout");
    }
    if !result.stderr.is_empty() {
      debug!(stderr = %result.stderr.trim_end(), "exec stderr");
    }

    Ok(result)
  }
}

/// Decode the package label printed by `docker inspect`.
///
/// A container without the label (not created by us, or created with an
/// older version) reads as holding no packages.
fn parse_packages_label(container: &str, raw: &str) -> Result<Vec<String>, EngineError> {
  let raw = raw.trim();
  if raw.is_empty() || raw == NO_VALUE {
    return Ok(Vec::new());
  }
  serde_json::from_str(raw).map_err(|source| EngineError::InvalidLabel {
    container: container.to_string(),
    source,
  })
}

/// Quote `s` for a POSIX shell unless it is made only of safe characters.
fn shell_quote(s: &str) -> String {
  let safe = !s.is_empty()
    && s
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | ':' | '=' | '/' | '@'));
  if safe {
    s.to_string()
  } else {
    format!("'{}'", s.replace('\'', "'\\''"))
  }
}
