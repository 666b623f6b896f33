use std::io;

use thiserror::Error;

/// Errors reported by a container engine.
///
/// These are passed through the synchronizer and builders unchanged; the
/// engine is the authority on whether a failure is transient.
#[derive(Debug, Error)]
pub enum EngineError {
  /// The engine program could not be started.
  #[error("failed to spawn {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },

  /// An engine command ran but reported failure.
  #[error("engine command failed with {}: {command}{}", describe_exit(.code), detail(.stderr))]
  CommandFailed {
    command: String,
    code: Option<i32>,
    stderr: String,
  },

  /// The named container does not exist.
  #[error("no such container: {0}")]
  NotFound(String),

  /// The package label stored on a container could not be decoded.
  #[error("invalid package label on {container}: {source}")]
  InvalidLabel {
    container: String,
    #[source]
    source: serde_json::Error,
  },

  /// The package set could not be encoded for storage on the container.
  #[error("failed to encode package label: {0}")]
  EncodeLabel(#[source] serde_json::Error),

  /// Any other engine-reported failure.
  #[error("{0}")]
  Other(String),
}

/// `exit code N`, or `a signal` when the process was killed.
pub(crate) fn describe_exit(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {}", code),
    None => "a signal".to_string(),
  }
}

/// Captured command output as a `: ...` message suffix, empty when there is none.
pub(crate) fn detail(output: &str) -> String {
  let output = output.trim();
  if output.is_empty() {
    String::new()
  } else {
    format!(": {}", output)
  }
}

/// Captured result of a command executed inside a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
  pub success: bool,
  pub exit_code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl ExecOutput {
  /// A successful result with the given stdout.
  pub fn ok(stdout: impl Into<String>) -> Self {
    Self {
      success: true,
      exit_code: Some(0),
      stdout: stdout.into(),
      stderr: String::new(),
    }
  }

  /// A failed result with the given exit code and stderr.
  pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
    Self {
      success: false,
      exit_code: Some(code),
      stdout: String::new(),
      stderr: stderr.into(),
    }
  }
}

/// Operations consumed from a container runtime.
///
/// Every call is a single request-response. Implementations must not cache
/// container state between calls: the synchronizer re-reads existence and
/// packages before every decision.
#[allow(async_fn_in_trait)]
pub trait ContainerEngine {
  /// Whether a container with this exact name exists, running or not.
  async fn container_exists(&self, name: &str) -> Result<bool, EngineError>;

  /// The package set the container currently holds.
  async fn container_packages(&self, name: &str) -> Result<Vec<String>, EngineError>;

  /// Create a container holding exactly `packages`.
  ///
  /// Creation is all-or-nothing: on error no container with this name is left
  /// behind by this call.
  async fn create_container(&self, name: &str, packages: &[String]) -> Result<(), EngineError>;

  async fn remove_container(&self, name: &str) -> Result<(), EngineError>;

  /// Run a shell command inside the container's project directory.
  ///
  /// A command that runs and exits non-zero is an `Ok` with
  /// `success == false`; `Err` is reserved for failures of the engine itself.
  async fn exec(&self, name: &str, command: &str) -> Result<ExecOutput, EngineError>;
}
