use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::engine::{ContainerEngine, EngineError, ExecOutput, describe_exit, detail};

/// Opaque builder options (`executable`, `args`, `make_flags`, ...).
pub type Options = BTreeMap<String, String>;

pub const OPT_EXECUTABLE: &str = "executable";
pub const OPT_ARGS: &str = "args";
pub const OPT_MAKE_FLAGS: &str = "make_flags";
pub const OPT_CMAKE_FLAGS: &str = "cmake_flags";
pub const OPT_QMAKE_FLAGS: &str = "qmake_flags";
pub const OPT_BUILD_DIR: &str = "build_dir";

pub const DEFAULT_BUILD_DIR: &str = "build";

#[derive(Debug, Error)]
pub enum BuilderError {
  /// The build type is not in the registry.
  #[error("unrecognized build type: {0}")]
  UnrecognizedBuildType(String),

  /// An option required by the requested operation is absent.
  #[error("missing required option '{0}'")]
  MissingOption(&'static str),

  /// Run was requested before a successful build.
  #[error("project has not been built successfully")]
  NotBuilt,

  /// A build or run command exited unsuccessfully. The message carries the
  /// command's stderr; its stdout is kept for the caller to show.
  #[error("command failed with {}: {command}{}", describe_exit(.code), detail(.stderr))]
  StepFailed {
    command: String,
    code: Option<i32>,
    stdout: String,
    stderr: String,
  },

  #[error(transparent)]
  Engine(#[from] EngineError),
}

/// Supported build systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildSystem {
  Makefile,
  CMake,
  Qmake,
}

/// Lifecycle of a single builder instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuilderState {
  #[default]
  Uninitialized,
  Built,
  Failed,
}

/// Build-time settings read from the project options when the builder is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
  pub make_flags: Option<String>,
  pub cmake_flags: Option<String>,
  pub qmake_flags: Option<String>,
  pub build_dir: String,
}

impl BuildSettings {
  pub fn from_options(options: &Options) -> Self {
    let flag = |key: &str| options.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string);
    Self {
      make_flags: flag(OPT_MAKE_FLAGS),
      cmake_flags: flag(OPT_CMAKE_FLAGS),
      qmake_flags: flag(OPT_QMAKE_FLAGS),
      build_dir: flag(OPT_BUILD_DIR).unwrap_or_else(|| DEFAULT_BUILD_DIR.to_string()),
    }
  }
}

/// Build and run strategy for one build system.
///
/// Obtained from [`crate::builder::registry::resolve`]. A builder is bound to
/// the build type it was created for and is replaced, not reconfigured, when
/// the project's type changes.
#[derive(Debug, Clone)]
pub struct Builder {
  system: BuildSystem,
  settings: BuildSettings,
  state: BuilderState,
}

impl Builder {
  pub(crate) fn new(system: BuildSystem, options: &Options) -> Self {
    Self {
      system,
      settings: BuildSettings::from_options(options),
      state: BuilderState::Uninitialized,
    }
  }

  /// The build type identifier this builder was created for.
  pub fn build_type(&self) -> &'static str {
    self.system.as_str()
  }

  pub fn state(&self) -> BuilderState {
    self.state
  }

  pub fn settings(&self) -> &BuildSettings {
    &self.settings
  }

  /// Commands run, in order, by [`Builder::build`].
  pub fn build_steps(&self) -> Vec<String> {
    self.system.build_steps(&self.settings)
  }

  /// Command run by [`Builder::run`] for the given options.
  pub fn run_command(&self, options: &Options) -> Result<String, BuilderError> {
    let executable = options
      .get(OPT_EXECUTABLE)
      .map(|v| v.trim())
      .filter(|v| !v.is_empty())
      .ok_or(BuilderError::MissingOption(OPT_EXECUTABLE))?;

    let mut command = self.system.artifact_path(&self.settings, executable);
    if let Some(args) = options.get(OPT_ARGS).map(|v| v.trim()).filter(|v| !v.is_empty()) {
      command.push(' ');
      command.push_str(args);
    }
    Ok(command)
  }

  /// Run every build step inside `container`, stopping at the first failure.
  ///
  /// Safe to call again after a success or a failure; the build tools
  /// themselves decide what to redo.
  pub async fn build<E: ContainerEngine>(&mut self, engine: &E, container: &str) -> Result<(), BuilderError> {
    let steps = self.build_steps();
    info!(container = %container, build_type = self.build_type(), steps = steps.len(), "building");

    for step in &steps {
      if let Err(e) = run_step(engine, container, step).await {
        self.state = BuilderState::Failed;
        return Err(e);
      }
    }

    self.state = BuilderState::Built;
    info!(container = %container, "build finished");
    Ok(())
  }

  /// Execute the built artifact inside `container`.
  ///
  /// Only valid once [`Builder::build`] has succeeded.
  pub async fn run<E: ContainerEngine>(
    &self,
    engine: &E,
    container: &str,
    options: &Options,
  ) -> Result<ExecOutput, BuilderError> {
    if self.state != BuilderState::Built {
      return Err(BuilderError::NotBuilt);
    }

    let command = self.run_command(options)?;
    info!(container = %container, command = %command, "running");
    run_step(engine, container, &command).await
  }
}

async fn run_step<E: ContainerEngine>(engine: &E, container: &str, command: &str) -> Result<ExecOutput, BuilderError> {
  debug!(container = %container, command = %command, "executing step");
  let output = engine.exec(container, command).await?;

  if !output.success {
    debug!(stderr = %output.stderr.trim_end(), "step stderr");
    return Err(BuilderError::StepFailed {
      command: command.to_string(),
      code: output.exit_code,
      stdout: output.stdout,
      stderr: output.stderr,
    });
  }

  Ok(output)
}
