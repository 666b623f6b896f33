//! Engine configuration.
//!
//! Defaults target a Docker daemon with an Ubuntu base image. Each field can be
//! overridden through an environment variable:
//!
//! | Variable              | Field             | Default                       |
//! |-----------------------|-------------------|-------------------------------|
//! | `COALIDE_ENGINE`      | `program`         | `docker`                      |
//! | `COALIDE_IMAGE`       | `image`           | `ubuntu:24.04`                |
//! | `COALIDE_INSTALL_CMD` | `install_command` | `apt-get update && apt-get install -y --no-install-recommends` |
//! | `COALIDE_WORKDIR`     | `workdir`         | `/src`                        |

use std::env;

use thiserror::Error;
use tracing::debug;

use crate::consts::{ENGINE_ENV, IMAGE_ENV, INSTALL_CMD_ENV, WORKDIR_ENV};

pub const DEFAULT_PROGRAM: &str = "docker";
pub const DEFAULT_IMAGE: &str = "ubuntu:24.04";
pub const DEFAULT_INSTALL_COMMAND: &str = "apt-get update && apt-get install -y --no-install-recommends";
pub const DEFAULT_WORKDIR: &str = "/src";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  /// An override variable is set but empty.
  #[error("environment variable {0} is set but empty")]
  Empty(&'static str),

  /// An override variable is not valid unicode.
  #[error("environment variable {0} is not valid unicode")]
  NotUnicode(&'static str),
}

/// Settings for the command-line container engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
  /// Engine executable (`docker`, `podman`, or a path).
  pub program: String,
  /// Base image every backing container starts from.
  pub image: String,
  /// Shell prefix that installs the packages appended to it.
  pub install_command: String,
  /// Project directory inside the container; builds and runs execute here.
  pub workdir: String,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      program: DEFAULT_PROGRAM.to_string(),
      image: DEFAULT_IMAGE.to_string(),
      install_command: DEFAULT_INSTALL_COMMAND.to_string(),
      workdir: DEFAULT_WORKDIR.to_string(),
    }
  }
}

impl EngineConfig {
  /// Defaults with environment overrides applied.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut config = Self::default();
    if let Some(program) = read_var(ENGINE_ENV)? {
      config.program = program;
    }
    if let Some(image) = read_var(IMAGE_ENV)? {
      config.image = image;
    }
    if let Some(install_command) = read_var(INSTALL_CMD_ENV)? {
      config.install_command = install_command;
    }
    if let Some(workdir) = read_var(WORKDIR_ENV)? {
      config.workdir = workdir;
    }
    debug!(?config, "engine configuration");
    Ok(config)
  }
}

fn read_var(name: &'static str) -> Result<Option<String>, ConfigError> {
  match env::var(name) {
    Ok(value) if value.trim().is_empty() => Err(ConfigError::Empty(name)),
    Ok(value) => Ok(Some(value)),
    Err(env::VarError::NotPresent) => Ok(None),
    Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(name)),
  }
}
