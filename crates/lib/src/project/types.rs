use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::builder::{Builder, BuilderError, Options, registry};
use crate::consts::CONTAINER_PREFIX;
use crate::engine::{ContainerEngine, EngineError, ExecOutput};
use crate::sync::{SyncOutcome, ensure_container};

/// Errors from building or running a project.
///
/// Both variants are transparent: the caller sees the engine or builder error
/// exactly as it was produced.
#[derive(Debug, Error)]
pub enum ProjectError {
  #[error(transparent)]
  Engine(#[from] EngineError),

  #[error(transparent)]
  Builder(#[from] BuilderError),
}

/// A project and its backing container.
///
/// Serializes to `{ "name", "type", "packages", "options" }`. The builder is
/// derived state and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
  name: String,
  #[serde(rename = "type")]
  build_type: String,
  #[serde(default)]
  packages: Vec<String>,
  #[serde(default)]
  options: Options,
  #[serde(skip)]
  builder: Option<Builder>,
}

impl Project {
  pub fn new(
    name: impl Into<String>,
    build_type: impl Into<String>,
    packages: Vec<String>,
    options: Options,
  ) -> Self {
    Self {
      name: name.into(),
      build_type: build_type.into(),
      packages,
      options,
      builder: None,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn build_type(&self) -> &str {
    &self.build_type
  }

  pub fn packages(&self) -> &[String] {
    &self.packages
  }

  pub fn options(&self) -> &Options {
    &self.options
  }

  /// The current builder, if one has been created.
  pub fn builder(&self) -> Option<&Builder> {
    self.builder.as_ref()
  }

  /// Name of the backing container.
  pub fn container_name(&self) -> String {
    container_name(&self.name)
  }

  /// Replace the declared package set.
  ///
  /// The container is checked against the new set on the next build.
  pub fn set_packages(&mut self, packages: Vec<String>) {
    self.packages = packages;
  }

  /// Change the build type. The current builder no longer matches and is
  /// replaced on the next build.
  pub fn set_build_type(&mut self, build_type: impl Into<String>) {
    self.build_type = build_type.into();
  }

  /// Replace the options. Builders read build settings once, so the current
  /// builder is dropped.
  pub fn set_options(&mut self, options: Options) {
    self.options = options;
    self.builder = None;
  }

  /// Synchronize the backing container, then build inside it.
  ///
  /// The first failing stage aborts the build and its error is returned
  /// unchanged.
  pub async fn build<E: ContainerEngine>(&mut self, engine: &E) -> Result<SyncOutcome, ProjectError> {
    let container = self.container_name();
    info!(project = %self.name, container = %container, build_type = %self.build_type, "building project");

    let outcome = ensure_container(engine, &container, &self.packages).await?;
    let builder = self.current_builder()?;
    builder.build(engine, &container).await?;

    Ok(outcome)
  }

  /// Build, then run the built artifact.
  ///
  /// Always rebuilds first so a stale artifact is never executed.
  pub async fn run<E: ContainerEngine>(&mut self, engine: &E) -> Result<ExecOutput, ProjectError> {
    self.build(engine).await?;

    let container = self.container_name();
    let builder = self.builder.as_ref().ok_or(BuilderError::NotBuilt)?;
    Ok(builder.run(engine, &container, &self.options).await?)
  }

  /// The builder for the current build type, creating or replacing it as needed.
  fn current_builder(&mut self) -> Result<&mut Builder, BuilderError> {
    let stale = self.builder.as_ref().map(Builder::build_type);
    if stale != Some(self.build_type.as_str()) {
      if let Some(from) = stale {
        debug!(from, to = %self.build_type, "replacing builder");
      }
      let builder = registry::resolve(&self.build_type, &self.options)?;
      return Ok(self.builder.insert(builder));
    }
    self.builder.as_mut().ok_or(BuilderError::NotBuilt)
  }
}

/// Derive an engine-legal container name from a project name.
///
/// Every run of characters outside `[A-Za-z0-9_]` becomes a single `-`,
/// leading and trailing dashes are dropped, and the result is lower-cased
/// and prefixed with `coalide-`. `"My App"` becomes `coalide-my-app`.
pub fn container_name(project_name: &str) -> String {
  let mut slug = String::with_capacity(project_name.len());
  let mut pending_dash = false;

  for c in project_name.chars() {
    if c.is_ascii_alphanumeric() || c == '_' {
      if pending_dash && !slug.is_empty() {
        slug.push('-');
      }
      pending_dash = false;
      slug.push(c.to_ascii_lowercase());
    } else {
      pending_dash = true;
    }
  }

  if slug.is_empty() {
    slug.push_str("unnamed");
  }

  format!("{}{}", CONTAINER_PREFIX, slug)
}
