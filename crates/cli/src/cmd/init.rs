//! Implementation of the `coalide init` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use coalide_lib::builder::Options;
use coalide_lib::builder::registry::{self, BUILD_TYPES};
use coalide_lib::consts::PROJECT_FILENAME;
use coalide_lib::project::store::save_project;
use coalide_lib::Project;

use crate::output::{print_info, print_success};

pub struct InitArgs {
  pub dir: Option<PathBuf>,
  pub name: Option<String>,
  pub build_type: String,
  pub packages: Vec<String>,
  pub options: Options,
}

/// Write a new `coalide.json` into the target directory.
///
/// Refuses to overwrite an existing project file and rejects build types
/// that have no registered builder.
pub fn cmd_init(args: InitArgs) -> Result<()> {
  if !registry::is_registered(&args.build_type) {
    bail!(
      "unrecognized build type: {} (expected one of: {})",
      args.build_type,
      BUILD_TYPES.join(", ")
    );
  }

  let dir = match args.dir {
    Some(dir) => dir,
    None => std::env::current_dir().context("Failed to determine current directory")?,
  };
  let path = dir.join(PROJECT_FILENAME);
  if path.exists() {
    bail!("{} already exists", path.display());
  }

  let name = match args.name {
    Some(name) => name,
    None => default_name(&dir)?,
  };

  let project = Project::new(name, args.build_type, args.packages, args.options);
  save_project(&path, &project)?;
  info!(path = %path.display(), "project file written");

  print_success(&format!("Created {}", path.display()));
  print_info(&format!("Container: {}", project.container_name()));

  Ok(())
}

fn default_name(dir: &Path) -> Result<String> {
  let resolved = std::path::absolute(dir).with_context(|| format!("Failed to resolve {}", dir.display()))?;
  let name = resolved
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();
  if name.is_empty() {
    bail!("cannot derive a project name from {}; pass --name", dir.display());
  }
  Ok(name)
}
