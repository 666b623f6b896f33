//! Project file persistence.
//!
//! A project is stored as pretty-printed JSON, `coalide.json` by default:
//!
//! ```json
//! {
//!   "name": "My App",
//!   "type": "makefile",
//!   "packages": ["gcc", "make"],
//!   "options": { "executable": "my-app" }
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use super::types::Project;
use crate::consts::PROJECT_FILENAME;

#[derive(Debug, Error)]
pub enum ProjectFileError {
  /// Failed to read the project file.
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to write the project file.
  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The file is not a valid project definition.
  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to serialize project: {0}")]
  Serialize(#[source] serde_json::Error),
}

/// Load a project definition from `path`.
pub fn load_project(path: &Path) -> Result<Project, ProjectFileError> {
  debug!(path = %path.display(), "loading project");

  let content = fs::read_to_string(path).map_err(|source| ProjectFileError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  serde_json::from_str(&content).map_err(|source| ProjectFileError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

/// Write a project definition to `path`.
///
/// Writes to a sibling temp file and renames it into place so a crash never
/// leaves a truncated definition.
pub fn save_project(path: &Path, project: &Project) -> Result<(), ProjectFileError> {
  let mut content = serde_json::to_string_pretty(project).map_err(ProjectFileError::Serialize)?;
  content.push('\n');

  let write_err = |source| ProjectFileError::Write {
    path: path.to_path_buf(),
    source,
  };

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).map_err(write_err)?;
  }

  let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
  temp_name.push(".tmp");
  let temp_path = path.with_file_name(temp_name);

  fs::write(&temp_path, &content).map_err(write_err)?;
  fs::rename(&temp_path, path).map_err(write_err)?;

  info!(path = %path.display(), project = %project.name(), "project saved");
  Ok(())
}

/// Find the nearest project file at or above `start`.
pub fn find_project_file(start: &Path) -> Option<PathBuf> {
  let start = dunce::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());

  start
    .ancestors()
    .map(|dir| dir.join(PROJECT_FILENAME))
    .find(|candidate| candidate.is_file())
}
