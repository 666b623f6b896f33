//! Implementation of the `coalide status` command.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use coalide_lib::{ContainerEngine, EngineError};
use coalide_lib::packages::packages_equal;

use super::{Workspace, runtime};
use crate::output::{OutputFormat, format_packages, print_info, print_json, print_stat, print_success, print_warning};

#[derive(Debug, Serialize)]
struct StatusReport {
  name: String,
  build_type: String,
  container: String,
  exists: bool,
  in_sync: bool,
  declared_packages: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  installed_packages: Option<Vec<String>>,
}

async fn installed_packages<E: ContainerEngine>(engine: &E, container: &str) -> Result<Option<Vec<String>>, EngineError> {
  if !engine.container_exists(container).await? {
    return Ok(None);
  }
  engine.container_packages(container).await.map(Some)
}

/// Report whether the project's container exists and matches its package list.
pub fn cmd_status(file: Option<&Path>, output: OutputFormat, verbose: bool) -> Result<()> {
  let Workspace { path, project, engine } = Workspace::open(file)?;
  let container = project.container_name();

  let rt = runtime()?;
  let installed = rt.block_on(installed_packages(&engine, &container))?;

  let in_sync = installed
    .as_deref()
    .is_some_and(|installed| packages_equal(installed, project.packages()));

  let report = StatusReport {
    name: project.name().to_string(),
    build_type: project.build_type().to_string(),
    container,
    exists: installed.is_some(),
    in_sync,
    declared_packages: project.packages().to_vec(),
    installed_packages: installed,
  };

  if output.is_json() {
    return print_json(&report);
  }

  println!("Project: {}", report.name);
  print_stat("Type", &report.build_type);
  print_stat("Container", &report.container);
  print_stat("Packages", &format_packages(&report.declared_packages));
  if verbose {
    print_stat("Project file", &path.display().to_string());
  }
  println!();

  match &report.installed_packages {
    None => print_info("Container does not exist; it will be created on the next build"),
    Some(_) if report.in_sync => print_success("Container is up to date"),
    Some(installed) => {
      print_warning("Container packages differ; it will be recreated on the next build");
      print_stat("Installed", &format_packages(installed));
    }
  }

  Ok(())
}
