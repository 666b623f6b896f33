//! Shared test helpers for CLI integration tests.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Stand-in for the docker CLI.
///
/// Containers are files under `$STATE` holding the packages label; every
/// `exec` command is appended to `$STATE/<name>.log`. A `<name>.stopped`
/// marker makes `exec` fail until `start` clears it. Commands mentioning
/// `FAIL` exit with code 2.
const FAKE_DOCKER: &str = r#"#!/bin/sh
cmd="$1"; shift
case "$cmd" in
  ps)
    name="${3#name=^}"; name="${name%\$}"
    [ -f "$STATE/$name" ] && echo "$name"
    exit 0 ;;
  container)
    [ -f "$STATE/$4" ] || { echo "Error: No such container: $4" >&2; exit 1; }
    cat "$STATE/$4"
    exit 0 ;;
  run)
    echo "${5#coalide.packages=}" > "$STATE/$3"
    exit 0 ;;
  rm)
    rm -f "$STATE/$2" "$STATE/$2.log" "$STATE/$2.stopped"
    exit 0 ;;
  start)
    [ -f "$STATE/$1" ] || { echo "Error: No such container: $1" >&2; exit 1; }
    rm -f "$STATE/$1.stopped"
    exit 0 ;;
  exec)
    name="$3"; shift 5
    [ -f "$STATE/$name" ] || { echo "Error: No such container: $name" >&2; exit 1; }
    [ -f "$STATE/$name.stopped" ] && { echo "Error: container $name is not running" >&2; exit 1; }
    echo "$1" >> "$STATE/$name.log"
    case "$1" in
      *FAIL*) echo "partial output from $1"; echo "make: *** [all] Error 2" >&2; exit 2 ;;
      ./*) echo "hello from $1" ;;
    esac
    exit 0 ;;
esac
exit 1
"#;

/// Isolated test environment.
///
/// Each test gets its own project directory and engine state.
pub struct TestEnv {
  pub temp: TempDir,
  pub engine_path: PathBuf,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("state")).unwrap();
    std::fs::create_dir_all(temp.path().join("project")).unwrap();

    let engine_path = temp.path().join("fake-docker");
    std::fs::write(&engine_path, FAKE_DOCKER).unwrap();
    std::fs::set_permissions(&engine_path, std::fs::Permissions::from_mode(0o755)).unwrap();

    Self { temp, engine_path }
  }

  pub fn project_dir(&self) -> PathBuf {
    self.temp.path().join("project")
  }

  fn state_dir(&self) -> PathBuf {
    self.temp.path().join("state")
  }

  /// Write `coalide.json` into the project directory.
  pub fn write_project(&self, content: &str) {
    std::fs::write(self.project_dir().join("coalide.json"), content).unwrap();
  }

  /// Pretend a container already exists with the given packages label.
  pub fn seed_container(&self, name: &str, packages: &[&str]) {
    let label = serde_json::to_string(packages).unwrap();
    std::fs::write(self.state_dir().join(name), label).unwrap();
  }

  /// Mark a container as exited, as after a daemon restart.
  pub fn stop_container(&self, name: &str) {
    std::fs::write(self.state_dir().join(format!("{}.stopped", name)), "").unwrap();
  }

  pub fn is_stopped(&self, name: &str) -> bool {
    self.state_dir().join(format!("{}.stopped", name)).exists()
  }

  pub fn container_exists(&self, name: &str) -> bool {
    self.state_dir().join(name).exists()
  }

  pub fn container_packages(&self, name: &str) -> Vec<String> {
    let label = std::fs::read_to_string(self.state_dir().join(name)).unwrap();
    serde_json::from_str(label.trim()).unwrap()
  }

  /// Commands executed inside a container, in order.
  pub fn exec_log(&self, name: &str) -> Vec<String> {
    read_lines(&self.state_dir().join(format!("{}.log", name)))
  }

  /// A coalide command running in the project directory against the fake engine.
  pub fn coalide_cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("coalide");
    cmd.current_dir(self.project_dir());
    cmd.env("COALIDE_ENGINE", &self.engine_path);
    cmd.env("COALIDE_INSTALL_CMD", "install");
    cmd.env("STATE", self.state_dir());
    cmd.env_remove("COALIDE_IMAGE");
    cmd.env_remove("COALIDE_WORKDIR");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}

fn read_lines(path: &Path) -> Vec<String> {
  std::fs::read_to_string(path)
    .unwrap_or_default()
    .lines()
    .map(str::to_string)
    .collect()
}

pub const MAKEFILE_PROJECT: &str = r#"{
  "name": "my-app",
  "type": "makefile",
  "packages": ["gcc", "make"],
  "options": { "executable": "my-app", "args": "--greet" }
}"#;
