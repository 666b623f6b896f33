//! Status command integration tests.

use predicates::prelude::*;

use super::common::{MAKEFILE_PROJECT, TestEnv};

#[test]
fn status_reports_missing_container() {
  let env = TestEnv::new();
  env.write_project(MAKEFILE_PROJECT);

  env
    .coalide_cmd()
    .arg("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("coalide-my-app"))
    .stdout(predicate::str::contains("does not exist"));
}

#[test]
fn status_ignores_package_order() {
  let env = TestEnv::new();
  env.write_project(MAKEFILE_PROJECT);
  env.seed_container("coalide-my-app", &["make", "gcc"]);

  env
    .coalide_cmd()
    .arg("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("up to date"));
}

#[test]
fn status_json_reports_drift() {
  let env = TestEnv::new();
  env.write_project(MAKEFILE_PROJECT);
  env.seed_container("coalide-my-app", &["gcc"]);

  let output = env.coalide_cmd().args(["status", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["container"], "coalide-my-app");
  assert_eq!(json["exists"], true);
  assert_eq!(json["in_sync"], false);
  assert_eq!(json["installed_packages"], serde_json::json!(["gcc"]));
  assert_eq!(json["declared_packages"], serde_json::json!(["gcc", "make"]));
}

#[test]
fn status_does_not_touch_containers() {
  let env = TestEnv::new();
  env.write_project(MAKEFILE_PROJECT);
  env.seed_container("coalide-my-app", &["gcc"]);

  env.coalide_cmd().arg("status").assert().success();

  assert_eq!(env.container_packages("coalide-my-app"), vec!["gcc"]);
  assert!(env.exec_log("coalide-my-app").is_empty());
}
