use coalide_lib::builder::registry;
use coalide_lib::consts::PROJECT_FILENAME;
use coalide_lib::engine::mock::{EngineCall, MockEngine, Operation};
use coalide_lib::project::store::{load_project, save_project};
use coalide_lib::{BuilderError, ExecOutput, Project, ProjectError, SyncOutcome};
use tempfile::TempDir;

use super::common::{my_app, options, packages};

#[tokio::test]
async fn clean_engine_gets_exactly_one_create() {
  let engine = MockEngine::new();
  let mut project = my_app();

  project.build(&engine).await.unwrap();

  assert_eq!(project.container_name(), "coalide-my-app");
  assert_eq!(engine.create_count(), 1);
  assert_eq!(engine.remove_count(), 0);
  assert!(
    engine
      .calls()
      .contains(&EngineCall::Create("coalide-my-app".to_string(), packages(&["gcc", "make"])))
  );
}

#[tokio::test]
async fn outdated_container_is_removed_then_created() {
  let engine = MockEngine::new().with_container("coalide-my-app", &["gcc"]);
  let mut project = my_app();

  let outcome = project.build(&engine).await.unwrap();

  assert_eq!(outcome, SyncOutcome::Recreated);
  let remove_at = engine
    .calls()
    .iter()
    .position(|c| matches!(c, EngineCall::Remove(_)))
    .unwrap();
  let create_at = engine
    .calls()
    .iter()
    .position(|c| matches!(c, EngineCall::Create(..)))
    .unwrap();
  assert!(remove_at < create_at);
  assert_eq!(engine.container("coalide-my-app"), Some(packages(&["gcc", "make"])));
}

#[tokio::test]
async fn reordered_packages_keep_the_container() {
  let engine = MockEngine::new().with_container("coalide-my-app", &["make", "gcc"]);
  let mut project = my_app();

  let outcome = project.build(&engine).await.unwrap();

  assert_eq!(outcome, SyncOutcome::Reused);
  assert_eq!(engine.create_count(), 0);
  assert_eq!(engine.remove_count(), 0);
}

#[tokio::test]
async fn edited_project_file_recreates_container() {
  let temp = TempDir::new().unwrap();
  let path = temp.path().join(PROJECT_FILENAME);
  let engine = MockEngine::new();

  save_project(&path, &my_app()).unwrap();
  let mut project = load_project(&path).unwrap();
  assert_eq!(project.build(&engine).await.unwrap(), SyncOutcome::Created);

  project.set_packages(packages(&["gcc", "make", "valgrind"]));
  save_project(&path, &project).unwrap();

  let mut reloaded = load_project(&path).unwrap();
  engine.clear_calls();
  assert_eq!(reloaded.build(&engine).await.unwrap(), SyncOutcome::Recreated);
  assert_eq!(engine.remove_count(), 1);
  assert_eq!(engine.create_count(), 1);
  assert_eq!(
    engine.container("coalide-my-app"),
    Some(packages(&["gcc", "make", "valgrind"]))
  );
}

#[tokio::test]
async fn failed_recreate_converges_on_retry() {
  let engine = MockEngine::new().with_container("coalide-my-app", &["gcc"]);
  engine.fail_on(Operation::Create, "image pull failed");
  let mut project = my_app();

  let err = project.build(&engine).await.unwrap_err();
  assert!(matches!(err, ProjectError::Engine(_)));
  assert!(engine.container("coalide-my-app").is_none());

  engine.clear_failure(Operation::Create);
  let outcome = project.build(&engine).await.unwrap();

  assert_eq!(outcome, SyncOutcome::Created);
  assert_eq!(engine.container("coalide-my-app"), Some(packages(&["gcc", "make"])));
}

#[tokio::test]
async fn build_failure_leaves_container_intact() {
  let engine = MockEngine::new();
  engine.respond_to_exec("make", ExecOutput::failed(2, "undefined reference to `main'"));
  let mut project = my_app();

  let err = project.build(&engine).await.unwrap_err();

  assert!(matches!(err, ProjectError::Builder(BuilderError::StepFailed { .. })));
  assert_eq!(engine.container("coalide-my-app"), Some(packages(&["gcc", "make"])));
}

#[tokio::test]
async fn run_fails_with_build_error_and_never_runs() {
  let engine = MockEngine::new();
  engine.respond_to_exec("qmake", ExecOutput::failed(3, "Cannot find .pro file"));
  let mut project = Project::new(
    "Qt Viewer",
    "qmake",
    packages(&["qt5-qmake", "g++", "make"]),
    options(&[("executable", "viewer")]),
  );

  let err = project.run(&engine).await.unwrap_err();

  assert_eq!(err.to_string(), "command failed with exit code 3: qmake: Cannot find .pro file");
  assert_eq!(engine.exec_commands(), vec!["qmake"]);
}

#[tokio::test]
async fn cmake_project_runs_from_build_dir() {
  let engine = MockEngine::new();
  engine.respond_to_exec("./out/tool", ExecOutput::ok("42\n"));
  let mut project = Project::new(
    "Tool",
    "cmake",
    packages(&["cmake", "g++"]),
    options(&[("executable", "tool"), ("build_dir", "out"), ("args", "--answer")]),
  );

  let output = project.run(&engine).await.unwrap();

  assert_eq!(output.stdout, "42\n");
  assert_eq!(
    engine.exec_commands(),
    vec!["cmake -S . -B out", "cmake --build out", "./out/tool --answer"]
  );
}

#[test]
fn unregistered_type_resolves_to_configuration_error() {
  let result = registry::resolve("bazel", &options(&[]));

  assert!(matches!(result, Err(BuilderError::UnrecognizedBuildType(ref t)) if t == "bazel"));
}

#[tokio::test]
async fn unregistered_type_syncs_container_then_fails_without_exec() {
  let engine = MockEngine::new();
  let mut project = Project::new("Bazel App", "bazel", packages(&["bazel"]), options(&[]));

  let err = project.build(&engine).await.unwrap_err();

  assert!(matches!(
    err,
    ProjectError::Builder(BuilderError::UnrecognizedBuildType(ref t)) if t == "bazel"
  ));
  assert_eq!(
    engine.calls(),
    vec![
      EngineCall::Exists("coalide-bazel-app".to_string()),
      EngineCall::Create("coalide-bazel-app".to_string(), packages(&["bazel"])),
    ]
  );
  assert!(engine.exec_commands().is_empty());
  assert!(project.builder().is_none());
}
