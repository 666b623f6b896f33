//! In-memory container engine.
//!
//! `MockEngine` keeps a table of containers and their package sets, records
//! every call made against it, and can be told to fail specific operations.
//! Exec calls succeed with empty output unless a scripted response matches.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::types::{ContainerEngine, EngineError, ExecOutput};

/// Engine operation, used to target scripted failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
  Exists,
  Packages,
  Create,
  Remove,
  Exec,
}

/// A recorded engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
  Exists(String),
  Packages(String),
  Create(String, Vec<String>),
  Remove(String),
  Exec(String, String),
}

#[derive(Debug, Default)]
struct MockState {
  containers: BTreeMap<String, Vec<String>>,
  calls: Vec<EngineCall>,
  failures: HashMap<Operation, String>,
  exec_responses: Vec<(String, ExecOutput)>,
}

#[derive(Debug, Default)]
pub struct MockEngine {
  state: Mutex<MockState>,
}

impl MockEngine {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seed an existing container.
  pub fn with_container(self, name: &str, packages: &[&str]) -> Self {
    self
      .lock()
      .containers
      .insert(name.to_string(), packages.iter().map(|p| p.to_string()).collect());
    self
  }

  /// Make every call of `op` fail with `message` until [`MockEngine::clear_failure`].
  pub fn fail_on(&self, op: Operation, message: &str) {
    self.lock().failures.insert(op, message.to_string());
  }

  pub fn clear_failure(&self, op: Operation) {
    self.lock().failures.remove(&op);
  }

  /// Respond with `output` to any exec whose command contains `pattern`.
  ///
  /// Earlier registrations win when several patterns match.
  pub fn respond_to_exec(&self, pattern: &str, output: ExecOutput) {
    self.lock().exec_responses.push((pattern.to_string(), output));
  }

  /// All calls made so far, in order.
  pub fn calls(&self) -> Vec<EngineCall> {
    self.lock().calls.clone()
  }

  pub fn clear_calls(&self) {
    self.lock().calls.clear();
  }

  pub fn create_count(&self) -> usize {
    self.count(|c| matches!(c, EngineCall::Create(..)))
  }

  pub fn remove_count(&self) -> usize {
    self.count(|c| matches!(c, EngineCall::Remove(_)))
  }

  /// Commands passed to exec, in order.
  pub fn exec_commands(&self) -> Vec<String> {
    self
      .lock()
      .calls
      .iter()
      .filter_map(|c| match c {
        EngineCall::Exec(_, cmd) => Some(cmd.clone()),
        _ => None,
      })
      .collect()
  }

  /// Current package set of a container, if it exists.
  pub fn container(&self, name: &str) -> Option<Vec<String>> {
    self.lock().containers.get(name).cloned()
  }

  fn count(&self, pred: impl Fn(&EngineCall) -> bool) -> usize {
    self.lock().calls.iter().filter(|c| pred(c)).count()
  }

  fn lock(&self) -> MutexGuard<'_, MockState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn record(&self, op: Operation, call: EngineCall) -> Result<MutexGuard<'_, MockState>, EngineError> {
    let mut state = self.lock();
    state.calls.push(call);
    match state.failures.get(&op).cloned() {
      Some(message) => Err(EngineError::Other(message)),
      None => Ok(state),
    }
  }
}

impl ContainerEngine for MockEngine {
  async fn container_exists(&self, name: &str) -> Result<bool, EngineError> {
    let state = self.record(Operation::Exists, EngineCall::Exists(name.to_string()))?;
    Ok(state.containers.contains_key(name))
  }

  async fn container_packages(&self, name: &str) -> Result<Vec<String>, EngineError> {
    let state = self.record(Operation::Packages, EngineCall::Packages(name.to_string()))?;
    state
      .containers
      .get(name)
      .cloned()
      .ok_or_else(|| EngineError::NotFound(name.to_string()))
  }

  async fn create_container(&self, name: &str, packages: &[String]) -> Result<(), EngineError> {
    let mut state = self.record(Operation::Create, EngineCall::Create(name.to_string(), packages.to_vec()))?;
    if state.containers.contains_key(name) {
      return Err(EngineError::Other(format!("container name {} is already in use", name)));
    }
    state.containers.insert(name.to_string(), packages.to_vec());
    Ok(())
  }

  async fn remove_container(&self, name: &str) -> Result<(), EngineError> {
    let mut state = self.record(Operation::Remove, EngineCall::Remove(name.to_string()))?;
    state
      .containers
      .remove(name)
      .map(|_| ())
      .ok_or_else(|| EngineError::NotFound(name.to_string()))
  }

  async fn exec(&self, name: &str, command: &str) -> Result<ExecOutput, EngineError> {
    let state = self.record(Operation::Exec, EngineCall::Exec(name.to_string(), command.to_string()))?;
    if !state.containers.contains_key(name) {
      return Err(EngineError::NotFound(name.to_string()));
    }
    let scripted = state
      .exec_responses
      .iter()
      .find(|(pattern, _)| command.contains(pattern.as_str()))
      .map(|(_, output)| output.clone());
    Ok(scripted.unwrap_or_else(|| ExecOutput::ok("")))
  }
}
