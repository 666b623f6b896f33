//! CLI integration tests against a scripted stand-in for the docker CLI.

#![cfg(unix)]

mod common;
mod status_tests;
