//! Command lines for each supported build system.
//!
//! All commands run from the project directory inside the container.

use super::types::{BuildSettings, BuildSystem};

pub const MAKEFILE: &str = "makefile";
pub const CMAKE: &str = "cmake";
pub const QMAKE: &str = "qmake";

impl BuildSystem {
  pub fn as_str(&self) -> &'static str {
    match self {
      BuildSystem::Makefile => MAKEFILE,
      BuildSystem::CMake => CMAKE,
      BuildSystem::Qmake => QMAKE,
    }
  }

  pub(crate) fn build_steps(&self, settings: &BuildSettings) -> Vec<String> {
    let make = with_flags("make", settings.make_flags.as_deref());

    match self {
      BuildSystem::Makefile => vec![make],
      BuildSystem::CMake => {
        let configure = with_flags(
          &format!("cmake -S . -B {}", settings.build_dir),
          settings.cmake_flags.as_deref(),
        );
        let mut compile = format!("cmake --build {}", settings.build_dir);
        if let Some(flags) = &settings.make_flags {
          compile.push_str(" -- ");
          compile.push_str(flags);
        }
        vec![configure, compile]
      }
      BuildSystem::Qmake => vec![with_flags("qmake", settings.qmake_flags.as_deref()), make],
    }
  }

  /// Path of the built executable relative to the project directory.
  ///
  /// Absolute executables are used as given.
  pub(crate) fn artifact_path(&self, settings: &BuildSettings, executable: &str) -> String {
    if executable.starts_with('/') {
      return executable.to_string();
    }
    let executable = executable.trim_start_matches("./");
    match self {
      BuildSystem::CMake => format!("./{}/{}", settings.build_dir.trim_end_matches('/'), executable),
      BuildSystem::Makefile | BuildSystem::Qmake => format!("./{}", executable),
    }
  }
}

fn with_flags(base: &str, flags: Option<&str>) -> String {
  match flags {
    Some(flags) => format!("{} {}", base, flags),
    None => base.to_string(),
  }
}
