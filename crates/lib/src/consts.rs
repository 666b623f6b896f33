//! Crate-wide constants.

/// Prefix applied to every container name derived from a project name.
pub const CONTAINER_PREFIX: &str = "coalide-";

/// Default file name of a project definition.
pub const PROJECT_FILENAME: &str = "coalide.json";

/// Container label recording the package set a container was created with.
pub const PACKAGES_LABEL: &str = "coalide.packages";

pub const ENGINE_ENV: &str = "COALIDE_ENGINE";
pub const IMAGE_ENV: &str = "COALIDE_IMAGE";
pub const INSTALL_CMD_ENV: &str = "COALIDE_INSTALL_CMD";
pub const WORKDIR_ENV: &str = "COALIDE_WORKDIR";
