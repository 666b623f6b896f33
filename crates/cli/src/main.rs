mod cmd;
mod output;
mod prompts;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{InitArgs, cmd_build, cmd_destroy, cmd_init, cmd_run, cmd_status};
use crate::output::{OutputFormat, print_error};

/// coalide - Reproducible container-backed build environments
#[derive(Parser)]
#[command(name = "coalide")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Create a new coalide.json project file
  Init {
    /// Directory to create the project file in (default: current directory)
    dir: Option<PathBuf>,

    /// Project name (default: directory name)
    #[arg(long)]
    name: Option<String>,

    /// Build system: makefile, cmake or qmake
    #[arg(short = 't', long = "type", default_value = "makefile")]
    build_type: String,

    /// Package to install in the container (repeatable)
    #[arg(short, long = "package")]
    packages: Vec<String>,

    /// Builder option as KEY=VALUE (repeatable)
    #[arg(short, long = "option", value_parser = parse_key_val)]
    options: Vec<(String, String)>,
  },

  /// Synchronize the project's container and build inside it
  Build {
    /// Project file (default: nearest coalide.json)
    #[arg(short, long)]
    file: Option<PathBuf>,
  },

  /// Build, then run the project's executable inside its container
  Run {
    /// Project file (default: nearest coalide.json)
    #[arg(short, long)]
    file: Option<PathBuf>,
  },

  /// Show the state of the project's container
  Status {
    /// Project file (default: nearest coalide.json)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// Remove the project's container
  Destroy {
    /// Project file (default: nearest coalide.json)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Skip the confirmation prompt
    #[arg(long)]
    force: bool,
  },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
  let (key, value) = s
    .split_once('=')
    .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
  if key.is_empty() {
    return Err(format!("empty option name in '{}'", s));
  }
  Ok((key.to_string(), value.to_string()))
}

fn main() {
  let cli = Cli::parse();

  // RUST_LOG wins; otherwise --verbose turns on our own info logs
  let default_filter = if cli.verbose {
    "coalide=info,coalide_lib=info"
  } else {
    "warn"
  };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(e) = dispatch(cli) {
    print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
}

fn dispatch(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Init {
      dir,
      name,
      build_type,
      packages,
      options,
    } => cmd_init(InitArgs {
      dir,
      name,
      build_type,
      packages,
      options: options.into_iter().collect(),
    }),
    Commands::Build { file } => cmd_build(file.as_deref()),
    Commands::Run { file } => cmd_run(file.as_deref()),
    Commands::Status { file, output } => cmd_status(file.as_deref(), output, cli.verbose),
    Commands::Destroy { file, force } => cmd_destroy(file.as_deref(), force),
  }
}
