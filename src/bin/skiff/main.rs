//! skiff CLI - a build driver for the legacy Go toolchain

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::Cli;
use skiff::util::diagnostic::emit;
use skiff::util::Shell;
use skiff::BuildError;

fn main() {
    let cli = Cli::parse();
    let verbosity = cli.verbosity();
    let shell = Shell::new(verbosity, cli.color);

    // RUST_LOG wins over the verbosity flags
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(cli, &shell) {
        match e.downcast_ref::<BuildError>() {
            Some(err) => emit(&err.to_diagnostic(), shell.use_color()),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, shell: &Shell) -> Result<()> {
    if cli.clean {
        commands::clean::execute(shell)
    } else {
        commands::build::execute(cli, shell)
    }
}
