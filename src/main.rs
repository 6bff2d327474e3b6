mod cli;
mod commands;
mod config;
mod engine;
mod progress;
mod runner;
mod sudo;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::Config;
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let config = Config {
        state_file: cli.state,
        zfs_bin: cli.zfs,
    };

    match cli.command {
        Command::Diff(args) => commands::reconcile::diff(&ctx, &config, args.json),
        Command::Plan => commands::reconcile::plan(&ctx, &config),
        Command::Apply(args) => commands::reconcile::apply(&ctx, &config, &args),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "zfs-attrs", &mut io::stdout());
            Ok(())
        }
    }
}
