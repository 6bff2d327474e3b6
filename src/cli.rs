use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "zfs-attrs")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Diff ZFS dataset properties against a declared state and converge them", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Desired-state JSON document
    #[arg(long, env = "EXPECTED_STATE", global = true)]
    pub state: Option<PathBuf>,

    /// zfs executable to run
    #[arg(long, env = "ZFS_BIN", default_value = "zfs", global = true)]
    pub zfs: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show drift between the declared and live properties
    Diff(DiffArgs),

    /// Print the zfs commands that would converge the system
    Plan,

    /// Converge the live properties onto the declaration
    Apply(ApplyArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct DiffArgs {
    /// Print the change list as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Show what would be run without running it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Keep running remaining steps after one fails
    #[arg(short, long)]
    pub keep_going: bool,

    /// Run zfs through sudo
    #[arg(long)]
    pub sudo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_apply_flags() {
        let cli = Cli::try_parse_from([
            "zfs-attrs",
            "--state",
            "/etc/zfs-attrs.json",
            "apply",
            "--yes",
            "--keep-going",
        ])
        .unwrap();

        assert_eq!(cli.state, Some(PathBuf::from("/etc/zfs-attrs.json")));
        assert_eq!(cli.zfs, "zfs");
        match cli.command {
            Command::Apply(args) => {
                assert!(args.yes);
                assert!(args.keep_going);
                assert!(!args.dry_run);
                assert!(!args.sudo);
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::try_parse_from(["zfs-attrs", "diff", "--json", "-vv", "--zfs", "/sbin/zfs"])
            .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.zfs, "/sbin/zfs");
        assert!(matches!(cli.command, Command::Diff(DiffArgs { json: true })));
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
