//! CLI tools for artipub
//!
//! Wraps the publish core for use as a build step:
//! - `run`: execute one publish invocation from a step configuration file
//! - `check`: validate a configuration and the repository connection
//! - `completions`: generate shell completions

pub mod check;
pub mod completions;
pub mod run;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// CLI arguments for artipub
#[derive(Parser, Debug)]
#[command(name = "artipub")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute one publish invocation
    Run {
        /// Step configuration file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,
        /// Base directory file matching is rooted at (defaults to the
        /// current directory)
        #[arg(short, long)]
        base_dir: Option<PathBuf>,
        /// Directory the temporary working copy is created under (defaults
        /// to $WORKSPACE, then the base directory)
        #[arg(short, long)]
        workspace: Option<PathBuf>,
        /// Additional KEY=VALUE variables, overriding the process environment
        #[arg(short, long)]
        param: Vec<String>,
    },

    /// Validate a configuration and the repository connection
    Check {
        /// Step configuration file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,
        /// Skip the connection attempt and only validate the file
        #[arg(long)]
        offline: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: ShellArg,
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ShellArg {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

impl From<ShellArg> for Shell {
    fn from(arg: ShellArg) -> Self {
        match arg {
            ShellArg::Bash => Shell::Bash,
            ShellArg::Zsh => Shell::Zsh,
            ShellArg::Fish => Shell::Fish,
            ShellArg::PowerShell => Shell::PowerShell,
        }
    }
}

/// Build the CLI command for completion generation
pub fn build_cli() -> clap::Command {
    use clap::CommandFactory;
    Args::command()
}

/// Parse and execute CLI arguments
pub fn run() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Run {
            config,
            base_dir,
            workspace,
            param,
        } => run::run_publish(&config, base_dir, workspace, &param),
        Command::Check { config, offline } => check::check_config(&config, offline),
        Command::Completions { shell, output } => {
            let completions = completions::generate_completions(shell.into())?;
            match output {
                Some(path) => completions::save_completions(&completions, &path),
                None => {
                    print!("{completions}");
                    Ok(())
                }
            }
        }
    }
}
