// ABOUTME: Command-line interface definition for the sshrc launcher
// ABOUTME: One positional target plus flags for profile forcing, file locations and dry runs

use clap::Parser;
use std::path::PathBuf;

/// Streamlines SSH access to commonly-used servers
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "sshrc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Hostname, IP address or nickname to access via SSH
    #[arg(value_name = "HOSTNAME OR NICK", required_unless_present = "init_config")]
    pub target: Option<String>,

    /// Force usage of a specific profile from the sshrc file
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// sshrc file to read (overrides the configured path)
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Launcher settings file (default: <config dir>/sshrc/config.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the ssh command line(s) instead of running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Write a default settings file and exit
    #[arg(long)]
    pub init_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
