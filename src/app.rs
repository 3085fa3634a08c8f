// ABOUTME: Application flow tying settings, sshrc resolution, command building and launching
// ABOUTME: Takes the process runner and output as parameters so the whole flow is testable

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{LookupError, SshrcError};
use crate::ssh::{LoginCommand, ProcessRunner, SessionLauncher, build_command, channel_for};
use crate::sshrc::SshrcFile;
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;

pub struct App<'a> {
    config: Config,
    runner: &'a dyn ProcessRunner,
    out: &'a mut dyn Write,
}

impl<'a> App<'a> {
    pub fn new(config: Config, runner: &'a dyn ProcessRunner, out: &'a mut dyn Write) -> Self {
        Self { config, runner, out }
    }

    /// Entry point for a parsed command line. Returns the process exit code.
    pub fn run_cli(cli: &Cli, runner: &'a dyn ProcessRunner, out: &'a mut dyn Write) -> Result<i32> {
        if cli.init_config {
            let path = match &cli.config {
                Some(path) => path.clone(),
                None => Config::default_config_path()?,
            };
            Config::save_default_config(&path)?;
            writeln!(out, "Wrote default configuration to {}", path.display())?;
            return Ok(0);
        }

        let config = Config::load(cli.config.as_deref())?;
        let target = cli.target.as_deref().unwrap_or_default();
        App::new(config, runner, out).connect(target, cli.profile.as_deref(), cli.file.clone(), cli.dry_run)
    }

    pub fn connect(
        &mut self,
        target: &str,
        forced_profile: Option<&str>,
        file: Option<PathBuf>,
        dry_run: bool,
    ) -> Result<i32> {
        let path = file.unwrap_or_else(|| PathBuf::from(&self.config.sshrc.path));
        let sshrc = SshrcFile::from_path(&path)?;

        match sshrc.resolve_target(target, forced_profile) {
            Ok(mut sessions) => {
                if !self.config.lookup.connect_all_matches {
                    sessions.truncate(1);
                }

                let mut code = 0;
                for session in &sessions {
                    let command = build_command(session, &self.config.ssh);
                    code = self.execute(&command, dry_run)?;
                }
                Ok(code)
            }
            Err(LookupError::ProfileNotFound(name)) => Err(SshrcError::ProfileNotFound(name).into()),
            Err(LookupError::NotFound(target)) => {
                tracing::debug!("No sshrc entry for '{}', falling back to plain ssh", target);
                let command = LoginCommand::passthrough(&target, &self.config.ssh);
                // Passthrough status is not propagated
                self.execute(&command, dry_run)?;
                Ok(0)
            }
        }
    }

    fn execute(&mut self, command: &LoginCommand, dry_run: bool) -> Result<i32> {
        let channel = channel_for(self.config.credentials.channel);
        let launcher = SessionLauncher::new(self.runner, channel.as_ref());

        if dry_run {
            writeln!(self.out, "{}", launcher.preview(command).join(" "))?;
            return Ok(0);
        }
        Ok(launcher.launch(command, &mut *self.out)?)
    }
}
