// ABOUTME: Runs login commands in the foreground with the terminal inherited
// ABOUTME: Wires the credential channel into the helper invocation and reports spawn failures

use crate::error::SshrcError;
use crate::ssh::command::LoginCommand;
use crate::ssh::credentials::CredentialChannel;
use std::io::{self, Write};
use std::process::Command;

/// Executes an argv to completion and returns its exit code.
pub trait ProcessRunner {
    fn run(&self, argv: &[String], env: &[(String, String)]) -> io::Result<i32>;
}

/// Spawns real processes with stdin/stdout/stderr inherited.
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, argv: &[String], env: &[(String, String)]) -> io::Result<i32> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command line"))?;

        let resolved = which::which(program)
            .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("{program}: {e}")))?;
        tracing::debug!("Resolved {} to {}", program, resolved.display());

        let status = Command::new(resolved).args(args).envs(env.iter().cloned()).status()?;
        // Killed by a signal: no code, report a plain failure
        Ok(status.code().unwrap_or(1))
    }
}

pub struct SessionLauncher<'a> {
    runner: &'a dyn ProcessRunner,
    channel: &'a dyn CredentialChannel,
}

impl<'a> SessionLauncher<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, channel: &'a dyn CredentialChannel) -> Self {
        Self { runner, channel }
    }

    /// The argv `launch` would run, with placeholders where the channel
    /// only knows its values after delivery.
    pub fn preview(&self, command: &LoginCommand) -> Vec<String> {
        match command.secret {
            Some(_) => command.argv_with_helper_args(&self.channel.preview_args()),
            None => command.argv.clone(),
        }
    }

    /// Echo the command line to `out`, then run it in the foreground.
    pub fn launch(&self, command: &LoginCommand, out: &mut dyn Write) -> Result<i32, SshrcError> {
        let Some(secret) = &command.secret else {
            echo(out, &command.argv);
            return self.spawn(&command.argv, &[]);
        };

        // Keep the delivery alive until the child has exited
        let delivery = self.channel.deliver(secret).map_err(|source| SshrcError::Credential {
            channel: self.channel.name(),
            source,
        })?;
        let argv = command.argv_with_helper_args(&delivery.helper_args);
        tracing::debug!("Password delivered via {} channel", self.channel.name());
        echo(out, &argv);

        let code = self.spawn(&argv, &delivery.env);
        drop(delivery);
        code
    }

    fn spawn(&self, argv: &[String], env: &[(String, String)]) -> Result<i32, SshrcError> {
        match self.runner.run(argv, env) {
            Ok(code) => {
                tracing::debug!("{} exited with {}", argv[0], code);
                Ok(code)
            }
            Err(source) => {
                tracing::debug!("Spawning {} failed: {}", argv[0], source);
                Err(SshrcError::Spawn {
                    program: argv[0].clone(),
                    source,
                })
            }
        }
    }
}

fn echo(out: &mut dyn Write, argv: &[String]) {
    // Output failures must not stop the session from starting
    if let Err(e) = writeln!(out, "{}", argv.join(" ")) {
        tracing::debug!("Failed to echo command line: {}", e);
    }
}
