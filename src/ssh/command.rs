// ABOUTME: Builds the ssh argv for a resolved session, plain or wrapped by sshpass
// ABOUTME: Passwords travel beside the argv as a Secret and never become an argument

use crate::config::SshSettings;
use crate::ssh::credentials::Secret;
use crate::sshrc::{Keyword, Session};

/// Argv ready to spawn plus the password that has to reach the helper out of band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCommand {
    pub argv: Vec<String>,
    pub secret: Option<Secret>,
}

impl LoginCommand {
    /// Bare `ssh <target>` with no attributes, used when nothing in the sshrc matches.
    pub fn passthrough(target: &str, settings: &SshSettings) -> Self {
        Self {
            argv: vec![settings.ssh_binary.clone(), target.to_string()],
            secret: None,
        }
    }

    /// Argv with extra helper flags spliced in right after the program.
    pub fn argv_with_helper_args(&self, helper_args: &[String]) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.argv.len() + helper_args.len());
        argv.push(self.argv[0].clone());
        argv.extend(helper_args.iter().cloned());
        argv.extend(self.argv[1..].iter().cloned());
        argv
    }
}

pub fn build_command(session: &Session, settings: &SshSettings) -> LoginCommand {
    let machine = session.get(Keyword::Machine).unwrap_or_default();
    let target = match session.non_empty(Keyword::Login) {
        Some(login) => format!("{login}@{machine}"),
        None => machine.to_string(),
    };

    let mut flags: Vec<String> = Vec::new();
    if let Some(keyfile) = session.non_empty(Keyword::Keyfile) {
        flags.push("-i".to_string());
        flags.push(keyfile.to_string());
    }
    if let Some(port) = session.non_empty(Keyword::Port) {
        flags.push(settings.port_flag.clone());
        flags.push(port.to_string());
    }
    if let Some(args) = session.get(Keyword::Args) {
        flags.extend(args.split_whitespace().map(str::to_string));
    }

    let mut argv = Vec::with_capacity(flags.len() + 3);
    let secret = match session.get(Keyword::Password) {
        Some(password) => {
            argv.push(settings.sshpass_binary.clone());
            argv.push(settings.ssh_binary.clone());
            argv.push(target);
            argv.extend(flags);
            Some(Secret::new(password))
        }
        None => {
            argv.push(settings.ssh_binary.clone());
            argv.extend(flags);
            argv.push(target);
            None
        }
    };

    // Attribute values are single tokens, but stay safe if one came in empty
    argv.retain(|token| !token.is_empty());

    LoginCommand { argv, secret }
}
