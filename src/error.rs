// ABOUTME: Error and warning types shared by the sshrc loader, lookup and launcher
// ABOUTME: Fatal conditions are typed errors, recoverable ones are collected warnings

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Non-fatal problems found while loading or resolving the sshrc file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("unrecognized keyword `{keyword}` on line {line}")]
    UnrecognizedKeyword { keyword: String, line: usize },

    #[error("keyword `{keyword}` has no value on line {line}")]
    MissingValue { keyword: String, line: usize },

    #[error("profile `{profile}` specified for {machine} not found")]
    ProfileLinkMissing { profile: String, machine: String },

    #[error("specified profile `{profile}` not found")]
    ForcedProfileNotFound { profile: String },
}

impl Warning {
    /// Log the warning to the diagnostic stream.
    pub fn emit(&self) {
        tracing::warn!("{self}");
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("profile `{0}` not found")]
    ProfileNotFound(String),
    #[error("no machine or nick matches `{0}`")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum SshrcError {
    #[error("failed to read sshrc file {}: {source}", path.display())]
    ReadSshrc { path: PathBuf, source: io::Error },

    #[error("specified profile `{0}` not found")]
    ProfileNotFound(String),

    #[error("failed to start `{program}`: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("failed to prepare {channel} credential channel: {source}")]
    Credential { channel: &'static str, source: io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_messages_name_the_culprit() {
        let w = Warning::ProfileLinkMissing {
            profile: "prod".to_string(),
            machine: "db1".to_string(),
        };
        assert_eq!(w.to_string(), "profile `prod` specified for db1 not found");

        let w = Warning::UnrecognizedKeyword { keyword: "user".to_string(), line: 3 };
        assert!(w.to_string().contains("`user`"));
        assert!(w.to_string().contains("line 3"));

        let w = Warning::MissingValue { keyword: "port".to_string(), line: 2 };
        assert_eq!(w.to_string(), "keyword `port` has no value on line 2");

        let w = Warning::ForcedProfileNotFound { profile: "staging".to_string() };
        assert_eq!(w.to_string(), "specified profile `staging` not found");
    }

    #[test]
    fn test_warning_is_a_std_error() {
        let w = Warning::ForcedProfileNotFound { profile: "x".to_string() };
        assert!(std::error::Error::source(&w).is_none());
    }

    #[test]
    fn test_spawn_error_keeps_cause() {
        let err = SshrcError::Spawn {
            program: "sshpass".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not in PATH"),
        };
        let msg = err.to_string();
        assert!(msg.contains("sshpass"));
        assert!(msg.contains("not in PATH"));
    }
}
