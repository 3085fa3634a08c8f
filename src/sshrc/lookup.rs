// ABOUTME: Target lookup matching a requested host or nick against resolved machines
// ABOUTME: Also synthesizes ad hoc sessions when the user forces a named profile

use crate::error::{LookupError, Warning};
use crate::sshrc::model::SshrcFile;
use crate::sshrc::parser::{Attributes, Keyword};

/// Fully merged attributes for one login attempt.
pub type Session = Attributes;

impl SshrcFile {
    /// Resolve what to connect to for `requested`.
    ///
    /// With a forced profile the requested string becomes the host outright.
    /// Otherwise every machine whose `machine` or `nick` equals `requested` is
    /// returned in file order; the caller picks how many to use.
    pub fn resolve_target(
        &self,
        requested: &str,
        forced_profile: Option<&str>,
    ) -> Result<Vec<Session>, LookupError> {
        if let Some(name) = forced_profile {
            let Some(profile) = self.find_profile(name) else {
                Warning::ForcedProfileNotFound { profile: name.to_string() }.emit();
                return Err(LookupError::ProfileNotFound(name.to_string()));
            };

            let mut session = Session::new();
            session.insert(Keyword::Machine, requested);
            for (keyword, value) in profile.iter() {
                session.insert(keyword, value);
            }
            tracing::debug!("Using forced profile '{}' for {}", name, requested);
            return Ok(vec![session]);
        }

        let matches: Vec<Session> = self
            .machines
            .iter()
            .filter(|m| {
                m.get(Keyword::Machine) == Some(requested) || m.get(Keyword::Nick) == Some(requested)
            })
            .cloned()
            .collect();

        if matches.is_empty() {
            return Err(LookupError::NotFound(requested.to_string()));
        }
        if matches.len() > 1 {
            tracing::debug!("{} machines match '{}'", matches.len(), requested);
        }
        Ok(matches)
    }
}
