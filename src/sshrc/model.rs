// ABOUTME: In-memory model of the sshrc file holding machine and profile records
// ABOUTME: Builds the model line by line and merges profile attributes into machines

use crate::error::{SshrcError, Warning};
use crate::sshrc::parser::{
    Attributes, Keyword, MACHINE_KEYWORDS, PROFILE_KEYWORDS, parse_fields, push_warning,
};
use std::fs;
use std::path::Path;

pub type MachineEntry = Attributes;
pub type ProfileEntry = Attributes;

#[derive(Debug, Clone, Default)]
pub struct SshrcFile {
    pub machines: Vec<MachineEntry>,
    pub profiles: Vec<ProfileEntry>,
    pub warnings: Vec<Warning>,
    resolved: bool,
}

impl SshrcFile {
    /// Build the model from raw lines without resolving profiles.
    pub fn load<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut file = SshrcFile::default();

        for (index, line) in lines.into_iter().enumerate() {
            let line_no = index + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();

            let Some(first) = fields.first() else {
                continue;
            };
            if first.starts_with('#') {
                continue;
            }

            let (kind, recognized) = match *first {
                "machine" => (Keyword::Machine, MACHINE_KEYWORDS),
                "profile" => (Keyword::Profile, PROFILE_KEYWORDS),
                _ => continue,
            };

            let Some(name) = fields.get(1) else {
                push_warning(
                    &mut file.warnings,
                    Warning::MissingValue { keyword: first.to_string(), line: line_no },
                );
                continue;
            };

            let mut record = parse_fields(&fields[2..], recognized, line_no, &mut file.warnings);
            record.insert(kind, *name);

            match kind {
                Keyword::Machine => file.machines.push(record),
                _ => file.profiles.push(record),
            }
        }

        tracing::debug!(
            "Loaded {} machines and {} profiles",
            file.machines.len(),
            file.profiles.len()
        );
        file
    }

    /// Load and resolve profiles in one go.
    pub fn parse(content: &str) -> Self {
        let mut file = Self::load(content.lines());
        file.resolve_profiles();
        file
    }

    pub fn from_path(path: &Path) -> Result<Self, SshrcError> {
        let content = fs::read_to_string(path).map_err(|source| SshrcError::ReadSshrc {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Parsing sshrc file: {}", path.display());
        Ok(Self::parse(&content))
    }

    /// First profile with the given name, in file order.
    pub fn find_profile(&self, name: &str) -> Option<&ProfileEntry> {
        self.profiles
            .iter()
            .find(|p| p.get(Keyword::Profile) == Some(name))
    }

    /// Copy profile attributes into every machine that references a profile.
    /// Attributes set on the machine itself always win. Runs once.
    pub fn resolve_profiles(&mut self) {
        if self.resolved {
            return;
        }
        self.resolved = true;

        let SshrcFile { machines, profiles, warnings, .. } = self;

        for machine in machines.iter_mut() {
            let Some(profile_name) = machine.get(Keyword::Profile).map(str::to_string) else {
                continue;
            };

            let profile = profiles
                .iter()
                .find(|p| p.get(Keyword::Profile) == Some(profile_name.as_str()));

            match profile {
                Some(profile) => {
                    for (keyword, value) in profile.iter() {
                        if keyword != Keyword::Profile {
                            machine.insert_if_absent(keyword, value);
                        }
                    }
                }
                None => {
                    let machine_name = machine.get(Keyword::Machine).unwrap_or_default();
                    push_warning(
                        warnings,
                        Warning::ProfileLinkMissing {
                            profile: profile_name,
                            machine: machine_name.to_string(),
                        },
                    );
                }
            }
        }
    }
}
