// ABOUTME: Launcher settings loaded from a TOML file: sshrc location, binaries and secret delivery
// ABOUTME: Every section is optional so an absent or partial file falls back to defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub sshrc: SshrcConfig,
    pub ssh: SshSettings,
    pub credentials: CredentialsConfig,
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SshrcConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SshSettings {
    pub ssh_binary: String,
    pub sshpass_binary: String,
    /// Flag emitted in front of the `port` attribute.
    pub port_flag: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    #[default]
    Env,
    Pipe,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CredentialsConfig {
    pub channel: ChannelKind,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LookupConfig {
    /// Open one session per matching machine instead of only the first.
    pub connect_all_matches: bool,
}

impl Default for SshrcConfig {
    fn default() -> Self {
        SshrcConfig {
            path: "./specfile.sshrc".to_string(),
        }
    }
}

impl Default for SshSettings {
    fn default() -> Self {
        SshSettings {
            ssh_binary: "ssh".to_string(),
            sshpass_binary: "sshpass".to_string(),
            port_flag: "-p".to_string(),
        }
    }
}

impl Config {
    pub fn default_config_content() -> &'static str {
        r#"# sshrc launcher configuration

[sshrc]
# Machine/profile file, relative paths resolve against the invocation directory
path = "./specfile.sshrc"

[ssh]
ssh_binary = "ssh"
# Wraps ssh when an entry carries a password
sshpass_binary = "sshpass"
# Flag used for the `port` attribute. Set to "-i" to mimic the old sshrc script.
port_flag = "-p"

[credentials]
# How the password reaches sshpass: "env" (SSHPASS variable) or "pipe" (unix only)
channel = "env"

[lookup]
# Connect to every machine matching the target instead of only the first
connect_all_matches = false
"#
    }

    pub fn load_from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::load_from_str(&content)
    }

    /// Load `path` if given, else the default location if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let default_path = Self::default_config_path()?;
                if default_path.exists() {
                    Self::load_from_file(&default_path)?
                } else {
                    tracing::debug!(
                        "No configuration at {}, using defaults",
                        default_path.display()
                    );
                    Config::default()
                }
            }
        };
        config.expand_path()?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(config_dir.join("sshrc").join("config.toml"))
    }

    pub fn expand_path(&mut self) -> Result<()> {
        self.sshrc.path = expand_tilde(&self.sshrc.path)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.sshrc.path.is_empty() {
            anyhow::bail!("sshrc path cannot be empty");
        }
        if self.ssh.ssh_binary.is_empty() {
            anyhow::bail!("ssh_binary cannot be empty");
        }
        if self.ssh.sshpass_binary.is_empty() {
            anyhow::bail!("sshpass_binary cannot be empty");
        }
        if !self.ssh.port_flag.starts_with('-') || self.ssh.port_flag.contains(char::is_whitespace)
        {
            anyhow::bail!("port_flag must be a single flag starting with '-'");
        }
        Ok(())
    }

    pub fn save_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write default config to: {}", path.display()))?;

        Ok(())
    }
}

fn expand_tilde(path: &str) -> Result<String> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(rest).to_string_lossy().into_owned())
    } else {
        Ok(path.to_string())
    }
}
