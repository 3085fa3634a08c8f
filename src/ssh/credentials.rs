// ABOUTME: Pluggable channels that hand a password to sshpass without putting it on the argv
// ABOUTME: Supports the SSHPASS environment variable and an inherited anonymous pipe

use crate::config::ChannelKind;
use std::fmt;
use std::io;

#[cfg(unix)]
use std::os::fd::OwnedFd;

/// A password that must not be logged or passed as an argument.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// What the launcher needs to add to the helper invocation.
#[derive(Default)]
pub struct Delivery {
    /// Flags inserted right after the helper binary.
    pub helper_args: Vec<String>,
    /// Variables set on the child only.
    pub env: Vec<(String, String)>,
    /// Descriptor the child reads from; must outlive the child.
    #[cfg(unix)]
    pub keep_alive: Option<OwnedFd>,
}

pub trait CredentialChannel {
    fn name(&self) -> &'static str;

    /// Helper flags as they would appear, without touching the secret.
    fn preview_args(&self) -> Vec<String>;

    fn deliver(&self, secret: &Secret) -> io::Result<Delivery>;
}

pub fn channel_for(kind: ChannelKind) -> Box<dyn CredentialChannel> {
    match kind {
        ChannelKind::Env => Box::new(EnvChannel),
        ChannelKind::Pipe => Box::new(PipeChannel),
    }
}

/// `sshpass -e`, password in `SSHPASS` on the child environment.
pub struct EnvChannel;

pub const SSHPASS_ENV: &str = "SSHPASS";

impl CredentialChannel for EnvChannel {
    fn name(&self) -> &'static str {
        "env"
    }

    fn preview_args(&self) -> Vec<String> {
        vec!["-e".to_string()]
    }

    fn deliver(&self, secret: &Secret) -> io::Result<Delivery> {
        Ok(Delivery {
            helper_args: self.preview_args(),
            env: vec![(SSHPASS_ENV.to_string(), secret.expose().to_string())],
            ..Delivery::default()
        })
    }
}

/// `sshpass -d <fd>`, password written into a pipe the child inherits.
pub struct PipeChannel;

/// Stand-in for the descriptor number, which only exists once delivered.
pub const PIPE_FD_PLACEHOLDER: &str = "<fd>";

/// The password is written before the helper starts, so it must fit in the pipe buffer.
pub const MAX_PIPE_SECRET_LEN: usize = 4096;

impl CredentialChannel for PipeChannel {
    fn name(&self) -> &'static str {
        "pipe"
    }

    fn preview_args(&self) -> Vec<String> {
        vec!["-d".to_string(), PIPE_FD_PLACEHOLDER.to_string()]
    }

    #[cfg(unix)]
    fn deliver(&self, secret: &Secret) -> io::Result<Delivery> {
        use std::io::Write;
        use std::os::fd::AsRawFd;

        if secret.expose().len() > MAX_PIPE_SECRET_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("password longer than {MAX_PIPE_SECRET_LEN} bytes"),
            ));
        }

        let (reader, mut writer) = io::pipe()?;
        writer.write_all(secret.expose().as_bytes())?;
        // Closing the write end gives sshpass EOF after the password
        drop(writer);

        let fd: OwnedFd = reader.into();
        let raw = fd.as_raw_fd();
        // SAFETY: `raw` belongs to `fd`, which stays open for this call.
        // Clearing FD_CLOEXEC lets the spawned helper inherit it.
        let rc = unsafe { libc::fcntl(raw, libc::F_SETFD, 0) };
        if rc == -1 {
            return Err(io::Error::last_os_error());
        }

        Ok(Delivery {
            helper_args: vec!["-d".to_string(), raw.to_string()],
            env: Vec::new(),
            keep_alive: Some(fd),
        })
    }

    #[cfg(not(unix))]
    fn deliver(&self, _secret: &Secret) -> io::Result<Delivery> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "pipe credential channel requires a unix platform",
        ))
    }
}
