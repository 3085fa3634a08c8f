// ABOUTME: ssh command construction, password delivery and foreground process launching
// ABOUTME: Turns a resolved session into a running ssh (or sshpass-wrapped ssh) process

pub mod command;
pub mod credentials;
pub mod launcher;

pub use command::{LoginCommand, build_command};
pub use credentials::channel_for;
pub use launcher::{ProcessRunner, SessionLauncher, SystemRunner};
