// ABOUTME: sshrc file handling: record parsing, the machine/profile model and target lookup
// ABOUTME: Everything here is pure and in-memory apart from reading the file itself

pub mod lookup;
pub mod model;
pub mod parser;

pub use lookup::Session;
pub use model::SshrcFile;
pub use parser::Keyword;
