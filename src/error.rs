use std::{error::Error, fmt, io, path::PathBuf};

use crate::literal::LiteralError;

/// The crate's result type.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Failures that stop a config build.
#[derive(Debug)]
pub enum BuildError {
    /// A file could not be read or written.
    Io { path: PathBuf, source: io::Error },
    /// The existing config file is not a valid JSON object.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A dict literal scraped from the training script did not parse.
    Literal {
        field: &'static str,
        source: LiteralError,
    },
    /// The console went away while a question was pending.
    Prompt(io::Error),
    /// The framework version could not be determined.
    VersionUnavailable(String),
    /// The operator declined a step the build cannot continue without.
    Aborted(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            BuildError::Json { path, source } => {
                write!(f, "invalid JSON in {}: {source}", path.display())
            }
            BuildError::Literal { field, source } => {
                write!(f, "cannot parse scraped value for {field}: {source}")
            }
            BuildError::Prompt(e) => write!(f, "console error: {e}"),
            BuildError::VersionUnavailable(msg) => write!(f, "version unavailable: {msg}"),
            BuildError::Aborted(msg) => write!(f, "aborted: {msg}"),
        }
    }
}

impl Error for BuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BuildError::Io { source, .. } => Some(source),
            BuildError::Json { source, .. } => Some(source),
            BuildError::Literal { source, .. } => Some(source),
            BuildError::Prompt(e) => Some(e),
            _ => None,
        }
    }
}
