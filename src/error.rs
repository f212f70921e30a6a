use std::path::PathBuf;

/// The error taxonomy from the system's error handling design: config
/// errors are rejected before any load is attempted, load errors carry
/// enough context to locate the offending byte in the input file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to load {path}: {reason}")]
    Load {
        path: PathBuf,
        reason: String,
        offset: Option<u64>,
    },
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn load(path: impl Into<PathBuf>, reason: impl Into<String>, offset: Option<u64>) -> Self {
        Error::Load {
            path: path.into(),
            reason: reason.into(),
            offset,
        }
    }
}
