// File: crates/cppman/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("The project name \"{0}\" isn't a valid directory name.")]
    InvalidName(String),

    #[error("The language \"{0}\" isn't available.")]
    UnknownLanguage(String),

    #[error("The standard \"{standard}\" isn't for the language \"{language}\".")]
    UnsupportedStandard { standard: String, language: String },

    #[error("The project template \"{}\" doesn't exist.", .0.display())]
    MissingTemplate(PathBuf),

    #[error("refusing to overwrite existing file \"{}\"", .0.display())]
    DestinationExists(PathBuf),

    #[error("io error at \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScaffoldError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this failure.
    ///
    /// 2: the requested name, language, standard or template cannot be used.
    /// 3: the project could not be written to disk.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScaffoldError::InvalidName(_)
            | ScaffoldError::UnknownLanguage(_)
            | ScaffoldError::UnsupportedStandard { .. }
            | ScaffoldError::MissingTemplate(_) => 2,
            ScaffoldError::DestinationExists(_) | ScaffoldError::Io { .. } => 3,
        }
    }
}
