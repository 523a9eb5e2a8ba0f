//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::Application(e.into())
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Io(_) => crate::exitcode::IOERR,
            CliError::Application(e) => match e {
                ApplicationError::Config { .. } | ApplicationError::Catalog { .. } => {
                    crate::exitcode::CONFIG
                }
                ApplicationError::Domain(d) => match d {
                    DomainError::NotFound(_) => crate::exitcode::NOT_FOUND,
                    DomainError::StaleNode => crate::exitcode::SOFTWARE,
                    DomainError::InvalidPathLength { .. }
                    | DomainError::ClassMismatch { .. }
                    | DomainError::NotSpeciesLevel { .. }
                    | DomainError::RootDeletionRefused(_)
                    | DomainError::EmptyName { .. } => crate::exitcode::DATAERR,
                },
            },
        }
    }
}
