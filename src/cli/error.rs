//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                ApplicationError::Outline { .. } => crate::exitcode::DATAERR,
                ApplicationError::OutlineExists(_) => crate::exitcode::CANTCREAT,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        let usage = CliError::Usage("no command".into());
        assert_eq!(usage.exit_code(), crate::exitcode::USAGE);

        let outline = CliError::from(ApplicationError::Outline {
            path: PathBuf::from("x.toml"),
            message: "bad".into(),
        });
        assert_eq!(outline.exit_code(), crate::exitcode::DATAERR);

        let domain = CliError::from(ApplicationError::from(DomainError::InvalidArgument(
            "no parent".into(),
        )));
        assert_eq!(domain.exit_code(), crate::exitcode::DATAERR);

        let exists = CliError::from(ApplicationError::OutlineExists(PathBuf::from("x.toml")));
        assert_eq!(exists.exit_code(), crate::exitcode::CANTCREAT);
    }
}
