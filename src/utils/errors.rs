use std::fmt;
use std::io;

#[derive(Debug)]
pub enum PascalError {
    // File and I/O errors
    FileReadError(String),
    IoError(io::Error),

    // The syntax error budget was exhausted; translation stops.
    TooManyErrors {
        count: usize,
        line: usize,
    },

    // Back end failures
    BackendError {
        stage: String,
        message: String,
    },

    // Broken internal invariant (never caused by user input)
    InternalError(String),
}

impl PascalError {
    /// Create a back end error for a specific stage
    pub fn backend_error(stage: impl Into<String>, message: impl Into<String>) -> Self {
        PascalError::BackendError {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        PascalError::InternalError(message.into())
    }

    /// Process exit status for this error.
    pub fn exit_status(&self) -> i32 {
        match self {
            PascalError::TooManyErrors { .. } => {
                crate::frontend::errors::PascalErrorCode::TooManyErrors.status()
            }
            PascalError::FileReadError(_) | PascalError::IoError(_) => {
                crate::frontend::errors::PascalErrorCode::IoError.status()
            }
            _ => 1,
        }
    }
}

impl fmt::Display for PascalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PascalError::FileReadError(msg) => write!(f, "File read error: {}", msg),
            PascalError::IoError(err) => write!(f, "I/O error: {}", err),
            PascalError::TooManyErrors { count, line } => {
                write!(f, "Too many syntax errors ({}) at line {}", count, line)
            }
            PascalError::BackendError { stage, message } => {
                write!(f, "Back end error in {}: {}", stage, message)
            }
            PascalError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for PascalError {}

impl From<io::Error> for PascalError {
    fn from(err: io::Error) -> Self {
        PascalError::IoError(err)
    }
}

impl From<String> for PascalError {
    fn from(err: String) -> Self {
        PascalError::InternalError(err)
    }
}

impl From<&str> for PascalError {
    fn from(err: &str) -> Self {
        PascalError::InternalError(err.to_string())
    }
}

impl From<fmt::Error> for PascalError {
    fn from(_: fmt::Error) -> Self {
        PascalError::InternalError("fmt error".to_string())
    }
}

// Type alias for Result with PascalError
pub type PascalResult<T> = Result<T, PascalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = PascalError::TooManyErrors { count: 26, line: 40 };
        assert_eq!(err.to_string(), "Too many syntax errors (26) at line 40");
        let err = PascalError::backend_error("interpreter", "boom");
        assert_eq!(err.to_string(), "Back end error in interpreter: boom");
    }

    #[test]
    fn too_many_errors_exit_status() {
        let err = PascalError::TooManyErrors { count: 26, line: 1 };
        assert_eq!(
            err.exit_status(),
            crate::frontend::errors::PascalErrorCode::TooManyErrors.status()
        );
        assert_eq!(PascalError::internal_error("x").exit_status(), 1);
    }
}
