use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditError {
    #[error("Failed to decode source text: {0}")]
    Parse(String),

    #[error("Malformed query pattern `{pattern}`: {message}")]
    Query { pattern: String, message: String },

    #[error("Unable to locate field insertion point in {}", .0.display())]
    InsertionPointNotFound(PathBuf),

    #[error("I/O failure on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Runtime invariant violated: {0}")]
    RuntimeInvariant(String),

    #[error("Editor command failed: {0}")]
    Editor(String),

    #[error("Main class not found; cannot proceed")]
    MainClassNotFound,

    #[error("No entity named `{0}` found in project")]
    EntityNotFound(String),

    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl EditError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EditError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type EditResult<T> = Result<T, EditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_error_display() {
        let error = EditError::InsertionPointNotFound(PathBuf::from("/tmp/Order.java"));
        assert_eq!(
            format!("{error}"),
            "Unable to locate field insertion point in /tmp/Order.java"
        );

        let error = EditError::Query {
            pattern: "(class_declaration".to_string(),
            message: "syntax".to_string(),
        };
        assert_eq!(
            format!("{error}"),
            "Malformed query pattern `(class_declaration`: syntax"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        let error = EditError::io(
            "/nope/A.java",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(format!("{error}").starts_with("I/O failure on /nope/A.java"));
        assert!(std::error::Error::source(&error).is_some());
    }
}
