use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`StageError`], for callers that branch on the
/// failure without matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The external client could not be started
    LaunchFailure,
    /// The external client ran and exited non-zero
    CheckoutFailure,
    /// A host path could not be expressed in the client's path syntax
    PathTranslationFailure,
    /// Promoting the context subdirectory into the source directory failed
    ExtractionFailure,
    /// The source location could not be parsed
    InvalidSource,
    /// Configuration could not be loaded or failed validation
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::LaunchFailure => "launch failure",
            ErrorKind::CheckoutFailure => "checkout failure",
            ErrorKind::PathTranslationFailure => "path translation failure",
            ErrorKind::ExtractionFailure => "extraction failure",
            ErrorKind::InvalidSource => "invalid source",
            ErrorKind::Config => "configuration error",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum StageError {
    #[error("Failed to launch '{program}': {source}")]
    LaunchFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Checkout of {location} into {} failed with exit code {exit_code}{}", .target.display(), render_output(.output))]
    CheckoutFailure {
        location: String,
        target: PathBuf,
        exit_code: i32,
        output: String,
    },

    #[error("Cannot translate path {}: {reason}", .path.display())]
    PathTranslationFailure { path: PathBuf, reason: String },

    #[error("Extraction failed at {}: {source}", .path.display())]
    ExtractionFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid source location '{location}': {reason}")]
    InvalidSource { location: String, reason: String },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

fn render_output(output: &str) -> String {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl StageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LaunchFailure { .. } => ErrorKind::LaunchFailure,
            Self::CheckoutFailure { .. } => ErrorKind::CheckoutFailure,
            Self::PathTranslationFailure { .. } => ErrorKind::PathTranslationFailure,
            Self::ExtractionFailure { .. } => ErrorKind::ExtractionFailure,
            Self::InvalidSource { .. } => ErrorKind::InvalidSource,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    pub fn launch_failure(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::LaunchFailure {
            program: program.into(),
            source,
        }
    }

    pub fn checkout_failure(
        location: impl Into<String>,
        target: impl Into<PathBuf>,
        exit_code: i32,
        output: impl Into<String>,
    ) -> Self {
        Self::CheckoutFailure {
            location: location.into(),
            target: target.into(),
            exit_code,
            output: output.into(),
        }
    }

    pub fn path_translation_failure(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::PathTranslationFailure {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn extraction_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ExtractionFailure {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_source(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSource {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn config_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn config_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            path,
            source: Some(Box::new(source)),
        }
    }
}

impl From<serde_yaml::Error> for StageError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::config_error_with_source("YAML deserialization failed", None, error)
    }
}

impl From<validator::ValidationErrors> for StageError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::config_error(format!("validation failed: {}", errors), None)
    }
}
