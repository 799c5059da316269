use crate::common::{StageError, StageResult};
use crate::domain::entities::retrieval::{Credentials, RetrievalRequest};
use crate::domain::value_objects::source_url::SourceUrl;
use crate::infrastructure::path::PathModeSetting;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use validator::{Validate, ValidationError};

fn default_client() -> String {
    "svn".to_string()
}

fn validate_context_dir(context_dir: &str) -> Result<(), ValidationError> {
    let path = Path::new(context_dir);
    if path.is_absolute() || context_dir.starts_with('/') || context_dir.starts_with('\\') {
        return Err(ValidationError::new("context_dir_absolute"));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(ValidationError::new("context_dir_parent"));
    }
    Ok(())
}

/// Staging settings as read from a YAML file and/or the command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StageConfig {
    /// Root directory for staging
    #[serde(default)]
    #[validate(length(min = 1, message = "working_dir must not be empty"))]
    pub working_dir: String,

    /// Repository URL or local path
    #[serde(default)]
    #[validate(length(min = 1, message = "source must not be empty"))]
    pub source: String,

    /// Revision pin, empty for HEAD
    #[serde(default)]
    pub revision: String,

    /// Subdirectory to stage instead of the whole tree
    #[serde(default)]
    #[validate(custom(function = "validate_context_dir"))]
    pub context_dir: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    #[serde(default)]
    pub ignore_submodules: bool,

    /// Client program name or path
    #[serde(default = "default_client")]
    #[validate(length(min = 1, message = "client must not be empty"))]
    pub client: String,

    #[serde(default)]
    pub path_mode: PathModeSetting,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            working_dir: String::new(),
            source: String::new(),
            revision: String::new(),
            context_dir: String::new(),
            username: None,
            password: None,
            ignore_submodules: false,
            client: default_client(),
            path_mode: PathModeSetting::default(),
        }
    }
}

impl StageConfig {
    pub fn new(working_dir: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            working_dir: working_dir.into(),
            source: source.into(),
            ..Self::default()
        }
    }

    /// Load from a YAML file. The result is not validated yet.
    pub fn load_from_file(path: &Path) -> StageResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StageError::config_error_with_source(
                format!("Failed to read {}", path.display()),
                Some(path.to_path_buf()),
                e,
            )
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            StageError::config_error_with_source(
                format!("Failed to parse {}", path.display()),
                Some(path.to_path_buf()),
                e,
            )
        })
    }

    /// Validate and turn into a request
    pub fn into_request(self) -> StageResult<RetrievalRequest> {
        self.validate()?;

        let source = SourceUrl::new(&self.source)
            .map_err(|e| StageError::invalid_source(&self.source, e.to_string()))?;

        let credentials = match (self.username, self.password) {
            (None, None) => None,
            (username, password) => Some(Credentials::new(
                username.unwrap_or_default(),
                password.unwrap_or_default(),
            )),
        };

        let mut request = RetrievalRequest::new(self.working_dir, source)
            .with_revision(self.revision)
            .with_context_dir(self.context_dir)
            .with_ignore_submodules(self.ignore_submodules);
        request.credentials = credentials;

        Ok(request)
    }
}
