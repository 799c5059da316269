use crate::domain::value_objects::source_url::SourceUrl;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Directory under the working dir holding the staged source tree
pub const SOURCE_DIR_NAME: &str = "source";

/// Directory under the working dir used for a full checkout before a
/// context subdirectory is promoted
pub const CONTEXT_TMP_DIR_NAME: &str = "context-tmp";

/// Username/password pair handed to the client
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both halves present; only then are credentials passed to the client
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything needed to stage one source tree
#[derive(Debug, Clone)]
pub struct RetrievalRequest {
    /// Root for staging
    pub working_dir: PathBuf,
    /// Where to check out from
    pub source: SourceUrl,
    /// Revision pin; empty means the client's default (HEAD)
    pub revision: String,
    /// Subdirectory of the checkout that becomes the staged tree; empty for the whole tree
    pub context_dir: String,
    pub credentials: Option<Credentials>,
    /// Informational only, svn externals are always fetched
    pub ignore_submodules: bool,
}

impl RetrievalRequest {
    pub fn new(working_dir: impl Into<PathBuf>, source: SourceUrl) -> Self {
        Self {
            working_dir: working_dir.into(),
            source,
            revision: String::new(),
            context_dir: String::new(),
            credentials: None,
            ignore_submodules: false,
        }
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    pub fn with_context_dir(mut self, context_dir: impl Into<String>) -> Self {
        self.context_dir = context_dir.into();
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    pub fn with_ignore_submodules(mut self, ignore: bool) -> Self {
        self.ignore_submodules = ignore;
        self
    }

    pub fn has_context_dir(&self) -> bool {
        !self.context_dir.is_empty()
    }

    pub fn layout(&self) -> StagingLayout {
        StagingLayout::new(&self.working_dir)
    }
}

/// Record of what was staged, consumed by later pipeline stages
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Source location without its fragment
    pub location: String,
    /// Revision as requested, possibly empty
    #[serde(rename = "ref")]
    pub revision: String,
    /// Context subdirectory that was promoted, empty when none
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context_dir: String,
}

/// On-disk staging paths for one working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingLayout {
    source_dir: PathBuf,
    scratch_dir: PathBuf,
}

impl StagingLayout {
    pub fn new(working_dir: &Path) -> Self {
        Self {
            source_dir: working_dir.join(SOURCE_DIR_NAME),
            scratch_dir: working_dir.join(CONTEXT_TMP_DIR_NAME),
        }
    }

    /// Canonical staged source directory
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Scratch checkout directory
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Where the client should write: the scratch dir when a context
    /// subdirectory is requested, otherwise the canonical source dir
    pub fn checkout_target(&self, request: &RetrievalRequest) -> &Path {
        if request.has_context_dir() {
            &self.scratch_dir
        } else {
            &self.source_dir
        }
    }

    /// Subtree of the scratch checkout that gets promoted. `None` when
    /// `context_dir` is absolute or climbs out with `..`.
    pub fn context_path(&self, context_dir: &str) -> Option<PathBuf> {
        let relative = Path::new(context_dir);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        contained.then(|| self.scratch_dir.join(relative))
    }
}
