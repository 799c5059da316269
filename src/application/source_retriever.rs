//! Staging of a pinned svn checkout into a working directory.
//!
//! `download` checks out either straight into `<working_dir>/source` or, when a
//! context subdirectory is requested, into `<working_dir>/context-tmp` and then
//! promotes `<context-tmp>/<context_dir>` to `<working_dir>/source`.
//!
//! When promotion fails the scratch checkout is left in place and the source
//! directory has already been cleared.

use crate::common::{IoResultExt, StageError, StageResult};
use crate::domain::entities::retrieval::{Credentials, RetrievalRequest, SourceInfo};
use crate::domain::value_objects::source_url::SourceUrl;
use crate::infrastructure::filesystem::FileSystem;
use crate::infrastructure::path::{to_client_path, PathMode};
use crate::infrastructure::process::{CommandError, CommandRunner, StdioMode};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// Default client program
pub const DEFAULT_CLIENT: &str = "svn";

/// `<source>` or `<source>@<revision>`, without the fragment
pub fn source_spec(source: &SourceUrl, revision: &str) -> String {
    let location = source.string_no_fragment();
    if revision.is_empty() {
        location
    } else {
        format!("{}@{}", location, revision)
    }
}

/// Arguments for `svn checkout`. Credentials are only passed when both halves are set.
pub fn build_checkout_args(
    source_spec: &str,
    target: &str,
    credentials: Option<&Credentials>,
) -> Vec<String> {
    let mut args = vec!["checkout".to_string()];

    if let Some(creds) = credentials.filter(|c| c.is_complete()) {
        args.push("--username".to_string());
        args.push(creds.username.clone());
        args.push("--password".to_string());
        args.push(creds.password.clone());
    }

    args.push("--non-interactive".to_string());
    args.push(source_spec.to_string());
    args.push(target.to_string());
    args
}

/// Checks out sources with an external client and lays them out for the build
pub struct SourceRetriever {
    runner: Arc<dyn CommandRunner>,
    fs: Arc<dyn FileSystem>,
    path_mode: PathMode,
    client: String,
}

impl SourceRetriever {
    pub fn new(runner: Arc<dyn CommandRunner>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            runner,
            fs,
            path_mode: PathMode::Native,
            client: DEFAULT_CLIENT.to_string(),
        }
    }

    pub fn with_path_mode(mut self, path_mode: PathMode) -> Self {
        self.path_mode = path_mode;
        self
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    pub fn path_mode(&self) -> PathMode {
        self.path_mode
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    /// Check out `request.source` and stage it under `request.working_dir`
    pub async fn download(&self, request: &RetrievalRequest) -> StageResult<SourceInfo> {
        let layout = request.layout();
        let target = layout.checkout_target(request);

        if request.has_context_dir() {
            trace!("Downloading {} ({}) ...", request.source, request.context_dir);
        } else {
            trace!("Downloading {} ...", request.source);
        }

        if let Some(fragment) = request.source.fragment() {
            debug!("Ignoring fragment #{} of {}", fragment, request.source.string_no_fragment());
        }

        let context_path = if request.has_context_dir() {
            Some(self.resolve_context_path(request)?)
        } else {
            None
        };

        if request.ignore_submodules {
            debug!("Checking out sources (ignoring submodules) into {}", target.display());
        } else {
            debug!("Checking out sources into {}", target.display());
        }

        self.checkout(
            &request.source,
            target,
            &request.revision,
            request.credentials.as_ref(),
        )
        .await?;

        info!("Checked out {} at {:?}", request.source.string_no_fragment(), request.revision);

        let mut info = SourceInfo {
            location: request.source.string_no_fragment(),
            revision: request.revision.clone(),
            context_dir: String::new(),
        };

        if let Some(context_path) = context_path {
            self.extract_context(request, &context_path)?;
            info.context_dir = request.context_dir.clone();
        }

        Ok(info)
    }

    /// Scratch-side path of the context dir, rejected up front if it would
    /// leave the checkout
    fn resolve_context_path(&self, request: &RetrievalRequest) -> StageResult<PathBuf> {
        request
            .layout()
            .context_path(&request.context_dir)
            .ok_or_else(|| {
                error!(
                    "Context dir {:?} must be a relative path inside the checkout",
                    request.context_dir
                );
                StageError::extraction_failure(
                    &request.context_dir,
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "context dir must be a relative path inside the checkout",
                    ),
                )
            })
    }

    /// Replace the source dir with the requested subtree of the scratch checkout
    fn extract_context(&self, request: &RetrievalRequest, context_path: &Path) -> StageResult<()> {
        let layout = request.layout();
        let source_dir = layout.source_dir();
        let scratch_dir = layout.scratch_dir();

        debug!(
            "Promoting {} to {}",
            context_path.display(),
            source_dir.display()
        );

        self.fs
            .remove_directory(source_dir)
            .extraction_context(source_dir)?;

        if let Err(e) = self.fs.copy_contents(context_path, source_dir) {
            error!(
                "Failed to copy context dir {} to {}: {}",
                context_path.display(),
                source_dir.display(),
                e
            );
            return Err(StageError::extraction_failure(context_path, e));
        }

        if let Err(e) = self.fs.remove_directory(scratch_dir) {
            warn!(
                "Failed to remove scratch checkout {}: {}",
                scratch_dir.display(),
                e
            );
        }

        Ok(())
    }

    /// Run `svn checkout` of `source` (at `revision`, if set) into `target`
    pub async fn checkout(
        &self,
        source: &SourceUrl,
        target: &Path,
        revision: &str,
        credentials: Option<&Credentials>,
    ) -> StageResult<()> {
        let mut source = source.clone();

        if self.path_mode == PathMode::Cygwin {
            if let Some(local) = source.local_path() {
                let translated = to_client_path(self.path_mode, &local)?;
                source = source.with_local_path(&translated);
            }
        }
        let target_arg = to_client_path(self.path_mode, target)?;

        let spec = source_spec(&source, revision);
        let args = build_checkout_args(&spec, &target_arg, credentials);

        match self.runner.run(&self.client, &args, StdioMode::Inherit).await {
            Ok(_) => Ok(()),
            Err(CommandError::LaunchFailure { program, source: cause }) => {
                error!(
                    "Checkout failed: source {}, target {}, could not launch {}: {}",
                    spec, target_arg, program, cause
                );
                Err(StageError::launch_failure(program, cause))
            }
            Err(CommandError::ExitFailure { exit_code, output }) => {
                error!(
                    "Checkout failed: source {}, target {}, exit code {}, with output {:?}",
                    spec, target_arg, exit_code, output
                );
                Err(StageError::checkout_failure(
                    source.string_no_fragment(),
                    target,
                    exit_code,
                    output,
                ))
            }
        }
    }

    /// Confirm the client can be launched; returns its version string
    pub async fn check_client(&self) -> StageResult<String> {
        let args = vec!["--version".to_string(), "--quiet".to_string()];
        match self.runner.run(&self.client, &args, StdioMode::Capture).await {
            Ok(output) => Ok(output.stdout.trim().to_string()),
            Err(CommandError::LaunchFailure { program, source }) => {
                Err(StageError::launch_failure(program, source))
            }
            Err(CommandError::ExitFailure { exit_code, output }) => Err(StageError::checkout_failure(
                format!("{} --version", self.client),
                Path::new(""),
                exit_code,
                output,
            )),
        }
    }
}
