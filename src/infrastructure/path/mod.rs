//! Translation of host paths into the syntax the external client expects.
//!
//! A Cygwin-built `svn.exe` on Windows only understands POSIX-style paths
//! (`/cygdrive/c/...`), while the rest of the process works with native
//! Windows paths. Everywhere else paths are passed through untouched.

use crate::common::{StageError, StageResult};
use crate::infrastructure::process::{CommandRunner, StdioMode};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Path syntax the client expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathMode {
    /// Host paths are used as-is
    #[default]
    Native,
    /// Host paths are converted to Cygwin POSIX paths
    Cygwin,
}

/// Path mode as written in configuration; `auto` probes the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PathModeSetting {
    Native,
    Cygwin,
    #[default]
    Auto,
}

impl PathModeSetting {
    /// Resolve to a concrete mode, probing `client` when set to `auto`
    pub async fn resolve(self, runner: &dyn CommandRunner, client: &str) -> PathMode {
        match self {
            PathModeSetting::Native => PathMode::Native,
            PathModeSetting::Cygwin => PathMode::Cygwin,
            PathModeSetting::Auto => detect_path_mode(runner, client).await,
        }
    }
}

fn drive_absolute_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z]):[\\/]+(.*)$").expect("valid drive regex"))
}

fn drive_relative_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z]:").expect("valid drive regex"))
}

/// Convert `path` to a string in the client's syntax
pub fn to_client_path(mode: PathMode, path: &Path) -> StageResult<String> {
    let raw = path
        .to_str()
        .ok_or_else(|| StageError::path_translation_failure(path, "path is not valid UTF-8"))?;

    match mode {
        PathMode::Native => Ok(raw.to_string()),
        PathMode::Cygwin => {
            to_cygwin(raw).map_err(|reason| StageError::path_translation_failure(path, reason))
        }
    }
}

fn to_cygwin(raw: &str) -> Result<String, String> {
    if raw.is_empty() {
        return Err("path is empty".to_string());
    }

    if let Some(caps) = drive_absolute_regex().captures(raw) {
        let drive = caps[1].to_ascii_lowercase();
        let rest = caps[2].replace('\\', "/");
        return Ok(if rest.is_empty() {
            format!("/cygdrive/{}", drive)
        } else {
            format!("/cygdrive/{}/{}", drive, rest)
        });
    }

    if drive_relative_regex().is_match(raw) {
        return Err("drive-relative paths cannot be translated".to_string());
    }

    // UNC (\\server\share) and relative paths only need their separators flipped
    Ok(raw.replace('\\', "/"))
}

/// Probe whether `client` is a Cygwin build. Only meaningful on Windows.
pub async fn detect_path_mode(runner: &dyn CommandRunner, client: &str) -> PathMode {
    if !cfg!(windows) {
        return PathMode::Native;
    }

    let args = vec!["--version".to_string()];
    match runner.run(client, &args, StdioMode::Capture).await {
        Ok(output) if output.stdout.to_lowercase().contains("cygwin") => PathMode::Cygwin,
        Ok(_) => PathMode::Native,
        Err(e) => {
            debug!("Could not probe {} for cygwin: {}", client, e);
            PathMode::Native
        }
    }
}
