use async_trait::async_trait;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Command runner errors
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Command exited with code {exit_code}")]
    ExitFailure { exit_code: i32, output: String },

    #[error("Failed to spawn '{program}': {source}")]
    LaunchFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// How the child's stdout/stderr are wired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// Stream straight to the operator's terminal
    Inherit,
    /// Collect into [`CommandOutput`] (and into the error on failure)
    Capture,
}

/// Captured output; both fields are empty for [`StdioMode::Inherit`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        combined.push_str(&self.stderr);
        combined
    }
}

/// Runs an external program to completion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`; non-zero exit is an error
    async fn run(
        &self,
        program: &str,
        args: &[String],
        stdio: StdioMode,
    ) -> Result<CommandOutput, CommandError>;
}

/// [`CommandRunner`] backed by real child processes
#[derive(Debug, Default, Clone)]
pub struct ProcessCommandRunner;

impl ProcessCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        stdio: StdioMode,
    ) -> Result<CommandOutput, CommandError> {
        debug!("Running: {}", render_command(program, args));

        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null());

        let launch_failure = |source| CommandError::LaunchFailure {
            program: program.to_string(),
            source,
        };

        let (status, output) = match stdio {
            StdioMode::Inherit => {
                let status = cmd
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .await
                    .map_err(launch_failure)?;
                (status, CommandOutput::default())
            }
            StdioMode::Capture => {
                let output = cmd
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .output()
                    .await
                    .map_err(launch_failure)?;
                let captured = CommandOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                };
                (output.status, captured)
            }
        };

        if !status.success() {
            return Err(CommandError::ExitFailure {
                exit_code: status.code().unwrap_or(-1),
                output: output.combined(),
            });
        }

        Ok(output)
    }
}

/// Render a command line for logs, masking the value after `--password`
pub fn render_command(program: &str, args: &[String]) -> String {
    let mut rendered = vec![program.to_string()];
    let mut mask_next = false;
    for arg in args {
        if mask_next {
            rendered.push("******".to_string());
            mask_next = false;
        } else {
            mask_next = arg == "--password";
            rendered.push(arg.clone());
        }
    }
    rendered.join(" ")
}
