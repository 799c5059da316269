//! Mock services for testing
//!
//! A recording [`CommandRunner`] that stands in for the svn client. On success
//! it writes a fake checkout tree into the target directory (the last argument),
//! the way a real `svn checkout` would.

use async_trait::async_trait;
use srcstage::infrastructure::{CommandError, CommandOutput, CommandRunner, StdioMode};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// One recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub stdio: StdioMode,
}

/// What the fake client does when invoked
#[derive(Debug, Clone)]
pub enum ClientBehavior {
    /// Exit 0 and write these files (relative path, contents) under the target
    Checkout(Vec<(String, Vec<u8>)>),
    /// Exit with this code and output, writing nothing
    Exit { code: i32, output: String },
    /// Exit with this code after writing a partial tree
    PartialThenExit {
        files: Vec<(String, Vec<u8>)>,
        code: i32,
    },
    /// Fail to launch
    Missing,
}

/// Recording command runner
pub struct RecordingCommandRunner {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    behavior: Mutex<ClientBehavior>,
}

impl RecordingCommandRunner {
    pub fn new(behavior: ClientBehavior) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            behavior: Mutex::new(behavior),
        }
    }

    /// Succeeds and writes `files` into the checkout target
    pub fn checking_out(files: &[(&str, &str)]) -> Self {
        Self::new(ClientBehavior::Checkout(
            files
                .iter()
                .map(|(path, contents)| (path.to_string(), contents.as_bytes().to_vec()))
                .collect(),
        ))
    }

    /// Get call history for verification
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Arguments of the only recorded call
    pub fn single_call_args(&self) -> Vec<String> {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one client invocation");
        calls[0].args.clone()
    }

    fn write_tree(target: &Path, files: &[(String, Vec<u8>)]) -> io::Result<()> {
        fs::create_dir_all(target)?;
        for (relative, contents) in files {
            let path = target.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, contents)?;
        }
        Ok(())
    }
}

#[async_trait]
impl CommandRunner for RecordingCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        stdio: StdioMode,
    ) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(RecordedCall {
            program: program.to_string(),
            args: args.to_vec(),
            stdio,
        });

        let target = PathBuf::from(args.last().cloned().unwrap_or_default());
        let behavior = self.behavior.lock().unwrap().clone();

        match behavior {
            ClientBehavior::Checkout(files) => {
                Self::write_tree(&target, &files).map_err(|source| CommandError::LaunchFailure {
                    program: program.to_string(),
                    source,
                })?;
                Ok(CommandOutput::default())
            }
            ClientBehavior::Exit { code, output } => Err(CommandError::ExitFailure {
                exit_code: code,
                output,
            }),
            ClientBehavior::PartialThenExit { files, code } => {
                let _ = Self::write_tree(&target, &files);
                Err(CommandError::ExitFailure {
                    exit_code: code,
                    output: String::new(),
                })
            }
            ClientBehavior::Missing => Err(CommandError::LaunchFailure {
                program: program.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "program not found"),
            }),
        }
    }
}
