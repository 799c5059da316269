pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::ffi::OsString;
use std::process::exit;
use tracing_subscriber::EnvFilter;

use crate::application::DEFAULT_CLIENT;
use commands::{CheckClientCommand, DownloadArgs, DownloadCommand};

/// Output format options for the staged source record
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// srcstage - stage a pinned svn checkout for a build
#[derive(Parser)]
#[command(name = "srcstage")]
#[command(about = "Stage a pinned Subversion checkout into a build working directory")]
#[command(version)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (", env!("GIT_HASH"), ", built ", env!("BUILD_DATE"), " for ", env!("BUILD_TARGET"), ")"
))]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check out a source tree into <working-dir>/source
    Download(DownloadArgs),

    /// Verify the svn client can be launched
    CheckClient {
        /// svn client program
        #[arg(long, default_value = DEFAULT_CLIENT)]
        client: String,
    },
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self {
            cli: Cli::try_parse_from(args)?,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        colored::control::set_override(!self.cli.no_color);
        self.init_logging();

        match self.handle_command().await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    fn init_logging(&self) {
        let default_level = if self.cli.verbose { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        // stdout carries the source record
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    async fn handle_command(&self) -> anyhow::Result<()> {
        match &self.cli.command {
            Commands::Download(args) => {
                let output = args.output;
                let config = args.to_config()?;
                DownloadCommand::new(config, output).execute().await
            }
            Commands::CheckClient { client } => CheckClientCommand::new(client).execute().await,
        }
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_download() {
        let app = CliApp::try_from_args([
            "srcstage",
            "download",
            "--working-dir",
            "/work",
            "--source",
            "https://svn.example.org/proj/trunk",
            "--revision",
            "42",
            "--output",
            "json",
        ])
        .unwrap();

        match app.cli.command {
            Commands::Download(args) => {
                assert_eq!(args.working_dir.as_deref(), Some("/work"));
                assert_eq!(args.revision.as_deref(), Some("42"));
                assert_eq!(args.output, OutputFormat::Json);
            }
            _ => panic!("Expected download command"),
        }
    }

    #[test]
    fn test_parse_check_client_default() {
        let app = CliApp::try_from_args(["srcstage", "check-client"]).unwrap();
        match app.cli.command {
            Commands::CheckClient { client } => assert_eq!(client, "svn"),
            _ => panic!("Expected check-client command"),
        }
    }

    #[test]
    fn test_unknown_path_mode_rejected() {
        let result = CliApp::try_from_args([
            "srcstage",
            "download",
            "--path-mode",
            "msys",
        ]);
        assert!(result.is_err());
    }
}
