use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::{SourceRetriever, StageConfig};
use crate::domain::entities::retrieval::{SourceInfo, StagingLayout};
use crate::infrastructure::{
    CommandRunner, LocalFileSystem, PathModeSetting, ProcessCommandRunner,
};
use crate::presentation::cli::OutputFormat;

/// Flags for `srcstage download`; anything set here overrides the config file
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// YAML file with staging settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Root directory for staging
    #[arg(short, long)]
    pub working_dir: Option<String>,

    /// Repository URL or local path
    #[arg(short, long)]
    pub source: Option<String>,

    /// Revision to check out (defaults to HEAD)
    #[arg(short, long)]
    pub revision: Option<String>,

    /// Subdirectory of the checkout to stage
    #[arg(long)]
    pub context_dir: Option<String>,

    /// Username passed to the client
    #[arg(long, env = "SRCSTAGE_SVN_USERNAME")]
    pub username: Option<String>,

    /// Password passed to the client
    #[arg(long, env = "SRCSTAGE_SVN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Ignore externals/submodules (informational for svn)
    #[arg(long)]
    pub ignore_submodules: bool,

    /// svn client program
    #[arg(long)]
    pub client: Option<String>,

    /// Path syntax expected by the client
    #[arg(long, value_enum)]
    pub path_mode: Option<PathModeSetting>,

    /// Output format (text, json, yaml)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

impl DownloadArgs {
    /// Merge flags over the config file (if any)
    pub fn to_config(&self) -> Result<StageConfig> {
        let mut config = match &self.config {
            Some(path) => StageConfig::load_from_file(path)?,
            None => StageConfig::default(),
        };

        if let Some(working_dir) = &self.working_dir {
            config.working_dir = working_dir.clone();
        }
        if let Some(source) = &self.source {
            config.source = source.clone();
        }
        if let Some(revision) = &self.revision {
            config.revision = revision.clone();
        }
        if let Some(context_dir) = &self.context_dir {
            config.context_dir = context_dir.clone();
        }
        if self.username.is_some() {
            config.username = self.username.clone();
        }
        if self.password.is_some() {
            config.password = self.password.clone();
        }
        if self.ignore_submodules {
            config.ignore_submodules = true;
        }
        if let Some(client) = &self.client {
            config.client = client.clone();
        }
        if let Some(path_mode) = self.path_mode {
            config.path_mode = path_mode;
        }

        Ok(config)
    }
}

/// Stage a source tree and print the resulting record
pub struct DownloadCommand {
    pub config: StageConfig,
    pub output: OutputFormat,
}

impl DownloadCommand {
    pub fn new(config: StageConfig, output: OutputFormat) -> Self {
        Self { config, output }
    }

    /// Execute the download command
    pub async fn execute(&self) -> Result<()> {
        let request = self.config.clone().into_request()?;

        let runner: Arc<dyn CommandRunner> = Arc::new(ProcessCommandRunner::new());
        let path_mode = self
            .config
            .path_mode
            .resolve(runner.as_ref(), &self.config.client)
            .await;

        let retriever = SourceRetriever::new(runner, Arc::new(LocalFileSystem::new()))
            .with_path_mode(path_mode)
            .with_client(self.config.client.clone());

        let info = retriever
            .download(&request)
            .await
            .with_context(|| format!("Failed to stage {}", request.source.string_no_fragment()))?;

        let layout = request.layout();
        self.print_info(&info, &layout)
    }

    fn print_info(&self, info: &SourceInfo, layout: &StagingLayout) -> Result<()> {
        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(info)?);
            }
            OutputFormat::Yaml => {
                print!("{}", serde_yaml::to_string(info)?);
            }
            OutputFormat::Text => {
                println!(
                    "{} Staged source into {}",
                    "✓".green().bold(),
                    layout.source_dir().display()
                );
                println!("  Location: {}", info.location);
                if !info.revision.is_empty() {
                    println!("  Ref: {}", info.revision);
                }
                if !info.context_dir.is_empty() {
                    println!("  Context dir: {}", info.context_dir);
                }
            }
        }
        Ok(())
    }
}
