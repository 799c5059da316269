use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::application::SourceRetriever;
use crate::infrastructure::{LocalFileSystem, ProcessCommandRunner};

/// Verify the svn client is installed and runnable
pub struct CheckClientCommand {
    pub client: String,
}

impl CheckClientCommand {
    pub fn new(client: impl Into<String>) -> Self {
        Self {
            client: client.into(),
        }
    }

    /// Execute the check-client command
    pub async fn execute(&self) -> Result<()> {
        let retriever = SourceRetriever::new(
            Arc::new(ProcessCommandRunner::new()),
            Arc::new(LocalFileSystem::new()),
        )
        .with_client(self.client.clone());

        let version = retriever.check_client().await?;
        println!(
            "{} {} {}",
            "✓".green().bold(),
            self.client,
            version
        );
        Ok(())
    }
}
