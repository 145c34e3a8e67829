use async_trait::async_trait;
use log::info;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use super::{SpeechSynthesizer, run_tool};
use crate::errors::ToolError;

/// Speech synthesis through the `gtts-cli` command line client
#[derive(Debug, Clone)]
pub struct GttsCli {
    command: String,
    timeout: Duration,
}

impl GttsCli {
    pub fn new(command: &str, timeout: Duration) -> Self {
        Self {
            command: command.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GttsCli {
    async fn synthesize(&self, text: &str, language: &str, output: &Path) -> Result<(), ToolError> {
        if text.trim().is_empty() {
            return Err(ToolError::InvalidOutput {
                tool: self.command.clone(),
                message: "refusing to synthesize empty text".to_string(),
            });
        }

        let mut command = Command::new(&self.command);
        command
            .arg("--lang")
            .arg(language)
            .arg("--output")
            .arg(output)
            .arg("--")
            .arg(text);

        run_tool(command, &self.command, self.timeout).await?;

        let size = tokio::fs::metadata(output).await.map(|m| m.len()).unwrap_or(0);
        if size == 0 {
            return Err(ToolError::InvalidOutput {
                tool: self.command.clone(),
                message: format!("no audio written to {}", output.display()),
            });
        }

        info!("Synthesized {} characters into {:?}", text.chars().count(), output);
        Ok(())
    }
}
