use async_trait::async_trait;
use hvacdesk_application::ConfirmationPrompt;
use hvacdesk_core::{AppError, AppResult};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Asks `y/N` questions on the terminal.
pub struct StdinConfirmationPrompt;

#[async_trait]
impl ConfirmationPrompt for StdinConfirmationPrompt {
    async fn confirm(&self, message: &str) -> AppResult<bool> {
        let answer = read_line(&format!("{message} [y/N] ")).await?;
        Ok(is_yes(&answer))
    }
}

/// Confirms every question; used by `--yes`.
pub struct AssumeYes;

#[async_trait]
impl ConfirmationPrompt for AssumeYes {
    async fn confirm(&self, _message: &str) -> AppResult<bool> {
        Ok(true)
    }
}

/// Prints `prompt` and reads one line from stdin without its line ending.
pub async fn read_line(prompt: &str) -> AppResult<String> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(prompt.as_bytes())
        .await
        .map_err(|error| AppError::Internal(format!("failed to write prompt: {error}")))?;
    stdout
        .flush()
        .await
        .map_err(|error| AppError::Internal(format!("failed to write prompt: {error}")))?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read stdin: {error}")))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
