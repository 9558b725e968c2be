use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use super::{Command, CommandKind};
use crate::completion::Completer;
use crate::error::HandlerError;
use crate::interaction::{CommandData, InteractionResponse};

const QUESTION_OPTION: &str = "question";

/// Forwards the `question` option to the completer and posts the answer.
pub struct Gpt3Command {
    completer: Arc<dyn Completer>,
}

impl Gpt3Command {
    pub fn new(completer: Arc<dyn Completer>) -> Self {
        Self { completer }
    }
}

#[async_trait]
impl Command for Gpt3Command {
    fn kind(&self) -> CommandKind {
        CommandKind::Gpt3
    }

    fn description(&self) -> &str {
        "Ask GPT-3 a question."
    }

    async fn execute(&self, data: &CommandData) -> Result<InteractionResponse, HandlerError> {
        let question = data
            .string_option(QUESTION_OPTION)
            .ok_or(HandlerError::MissingOption(QUESTION_OPTION))?;

        info!(command = %self.kind(), "gpt3 request");

        let completion = self.completer.complete(question).await.map_err(|e| {
            error!(command = %self.kind(), "completion failed: {e:#}");
            HandlerError::Completion(e)
        })?;

        Ok(InteractionResponse::message(completion.text.trim()))
    }
}
