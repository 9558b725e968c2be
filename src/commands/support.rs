use async_trait::async_trait;
use tracing::info;

use super::{Command, CommandKind};
use crate::consts::SUPPORT_MESSAGE;
use crate::error::HandlerError;
use crate::interaction::{CommandData, InteractionResponse};

pub struct SupportCommand;

#[async_trait]
impl Command for SupportCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::Support
    }

    fn description(&self) -> &str {
        "Like this bot? Support its inspiration!"
    }

    async fn execute(&self, _data: &CommandData) -> Result<InteractionResponse, HandlerError> {
        info!(command = %self.kind(), "support request");
        Ok(InteractionResponse::ephemeral(SUPPORT_MESSAGE))
    }
}
