use async_trait::async_trait;
use tracing::info;

use super::{Command, CommandKind};
use crate::consts::invite_url;
use crate::error::HandlerError;
use crate::interaction::{CommandData, InteractionResponse};

pub struct InviteCommand {
    url: String,
}

impl InviteCommand {
    pub fn new(application_id: &str) -> Self {
        Self {
            url: invite_url(application_id),
        }
    }
}

#[async_trait]
impl Command for InviteCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::Invite
    }

    fn description(&self) -> &str {
        "Get an invite link to add the bot to your server."
    }

    async fn execute(&self, _data: &CommandData) -> Result<InteractionResponse, HandlerError> {
        info!(command = %self.kind(), "invite request");
        Ok(InteractionResponse::ephemeral(self.url.clone()))
    }
}
