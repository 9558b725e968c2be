//! The interaction handler: verify, parse, dispatch.
//!
//! Order matters. The signature is checked against the raw body before the
//! body is parsed, so an unsigned request never reaches command code.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::SignatureVerifier;
use crate::commands::CommandRegistry;
use crate::completion::Completer;
use crate::config::Config;
use crate::error::HandlerError;
use crate::interaction::{Interaction, InteractionResponse, InteractionType};

pub struct InteractionHandler {
    verifier: SignatureVerifier,
    commands: CommandRegistry,
}

impl InteractionHandler {
    pub fn new(verifier: SignatureVerifier, commands: CommandRegistry) -> Self {
        Self { verifier, commands }
    }

    /// Handler with the built-in commands, wired from `config`.
    pub fn from_config(config: &Config, completer: Arc<dyn Completer>) -> Result<Self> {
        let verifier = config.verifier()?;
        let commands = CommandRegistry::new(config, completer);
        Ok(Self::new(verifier, commands))
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Handle one webhook delivery. `signature` and `timestamp` are the raw
    /// header values, `body` the raw request body.
    pub async fn handle(
        &self,
        signature: Option<&str>,
        timestamp: Option<&str>,
        body: &[u8],
    ) -> Result<InteractionResponse, HandlerError> {
        if let Err(e) = self.verifier.verify_headers(signature, timestamp, body) {
            warn!("invalid request: {e}");
            return Err(e.into());
        }

        let interaction: Interaction = serde_json::from_slice(body).map_err(|e| {
            warn!("malformed interaction payload: {e}");
            HandlerError::from(e)
        })?;

        match interaction.kind {
            InteractionType::Ping => {
                info!("handling ping request");
                Ok(InteractionResponse::pong())
            }
            InteractionType::ApplicationCommand => {
                let Some(data) = interaction.data.as_ref() else {
                    warn!("application command without data");
                    return Err(HandlerError::UnknownCommand(String::new()));
                };
                self.commands.dispatch(data).await.inspect_err(|e| {
                    // completion failures are logged where they happen
                    if e.status().is_client_error() {
                        warn!(command = %data.name, "{e}");
                    }
                })
            }
            InteractionType::Other(code) => {
                warn!(interaction_type = code, "unknown interaction type");
                Err(HandlerError::UnknownType(code))
            }
        }
    }
}
