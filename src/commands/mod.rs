//! Slash commands the bot answers.
//!
//! Each command has a [`CommandKind`] variant and one [`Command`]
//! implementation. The [`CommandRegistry`] maps kinds to implementations;
//! it is built once at startup and only read afterwards.

mod gpt3;
mod invite;
mod support;

pub use gpt3::Gpt3Command;
pub use invite::InviteCommand;
pub use support::SupportCommand;

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::completion::Completer;
use crate::config::Config;
use crate::error::HandlerError;
use crate::interaction::{CommandData, InteractionResponse};

/// The commands this bot knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Invite,
    Support,
    Gpt3,
}

impl CommandKind {
    pub const ALL: [CommandKind; 3] = [CommandKind::Invite, CommandKind::Support, CommandKind::Gpt3];

    /// Canonical (lowercase) command name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Invite => "invite",
            Self::Support => "support",
            Self::Gpt3 => "gpt3",
        }
    }

    /// Match a command name exactly, ignoring ASCII case.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A slash command. Dependencies are injected at construction.
#[async_trait]
pub trait Command: Send + Sync {
    fn kind(&self) -> CommandKind;

    /// One-line description, as shown in Discord's command picker.
    fn description(&self) -> &str;

    async fn execute(&self, data: &CommandData) -> Result<InteractionResponse, HandlerError>;
}

pub struct CommandRegistry {
    commands: HashMap<CommandKind, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Empty registry. Every name is unknown until commands are registered.
    pub fn empty() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registry with all built-in commands wired to `config` and `completer`.
    pub fn new(config: &Config, completer: Arc<dyn Completer>) -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(InviteCommand::new(&config.application_id)));
        registry.register(Arc::new(SupportCommand));
        registry.register(Arc::new(Gpt3Command::new(completer)));
        registry
    }

    /// Add or replace the command for its kind.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.commands.insert(command.kind(), command);
    }

    pub fn get(&self, kind: CommandKind) -> Option<&Arc<dyn Command>> {
        self.commands.get(&kind)
    }

    /// Run the command named in `data`.
    pub async fn dispatch(&self, data: &CommandData) -> Result<InteractionResponse, HandlerError> {
        let command = CommandKind::parse(&data.name)
            .and_then(|kind| self.get(kind))
            .ok_or_else(|| HandlerError::UnknownCommand(data.name.clone()))?;
        command.execute(data).await
    }

    /// Registered kinds, in declaration order.
    pub fn kinds(&self) -> Vec<CommandKind> {
        CommandKind::ALL
            .into_iter()
            .filter(|kind| self.commands.contains_key(kind))
            .collect()
    }
}
