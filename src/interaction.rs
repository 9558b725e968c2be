//! Discord interaction payloads, inbound and outbound.
//!
//! Only the fields the handler reads are modelled; everything else in the
//! webhook body is ignored by serde.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The `type` field of an inbound interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionType {
    /// Liveness check sent when the endpoint URL is registered.
    Ping,
    /// A user invoked a slash command.
    ApplicationCommand,
    /// Components, autocomplete, modal submits, anything newer, and any
    /// other integer a caller sends.
    Other(i64),
}

impl From<i64> for InteractionType {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::Ping,
            2 => Self::ApplicationCommand,
            other => Self::Other(other),
        }
    }
}

impl InteractionType {
    pub fn code(self) -> i64 {
        match self {
            Self::Ping => 1,
            Self::ApplicationCommand => 2,
            Self::Other(code) => code,
        }
    }
}

impl<'de> Deserialize<'de> for InteractionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::from)
    }
}

/// An inbound interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default)]
    pub data: Option<CommandData>,
}

/// The invoked command and its options.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl CommandData {
    /// Value of a string option by name. Non-string values are ignored.
    pub fn string_option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .and_then(|o| o.value.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Interaction callback type codes the handler emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    Pong,
    ChannelMessageWithSource,
}

impl ResponseType {
    pub fn code(self) -> u8 {
        match self {
            Self::Pong => 1,
            Self::ChannelMessageWithSource => 4,
        }
    }
}

impl Serialize for ResponseType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Message flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageFlags(pub u64);

impl MessageFlags {
    /// Reply visible only to the invoking user.
    pub const EPHEMERAL: MessageFlags = MessageFlags(1 << 6);

    pub fn contains(self, other: MessageFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageData {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<MessageFlags>,
}

/// An outbound interaction response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: ResponseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessageData>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: ResponseType::Pong,
            data: None,
        }
    }

    /// A channel message everyone in the channel can see.
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: ResponseType::ChannelMessageWithSource,
            data: Some(MessageData {
                content: content.into(),
                flags: None,
            }),
        }
    }

    /// A channel message only the invoking user can see.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            kind: ResponseType::ChannelMessageWithSource,
            data: Some(MessageData {
                content: content.into(),
                flags: Some(MessageFlags::EPHEMERAL),
            }),
        }
    }

    pub fn content(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.content.as_str())
    }

    pub fn is_ephemeral(&self) -> bool {
        self.data
            .as_ref()
            .and_then(|d| d.flags)
            .is_some_and(|f| f.contains(MessageFlags::EPHEMERAL))
    }
}
