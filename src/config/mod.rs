//! Runtime configuration.
//!
//! Everything the handler needs is carried in one [`Config`] value that is
//! built once at startup (see `main.rs`, which fills it from CLI flags and
//! environment variables) and handed to the pieces that need it.

use anyhow::{Context, Result, bail};
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use crate::auth::SignatureVerifier;
use crate::consts::{
    DEFAULT_BIND, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_OPENAI_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

#[derive(Clone)]
pub struct Config {
    /// Discord application ID, used to build the invite URL.
    pub application_id: String,
    /// Hex-encoded Ed25519 public key of the application.
    pub public_key: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub completion_model: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    pub bind: SocketAddr,
}

impl Config {
    /// Build a config with defaults for everything but the three secrets.
    pub fn new(application_id: &str, public_key: &str, openai_api_key: &str) -> Result<Self> {
        Ok(Self {
            application_id: application_id.to_string(),
            public_key: public_key.to_string(),
            openai_api_key: openai_api_key.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            completion_model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            bind: DEFAULT_BIND
                .parse()
                .context("default bind address is invalid")?,
        })
    }

    /// Reject values the service cannot run with. Errors name the
    /// environment variable to fix.
    pub fn validate(&self) -> Result<()> {
        if self.application_id.trim().is_empty() {
            bail!("APPLICATION_ID must not be empty");
        }
        if self.openai_api_key.trim().is_empty() {
            bail!("OPENAI_API_KEY must not be empty");
        }
        if self.completion_model.trim().is_empty() {
            bail!("completion model must not be empty");
        }
        if self.max_tokens == 0 {
            bail!("max tokens must be greater than zero");
        }
        self.verifier()?;
        Ok(())
    }

    /// The signature verifier for the configured public key.
    pub fn verifier(&self) -> Result<SignatureVerifier> {
        SignatureVerifier::from_hex(&self.public_key).context("PUBLIC_KEY is invalid")
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            application_id: "123456789".to_string(),
            public_key: test_public_key(),
            openai_api_key: "sk-test".to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            completion_model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout: Duration::from_secs(5),
            bind: SocketAddr::from(([127, 0, 0, 1], 0)),
        }
    }
}

#[cfg(test)]
fn test_public_key() -> String {
    let key = ed25519_dalek::SigningKey::from_bytes(&[1u8; 32]);
    hex::encode(key.verifying_key().to_bytes())
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("application_id", &self.application_id)
            .field("public_key", &self.public_key)
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("completion_model", &self.completion_model)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout", &self.request_timeout)
            .field("bind", &self.bind)
            .finish()
    }
}
