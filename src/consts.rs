//! Project-wide constants.

/// Header carrying the hex-encoded Ed25519 signature.
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";

/// Header carrying the timestamp that is prefixed to the signed body.
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Default completion model when none is specified.
pub const DEFAULT_MODEL: &str = "text-davinci-002";

/// Token budget for a single completion.
pub const DEFAULT_MAX_TOKENS: u32 = 100;

/// Default completion API host.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Default HTTP client timeout for the completion API, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// Reply for `/support`.
pub const SUPPORT_MESSAGE: &str = "Thanks for using OMMC bot! It is based off of Ian Mitchell's Vercel bot tutorial. You can support him at https://github.com/sponsors/ianmitchell";

/// OAuth URL that adds the application's commands to a guild.
pub fn invite_url(application_id: &str) -> String {
    format!(
        "https://discord.com/oauth2/authorize?client_id={application_id}&scope=applications.commands"
    )
}
