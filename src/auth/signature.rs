//! Ed25519 request signing as used by Discord interaction webhooks.
//!
//! Discord signs `timestamp || body` with the application's private key and
//! sends the hex-encoded signature alongside the timestamp. A request is
//! only accepted when the signature checks out against the configured
//! public key.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use thiserror::Error;

/// Why a request signature was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing {0} header")]
    MissingHeader(&'static str),

    #[error("{0} is not valid hex")]
    InvalidHex(&'static str),

    #[error("{what} has wrong length (expected {expected} bytes, got {actual})")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("public key is not a valid Ed25519 point")]
    InvalidPublicKey,

    #[error("signature does not match")]
    Mismatch,
}

/// Verifies interaction signatures against one application public key.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    /// Parse a hex-encoded 32-byte public key.
    pub fn from_hex(public_key: &str) -> Result<Self, SignatureError> {
        let bytes: [u8; 32] = decode_fixed(public_key.trim(), "public key")?;
        let key = VerifyingKey::from_bytes(&bytes).map_err(|_| SignatureError::InvalidPublicKey)?;
        Ok(Self { key })
    }

    /// Check `signature` (hex) over `timestamp || body`.
    pub fn verify(&self, signature: &str, timestamp: &str, body: &[u8]) -> Result<(), SignatureError> {
        let sig_bytes: [u8; 64] = decode_fixed(signature.trim(), "signature")?;
        let signature = Signature::from_bytes(&sig_bytes);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.key
            .verify(&message, &signature)
            .map_err(|_| SignatureError::Mismatch)
    }

    /// Like [`verify`](Self::verify), but takes the raw header values so a
    /// missing header is reported the same way as a bad one.
    pub fn verify_headers(
        &self,
        signature: Option<&str>,
        timestamp: Option<&str>,
        body: &[u8],
    ) -> Result<(), SignatureError> {
        let signature =
            signature.ok_or(SignatureError::MissingHeader(crate::consts::SIGNATURE_HEADER))?;
        let timestamp =
            timestamp.ok_or(SignatureError::MissingHeader(crate::consts::TIMESTAMP_HEADER))?;
        self.verify(signature, timestamp, body)
    }
}

fn decode_fixed<const N: usize>(input: &str, what: &'static str) -> Result<[u8; N], SignatureError> {
    let bytes = hex::decode(input).map_err(|_| SignatureError::InvalidHex(what))?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| SignatureError::InvalidLength {
        what,
        expected: N,
        actual,
    })
}
