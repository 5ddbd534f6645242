//! Ed25519 verification of incoming interaction requests.
//!
//! Discord signs `timestamp ‖ body` with the application's key and sends the
//! signature and timestamp as headers. Requests that fail verification must
//! be answered with 401.

use axum::http::HeaderMap;
use ed25519_dalek::{Signature, VerifyingKey};

use crate::error::Error;

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// The application's public key.
#[derive(Clone, Debug)]
pub struct SignatureVerifier {
  key: VerifyingKey,
}

impl SignatureVerifier {
  pub fn new(key: VerifyingKey) -> Self { Self { key } }

  /// Parse the hex key shown in the developer portal.
  pub fn from_hex(public_key: &str) -> Result<Self, Error> {
    let bytes: [u8; 32] = hex::decode(public_key.trim())
      .ok()
      .and_then(|b| b.try_into().ok())
      .ok_or_else(|| Error::BadRequest("public key must be 32 hex-encoded bytes".into()))?;
    let key = VerifyingKey::from_bytes(&bytes)
      .map_err(|e| Error::BadRequest(format!("invalid public key: {e}")))?;
    Ok(Self { key })
  }

  /// Check the signature headers against `body`.
  pub fn verify(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), Error> {
    let header = |name| {
      headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(Error::Unauthorized)
    };
    let signature = header(SIGNATURE_HEADER)?;
    let timestamp = header(TIMESTAMP_HEADER)?;

    let sig_bytes: [u8; 64] = hex::decode(signature)
      .ok()
      .and_then(|b| b.try_into().ok())
      .ok_or(Error::Unauthorized)?;
    let signature = Signature::from_bytes(&sig_bytes);

    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);

    self
      .key
      .verify_strict(&message, &signature)
      .map_err(|_| Error::Unauthorized)
  }
}
