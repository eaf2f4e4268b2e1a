//! Reads the `exp` claim out of an access token without verifying its signature.
//!
//! Access tokens are compact JWTs minted by the Notion API. The client only needs their expiry
//! instant to schedule refreshes; verifying the signature would require the server's signing
//! key, and the API is already trusted as the token's issuer. Only the payload segment is
//! decoded; the header and signature segments are never inspected.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::_prelude::*;

/// Errors produced while decoding an access token payload.
#[derive(Debug, ThisError)]
pub enum TokenDecodeError {
	/// The token is not made of three dot-separated segments.
	#[error("Access token is not a compact JWT.")]
	NotCompact,
	/// The payload segment is not valid base64url.
	#[error("Access token payload is not valid base64url.")]
	Base64(#[from] base64::DecodeError),
	/// The payload segment is not a JSON object.
	#[error("Access token payload is not valid JSON.")]
	Json(#[from] serde_json::Error),
	/// The payload does not carry a numeric `exp` claim.
	#[error("Access token payload has no numeric exp claim.")]
	MissingExpiry,
	/// The `exp` claim cannot be represented as a timestamp.
	#[error("Access token exp claim is out of range.")]
	ExpiryOutOfRange,
}

#[derive(Deserialize)]
struct ExpiryClaim {
	exp: Option<serde_json::Number>,
}

/// Decodes the absolute expiry instant embedded in `token`.
pub fn decode_expiry(token: &str) -> Result<OffsetDateTime, TokenDecodeError> {
	let mut segments = token.split('.');
	let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
		(Some(_), Some(payload), Some(_), None) => payload,
		_ => return Err(TokenDecodeError::NotCompact),
	};
	let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
	let claim: ExpiryClaim = serde_json::from_slice(&bytes)?;
	let exp = claim.exp.ok_or(TokenDecodeError::MissingExpiry)?;

	if let Some(secs) = exp.as_i64() {
		return OffsetDateTime::from_unix_timestamp(secs)
			.map_err(|_| TokenDecodeError::ExpiryOutOfRange);
	}

	let secs =
		exp.as_f64().filter(|secs| secs.is_finite()).ok_or(TokenDecodeError::MissingExpiry)?;
	let nanos = (secs * 1_000_000_000.) as i128;

	OffsetDateTime::from_unix_timestamp_nanos(nanos)
		.map_err(|_| TokenDecodeError::ExpiryOutOfRange)
}
