//! Client-level error types shared across authentication, dispatch, and resource calls.

// self
use crate::{_prelude::*, auth::IdentifierError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The API rejected the credentials (HTTP 401), or a refresh was attempted without any
	/// refresh token on hand.
	#[error("Invalid credentials: {reason}.")]
	InvalidCredentials {
		/// API- or client-supplied reason string.
		reason: String,
	},
	/// Any other failed request: non-2xx status, transport failure, or a response that does not
	/// match the expected schema.
	#[error(transparent)]
	RequestFailed(#[from] RequestError),
	/// Local configuration problem raised while building a client.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	pub(crate) fn invalid_credentials(reason: impl Into<String>) -> Self {
		Self::InvalidCredentials { reason: reason.into() }
	}
}

/// Failures grouped under [`Error::RequestFailed`].
#[derive(Debug, ThisError)]
pub enum RequestError {
	/// The API answered with a non-2xx status other than 401.
	#[error("Request to {endpoint} failed with HTTP {status}: {message}.")]
	Api {
		/// Relative endpoint that was requested.
		endpoint: String,
		/// HTTP status code returned by the API.
		status: u16,
		/// First structured error title found in the response body.
		message: String,
	},
	/// The request never produced an HTTP response.
	#[error("Transport failure while calling {endpoint}.")]
	Transport {
		/// Relative endpoint that was requested.
		endpoint: String,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// The endpoint could not be joined onto the base URL.
	#[error("Endpoint {endpoint} does not form a valid URL.")]
	InvalidEndpoint {
		/// Relative endpoint that was requested.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A request body could not be serialized.
	#[error("Request body for {endpoint} could not be serialized.")]
	Encode {
		/// Relative endpoint that was requested.
		endpoint: String,
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// A timestamp parameter could not be rendered as RFC 3339.
	#[error("Timestamp parameter for {endpoint} could not be formatted.")]
	Timestamp {
		/// Relative endpoint that was requested.
		endpoint: String,
		/// Underlying formatting failure.
		#[source]
		source: time::error::Format,
	},
	/// A successful response carried a body that is not JSON.
	#[error("Response from {endpoint} is not valid JSON.")]
	Decode {
		/// Relative endpoint that was requested.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// A response body did not satisfy the expected schema.
	#[error("Error while parsing response from {endpoint}: {source}")]
	Validation {
		/// Relative endpoint that was requested.
		endpoint: String,
		/// Structured validation failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A concurrent refresh this call queued behind failed.
	#[error("Refresh shared with a concurrent call failed: {message}")]
	RefreshFailed {
		/// Rendered failure of the shared refresh.
		message: String,
	},
	/// The API issued an access token whose payload cannot be read.
	#[error(transparent)]
	MalformedToken(#[from] crate::auth::TokenDecodeError),
}

/// Configuration and validation failures raised while building a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Base URL cannot carry relative API endpoints.
	#[error("Base URL `{url}` is unusable: {reason}.")]
	InvalidBaseUrl {
		/// Offending URL.
		url: String,
		/// Human-readable reason.
		reason: &'static str,
	},
	/// A caller-supplied identifier failed validation.
	#[error(transparent)]
	Identifier(#[from] IdentifierError),
}

/// Transport-level failures (network errors and timeouts).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
