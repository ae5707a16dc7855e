//! Crate-level error types shared across posts, transports, and flows.

// self
use crate::{_prelude::*, app::AppError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// A model or request body failed to encode, or post content failed to decode.
	#[error("Failed to serialize or deserialize {context}.")]
	Serialization {
		/// What was being encoded or decoded.
		context: &'static str,
		/// Underlying JSON failure.
		#[source]
		source: serde_json::Error,
	},
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The server rejected the exchange or answered with an unreadable body.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// A decoded value is missing required data or names something unsupported.
	#[error(transparent)]
	Validation(#[from] ValidationError),

	/// The Hawk layer refused the key material or could not sign a request.
	#[error("Hawk signing failed.")]
	Signing {
		/// Underlying Hawk failure.
		#[source]
		source: hawk::Error,
	},

	/// The authorization redirect reported an error instead of a code.
	#[error("Authorization was denied: {reason}.")]
	AuthorizationDenied {
		/// Value of the redirect's `error` parameter.
		reason: String,
	},
	/// The app's grant is no longer active and must not be used.
	#[error("App authorization has been revoked.")]
	Revoked,
}
impl Error {
	pub(crate) fn serialization(context: &'static str, source: serde_json::Error) -> Self {
		Self::Serialization { context, source }
	}

	pub(crate) fn signing(source: hawk::Error) -> Self {
		Self::Signing { source }
	}
}

/// Configuration and local state failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// A URL derived from server metadata could not be built.
	#[error("Server URL `{url}` cannot be used for this request.")]
	InvalidUrl {
		/// Offending URL.
		url: String,
	},
	/// The authorization flow was driven out of order.
	#[error("Cannot {action} while the authorization flow is {state}.")]
	InvalidTransition {
		/// Label of the state the flow was in.
		state: &'static str,
		/// Attempted action.
		action: &'static str,
	},
	/// The `state` returned by the authorization redirect did not match the one sent.
	#[error("Authorization state mismatch.")]
	StateMismatch,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO). Never retried by this crate.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Tent server.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete before the transport's timeout.
	#[error("Request to the Tent server timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the Tent server.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// The token endpoint answered, but not with a usable exchange result.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Non-success HTTP status.
	#[error("Token exchange was rejected with HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Raw response body (lossy UTF-8) for diagnostics.
		body: String,
	},
	/// Response body could not be decoded into an access token response.
	#[error("Token endpoint returned malformed JSON.")]
	MalformedBody {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
}
impl ProtocolError {
	/// HTTP status code attached to the failure.
	pub fn status(&self) -> u16 {
		match self {
			Self::Status { status, .. } | Self::MalformedBody { status, .. } => *status,
		}
	}
}

/// Decoded data that cannot be turned into a usable value.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// A required field was absent or empty.
	#[error("Required field `{field}` is missing or empty.")]
	MissingField {
		/// Wire name of the field.
		field: &'static str,
	},
	/// A decoded app registration breaks the rules its builder enforces.
	#[error(transparent)]
	InvalidApp(#[from] AppError),
	/// The authorization code was empty.
	#[error("Authorization code cannot be empty.")]
	EmptyAuthorizationCode,
	/// A post carried a type URI this crate does not handle.
	#[error("Unknown post type `{found}`.")]
	UnknownPostType {
		/// Type URI found on the post.
		found: String,
	},
	/// A post carried a recognized type, but not the one requested.
	#[error("Expected a `{expected}` post but found `{found}`.")]
	UnexpectedPostType {
		/// Type URI required by the caller.
		expected: &'static str,
		/// Type URI found on the post.
		found: &'static str,
	},
	/// The server echoed a token type other than the Hawk token type.
	#[error("Unexpected token type `{found}`.")]
	UnexpectedTokenType {
		/// Token type returned by the server.
		found: String,
	},
	/// The advertised Hawk algorithm has no supported digest.
	#[error("Unsupported Hawk algorithm `{name}`.")]
	UnsupportedDigest {
		/// Algorithm name as advertised.
		name: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn validation_error_converts_into_crate_error_with_source() {
		let err: Error = ValidationError::MissingField { field: "hawk_key" }.into();

		assert!(matches!(err, Error::Validation(ValidationError::MissingField { .. })));
		assert_eq!(err.to_string(), "Required field `hawk_key` is missing or empty.");
	}

	#[test]
	fn protocol_error_reports_status() {
		let err = ProtocolError::Status { status: 401, body: "{}".into() };

		assert_eq!(err.status(), 401);
		assert_eq!(err.to_string(), "Token exchange was rejected with HTTP 401.");
	}

	#[test]
	fn serialization_error_keeps_source() {
		let source = serde_json::from_str::<serde_json::Value>("{")
			.expect_err("Truncated JSON should fail to parse.");
		let err = Error::serialization("app post content", source);

		assert!(StdError::source(&err).is_some());
		assert_eq!(err.to_string(), "Failed to serialize or deserialize app post content.");
	}
}
