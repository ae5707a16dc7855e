//! Wire types for the Hawk token exchange.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::TOKEN_TYPE_HAWK,
	credentials::{Credentials, DigestSelection},
	error::ValidationError,
};

/// Single-use authorization code delivered by the authorization redirect.
///
/// The code is deliberately neither `Clone` nor `Copy`: exchanging it consumes it.
#[derive(PartialEq, Eq)]
pub struct AuthorizationCode(String);
impl AuthorizationCode {
	/// Wraps a code after rejecting empty input.
	pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
		let code = code.into();

		if code.is_empty() {
			return Err(ValidationError::EmptyAuthorizationCode);
		}

		Ok(Self(code))
	}

	/// Returns the raw code.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for AuthorizationCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AuthorizationCode").field(&"<redacted>").finish()
	}
}
impl FromStr for AuthorizationCode {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

/// Body posted to the OAuth token endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenRequest {
	/// Authorization code being exchanged.
	pub code: String,
	/// Always [`TOKEN_TYPE_HAWK`].
	pub token_type: String,
}
impl AccessTokenRequest {
	/// Builds a Hawk token request for `code`.
	pub fn hawk(code: &AuthorizationCode) -> Self {
		Self { code: code.expose().to_owned(), token_type: TOKEN_TYPE_HAWK.to_owned() }
	}

	/// Serializes the request body.
	pub fn to_json(&self) -> Result<Vec<u8>> {
		serde_json::to_vec(self).map_err(|e| Error::serialization("access token request", e))
	}
}

/// Body returned by the OAuth token endpoint.
///
/// Every field defaults to empty when absent so that [`into_credentials`](Self::into_credentials)
/// can report exactly which one was missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenResponse {
	/// Hawk identifier.
	#[serde(default)]
	pub access_token: String,
	/// Hawk key.
	#[serde(default)]
	pub hawk_key: TokenSecret,
	/// Digest name advertised by the server.
	#[serde(default)]
	pub hawk_algorithm: String,
	/// Echoed token type.
	#[serde(default)]
	pub token_type: String,
}
impl AccessTokenResponse {
	/// Validates the response and pairs the key with the access token identifier.
	pub fn into_credentials(self, digest: DigestSelection) -> Result<Credentials, ValidationError> {
		if self.access_token.is_empty() {
			return Err(ValidationError::MissingField { field: "access_token" });
		}
		if self.hawk_key.is_empty() {
			return Err(ValidationError::MissingField { field: "hawk_key" });
		}
		if self.hawk_algorithm.is_empty() {
			return Err(ValidationError::MissingField { field: "hawk_algorithm" });
		}
		if self.token_type.is_empty() {
			return Err(ValidationError::MissingField { field: "token_type" });
		}
		if self.token_type != TOKEN_TYPE_HAWK {
			return Err(ValidationError::UnexpectedTokenType { found: self.token_type });
		}

		let algorithm = digest.resolve(&self.hawk_algorithm)?;

		Credentials::new(self.access_token, self.hawk_key.expose(), algorithm)
	}
}
