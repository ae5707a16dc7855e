//! Request signing contracts and the Hawk implementation.

// crates.io
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
// self
use crate::{
	_prelude::*,
	credentials::{Credentials, HawkAlgorithm},
	error::ConfigError,
	http::HttpRequest,
};

/// Attaches authorization to an outbound request before it is sent.
pub trait RequestSigner
where
	Self: Debug + Send + Sync,
{
	/// Mutates `request` in place, typically by setting the `Authorization` header.
	fn sign(&self, request: &mut HttpRequest) -> Result<()>;
}

/// Signer for requests that carry no authorization.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unsigned;
impl RequestSigner for Unsigned {
	fn sign(&self, _request: &mut HttpRequest) -> Result<()> {
		Ok(())
	}
}

/// Signs requests with a Hawk `Authorization` header, including a payload hash when the
/// request has a body.
pub struct HawkSigner {
	credentials: hawk::Credentials,
	algorithm: HawkAlgorithm,
}
impl HawkSigner {
	/// Prepares a signer from issued credentials.
	pub fn new(credentials: &Credentials) -> Result<Self> {
		Ok(Self { credentials: credentials.signing_credentials()?, algorithm: credentials.algorithm })
	}
}
impl RequestSigner for HawkSigner {
	fn sign(&self, request: &mut HttpRequest) -> Result<()> {
		let uri = request.uri();
		let host = uri.host().ok_or_else(|| ConfigError::InvalidUrl { url: uri.to_string() })?;
		let port = uri.port_u16().unwrap_or(match uri.scheme_str() {
			Some("https") => 443,
			_ => 80,
		});
		let path = uri.path_and_query().map(|value| value.as_str()).unwrap_or("/");
		let hash = if request.body().is_empty() {
			None
		} else {
			let content_type = request
				.headers()
				.get(CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.unwrap_or_default();

			Some(
				hawk::PayloadHasher::hash(content_type, self.algorithm.digest(), request.body())
					.map_err(Error::signing)?,
			)
		};
		let header = hawk::RequestBuilder::new(request.method().as_str(), host, port, path)
			.hash(hash.as_deref())
			.request()
			.make_header(&self.credentials)
			.map_err(Error::signing)?;
		let value = HeaderValue::from_str(&format!("Hawk {header}"))
			.map_err(|e| ConfigError::from(http::Error::from(e)))?;

		request.headers_mut().insert(AUTHORIZATION, value);

		Ok(())
	}
}
impl Debug for HawkSigner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HawkSigner")
			.field("id", &self.credentials.id)
			.field("algorithm", &self.algorithm)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::time::Duration as StdDuration;
	// self
	use super::*;

	fn request(body: &[u8]) -> HttpRequest {
		http::Request::post("https://tent.example.com/oauth/token")
			.header(CONTENT_TYPE, "application/json")
			.body(body.to_vec())
			.expect("Static request should build.")
	}

	fn signer() -> HawkSigner {
		let credentials = Credentials::new("app-id", "app-key", HawkAlgorithm::Sha256)
			.expect("Fixture credentials should be valid.");

		HawkSigner::new(&credentials).expect("SHA-256 keys are always accepted.")
	}

	#[test]
	fn unsigned_requests_are_left_alone() {
		let mut request = request(b"{}");

		Unsigned.sign(&mut request).expect("Unsigned never fails.");

		assert!(request.headers().get(AUTHORIZATION).is_none());
	}

	#[test]
	fn hawk_header_validates_against_the_same_request() {
		let body = br#"{"code":"abc123"}"#;
		let mut request = request(body);

		signer().sign(&mut request).expect("Signing should succeed.");

		let value = request
			.headers()
			.get(AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.expect("Authorization header should be set.");

		assert!(value.starts_with("Hawk "));
		assert!(value.contains("id=\"app-id\""));

		let header: hawk::Header =
			value.trim_start_matches("Hawk ").parse().expect("Header should parse back.");
		let hash = hawk::PayloadHasher::hash("application/json", hawk::SHA256, &body[..])
			.expect("Payload hashing should succeed.");
		let key = hawk::Key::new("app-key", hawk::SHA256).expect("Key should build.");
		let server_view =
			hawk::RequestBuilder::new("POST", "tent.example.com", 443, "/oauth/token")
				.hash(&hash[..])
				.request();

		assert!(server_view.validate_header(&header, &key, StdDuration::from_secs(60)));
	}

	#[test]
	fn debug_output_omits_key() {
		assert!(!format!("{:?}", signer()).contains("app-key"));
	}
}
