//! Authorization code exchange for Hawk credentials.

// crates.io
use http::header::{ACCEPT, CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	config::JSON_MEDIA_TYPE,
	credentials::{Credentials, DigestSelection},
	error::{ConfigError, ProtocolError},
	flows::Client,
	http::{HttpRequest, HttpResponse, TentHttpClient},
	oauth::{AccessTokenRequest, AccessTokenResponse, AuthorizationCode},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C> Client<C>
where
	C: ?Sized + TentHttpClient,
{
	/// Exchanges a single-use authorization code for Hawk credentials.
	///
	/// Performs exactly one POST to the server's `oauth_token` endpoint. Nothing is
	/// retried or persisted; on failure the code is gone and a new authorization is needed.
	pub async fn request_access_token(&self, code: AuthorizationCode) -> Result<Credentials> {
		const KIND: FlowKind = FlowKind::TokenExchange;

		let span = FlowSpan::new(KIND, "request_access_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let body = AccessTokenRequest::hawk(&code).to_json()?;
				let mut request = build_token_request(self.server.oauth_token_url(), body)?;

				self.signer().sign(&mut request)?;

				let response = self.http_client.execute(request).await?;

				map_token_response(response, self.digest)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}

fn build_token_request(url: &Url, body: Vec<u8>) -> Result<HttpRequest> {
	http::Request::post(url.as_str())
		.header(ACCEPT, JSON_MEDIA_TYPE)
		.header(CONTENT_TYPE, JSON_MEDIA_TYPE)
		.body(body)
		.map_err(|e| ConfigError::from(e).into())
}

fn map_token_response(response: HttpResponse, digest: DigestSelection) -> Result<Credentials> {
	let status = response.status();

	if !status.is_success() {
		return Err(ProtocolError::Status {
			status: status.as_u16(),
			body: String::from_utf8_lossy(response.body()).into_owned(),
		}
		.into());
	}

	let deserializer = &mut serde_json::Deserializer::from_slice(response.body());
	let parsed: AccessTokenResponse = serde_path_to_error::deserialize(deserializer)
		.map_err(|source| ProtocolError::MalformedBody { source, status: status.as_u16() })?;

	Ok(parsed.into_credentials(digest)?)
}
