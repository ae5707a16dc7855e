//! Transport primitives for Tent requests.
//!
//! [`TentHttpClient`] is the crate's only dependency on an HTTP stack. Flows build an
//! [`HttpRequest`], let a [`RequestSigner`](crate::signing::RequestSigner) attach
//! authorization, and hand it to the client exactly once; the response comes back as an
//! [`HttpResponse`] with its status untouched so callers can classify it themselves.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::{ConfigError, TransportError};

/// Outbound request with a buffered body.
pub type HttpRequest = http::Request<Vec<u8>>;
/// Inbound response with a buffered body.
pub type HttpResponse = http::Response<Vec<u8>>;
/// Future returned by [`TentHttpClient::execute`].
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse>> + 'a + Send>>;

/// Abstraction over HTTP transports able to perform one request/response round trip.
///
/// Implementations must be `Send + Sync + 'static` so a single client can be shared by
/// concurrent exchanges. Non-success statuses are not errors at this layer; only failures
/// to complete the round trip are, and those surface as
/// [`TransportError`](crate::error::TransportError). Implementations must not retry.
pub trait TentHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Performs a single round trip.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token endpoints answer directly, so any custom [`ReqwestClient`] should disable
/// redirect following. Timeouts are whatever the wrapped client was built with.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TentHttpClient for ReqwestHttpClient {
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let request = reqwest::Request::try_from(request).map_err(map_reqwest_error)?;
			let response = client.execute(request).await.map_err(map_reqwest_error)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(map_reqwest_error)?;
			let mut response_new = HttpResponse::new(body.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(err: ReqwestError) -> Error {
	if err.is_builder() {
		ConfigError::http_client_build(err).into()
	} else {
		TransportError::from(err).into()
	}
}
