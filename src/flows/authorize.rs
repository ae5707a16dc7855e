//! Authorization redirect construction and redirect parsing.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	config::AUTHORIZATION_STATE_LEN,
	error::{ConfigError, ValidationError},
	flows::Client,
	http::TentHttpClient,
	oauth::AuthorizationCode,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Authorization redirect metadata returned by [`Client::authorization_request`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	/// Registered app post id, sent as `client_id`.
	pub client_id: String,
	/// Opaque state value that must round-trip via the redirect.
	pub state: String,
	/// Fully-formed URL the user should be sent to.
	pub url: Url,
}
impl AuthorizationRequest {
	/// Validates the returned `state` parameter after the authorization redirect.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state { Ok(()) } else { Err(ConfigError::StateMismatch.into()) }
	}

	/// Reads the authorization code from the redirect the server sent the user back with.
	///
	/// The redirect's `state` is checked first; an `error` parameter means the user (or the
	/// server) declined the app.
	pub fn code_from_redirect(&self, redirect: &Url) -> Result<AuthorizationCode> {
		let mut code = None;
		let mut state = None;
		let mut denied = None;

		for (key, value) in redirect.query_pairs() {
			match key.as_ref() {
				"code" => code = Some(value.into_owned()),
				"state" => state = Some(value.into_owned()),
				"error" => denied = Some(value.into_owned()),
				_ => {},
			}
		}

		self.validate_state(state.as_deref().unwrap_or_default())?;

		if let Some(reason) = denied {
			return Err(Error::AuthorizationDenied { reason });
		}

		let code = code.ok_or(ValidationError::MissingField { field: "code" })?;

		Ok(AuthorizationCode::new(code)?)
	}
}

impl<C> Client<C>
where
	C: ?Sized + TentHttpClient,
{
	/// Builds the URL that sends a user to approve the app registered as `app_id`.
	pub fn authorization_request(&self, app_id: &str) -> AuthorizationRequest {
		const KIND: FlowKind = FlowKind::Authorization;

		let _span = FlowSpan::new(KIND, "authorization_request").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let state = random_string(AUTHORIZATION_STATE_LEN);
		let url = build_authorize_url(self.server.oauth_auth_url(), app_id, &state);

		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		AuthorizationRequest { client_id: app_id.to_owned(), state, url }
	}
}

fn build_authorize_url(base: &Url, client_id: &str, state: &str) -> Url {
	let mut url = base.clone();

	url.query_pairs_mut().append_pair("client_id", client_id).append_pair("state", state);

	url
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}
