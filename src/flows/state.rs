//! One-shot authorization state machine.
//!
//! ```text
//! Unauthorized --receive_code--> CodeReceived --exchange--> Exchanging --+--> Authorized
//!                                                                        +--> Failed
//! ```
//!
//! `Authorized` and `Failed` are terminal. The authorization code is consumed on entry to
//! `Exchanging`, so a dropped exchange future leaves the flow there and a fresh
//! authorization is needed.

// self
use crate::{
	_prelude::*,
	credentials::Credentials,
	error::ConfigError,
	flows::{AuthorizationRequest, Client},
	http::TentHttpClient,
	oauth::AuthorizationCode,
};

/// Position of an [`AuthorizationFlow`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExchangeState {
	/// No code yet.
	Unauthorized,
	/// A code arrived and awaits exchange.
	CodeReceived,
	/// The exchange request is in flight.
	Exchanging,
	/// Credentials were issued.
	Authorized(Credentials),
	/// The exchange failed; the code is spent.
	Failed,
}
impl ExchangeState {
	/// Returns a stable label for the state.
	pub fn as_str(&self) -> &'static str {
		match self {
			ExchangeState::Unauthorized => "unauthorized",
			ExchangeState::CodeReceived => "code_received",
			ExchangeState::Exchanging => "exchanging",
			ExchangeState::Authorized(_) => "authorized",
			ExchangeState::Failed => "failed",
		}
	}
}

/// Drives a single app authorization from redirect to credentials.
#[derive(Debug)]
pub struct AuthorizationFlow {
	app_id: String,
	request: Option<AuthorizationRequest>,
	code: Option<AuthorizationCode>,
	state: ExchangeState,
}
impl AuthorizationFlow {
	/// Starts an unauthorized flow for the app registered as `app_id`.
	pub fn new(app_id: impl Into<String>) -> Self {
		Self { app_id: app_id.into(), request: None, code: None, state: ExchangeState::Unauthorized }
	}

	/// Current state.
	pub fn state(&self) -> &ExchangeState {
		&self.state
	}

	/// Issued credentials, once authorized.
	pub fn credentials(&self) -> Option<&Credentials> {
		match &self.state {
			ExchangeState::Authorized(credentials) => Some(credentials),
			_ => None,
		}
	}

	/// Builds the authorization redirect and remembers its `state` for the callback.
	///
	/// Calling it again before a code arrives replaces the pending request.
	pub fn start<C>(&mut self, client: &Client<C>) -> Result<&AuthorizationRequest>
	where
		C: ?Sized + TentHttpClient,
	{
		self.ensure(matches!(self.state, ExchangeState::Unauthorized), "start authorization")?;

		Ok(&*self.request.insert(client.authorization_request(&self.app_id)))
	}

	/// Records the code delivered by the redirect after checking the returned `state`.
	pub fn receive_code(&mut self, state: &str, code: AuthorizationCode) -> Result<()> {
		self.ensure(matches!(self.state, ExchangeState::Unauthorized), "receive a code")?;

		let request = self.request.as_ref().ok_or(ConfigError::InvalidTransition {
			state: self.state.as_str(),
			action: "receive a code before starting authorization",
		})?;

		request.validate_state(state)?;

		self.accept(code);

		Ok(())
	}

	/// Parses the redirect URL and records its code; see
	/// [`AuthorizationRequest::code_from_redirect`].
	pub fn receive_redirect(&mut self, redirect: &Url) -> Result<()> {
		self.ensure(matches!(self.state, ExchangeState::Unauthorized), "receive a redirect")?;

		let request = self.request.as_ref().ok_or(ConfigError::InvalidTransition {
			state: self.state.as_str(),
			action: "receive a redirect before starting authorization",
		})?;
		let code = request.code_from_redirect(redirect)?;

		self.accept(code);

		Ok(())
	}

	/// Exchanges the received code exactly once.
	///
	/// A second call, or a call before a code arrived, fails with
	/// [`ConfigError::InvalidTransition`] without touching the network.
	pub async fn exchange<C>(&mut self, client: &Client<C>) -> Result<Credentials>
	where
		C: ?Sized + TentHttpClient,
	{
		self.ensure(matches!(self.state, ExchangeState::CodeReceived), "exchange the code")?;

		let code = self.code.take().ok_or(ConfigError::InvalidTransition {
			state: self.state.as_str(),
			action: "exchange a missing code",
		})?;

		self.state = ExchangeState::Exchanging;

		match client.request_access_token(code).await {
			Ok(credentials) => {
				self.state = ExchangeState::Authorized(credentials.clone());

				Ok(credentials)
			},
			Err(e) => {
				self.state = ExchangeState::Failed;

				Err(e)
			},
		}
	}

	/// Consumes the flow, returning the issued credentials when authorized.
	pub fn into_credentials(self) -> Option<Credentials> {
		match self.state {
			ExchangeState::Authorized(credentials) => Some(credentials),
			_ => None,
		}
	}

	fn accept(&mut self, code: AuthorizationCode) {
		self.request = None;
		self.code = Some(code);
		self.state = ExchangeState::CodeReceived;
	}

	fn ensure(&self, allowed: bool, action: &'static str) -> Result<()> {
		if allowed {
			Ok(())
		} else {
			Err(ConfigError::InvalidTransition { state: self.state.as_str(), action }.into())
		}
	}
}
