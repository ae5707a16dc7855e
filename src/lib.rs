//! Client-side Tent app registration and Hawk credential exchange: typed posts, a one-shot
//! authorization-code exchange, and signing-ready credentials in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod app;
pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod post;
pub mod server;
pub mod signing;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{flows::Client, http::ReqwestHttpClient, server::ServerMeta};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = Client<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates a local mock
	/// server may present.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a mock server's metadata with the auth and token endpoints under `base`.
	pub fn test_server_meta(base: &str) -> ServerMeta {
		let url = |path: &str| {
			Url::parse(&format!("{}{path}", base.trim_end_matches('/')))
				.expect("Mock server URL should parse successfully.")
		};

		ServerMeta::builder()
			.oauth_auth(url("/oauth"))
			.oauth_token(url("/oauth/token"))
			.new_post(url("/posts"))
			.build()
			.expect("Mock server metadata should build successfully.")
	}

	/// Constructs a [`Client`] for the mock server rooted at `base`.
	pub fn build_reqwest_test_client(base: &str) -> ReqwestTestClient {
		Client::with_http_client(test_server_meta(base), test_reqwest_http_client())
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use hawk;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use crate::_preludet::*;

	#[test]
	fn test_helpers_root_endpoints_at_the_mock_server() {
		let client = build_reqwest_test_client("http://127.0.0.1:5000/");

		assert_eq!(client.server.oauth_auth_url().as_str(), "http://127.0.0.1:5000/oauth");
		assert_eq!(client.server.oauth_token_url().as_str(), "http://127.0.0.1:5000/oauth/token");
	}
}

#[cfg(test)] use {color_eyre as _, httpmock as _, parking_lot as _};
