//! Tent server metadata: the endpoint set discovered from an entity's meta post.
//!
//! Discovery itself (fetching and parsing the meta post) happens elsewhere; this module
//! holds the validated result so flows can resolve endpoints such as the OAuth token URL
//! without knowing how they were found.

// self
use crate::_prelude::*;

/// Errors raised while constructing or validating server metadata.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ServerMetaError {
	/// Authorization endpoint is required for the redirect flow.
	#[error("Missing oauth_auth endpoint.")]
	MissingOAuthAuth,
	/// Token endpoint is mandatory for code exchanges.
	#[error("Missing oauth_token endpoint.")]
	MissingOAuthToken,
	/// Endpoints must use HTTP(S).
	#[error("The {endpoint} endpoint must use http(s): {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Endpoint set advertised by a Tent server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerUrls {
	/// Where users approve an app (authorization redirect target).
	pub oauth_auth: Url,
	/// Where authorization codes are exchanged for Hawk credentials.
	pub oauth_token: Url,
	/// Where new posts (including app registrations) are created.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub new_post: Option<Url>,
	/// Posts feed endpoint.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub posts_feed: Option<Url>,
}

/// Immutable server metadata consumed by flows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMeta {
	/// Protocol version advertised by the server.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	/// Lower values are preferred when an entity lists several servers.
	#[serde(default)]
	pub preference: u32,
	/// Endpoint definitions.
	pub urls: ServerUrls,
}
impl ServerMeta {
	/// Returns a new builder.
	pub fn builder() -> ServerMetaBuilder {
		ServerMetaBuilder::default()
	}

	/// Resolves the OAuth token endpoint.
	pub fn oauth_token_url(&self) -> &Url {
		&self.urls.oauth_token
	}

	/// Resolves the authorization redirect endpoint.
	pub fn oauth_auth_url(&self) -> &Url {
		&self.urls.oauth_auth
	}

	/// Picks the most preferred server from an entity's server list.
	pub fn preferred(servers: &[ServerMeta]) -> Option<&ServerMeta> {
		servers.iter().min_by_key(|server| server.preference)
	}

	/// Validates invariants for metadata that arrived over the wire.
	pub fn validate(&self) -> Result<(), ServerMetaError> {
		validate_endpoint("oauth_auth", &self.urls.oauth_auth)?;
		validate_endpoint("oauth_token", &self.urls.oauth_token)?;

		if let Some(url) = self.urls.new_post.as_ref() {
			validate_endpoint("new_post", url)?;
		}
		if let Some(url) = self.urls.posts_feed.as_ref() {
			validate_endpoint("posts_feed", url)?;
		}

		Ok(())
	}
}

/// Builder for [`ServerMeta`] values.
#[derive(Debug, Default)]
pub struct ServerMetaBuilder {
	version: Option<String>,
	preference: u32,
	oauth_auth: Option<Url>,
	oauth_token: Option<Url>,
	new_post: Option<Url>,
	posts_feed: Option<Url>,
}
impl ServerMetaBuilder {
	/// Sets the advertised protocol version.
	pub fn version(mut self, version: impl Into<String>) -> Self {
		self.version = Some(version.into());

		self
	}

	/// Sets the server preference.
	pub fn preference(mut self, preference: u32) -> Self {
		self.preference = preference;

		self
	}

	/// Sets the authorization endpoint.
	pub fn oauth_auth(mut self, url: Url) -> Self {
		self.oauth_auth = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn oauth_token(mut self, url: Url) -> Self {
		self.oauth_token = Some(url);

		self
	}

	/// Sets the new-post endpoint.
	pub fn new_post(mut self, url: Url) -> Self {
		self.new_post = Some(url);

		self
	}

	/// Sets the posts feed endpoint.
	pub fn posts_feed(mut self, url: Url) -> Self {
		self.posts_feed = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting metadata.
	pub fn build(self) -> Result<ServerMeta, ServerMetaError> {
		let oauth_auth = self.oauth_auth.ok_or(ServerMetaError::MissingOAuthAuth)?;
		let oauth_token = self.oauth_token.ok_or(ServerMetaError::MissingOAuthToken)?;
		let meta = ServerMeta {
			version: self.version,
			preference: self.preference,
			urls: ServerUrls {
				oauth_auth,
				oauth_token,
				new_post: self.new_post,
				posts_feed: self.posts_feed,
			},
		};

		meta.validate()?;

		Ok(meta)
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ServerMetaError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ServerMetaError::UnsupportedScheme { endpoint: name, url: url.to_string() }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Test URL should parse.")
	}

	#[test]
	fn builder_requires_oauth_endpoints() {
		let err = ServerMeta::builder()
			.oauth_token(url("https://tent.example.com/oauth/token"))
			.build()
			.expect_err("Missing oauth_auth must be rejected.");

		assert_eq!(err, ServerMetaError::MissingOAuthAuth);

		let err = ServerMeta::builder()
			.oauth_auth(url("https://tent.example.com/oauth"))
			.build()
			.expect_err("Missing oauth_token must be rejected.");

		assert_eq!(err, ServerMetaError::MissingOAuthToken);
	}

	#[test]
	fn builder_rejects_non_http_endpoints() {
		let err = ServerMeta::builder()
			.oauth_auth(url("https://tent.example.com/oauth"))
			.oauth_token(url("ftp://tent.example.com/oauth/token"))
			.build()
			.expect_err("Non-HTTP endpoints must be rejected.");

		assert!(matches!(err, ServerMetaError::UnsupportedScheme { endpoint: "oauth_token", .. }));
	}

	#[test]
	fn metadata_deserializes_from_meta_post_shape() {
		let meta: ServerMeta = serde_json::from_str(
			r#"{
				"version": "0.3",
				"preference": 0,
				"urls": {
					"oauth_auth": "https://tent.example.com/oauth",
					"oauth_token": "https://tent.example.com/oauth/token",
					"new_post": "https://tent.example.com/posts"
				}
			}"#,
		)
		.expect("Meta post server entry should decode.");

		assert!(meta.validate().is_ok());
		assert_eq!(meta.oauth_token_url().as_str(), "https://tent.example.com/oauth/token");
		assert_eq!(meta.oauth_auth_url().path(), "/oauth");
	}

	#[test]
	fn preferred_picks_lowest_preference() {
		let build = |preference, host: &str| {
			ServerMeta::builder()
				.preference(preference)
				.oauth_auth(url(&format!("https://{host}/oauth")))
				.oauth_token(url(&format!("https://{host}/oauth/token")))
				.build()
				.expect("Server metadata should build.")
		};
		let servers = vec![build(2, "backup.example.com"), build(0, "primary.example.com")];
		let preferred = ServerMeta::preferred(&servers).expect("List is not empty.");

		assert_eq!(preferred.oauth_token_url().host_str(), Some("primary.example.com"));
		assert!(ServerMeta::preferred(&[]).is_none());
	}
}
