//! App registration and authorization-grant models.
//!
//! An [`App`] describes the client that asks a Tent server for access; it is sent to the
//! server wrapped in an app post ([`App::to_post`]). After the user approves the request
//! the server records what was actually granted as an [`AppAuth`].

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, ScopeValidationError},
	error::ValidationError,
	post::{Post, PostPermissions, PostType},
};

/// Errors raised while building an [`App`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum AppError {
	/// The app name was empty or whitespace.
	#[error("App name cannot be empty.")]
	EmptyName,
	/// A URL field must use HTTP(S).
	#[error("The {field} must be an http(s) URL: {url}.")]
	UnsupportedScheme {
		/// Which field failed validation.
		field: &'static str,
		/// URL that failed validation.
		url: String,
	},
	/// Requested scopes could not be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] ScopeValidationError),
}

/// Post types an app asks to read and write.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPostTypes {
	/// Post type URIs the app may read.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub read: Vec<String>,
	/// Post type URIs the app may write.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub write: Vec<String>,
}
impl AppPostTypes {
	/// Wildcard that matches every post type.
	pub const ALL: &'static str = "all";

	/// Returns true if reading `post_type` is covered.
	pub fn can_read(&self, post_type: &str) -> bool {
		covers(&self.read, post_type)
	}

	/// Returns true if writing `post_type` is covered.
	pub fn can_write(&self, post_type: &str) -> bool {
		covers(&self.write, post_type)
	}

	fn is_empty(&self) -> bool {
		self.read.is_empty() && self.write.is_empty()
	}
}

/// Client application identity and requested access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
	/// Human-readable application name.
	pub name: String,
	/// Canonical application URL.
	pub url: Url,
	/// Optional description shown to the user during authorization.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Requested scopes.
	#[serde(default, skip_serializing_if = "ScopeSet::is_empty")]
	pub scopes: ScopeSet,
	/// Requested post-type access.
	#[serde(default, skip_serializing_if = "AppPostTypes::is_empty")]
	pub post_types: AppPostTypes,
	/// Where the server sends the user (and the authorization code) after approval.
	pub redirect_uri: Url,
	/// Endpoint the server notifies about new posts.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notification_url: Option<Url>,
	/// Post types the app wants notifications for.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub notification_post_types: Vec<String>,
}
impl App {
	/// Returns a builder seeded with the required fields.
	pub fn builder(name: impl Into<String>, url: Url, redirect_uri: Url) -> AppBuilder {
		AppBuilder::new(name.into(), url, redirect_uri)
	}

	/// Wraps the registration into a public app post.
	pub fn to_post(&self) -> Result<Post> {
		self.to_post_with_permissions(PostPermissions::public())
	}

	/// Wraps the registration into an app post with explicit visibility.
	pub fn to_post_with_permissions(&self, permissions: PostPermissions) -> Result<Post> {
		Post::wrap(PostType::App, self, permissions)
	}

	/// Reads a registration back out of an app post, applying the builder's checks.
	pub fn from_post(post: &Post) -> Result<Self> {
		let app: Self = post.decode(PostType::App)?;

		app.validate().map_err(ValidationError::from)?;

		Ok(app)
	}

	/// Checks the name and every URL field; registrations from the wire pass through here too.
	pub fn validate(&self) -> Result<(), AppError> {
		if self.name.trim().is_empty() {
			return Err(AppError::EmptyName);
		}

		validate_url("url", &self.url)?;
		validate_url("redirect_uri", &self.redirect_uri)?;

		if let Some(url) = self.notification_url.as_ref() {
			validate_url("notification_url", url)?;
		}

		Ok(())
	}
}

/// Builder for [`App`] values.
#[derive(Debug)]
pub struct AppBuilder {
	name: String,
	url: Url,
	redirect_uri: Url,
	description: Option<String>,
	scopes: Vec<String>,
	post_types: AppPostTypes,
	notification_url: Option<Url>,
	notification_post_types: Vec<String>,
}
impl AppBuilder {
	fn new(name: String, url: Url, redirect_uri: Url) -> Self {
		Self {
			name,
			url,
			redirect_uri,
			description: None,
			scopes: Vec::new(),
			post_types: AppPostTypes::default(),
			notification_url: None,
			notification_post_types: Vec::new(),
		}
	}

	/// Sets the description shown during authorization.
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	/// Adds a requested scope.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scopes.push(scope.into());

		self
	}

	/// Adds several requested scopes.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes.extend(scopes.into_iter().map(Into::into));

		self
	}

	/// Requests read access to a post type.
	pub fn read_post_type(mut self, post_type: impl Into<String>) -> Self {
		self.post_types.read.push(post_type.into());

		self
	}

	/// Requests write access to a post type.
	pub fn write_post_type(mut self, post_type: impl Into<String>) -> Self {
		self.post_types.write.push(post_type.into());

		self
	}

	/// Subscribes `url` to notifications for the given post types.
	pub fn notifications<I, S>(mut self, url: Url, post_types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.notification_url = Some(url);
		self.notification_post_types = post_types.into_iter().map(Into::into).collect();

		self
	}

	/// Consumes the builder and validates the resulting registration.
	pub fn build(self) -> Result<App, AppError> {
		let app = App {
			name: self.name,
			url: self.url,
			description: self.description,
			scopes: ScopeSet::new(self.scopes)?,
			post_types: self.post_types,
			redirect_uri: self.redirect_uri,
			notification_url: self.notification_url,
			notification_post_types: self.notification_post_types,
		};

		app.validate()?;

		Ok(app)
	}
}

/// The server's record of what an app was actually granted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppAuth {
	/// False once the user has revoked the grant.
	pub active: bool,
	/// Granted scopes.
	#[serde(default, skip_serializing_if = "ScopeSet::is_empty")]
	pub scopes: ScopeSet,
	/// Granted post-type access.
	#[serde(default, skip_serializing_if = "AppPostTypes::is_empty")]
	pub post_types: AppPostTypes,
}
impl AppAuth {
	/// Reads a grant out of an app-auth post.
	pub fn from_post(post: &Post) -> Result<Self> {
		post.decode(PostType::AppAuth)
	}

	/// Fails with [`Error::Revoked`] when the grant is no longer active.
	pub fn ensure_active(&self) -> Result<()> {
		if self.active { Ok(()) } else { Err(Error::Revoked) }
	}

	/// Returns true if the grant is active and includes `scope`.
	pub fn grants_scope(&self, scope: &str) -> bool {
		self.active && self.scopes.contains(scope)
	}

	/// Scopes `app` asked for that this grant leaves out.
	pub fn missing_scopes<'a>(&self, app: &'a App) -> Vec<&'a str> {
		self.scopes.missing_from(&app.scopes).collect()
	}

	/// Returns true if the grant is active and covers reading `post_type`.
	pub fn can_read(&self, post_type: &str) -> bool {
		self.active && self.post_types.can_read(post_type)
	}

	/// Returns true if the grant is active and covers writing `post_type`.
	pub fn can_write(&self, post_type: &str) -> bool {
		self.active && self.post_types.can_write(post_type)
	}
}

fn covers(list: &[String], post_type: &str) -> bool {
	list.iter().any(|entry| entry == AppPostTypes::ALL || entry == post_type)
}

fn validate_url(field: &'static str, url: &Url) -> Result<(), AppError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(AppError::UnsupportedScheme { field, url: url.to_string() }),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::config::POST_TYPE_APP;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Test URL should parse.")
	}

	fn app() -> App {
		App::builder(
			"Example App",
			url("https://app.example.com"),
			url("https://app.example.com/oauth/callback"),
		)
		.description("An example app")
		.scopes(["permissions", "read_posts", "permissions"])
		.read_post_type("https://tent.io/types/status/v0#")
		.write_post_type("https://tent.io/types/status/v0#")
		.notifications(url("https://app.example.com/notify"), ["https://tent.io/types/status/v0#"])
		.build()
		.expect("Fixture app should build.")
	}

	#[test]
	fn app_post_round_trips() {
		let app = app();
		let post = app.to_post().expect("App should wrap into a post.");

		assert_eq!(post.post_type.as_str(), POST_TYPE_APP);
		assert!(post.permissions.public);
		assert_eq!(App::from_post(&post).expect("App post should decode."), app);
	}

	#[test]
	fn app_content_uses_tent_field_names() {
		let post = app().to_post().expect("App should wrap into a post.");

		assert_eq!(post.content["redirect_uri"], "https://app.example.com/oauth/callback");
		assert_eq!(post.content["scopes"], json!(["permissions", "read_posts"]));
		assert_eq!(post.content["post_types"]["read"], json!(["https://tent.io/types/status/v0#"]));
		assert_eq!(post.content["notification_url"], "https://app.example.com/notify");
	}

	#[test]
	fn explicit_permissions_override_public_default() {
		let post = app()
			.to_post_with_permissions(PostPermissions::private(["https://me.example.com"]))
			.expect("App should wrap into a post.");

		assert!(!post.permissions.public);
	}

	#[test]
	fn builder_rejects_invalid_input() {
		let err = App::builder("  ", url("https://a.example.com"), url("https://a.example.com/cb"))
			.build()
			.expect_err("Blank names must be rejected.");

		assert_eq!(err, AppError::EmptyName);

		let err = App::builder("App", url("https://a.example.com"), url("ftp://a.example.com/cb"))
			.build()
			.expect_err("Non-HTTP redirect URIs must be rejected.");

		assert!(matches!(err, AppError::UnsupportedScheme { field: "redirect_uri", .. }));

		let err = App::builder("App", url("https://a.example.com"), url("https://a.example.com/cb"))
			.scope("two words")
			.build()
			.expect_err("Invalid scopes must be rejected.");

		assert!(matches!(err, AppError::InvalidScope(_)));
	}

	#[test]
	fn app_from_wrong_post_type_fails() {
		let post = Post::wrap(PostType::AppAuth, &json!({ "active": true }), Default::default())
			.expect("JSON values always serialize.");
		let err = App::from_post(&post).expect_err("App-auth posts are not app posts.");

		assert!(matches!(err, Error::Validation(ValidationError::UnexpectedPostType { .. })));
	}

	#[test]
	fn decoding_applies_builder_checks() {
		let wrap = |content: serde_json::Value| {
			Post::wrap(PostType::App, &content, Default::default())
				.expect("JSON values always serialize.")
		};
		let err = App::from_post(&wrap(json!({
			"name": "",
			"url": "ftp://evil.example.com",
			"redirect_uri": "javascript:alert(1)"
		})))
		.expect_err("Blank names from the wire must be rejected.");

		assert!(matches!(
			err,
			Error::Validation(ValidationError::InvalidApp(AppError::EmptyName))
		));

		let err = App::from_post(&wrap(json!({
			"name": "Evil",
			"url": "https://evil.example.com",
			"redirect_uri": "javascript:alert(1)"
		})))
		.expect_err("Script redirect URIs must be rejected.");

		assert!(matches!(
			err,
			Error::Validation(ValidationError::InvalidApp(AppError::UnsupportedScheme {
				field: "redirect_uri",
				..
			}))
		));

		let err = App::from_post(&wrap(json!({
			"name": "Notify",
			"url": "https://app.example.com",
			"redirect_uri": "https://app.example.com/cb",
			"notification_url": "file:///etc/passwd"
		})))
		.expect_err("Non-HTTP notification URLs must be rejected.");

		assert!(matches!(
			err,
			Error::Validation(ValidationError::InvalidApp(AppError::UnsupportedScheme {
				field: "notification_url",
				..
			}))
		));
	}

	#[test]
	fn app_auth_lookups_respect_active_flag() {
		let post = Post::wrap(
			PostType::AppAuth,
			&json!({
				"active": true,
				"scopes": ["permissions"],
				"post_types": { "read": ["all"], "write": ["https://tent.io/types/status/v0#"] }
			}),
			Default::default(),
		)
		.expect("JSON values always serialize.");
		let mut auth = AppAuth::from_post(&post).expect("App-auth post should decode.");

		assert!(auth.ensure_active().is_ok());
		assert!(auth.grants_scope("permissions"));
		assert!(auth.can_read("https://tent.io/types/photo/v0#"));
		assert!(auth.can_write("https://tent.io/types/status/v0#"));
		assert!(!auth.can_write("https://tent.io/types/photo/v0#"));
		assert_eq!(auth.missing_scopes(&app()), vec!["read_posts"]);

		auth.active = false;

		assert!(matches!(auth.ensure_active(), Err(Error::Revoked)));
		assert!(!auth.grants_scope("permissions"));
		assert!(!auth.can_read("https://tent.io/types/photo/v0#"));
	}
}
