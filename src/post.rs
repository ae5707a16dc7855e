//! Typed, permissioned Tent post envelopes.
//!
//! A [`Post`] carries one of the three post types this crate understands ([`PostType`])
//! together with its JSON content and visibility. Models wrap themselves into posts with
//! [`Post::wrap`] and read themselves back with [`Post::decode`], which refuses content of
//! the wrong type instead of guessing.

// self
use crate::{
	_prelude::*,
	config::{POST_TYPE_APP, POST_TYPE_APP_AUTH, POST_TYPE_CREDENTIALS},
	error::ValidationError,
};

/// Post types recognized by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PostType {
	/// App registration (`https://tent.io/types/app/v0#`).
	App,
	/// Server-side grant record (`https://tent.io/types/app-auth/v0#`).
	AppAuth,
	/// Hawk credentials (`https://tent.io/types/credentials/v0#`).
	Credentials,
}
impl PostType {
	/// Returns the type URI used on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			PostType::App => POST_TYPE_APP,
			PostType::AppAuth => POST_TYPE_APP_AUTH,
			PostType::Credentials => POST_TYPE_CREDENTIALS,
		}
	}
}
impl Display for PostType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for PostType {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			POST_TYPE_APP => Ok(PostType::App),
			POST_TYPE_APP_AUTH => Ok(PostType::AppAuth),
			POST_TYPE_CREDENTIALS => Ok(PostType::Credentials),
			other => Err(ValidationError::UnknownPostType { found: other.to_owned() }),
		}
	}
}
impl TryFrom<String> for PostType {
	type Error = ValidationError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
impl From<PostType> for String {
	fn from(value: PostType) -> Self {
		value.as_str().to_owned()
	}
}

/// Visibility flags attached to a post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPermissions {
	/// Whether the post is visible to everyone.
	pub public: bool,
	/// Entities explicitly allowed to read a non-public post.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub entities: Vec<String>,
	/// Groups explicitly allowed to read a non-public post.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub groups: Vec<String>,
}
impl PostPermissions {
	/// Visible to everyone.
	pub fn public() -> Self {
		Self { public: true, entities: Vec::new(), groups: Vec::new() }
	}

	/// Visible only to the listed entities.
	pub fn private<I, S>(entities: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			public: false,
			entities: entities.into_iter().map(Into::into).collect(),
			groups: Vec::new(),
		}
	}
}
impl Default for PostPermissions {
	fn default() -> Self {
		Self::public()
	}
}

/// Non-owning lookup key for a post that has been stored server-side.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostRef {
	/// Post identifier.
	pub id: String,
	/// Entity that published the post, when known.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub entity: Option<String>,
}

/// Generic typed document envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
	/// Server-assigned identifier; absent until the post has been published.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Publishing entity URI.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub entity: Option<String>,
	/// Post type.
	#[serde(rename = "type")]
	pub post_type: PostType,
	/// Publish time in milliseconds since the Unix epoch.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub published_at: Option<i64>,
	/// Serialized model carried by the post.
	#[serde(default)]
	pub content: serde_json::Value,
	/// Visibility flags.
	#[serde(default)]
	pub permissions: PostPermissions,
}
impl Post {
	/// Serializes `model` into a new, unpublished post of the given type.
	pub fn wrap<T>(post_type: PostType, model: &T, permissions: PostPermissions) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		let content = serde_json::to_value(model)
			.map_err(|e| Error::serialization(content_label(post_type), e))?;

		Ok(Self {
			id: None,
			entity: None,
			post_type,
			published_at: None,
			content,
			permissions,
		})
	}

	/// Decodes the content after checking that the post has the `expected` type.
	pub fn decode<T>(&self, expected: PostType) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.ensure_type(expected)?;

		T::deserialize(&self.content).map_err(|e| Error::serialization(content_label(expected), e))
	}

	/// Fails with [`ValidationError::UnexpectedPostType`] unless the post has `expected` type.
	pub fn ensure_type(&self, expected: PostType) -> Result<(), ValidationError> {
		if self.post_type == expected {
			Ok(())
		} else {
			Err(ValidationError::UnexpectedPostType {
				expected: expected.as_str(),
				found: self.post_type.as_str(),
			})
		}
	}

	/// Stamps `published_at` with the current clock.
	pub fn published_now(mut self) -> Self {
		let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;

		self.published_at = i64::try_from(millis).ok();

		self
	}

	/// Lookup key for the post, available once the server has assigned an identifier.
	pub fn reference(&self) -> Option<PostRef> {
		self.id.as_ref().map(|id| PostRef { id: id.clone(), entity: self.entity.clone() })
	}
}

fn content_label(post_type: PostType) -> &'static str {
	match post_type {
		PostType::App => "app post content",
		PostType::AppAuth => "app-auth post content",
		PostType::Credentials => "credentials post content",
	}
}
