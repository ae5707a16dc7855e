//! Hawk credentials issued by the token exchange, and their adapter to the signing layer.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::ValidationError,
	post::{Post, PostPermissions, PostRef, PostType},
};

/// Digest algorithms usable with Hawk credentials.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HawkAlgorithm {
	/// SHA-256.
	#[default]
	Sha256,
	/// SHA-384.
	Sha384,
	/// SHA-512.
	Sha512,
}
impl HawkAlgorithm {
	/// Returns the wire name (`sha256`, `sha384`, `sha512`).
	pub const fn as_str(self) -> &'static str {
		match self {
			HawkAlgorithm::Sha256 => "sha256",
			HawkAlgorithm::Sha384 => "sha384",
			HawkAlgorithm::Sha512 => "sha512",
		}
	}

	/// Digest handed to the Hawk signing layer.
	pub fn digest(self) -> hawk::DigestAlgorithm {
		match self {
			HawkAlgorithm::Sha256 => hawk::SHA256,
			HawkAlgorithm::Sha384 => hawk::SHA384,
			HawkAlgorithm::Sha512 => hawk::SHA512,
		}
	}
}
impl Display for HawkAlgorithm {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for HawkAlgorithm {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"sha256" | "sha-256" => Ok(HawkAlgorithm::Sha256),
			"sha384" | "sha-384" => Ok(HawkAlgorithm::Sha384),
			"sha512" | "sha-512" => Ok(HawkAlgorithm::Sha512),
			_ => Err(ValidationError::UnsupportedDigest { name: s.to_owned() }),
		}
	}
}

/// How the signing digest is chosen when converting a token response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DigestSelection {
	/// Always SHA-256, whatever the server advertises.
	#[default]
	Fixed,
	/// Use the server's advertised `hawk_algorithm`; unknown names are rejected.
	Advertised,
}
impl DigestSelection {
	/// Resolves the digest for a response that advertised `advertised`.
	pub fn resolve(self, advertised: &str) -> Result<HawkAlgorithm, ValidationError> {
		match self {
			DigestSelection::Fixed => Ok(HawkAlgorithm::Sha256),
			DigestSelection::Advertised => advertised.parse(),
		}
	}
}

#[derive(Serialize, Deserialize)]
struct CredentialsContent {
	hawk_key: TokenSecret,
	hawk_algorithm: HawkAlgorithm,
}

/// Signing credentials for all requests made after authorization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	/// Hawk identifier (the issued access token).
	pub id: String,
	/// Shared Hawk key; callers must avoid logging it.
	pub key: TokenSecret,
	/// Digest used when signing.
	pub algorithm: HawkAlgorithm,
	/// Credentials post these were read from, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub post: Option<PostRef>,
}
impl Credentials {
	/// Creates credentials after checking that neither the id nor the key is empty.
	pub fn new(
		id: impl Into<String>,
		key: impl Into<String>,
		algorithm: HawkAlgorithm,
	) -> Result<Self, ValidationError> {
		let id = id.into();
		let key = TokenSecret::new(key);

		if id.is_empty() {
			return Err(ValidationError::MissingField { field: "access_token" });
		}
		if key.is_empty() {
			return Err(ValidationError::MissingField { field: "hawk_key" });
		}

		Ok(Self { id, key, algorithm, post: None })
	}

	/// Records the post these credentials originate from.
	pub fn with_post(mut self, post: PostRef) -> Self {
		self.post = Some(post);

		self
	}

	/// Builds the credentials consumed by the Hawk signing layer.
	pub fn signing_credentials(&self) -> Result<hawk::Credentials> {
		let key = hawk::Key::new(self.key.expose().as_bytes(), self.algorithm.digest())
			.map_err(Error::signing)?;

		Ok(hawk::Credentials { id: self.id.clone(), key })
	}

	/// Wraps the key material into a private credentials post.
	pub fn to_post(&self) -> Result<Post> {
		let content =
			CredentialsContent { hawk_key: self.key.clone(), hawk_algorithm: self.algorithm };

		Post::wrap(PostType::Credentials, &content, PostPermissions::private(Vec::<String>::new()))
	}

	/// Reads credentials from a published credentials post; the post id is the Hawk id.
	pub fn from_post(post: &Post) -> Result<Self> {
		let content: CredentialsContent = post.decode(PostType::Credentials)?;
		let reference = post.reference().ok_or(ValidationError::MissingField { field: "id" })?;
		let credentials =
			Self::new(reference.id.clone(), content.hawk_key.expose(), content.hawk_algorithm)?;

		Ok(credentials.with_post(reference))
	}
}
