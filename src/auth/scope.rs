//! Scope sets shared by app registrations and grants.

// std
use std::collections::BTreeSet;
// self
use crate::_prelude::*;

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Deduplicated, sorted set of Tent scopes (`read_posts`, `write_profile`, ...).
///
/// Registrations and grants list scopes as JSON arrays in any order; two sets compare
/// equal whenever they name the same scopes.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ScopeSet(BTreeSet<String>);
impl ScopeSet {
	/// Builds a set after rejecting empty or whitespace-bearing entries.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		scopes
			.into_iter()
			.map(|scope| {
				let scope = scope.into();

				if scope.is_empty() {
					Err(ScopeValidationError::Empty)
				} else if scope.chars().any(char::is_whitespace) {
					Err(ScopeValidationError::ContainsWhitespace { scope })
				} else {
					Ok(scope)
				}
			})
			.collect::<Result<_, _>>()
			.map(Self)
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are listed.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if `scope` is listed.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.contains(scope)
	}

	/// Returns true if every scope in `other` is also listed here.
	pub fn is_superset(&self, other: &ScopeSet) -> bool {
		self.0.is_superset(&other.0)
	}

	/// Scopes of `requested` that this set does not list.
	pub fn missing_from<'a>(&self, requested: &'a ScopeSet) -> impl Iterator<Item = &'a str> {
		requested.iter().filter(|scope| !self.contains(scope))
	}

	/// Iterates scopes in sorted order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}
}
impl Debug for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_set().entries(self.iter()).finish()
	}
}
impl Display for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.iter().collect::<Vec<_>>().join(", "))
	}
}
impl TryFrom<Vec<String>> for ScopeSet {
	type Error = ScopeValidationError;

	fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl From<ScopeSet> for Vec<String> {
	fn from(value: ScopeSet) -> Self {
		value.0.into_iter().collect()
	}
}
