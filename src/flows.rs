//! High-level Tent flows driven through a shared [`Client`].

pub mod authorize;
pub mod state;
pub mod token_exchange;

pub use authorize::*;
pub use state::*;

// self
use crate::{
	_prelude::*,
	credentials::{Credentials, DigestSelection},
	http::TentHttpClient,
	server::ServerMeta,
	signing::{HawkSigner, RequestSigner, Unsigned},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestTentClient = Client<ReqwestHttpClient>;

/// Runs authorization and token exchange flows against a single Tent server.
///
/// The client owns the HTTP transport, the server's endpoint set, and the signer applied to
/// every outbound request. It holds no per-exchange state, so one instance can be cloned
/// and shared by concurrent exchanges.
#[derive(Clone)]
pub struct Client<C>
where
	C: ?Sized + TentHttpClient,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Endpoints of the server being authorized against.
	pub server: ServerMeta,
	/// How the signing digest is chosen for issued credentials.
	pub digest: DigestSelection,
	signer: Arc<dyn RequestSigner>,
}
impl<C> Client<C>
where
	C: ?Sized + TentHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(server: ServerMeta, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			server,
			digest: DigestSelection::default(),
			signer: Arc::new(Unsigned),
		}
	}

	/// Signs every outbound request with the app's own Hawk credentials.
	pub fn with_app_credentials(self, credentials: &Credentials) -> Result<Self> {
		Ok(self.with_signer(Arc::new(HawkSigner::new(credentials)?)))
	}

	/// Replaces the request signer.
	pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
		self.signer = signer;

		self
	}

	/// Chooses how issued credentials pick their signing digest.
	pub fn with_digest_selection(mut self, digest: DigestSelection) -> Self {
		self.digest = digest;

		self
	}

	pub(crate) fn signer(&self) -> &dyn RequestSigner {
		self.signer.as_ref()
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(server: ServerMeta) -> Self {
		Self::with_http_client(server, ReqwestHttpClient::default())
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + TentHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("server", &self.server)
			.field("digest", &self.digest)
			.field("signer", &self.signer)
			.finish()
	}
}
