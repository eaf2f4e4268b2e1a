//! The Notion API client: session ownership, construction, and configuration.
//!
//! A [`Client`] owns one [`Session`] and sends every call, including its own authentication
//! calls, through the dispatch path in [`dispatch`]. Clones share the session, the refresh
//! guard, and the refresh-token callbacks, so a clone handed to another task observes the same
//! rotations.

pub mod dispatch;

mod guard;
mod metrics;
mod negotiate;

pub use dispatch::RequestOptions;
pub use metrics::RefreshMetrics;

// std
use std::time::Duration as StdDuration;
// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	auth::{
		RefreshTokenCallbackHandle, RefreshTokenCallbacks, Session, SessionName, TokenSecret,
		UserUuid,
	},
	client::guard::RefreshGuard,
	error::ConfigError,
	http::{DEFAULT_TIMEOUT, HttpTransport},
};

/// Production API root; endpoints are appended verbatim.
pub const DEFAULT_BASE_URL: &str = "https://api.getnotion.com/api";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestNotionClient = Client<ReqwestHttpClient>;

/// Authenticated handle to the Notion API.
pub struct Client<C>
where
	C: ?Sized + HttpTransport,
{
	transport: Arc<C>,
	base_url: Url,
	request_timeout: StdDuration,
	session: Arc<Mutex<Session>>,
	callbacks: RefreshTokenCallbacks,
	refresh_guard: Arc<RefreshGuard>,
	refresh_metrics: Arc<RefreshMetrics>,
}
impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Returns a snapshot of the session state.
	pub fn session(&self) -> Session {
		self.session.lock().clone()
	}

	/// Returns the current refresh token, if any.
	pub fn refresh_token(&self) -> Option<TokenSecret> {
		self.session.lock().refresh_token().cloned()
	}

	/// Returns the authenticated user's identifier, if known.
	pub fn user_uuid(&self) -> Option<UserUuid> {
		self.session.lock().user_uuid().cloned()
	}

	/// Returns the base URL every endpoint is appended to.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Returns the transport shared by every call.
	pub fn transport(&self) -> &Arc<C> {
		&self.transport
	}

	/// Returns the refresh counters shared by all clones of this client.
	pub fn refresh_metrics(&self) -> &RefreshMetrics {
		&self.refresh_metrics
	}

	/// Registers a callback invoked with the new refresh token after every successful login or
	/// refresh.
	pub fn add_refresh_token_callback<F>(&self, callback: F) -> RefreshTokenCallbackHandle
	where
		F: 'static + Fn(&str) + Send + Sync,
	{
		self.callbacks.add(callback)
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient> {
	/// Starts a builder using the default reqwest transport.
	///
	/// The default transport opens a short-lived connection pool for every call; use
	/// [`ClientBuilder::with_transport`] with [`ReqwestHttpClient::with_client`] to reuse a
	/// long-lived one instead.
	pub fn builder() -> ClientBuilder<ReqwestHttpClient> {
		ClientBuilder::new(ReqwestHttpClient::default())
	}
}
impl<C> Clone for Client<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			base_url: self.base_url.clone(),
			request_timeout: self.request_timeout,
			session: self.session.clone(),
			callbacks: self.callbacks.clone(),
			refresh_guard: self.refresh_guard.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
		}
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let session = self.session.lock();

		f.debug_struct("Client")
			.field("base_url", &self.base_url.as_str())
			.field("request_timeout", &self.request_timeout)
			.field("user_uuid", &session.user_uuid())
			.field("scheme", &session.scheme())
			.field("callbacks", &self.callbacks)
			.finish()
	}
}

/// Builder for [`Client`].
pub struct ClientBuilder<C>
where
	C: ?Sized + HttpTransport,
{
	transport: Arc<C>,
	base_url: Option<Url>,
	session_name: Option<String>,
	request_timeout: StdDuration,
}
impl<C> ClientBuilder<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a builder around the provided transport.
	pub fn new(transport: C) -> Self
	where
		C: Sized,
	{
		Self::from_shared(Arc::new(transport))
	}

	/// Creates a builder around an already shared transport.
	pub fn from_shared(transport: Arc<C>) -> Self {
		Self { transport, base_url: None, session_name: None, request_timeout: DEFAULT_TIMEOUT }
	}

	/// Overrides the API root (defaults to [`DEFAULT_BASE_URL`]).
	pub fn base_url(mut self, base_url: Url) -> Self {
		self.base_url = Some(base_url);

		self
	}

	/// Sets the session name sent at login instead of a random one.
	pub fn session_name(mut self, session_name: impl Into<String>) -> Self {
		self.session_name = Some(session_name.into());

		self
	}

	/// Overrides the total timeout applied to every call (defaults to 10 seconds).
	pub fn request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Swaps the transport while keeping the rest of the configuration.
	pub fn with_transport<T>(self, transport: T) -> ClientBuilder<T>
	where
		T: HttpTransport,
	{
		self.with_shared_transport(Arc::new(transport))
	}

	/// Swaps in an already shared transport while keeping the rest of the configuration.
	pub fn with_shared_transport<T>(self, transport: Arc<T>) -> ClientBuilder<T>
	where
		T: ?Sized + HttpTransport,
	{
		ClientBuilder {
			transport,
			base_url: self.base_url,
			session_name: self.session_name,
			request_timeout: self.request_timeout,
		}
	}

	/// Validates the configuration and returns an unauthenticated client.
	pub fn build(self) -> Result<Client<C>> {
		let base_url = match self.base_url {
			Some(url) => url,
			None => Url::parse(DEFAULT_BASE_URL).map_err(|_| ConfigError::InvalidBaseUrl {
				url: DEFAULT_BASE_URL.into(),
				reason: "it does not parse",
			})?,
		};

		validate_base_url(&base_url)?;

		let session_name = match self.session_name {
			Some(name) => SessionName::new(name).map_err(ConfigError::from)?,
			None => SessionName::generate(),
		};

		Ok(Client {
			transport: self.transport,
			base_url,
			request_timeout: self.request_timeout,
			session: Arc::new(Mutex::new(Session::new(session_name))),
			callbacks: RefreshTokenCallbacks::default(),
			refresh_guard: Default::default(),
			refresh_metrics: Default::default(),
		})
	}

	/// Builds a client and logs in with email + password.
	pub async fn connect_with_credentials(self, email: &str, password: &str) -> Result<Client<C>> {
		let client = self.build()?;

		client.authenticate_with_credentials(email, password).await?;

		Ok(client)
	}

	/// Builds a client and logs in through the deprecated sign-in endpoint.
	pub async fn connect_with_legacy_credentials(
		self,
		email: &str,
		password: &str,
	) -> Result<Client<C>> {
		let client = self.build()?;

		client.authenticate_with_legacy_credentials(email, password).await?;

		Ok(client)
	}

	/// Builds a client for a known user and authenticates with a stored refresh token, skipping
	/// the password entirely.
	pub async fn connect_with_refresh_token(
		self,
		user_uuid: &str,
		refresh_token: &str,
	) -> Result<Client<C>> {
		let user_uuid = UserUuid::new(user_uuid).map_err(ConfigError::from)?;
		let client = self.build()?;

		client.session.lock().set_user_uuid(user_uuid);
		client.authenticate_with_refresh_token(Some(refresh_token)).await?;

		Ok(client)
	}
}
impl<C> Debug for ClientBuilder<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientBuilder")
			.field("base_url", &self.base_url.as_ref().map(Url::as_str))
			.field("session_name", &self.session_name)
			.field("request_timeout", &self.request_timeout)
			.finish()
	}
}

fn validate_base_url(url: &Url) -> Result<(), ConfigError> {
	let invalid = |reason| ConfigError::InvalidBaseUrl { url: url.to_string(), reason };

	if !matches!(url.scheme(), "http" | "https") {
		return Err(invalid("scheme must be http or https"));
	}
	if url.cannot_be_a_base() {
		return Err(invalid("it cannot carry a path"));
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(invalid("it must not carry a query or fragment"));
	}

	Ok(())
}
