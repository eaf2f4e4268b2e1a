//! Session state: the current tokens, their expiry, and the identity they belong to.

// self
use crate::{
	_prelude::*,
	auth::{SessionName, TokenSecret, UserUuid, token::jwt},
	error::RequestError,
};

/// Authentication scheme that produced the current access token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthScheme {
	/// JWT access token paired with a rotating refresh token.
	Bearer,
	/// Non-expiring token issued by the deprecated sign-in endpoint.
	Legacy,
}

/// Plain holder for the tokens of one client.
///
/// The session performs no I/O and no synchronization; the owning client serializes access.
/// Every mutation replaces related fields together so readers never see a token paired with
/// another token's expiry.
#[derive(Clone, Debug)]
pub struct Session {
	access_token: Option<TokenSecret>,
	access_token_expires_at: Option<OffsetDateTime>,
	refresh_token: Option<TokenSecret>,
	user_uuid: Option<UserUuid>,
	session_name: SessionName,
}
impl Session {
	/// Creates an unauthenticated session.
	pub fn new(session_name: SessionName) -> Self {
		Self {
			access_token: None,
			access_token_expires_at: None,
			refresh_token: None,
			user_uuid: None,
			session_name,
		}
	}

	/// Returns the current access token, if any.
	pub fn access_token(&self) -> Option<&TokenSecret> {
		self.access_token.as_ref()
	}

	/// Returns the expiry decoded from the current access token.
	pub fn access_token_expires_at(&self) -> Option<OffsetDateTime> {
		self.access_token_expires_at
	}

	/// Returns the current refresh token, if any.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.refresh_token.as_ref()
	}

	/// Returns the authenticated user's identifier, if known.
	pub fn user_uuid(&self) -> Option<&UserUuid> {
		self.user_uuid.as_ref()
	}

	/// Records the user the session belongs to.
	pub fn set_user_uuid(&mut self, user_uuid: UserUuid) {
		self.user_uuid = Some(user_uuid);
	}

	/// Returns the name sent at login.
	pub fn session_name(&self) -> &SessionName {
		&self.session_name
	}

	/// Returns the scheme of the current access token.
	pub fn scheme(&self) -> Option<AuthScheme> {
		self.access_token.as_ref()?;

		Some(if self.refresh_token.is_some() { AuthScheme::Bearer } else { AuthScheme::Legacy })
	}

	/// Stores a JWT access token and its refresh token.
	///
	/// The expiry is decoded before anything is written, so a malformed token leaves the
	/// session untouched.
	pub fn store_tokens(
		&mut self,
		access_token: impl Into<String>,
		refresh_token: impl Into<String>,
	) -> Result<(), RequestError> {
		let access_token = access_token.into();
		let expires_at = jwt::decode_expiry(&access_token)?;

		self.access_token = Some(TokenSecret::new(access_token));
		self.access_token_expires_at = Some(expires_at);
		self.refresh_token = Some(TokenSecret::new(refresh_token));

		Ok(())
	}

	/// Stores a legacy access token, which carries no expiry and no refresh token.
	pub fn store_legacy_token(&mut self, user_uuid: UserUuid, access_token: impl Into<String>) {
		self.user_uuid = Some(user_uuid);
		self.access_token = Some(TokenSecret::new(access_token));
		self.access_token_expires_at = None;
		self.refresh_token = None;
	}

	/// Builds the `Authorization` header value for the current access token.
	pub fn authorization_header(&self) -> Option<String> {
		let token = self.access_token.as_ref()?.expose();

		match self.scheme()? {
			AuthScheme::Bearer => Some(format!("Bearer {token}")),
			AuthScheme::Legacy => Some(format!("Token token={token}")),
		}
	}

	/// Returns the access token when its expiry is known and `now` is at or past it.
	pub fn expired_access_token(&self, now: OffsetDateTime) -> Option<TokenSecret> {
		match (&self.access_token, self.access_token_expires_at) {
			(Some(token), Some(expires_at)) if now >= expires_at => Some(token.clone()),
			_ => None,
		}
	}
}
