//! Authentication flows: credential login, refresh-token rotation, and legacy sign-in.
//!
//! Every flow sends through the client without the pre-flight expiry check, runs inside a
//! [`FlowSpan`], and records attempt/success/failure outcomes. Refreshes additionally run under
//! the client's refresh guard so concurrent callers converge on one remote rotation.

// crates.io
use serde_json::json;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	client::{Client, RequestOptions, guard::RefreshTicket},
	http::{HttpTransport, Method},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	resource::user::{LegacyUser, User},
};

const ACCEPT_VERSION: (&str, &str) = ("Accept-Version", "2");
const MISSING_REFRESH_TOKEN: &str = "No valid refresh token provided";

#[derive(Deserialize)]
struct AuthTokens {
	jwt: TokenSecret,
	refresh_token: TokenSecret,
}

#[derive(Deserialize)]
struct CredentialsResponse {
	user: User,
	auth: AuthTokens,
}

#[derive(Deserialize)]
struct RefreshResponse {
	auth: AuthTokens,
}

#[derive(Deserialize)]
struct LegacySession {
	authentication_token: String,
}

#[derive(Deserialize)]
struct LegacyResponse {
	users: LegacyUser,
	session: LegacySession,
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Logs in with email + password and stores the issued token pair.
	///
	/// Registered refresh-token callbacks fire with the new refresh token once the tokens are
	/// stored.
	pub async fn authenticate_with_credentials(&self, email: &str, password: &str) -> Result<()> {
		const KIND: FlowKind = FlowKind::Credentials;

		let span = FlowSpan::new(KIND, "authenticate_with_credentials");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let session_name = self.session.lock().session_name().clone();
				let options = RequestOptions::new()
					.header(ACCEPT_VERSION.0, ACCEPT_VERSION.1)
					.json(json!({
						"auth": {
							"email": email,
							"password": password,
							"session_name": &*session_name,
						}
					}));
				let response = self
					.send_and_validate::<CredentialsResponse>(Method::Post, "/auth/login", options)
					.await?;
				let AuthTokens { jwt, refresh_token } = response.auth;

				{
					let mut session = self.session.lock();

					session.store_tokens(jwt.expose(), refresh_token.expose())?;
					session.set_user_uuid(response.user.uuid);
				}

				self.callbacks.notify(refresh_token.expose());

				Ok(())
			})
			.await;

		record_outcome(KIND, &result);

		result
	}

	/// Rotates the token pair through the refresh endpoint.
	///
	/// `refresh_token` overrides the held refresh token for this call only; it is stored once
	/// the API accepts it. Fails with [`Error::InvalidCredentials`] without contacting the API
	/// when neither token is available or no user UUID is known.
	pub async fn authenticate_with_refresh_token(&self, refresh_token: Option<&str>) -> Result<()> {
		if refresh_token.is_none() && self.session.lock().refresh_token().is_none() {
			return Err(Error::invalid_credentials(MISSING_REFRESH_TOKEN));
		}

		let mut ticket = self.refresh_guard.enter().await;

		self.rotate(&mut ticket, refresh_token).await
	}

	/// Logs in through the deprecated sign-in endpoint.
	///
	/// The issued token never expires and comes without a refresh token, so requests use the
	/// `Token token=` header scheme afterwards.
	pub async fn authenticate_with_legacy_credentials(
		&self,
		email: &str,
		password: &str,
	) -> Result<()> {
		const KIND: FlowKind = FlowKind::LegacyCredentials;

		let span = FlowSpan::new(KIND, "authenticate_with_legacy_credentials");

		obs::legacy_authentication();
		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let options = RequestOptions::new()
					.json(json!({ "sessions": { "email": email, "password": password } }));
				let response = self
					.send_and_validate::<LegacyResponse>(Method::Post, "/users/sign_in", options)
					.await?;

				self.session
					.lock()
					.store_legacy_token(response.users.uuid, response.session.authentication_token);

				Ok(())
			})
			.await;

		record_outcome(KIND, &result);

		result
	}

	/// Refreshes on behalf of a request that found `stale` expired.
	///
	/// Callers queue on the refresh guard. Whoever gets in after another caller already
	/// replaced `stale` returns without contacting the API, and whoever queued behind a
	/// rotation that then failed gets that failure back instead of sending the same refresh
	/// token again.
	pub(crate) async fn refresh_expired(&self, stale: TokenSecret) -> Result<()> {
		let mut ticket = self.refresh_guard.enter().await;
		let replaced = self.session.lock().access_token() != Some(&stale);

		if replaced {
			self.refresh_metrics.record_coalesced();

			return Ok(());
		}
		if let Some(outcome) = ticket.finished_since_arrival() {
			self.refresh_metrics.record_coalesced();

			return outcome.map_err(|failure| failure.to_error());
		}

		obs::token_expired();

		self.rotate(&mut ticket, None).await
	}

	async fn rotate(&self, ticket: &mut RefreshTicket<'_>, explicit: Option<&str>) -> Result<()> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "rotate");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let (user_uuid, refresh_token) = {
					let session = self.session.lock();
					let refresh_token = match explicit {
						Some(token) => token.to_owned(),
						None => session
							.refresh_token()
							.map(|token| token.expose().to_owned())
							.ok_or_else(|| Error::invalid_credentials(MISSING_REFRESH_TOKEN))?,
					};
					let user_uuid = session.user_uuid().cloned().ok_or_else(|| {
						Error::invalid_credentials("No user UUID is known for the refresh endpoint")
					})?;

					(user_uuid, refresh_token)
				};
				let endpoint = format!("/auth/{user_uuid}/refresh");
				let options = RequestOptions::new()
					.header(ACCEPT_VERSION.0, ACCEPT_VERSION.1)
					.json(json!({ "auth": { "refresh_token": refresh_token } }));
				let rotated = self.exchange(&endpoint, options).await;

				self.refresh_metrics.record_rotation(&rotated);
				self.callbacks.notify(rotated?.expose());

				Ok(())
			})
			.await;

		ticket.finish(&result);
		record_outcome(KIND, &result);

		result
	}

	// Stores the rotated pair and returns the new refresh token.
	async fn exchange(&self, endpoint: &str, options: RequestOptions) -> Result<TokenSecret> {
		let response =
			self.send_and_validate::<RefreshResponse>(Method::Post, endpoint, options).await?;
		let AuthTokens { jwt, refresh_token } = response.auth;

		self.session.lock().store_tokens(jwt.expose(), refresh_token.expose())?;

		Ok(refresh_token)
	}
}

fn record_outcome(kind: FlowKind, result: &Result<()>) {
	match result {
		Ok(_) => obs::record_flow_outcome(kind, FlowOutcome::Success),
		Err(_) => obs::record_flow_outcome(kind, FlowOutcome::Failure),
	}
}
