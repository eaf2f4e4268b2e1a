//! The authenticated user's profile and preferences.

// self
use crate::{
	_prelude::*,
	auth::UserUuid,
	client::{Client, RequestOptions},
	http::{HttpTransport, Method},
	resource::timestamp,
};

/// A Notion user.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct User {
	/// Numeric user identifier.
	pub id: i64,
	/// Stable UUID used by the refresh endpoint.
	pub uuid: UserUuid,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Email address.
	pub email: String,
	/// Phone number, when set.
	pub phone_number: Option<String>,
	/// Account role.
	pub role: String,
	/// Organization name.
	pub organization: String,
	/// Creation time.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last update time.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub updated_at: OffsetDateTime,
}

/// A Notion user as returned by the deprecated sign-in endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LegacyUser {
	/// Numeric user identifier.
	pub id: i64,
	/// Stable user UUID.
	pub uuid: UserUuid,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Email address.
	pub email: String,
	/// Phone number, when set.
	pub phone_number: Option<String>,
	/// Account role.
	pub role: String,
	/// Organization name.
	pub organization: String,
	/// Legacy access token (redundant with the session object).
	pub authentication_token: String,
	/// Creation time.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last update time.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub updated_at: OffsetDateTime,
}

/// Notification and display preferences.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserPreferences {
	/// Numeric user identifier.
	pub user_id: i64,
	/// 24-hour clock.
	pub military_time_enabled: bool,
	/// Celsius temperatures.
	pub celsius_enabled: bool,
	/// Alerts when sensors disconnect.
	pub disconnect_alerts_enabled: bool,
	/// Alerts on home/away changes.
	pub home_away_alerts_enabled: bool,
	/// Low-battery alerts.
	pub battery_alerts_enabled: bool,
}

#[derive(Deserialize)]
struct InfoResponse {
	users: User,
}

#[derive(Deserialize)]
struct PreferencesResponse {
	user_preferences: UserPreferences,
}

/// Endpoints scoped to the authenticated user.
pub struct Users<'a, C>
where
	C: ?Sized + HttpTransport,
{
	client: &'a Client<C>,
}
impl<C> Users<'_, C>
where
	C: ?Sized + HttpTransport,
{
	/// Fetches the authenticated user's profile.
	pub async fn info(&self) -> Result<User> {
		let endpoint = format!("/users/{}", self.user_uuid()?);
		let response = self
			.client
			.request_and_validate::<InfoResponse>(Method::Get, &endpoint, RequestOptions::new())
			.await?;

		Ok(response.users)
	}

	/// Fetches the authenticated user's preferences.
	pub async fn preferences(&self) -> Result<UserPreferences> {
		let endpoint = format!("/users/{}/user_preferences", self.user_uuid()?);
		let response = self
			.client
			.request_and_validate::<PreferencesResponse>(
				Method::Get,
				&endpoint,
				RequestOptions::new(),
			)
			.await?;

		Ok(response.user_preferences)
	}

	fn user_uuid(&self) -> Result<UserUuid> {
		self.client
			.user_uuid()
			.ok_or_else(|| Error::invalid_credentials("No user UUID is known; authenticate first"))
	}
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Endpoints scoped to the authenticated user.
	pub fn users(&self) -> Users<'_, C> {
		Users { client: self }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn preferences_deserialize() {
		let body = serde_json::json!({
			"user_preferences": {
				"user_id": 12345,
				"military_time_enabled": false,
				"celsius_enabled": false,
				"disconnect_alerts_enabled": true,
				"home_away_alerts_enabled": false,
				"battery_alerts_enabled": true
			}
		});
		let response: PreferencesResponse =
			serde_json::from_value(body).expect("Preferences fixture should deserialize.");

		assert!(response.user_preferences.battery_alerts_enabled);
		assert!(!response.user_preferences.celsius_enabled);
	}

	#[test]
	fn invalid_user_uuids_fail_validation() {
		let body = serde_json::json!({
			"id": 1,
			"uuid": "../escape",
			"first_name": "John",
			"last_name": "Doe",
			"email": "user@email.com",
			"phone_number": null,
			"role": "user",
			"organization": "Notion User",
			"created_at": "2019-04-30T01:35:03.781Z",
			"updated_at": "2023-12-12T22:33:01.073Z"
		});

		assert!(serde_json::from_value::<User>(body).is_err());
	}
}
