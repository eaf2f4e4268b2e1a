//! Systems: the account-level grouping of bridges and sensors at one address.

// self
use crate::{
	_prelude::*,
	client::{Client, RequestOptions},
	http::{HttpTransport, Method},
	resource::timestamp,
};

/// A system as returned by `/systems`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct System {
	/// Numeric system identifier.
	pub id: i64,
	/// System UUID.
	pub uuid: String,
	/// Display name.
	pub name: String,
	/// Operating mode (for example `home`).
	pub mode: String,
	/// Monitoring partners.
	#[serde(default)]
	pub partners: Vec<String>,
	/// Latitude in degrees.
	pub latitude: f64,
	/// Longitude in degrees.
	pub longitude: f64,
	/// IANA time zone.
	pub timezone_id: String,
	/// Creation time.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last update time.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub updated_at: OffsetDateTime,
	/// Start of the configured night window.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub night_time_start: OffsetDateTime,
	/// End of the configured night window.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub night_time_end: OffsetDateTime,
	/// City or locality.
	pub locality: String,
	/// Postal code.
	pub postal_code: String,
	/// State or province.
	pub administrative_area: String,
	/// Fire department number.
	pub fire_number: String,
	/// Police department number.
	pub police_number: String,
	/// Emergency number.
	pub emergency_number: String,
	/// Street address.
	#[serde(default)]
	pub address: Option<String>,
	/// Professional monitoring permit.
	#[serde(default)]
	pub notion_pro_permit: Option<String>,
}

#[derive(Deserialize)]
struct AllResponse {
	systems: Vec<System>,
}

#[derive(Deserialize)]
struct GetResponse {
	systems: System,
}

/// System endpoints.
pub struct Systems<'a, C>
where
	C: ?Sized + HttpTransport,
{
	client: &'a Client<C>,
}
impl<C> Systems<'_, C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists every system on the account.
	pub async fn all(&self) -> Result<Vec<System>> {
		let response = self
			.client
			.request_and_validate::<AllResponse>(Method::Get, "/systems", RequestOptions::new())
			.await?;

		Ok(response.systems)
	}

	/// Fetches one system.
	pub async fn get(&self, system_id: i64) -> Result<System> {
		let response = self
			.client
			.request_and_validate::<GetResponse>(
				Method::Get,
				&format!("/systems/{system_id}"),
				RequestOptions::new(),
			)
			.await?;

		Ok(response.systems)
	}
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// System endpoints.
	pub fn systems(&self) -> Systems<'_, C> {
		Systems { client: self }
	}
}
