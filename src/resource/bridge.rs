//! Bridges (base stations) relaying sensor traffic to the cloud.

// self
use crate::{
	_prelude::*,
	client::{Client, RequestOptions},
	http::{HttpTransport, Method},
	resource::{LinkTarget, timestamp},
};

/// Firmware versions reported by a bridge's radios.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FirmwareVersion {
	/// Wi-Fi module firmware.
	pub wifi: String,
	/// Wi-Fi application firmware.
	pub wifi_app: String,
	/// Silicon Labs radio firmware, when present.
	#[serde(default)]
	pub silabs: Option<String>,
	/// Texas Instruments radio firmware, when present.
	#[serde(default)]
	pub ti: Option<String>,
}

/// A bridge as returned by `/base_stations`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Bridge {
	/// Numeric bridge identifier.
	pub id: i64,
	/// User-assigned name.
	pub name: Option<String>,
	/// Operating mode (for example `home`).
	pub mode: String,
	/// Hardware identifier.
	pub hardware_id: String,
	/// Hardware revision.
	pub hardware_revision: i64,
	/// Firmware versions.
	pub firmware_version: FirmwareVersion,
	/// When the bridge went missing, if it has.
	#[serde(default, deserialize_with = "timestamp::rfc3339_option")]
	pub missing_at: Option<OffsetDateTime>,
	/// Creation time.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last update time.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub updated_at: OffsetDateTime,
	/// System the bridge belongs to.
	pub system_id: i64,
	/// Firmware versions (duplicated by the API under a second key).
	pub firmware: FirmwareVersion,
	/// Related entities.
	pub links: BTreeMap<String, LinkTarget>,
}

#[derive(Deserialize)]
struct AllResponse {
	base_stations: Vec<Bridge>,
}

#[derive(Deserialize)]
struct GetResponse {
	base_stations: Bridge,
}

/// Bridge endpoints.
pub struct Bridges<'a, C>
where
	C: ?Sized + HttpTransport,
{
	client: &'a Client<C>,
}
impl<C> Bridges<'_, C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists every bridge on the account.
	pub async fn all(&self) -> Result<Vec<Bridge>> {
		let response = self
			.client
			.request_and_validate::<AllResponse>(
				Method::Get,
				"/base_stations",
				RequestOptions::new(),
			)
			.await?;

		Ok(response.base_stations)
	}

	/// Fetches one bridge.
	pub async fn get(&self, bridge_id: i64) -> Result<Bridge> {
		let response = self
			.client
			.request_and_validate::<GetResponse>(
				Method::Get,
				&format!("/base_stations/{bridge_id}"),
				RequestOptions::new(),
			)
			.await?;

		Ok(response.base_stations)
	}
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Bridge endpoints.
	pub fn bridges(&self) -> Bridges<'_, C> {
		Bridges { client: self }
	}
}
