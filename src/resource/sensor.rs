//! Sensors and their embedded bridge/user summaries.

// self
use crate::{
	_prelude::*,
	client::{Client, RequestOptions},
	http::{HttpTransport, Method},
	resource::{LinkTarget, timestamp},
};

/// Bridge summary embedded in a sensor.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SensorBridge {
	/// Bridge identifier.
	pub id: i64,
	/// Bridge hardware identifier.
	pub hardware_id: String,
}

/// Owner summary embedded in a sensor.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SensorUser {
	/// User identifier.
	pub id: i64,
	/// User email.
	pub email: String,
}

/// Firmware update state.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Firmware {
	/// Update status string.
	pub status: String,
}

/// Surface the sensor is mounted on.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SurfaceType {
	/// Surface identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Stable slug.
	pub slug: String,
}

/// A sensor as returned by `/sensors`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Sensor {
	/// Numeric sensor identifier.
	pub id: i64,
	/// Sensor UUID.
	pub uuid: String,
	/// Owner.
	pub user: SensorUser,
	/// Bridge currently relaying the sensor.
	pub bridge: SensorBridge,
	/// Hardware identifier of the last bridge that heard the sensor.
	pub last_bridge_hardware_id: String,
	/// User-assigned name.
	pub name: String,
	/// Location identifier.
	pub location_id: i64,
	/// System the sensor belongs to.
	pub system_id: i64,
	/// Hardware identifier.
	pub hardware_id: String,
	/// Hardware revision.
	pub hardware_revision: i64,
	/// Firmware version string.
	pub firmware_version: String,
	/// Device key.
	pub device_key: String,
	/// Whether the radio link is encrypted.
	pub encryption_key: bool,
	/// Installation time.
	#[serde(default, deserialize_with = "timestamp::rfc3339_option")]
	pub installed_at: Option<OffsetDateTime>,
	/// Calibration time.
	#[serde(default, deserialize_with = "timestamp::rfc3339_option")]
	pub calibrated_at: Option<OffsetDateTime>,
	/// Last report time.
	#[serde(default, deserialize_with = "timestamp::rfc3339_option")]
	pub last_reported_at: Option<OffsetDateTime>,
	/// When the sensor went missing, if it has.
	#[serde(default, deserialize_with = "timestamp::rfc3339_option")]
	pub missing_at: Option<OffsetDateTime>,
	/// Last update time.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub updated_at: OffsetDateTime,
	/// Creation time.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Signal strength (0-5).
	pub signal_strength: i64,
	/// Firmware update state, when reported.
	#[serde(default)]
	pub firmware: Option<Firmware>,
	/// Mounting surface, when configured.
	#[serde(default)]
	pub surface_type: Option<SurfaceType>,
	/// Related entities.
	#[serde(default)]
	pub links: BTreeMap<String, LinkTarget>,
}

#[derive(Deserialize)]
struct AllResponse {
	sensors: Vec<Sensor>,
}

#[derive(Deserialize)]
struct GetResponse {
	sensors: Sensor,
}

/// Sensor endpoints.
pub struct Sensors<'a, C>
where
	C: ?Sized + HttpTransport,
{
	client: &'a Client<C>,
}
impl<C> Sensors<'_, C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists every sensor on the account.
	pub async fn all(&self) -> Result<Vec<Sensor>> {
		let response = self
			.client
			.request_and_validate::<AllResponse>(Method::Get, "/sensors", RequestOptions::new())
			.await?;

		Ok(response.sensors)
	}

	/// Fetches one sensor.
	pub async fn get(&self, sensor_id: i64) -> Result<Sensor> {
		let response = self
			.client
			.request_and_validate::<GetResponse>(
				Method::Get,
				&format!("/sensors/{sensor_id}"),
				RequestOptions::new(),
			)
			.await?;

		Ok(response.sensors)
	}
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Sensor endpoints.
	pub fn sensors(&self) -> Sensors<'_, C> {
		Sensors { client: self }
	}
}
