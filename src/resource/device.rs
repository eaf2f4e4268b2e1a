//! Devices (phones and other push targets) registered for notifications.

// self
use crate::{
	_prelude::*,
	client::{Client, RequestOptions},
	http::{HttpTransport, Method},
	resource::timestamp,
};

/// A registered push target.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Device {
	/// Numeric device identifier.
	pub id: i64,
	/// Push token.
	pub token: String,
	/// Platform (for example `ios`).
	pub platform: String,
	/// Push endpoint.
	pub endpoint: String,
	/// Creation time.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last update time.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub updated_at: OffsetDateTime,
}

#[derive(Deserialize)]
struct AllResponse {
	devices: Vec<Device>,
}

// The API answers single-device calls under either key.
#[derive(Deserialize)]
struct GetResponse {
	#[serde(alias = "devices")]
	device: Device,
}

/// Device endpoints.
pub struct Devices<'a, C>
where
	C: ?Sized + HttpTransport,
{
	client: &'a Client<C>,
}
impl<C> Devices<'_, C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists every registered device.
	pub async fn all(&self) -> Result<Vec<Device>> {
		let response = self
			.client
			.request_and_validate::<AllResponse>(Method::Get, "/devices", RequestOptions::new())
			.await?;

		Ok(response.devices)
	}

	/// Fetches one device.
	pub async fn get(&self, device_id: i64) -> Result<Device> {
		let response = self
			.client
			.request_and_validate::<GetResponse>(
				Method::Get,
				&format!("/devices/{device_id}"),
				RequestOptions::new(),
			)
			.await?;

		Ok(response.device)
	}

	/// Registers a device with the given attributes (sent under the `devices` key).
	pub async fn create(&self, attributes: JsonValue) -> Result<Device> {
		let options = RequestOptions::new().json(serde_json::json!({ "devices": attributes }));
		let response = self
			.client
			.request_and_validate::<GetResponse>(Method::Post, "/devices", options)
			.await?;

		Ok(response.device)
	}

	/// Deletes a device.
	pub async fn delete(&self, device_id: i64) -> Result<()> {
		self.client
			.request(Method::Delete, &format!("/devices/{device_id}"), RequestOptions::new())
			.await?;

		Ok(())
	}
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Device endpoints.
	pub fn devices(&self) -> Devices<'_, C> {
		Devices { client: self }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn single_device_accepts_either_wrapper_key() {
		let device = serde_json::json!({
			"id": 12345,
			"token": "123456abcde",
			"platform": "ios",
			"endpoint": "arn:aws:sns:us-west-2:307936840629:...",
			"created_at": "2019-06-17T00:57:09.937Z",
			"updated_at": "2019-06-17T00:57:09.937Z"
		});

		for key in ["device", "devices"] {
			let wrapped = serde_json::json!({ key: device.clone() });
			let response: GetResponse =
				serde_json::from_value(wrapped).expect("Device fixture should deserialize.");

			assert_eq!(response.device.platform, "ios");
		}
	}
}
