//! Listeners: the per-sensor detectors (leak, temperature, door, ...) and their definitions.

// self
use crate::{
	_prelude::*,
	client::{Client, RequestOptions},
	http::{HttpTransport, Method},
	resource::timestamp,
};

/// Detector kinds, keyed by listener definition identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
	/// Battery level.
	Battery,
	/// Mold risk.
	Mold,
	/// Temperature.
	Temperature,
	/// Water leak.
	LeakStatus,
	/// Safe open/closed.
	Safe,
	/// Door open/closed.
	Door,
	/// Smoke or CO alarm.
	Smoke,
	/// Sensor connectivity.
	Connected,
	/// Hinged window open/closed.
	HingedWindow,
	/// Garage door open/closed.
	GarageDoor,
	/// Sliding door or window open/closed.
	SlidingDoorOrWindow,
	/// Any definition this crate does not know about.
	Unknown,
}
impl ListenerKind {
	/// Maps a listener definition identifier to its kind.
	pub const fn from_definition_id(definition_id: i64) -> Self {
		match definition_id {
			0 => Self::Battery,
			2 => Self::Mold,
			3 => Self::Temperature,
			4 => Self::LeakStatus,
			5 => Self::Safe,
			6 => Self::Door,
			7 => Self::Smoke,
			10 => Self::Connected,
			12 => Self::HingedWindow,
			13 => Self::GarageDoor,
			32 => Self::SlidingDoorOrWindow,
			_ => Self::Unknown,
		}
	}
}

/// Whether a listener can be enrolled in professional monitoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProMonitoringStatus {
	/// Can be enrolled.
	Eligible,
	/// Cannot be enrolled.
	Ineligible,
}

/// Human-readable listener state.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LocalizedStatus {
	/// Short state label.
	pub state: String,
	/// Longer description.
	pub description: String,
}

/// Entity an insight originated from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct InsightOrigin {
	/// Origin identifier.
	#[serde(default)]
	pub id: Option<String>,
	/// Origin type (for example `Sensor`).
	#[serde(default, rename = "type")]
	pub origin_type: Option<String>,
}

/// The listener's primary reading.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PrimaryInsight {
	/// Origin of the reading.
	pub origin: InsightOrigin,
	/// Reading value.
	pub value: String,
	/// When the reading was received.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub data_received_at: OffsetDateTime,
}

/// Insights attached to a listener.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Insights {
	/// Primary reading.
	pub primary: PrimaryInsight,
}

/// A listener as returned by `/sensor/listeners`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Listener {
	/// Listener identifier.
	pub id: String,
	/// Listener definition identifier; see [`Listener::kind`].
	pub definition_id: i64,
	/// Creation time.
	#[serde(deserialize_with = "timestamp::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Model version.
	pub model_version: String,
	/// Sensor the listener runs on.
	pub sensor_id: String,
	/// Human-readable state.
	pub status_localized: LocalizedStatus,
	/// Latest readings.
	pub insights: Insights,
	/// Free-form configuration.
	pub configuration: BTreeMap<String, JsonValue>,
	/// Professional monitoring eligibility.
	pub pro_monitoring_status: ProMonitoringStatus,
	/// Device type (for example `sensor`).
	#[serde(rename = "type")]
	pub device_type: String,
}
impl Listener {
	/// Returns the detector kind for this listener's definition.
	pub fn kind(&self) -> ListenerKind {
		ListenerKind::from_definition_id(self.definition_id)
	}
}

/// A listener definition as returned by `/listener_definitions`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ListenerDefinition {
	/// Definition identifier.
	pub id: i64,
	/// Definition name.
	pub name: String,
	/// Conflict group.
	pub conflict_type: String,
	/// Priority among conflicting definitions.
	pub priority: i64,
	/// Whether the definition is hidden from users.
	pub hidden: bool,
	/// Definitions this one conflicts with.
	pub conflicting_types: Vec<String>,
	/// Extra resources.
	pub resources: Option<JsonValue>,
	/// Hardware revisions that support this definition.
	pub compatible_hardware_revisions: Vec<i64>,
	/// Definition type (for example `sensor`).
	#[serde(rename = "type")]
	pub definition_type: String,
}

#[derive(Deserialize)]
struct AllResponse {
	listeners: Vec<Listener>,
}

#[derive(Deserialize)]
struct DefinitionsResponse {
	listener_definitions: Vec<ListenerDefinition>,
}

/// Listener endpoints.
pub struct Listeners<'a, C>
where
	C: ?Sized + HttpTransport,
{
	client: &'a Client<C>,
}
impl<C> Listeners<'_, C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists the listeners of every sensor.
	pub async fn all(&self) -> Result<Vec<Listener>> {
		let response = self
			.client
			.request_and_validate::<AllResponse>(
				Method::Get,
				"/sensor/listeners",
				RequestOptions::new(),
			)
			.await?;

		Ok(response.listeners)
	}

	/// Lists every listener definition.
	pub async fn definitions(&self) -> Result<Vec<ListenerDefinition>> {
		let response = self
			.client
			.request_and_validate::<DefinitionsResponse>(
				Method::Get,
				"/listener_definitions",
				RequestOptions::new(),
			)
			.await?;

		Ok(response.listener_definitions)
	}
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Listener endpoints.
	pub fn listeners(&self) -> Listeners<'_, C> {
		Listeners { client: self }
	}
}
