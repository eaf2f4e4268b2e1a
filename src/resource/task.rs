//! Tasks: the monitored conditions attached to sensors.
//!
//! Task payloads vary by task type, so these endpoints return raw JSON.

// self
use crate::{
	_prelude::*,
	auth::TaskId,
	client::{Client, RequestOptions},
	error::RequestError,
	http::{HttpTransport, Method},
	resource::timestamp,
};

#[derive(Deserialize)]
struct TasksResponse {
	tasks: JsonValue,
}

#[derive(Deserialize)]
struct HistoryResponse {
	task: TaskData,
}

#[derive(Deserialize)]
struct TaskData {
	data: JsonValue,
}

/// Task endpoints.
pub struct Tasks<'a, C>
where
	C: ?Sized + HttpTransport,
{
	client: &'a Client<C>,
}
impl<C> Tasks<'_, C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists every task.
	pub async fn all(&self) -> Result<Vec<JsonValue>> {
		#[derive(Deserialize)]
		struct AllResponse {
			tasks: Vec<JsonValue>,
		}

		let response = self
			.client
			.request_and_validate::<AllResponse>(Method::Get, "/tasks", RequestOptions::new())
			.await?;

		Ok(response.tasks)
	}

	/// Fetches one task.
	pub async fn get(&self, task_id: &TaskId) -> Result<JsonValue> {
		let response = self
			.client
			.request_and_validate::<TasksResponse>(
				Method::Get,
				&format!("/tasks/{task_id}"),
				RequestOptions::new(),
			)
			.await?;

		Ok(response.tasks)
	}

	/// Attaches new tasks to a sensor.
	pub async fn create(&self, sensor_id: i64, tasks: Vec<JsonValue>) -> Result<JsonValue> {
		let options = RequestOptions::new()
			.json(serde_json::json!({ "sensor_id": sensor_id, "tasks": tasks }));
		let response = self
			.client
			.request_and_validate::<TasksResponse>(
				Method::Post,
				&format!("/sensors/{sensor_id}/tasks"),
				options,
			)
			.await?;

		Ok(response.tasks)
	}

	/// Removes a task from a sensor.
	pub async fn delete(&self, sensor_id: i64, task_id: &TaskId) -> Result<()> {
		self.client
			.request(
				Method::Delete,
				&format!("/sensors/{sensor_id}/tasks/{task_id}"),
				RequestOptions::new(),
			)
			.await?;

		Ok(())
	}

	/// Fetches a task's recorded values between `data_after` and `data_before`.
	pub async fn history(
		&self,
		task_id: &TaskId,
		data_before: OffsetDateTime,
		data_after: OffsetDateTime,
	) -> Result<JsonValue> {
		let endpoint = format!("/tasks/{task_id}/data");
		let render = |value| {
			timestamp::format(value)
				.map_err(|source| RequestError::Timestamp { endpoint: endpoint.clone(), source })
		};
		let options = RequestOptions::new()
			.query("data_before", render(data_before)?)
			.query("data_after", render(data_after)?);
		let response = self
			.client
			.request_and_validate::<HistoryResponse>(Method::Get, &endpoint, options)
			.await?;

		Ok(response.task.data)
	}
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Task endpoints.
	pub fn tasks(&self) -> Tasks<'_, C> {
		Tasks { client: self }
	}
}
