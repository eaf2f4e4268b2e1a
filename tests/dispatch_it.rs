#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use time::macros;
// self
use notion_client::{
	_preludet::*,
	auth::TaskId,
	client::{ReqwestNotionClient, RequestOptions},
	error::RequestError,
	http::Method,
};

const SENSOR_ALL: &str = include_str!("fixtures/sensor_all.json");
const BRIDGE_ALL: &str = include_str!("fixtures/bridge_all.json");
const SYSTEM_ALL: &str = include_str!("fixtures/system_all.json");
const USER_INFO: &str = include_str!("fixtures/user_info.json");
const AUTH_FAILURE: &str = include_str!("fixtures/auth_failure.json");
const BAD_API_RESPONSE: &str = include_str!("fixtures/bad_api_response.json");

async fn login(server: &MockServer, access_token: &str) -> ReqwestNotionClient {
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/login");
			then.status(200)
				.header("content-type", "application/json")
				.body(credentials_login_body(access_token, TEST_REFRESH_TOKEN));
		})
		.await;
	let client = test_client_builder(&server.url("/api"))
		.connect_with_credentials(TEST_EMAIL, TEST_PASSWORD)
		.await
		.expect("Credentials login should succeed against the mock server.");

	mock.assert_async().await;

	client
}

fn expired_token() -> String {
	mint_access_token(OffsetDateTime::now_utc() - Duration::minutes(1))
}

fn fresh_token() -> String {
	mint_access_token(OffsetDateTime::now_utc() + Duration::hours(1))
}

fn refresh_path() -> String {
	format!("/api/auth/{TEST_USER_UUID}/refresh")
}

#[tokio::test]
async fn expired_access_token_is_refreshed_before_the_request() {
	let server = MockServer::start_async().await;
	let client = login(&server, &expired_token()).await;
	let fresh = fresh_token();
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(refresh_path())
				.header("accept-version", "2")
				.json_body(serde_json::json!({ "auth": { "refresh_token": TEST_REFRESH_TOKEN } }));
			then.status(200)
				.header("content-type", "application/json")
				.body(refresh_body(&fresh, "rotated-refresh-token"));
		})
		.await;
	let sensors_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/sensors")
				.header("authorization", format!("Bearer {fresh}"));
			then.status(200).header("content-type", "application/json").body(SENSOR_ALL);
		})
		.await;
	let sensors = client.sensors().all().await.expect("Sensor listing should succeed.");

	refresh_mock.assert_async().await;
	sensors_mock.assert_async().await;

	assert_eq!(sensors.len(), 2);
	assert_eq!(sensors[1].surface_type.as_ref().map(|s| s.slug.as_str()), Some("drywall"));
	assert_eq!(client.refresh_token().as_ref().map(|t| t.expose()), Some("rotated-refresh-token"));
	assert_eq!(client.refresh_metrics().successes(), 1);
}

#[tokio::test]
async fn concurrent_requests_share_a_single_refresh() {
	let server = MockServer::start_async().await;
	let client = login(&server, &expired_token()).await;
	let fresh = fresh_token();
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(refresh_path());
			then.status(200)
				.header("content-type", "application/json")
				.delay(std::time::Duration::from_millis(50))
				.body(refresh_body(&fresh, "rotated-refresh-token"));
		})
		.await;
	let sensors_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/sensors")
				.header("authorization", format!("Bearer {fresh}"));
			then.status(200).header("content-type", "application/json").body(SENSOR_ALL);
		})
		.await;
	let bridges_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/base_stations")
				.header("authorization", format!("Bearer {fresh}"));
			then.status(200).header("content-type", "application/json").body(BRIDGE_ALL);
		})
		.await;
	let systems_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/systems")
				.header("authorization", format!("Bearer {fresh}"));
			then.status(200).header("content-type", "application/json").body(SYSTEM_ALL);
		})
		.await;
	let (sensor_api, bridge_api, system_api) =
		(client.sensors(), client.bridges(), client.systems());
	let (sensors, bridges, systems, sensors_again) =
		tokio::join!(sensor_api.all(), bridge_api.all(), system_api.all(), sensor_api.all());

	sensors.expect("Sensor listing should succeed.");
	bridges.expect("Bridge listing should succeed.");
	sensors_again.expect("Second sensor listing should succeed.");

	let systems = systems.expect("System listing should succeed.");

	refresh_mock.assert_calls_async(1).await;
	sensors_mock.assert_calls_async(2).await;
	bridges_mock.assert_calls_async(1).await;
	systems_mock.assert_calls_async(1).await;

	assert_eq!(systems[0].timezone_id, "America/New_York");
	assert_eq!(client.refresh_metrics().attempts(), 1);
	assert_eq!(client.refresh_metrics().coalesced(), 3);
}

#[tokio::test]
async fn queued_callers_adopt_a_failed_refresh() {
	let server = MockServer::start_async().await;
	let stale = expired_token();
	let client = login(&server, &stale).await;
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(refresh_path());
			then.status(401)
				.header("content-type", "application/json")
				.delay(std::time::Duration::from_millis(50))
				.body(AUTH_FAILURE);
		})
		.await;
	let sensors_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/sensors");
			then.status(200).header("content-type", "application/json").body(SENSOR_ALL);
		})
		.await;
	let (sensor_api, bridge_api, system_api) =
		(client.sensors(), client.bridges(), client.systems());
	let (sensors, bridges, systems, sensors_again) =
		tokio::join!(sensor_api.all(), bridge_api.all(), system_api.all(), sensor_api.all());

	for err in [
		sensors.map(drop).expect_err("Sensor listing must fail with the refresh."),
		bridges.map(drop).expect_err("Bridge listing must fail with the refresh."),
		systems.map(drop).expect_err("System listing must fail with the refresh."),
		sensors_again.map(drop).expect_err("Second sensor listing must fail with the refresh."),
	] {
		match err {
			Error::InvalidCredentials { reason } => assert_eq!(reason, "Invalid email or password"),
			other => panic!("Expected invalid credentials, got {other:?}."),
		}
	}

	refresh_mock.assert_calls_async(1).await;
	sensors_mock.assert_calls_async(0).await;

	assert_eq!(client.session().access_token().map(|t| t.expose()), Some(stale.as_str()));
	assert_eq!(client.refresh_metrics().attempts(), 1);
	assert_eq!(client.refresh_metrics().failures(), 1);
	assert_eq!(client.refresh_metrics().coalesced(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn spawned_clones_share_a_single_refresh() {
	let server = MockServer::start_async().await;
	let client = login(&server, &expired_token()).await;
	let fresh = fresh_token();
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(refresh_path());
			then.status(200)
				.header("content-type", "application/json")
				.delay(std::time::Duration::from_millis(50))
				.body(refresh_body(&fresh, "rotated-refresh-token"));
		})
		.await;
	let bridges_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/base_stations")
				.header("authorization", format!("Bearer {fresh}"));
			then.status(200).header("content-type", "application/json").body(BRIDGE_ALL);
		})
		.await;
	let tasks = (0..4)
		.map(|_| {
			let client = client.clone();

			tokio::spawn(async move { client.bridges().all().await })
		})
		.collect::<Vec<_>>();

	for task in tasks {
		task.await
			.expect("Spawned request should not panic.")
			.expect("Bridge listing should succeed.");
	}

	refresh_mock.assert_calls_async(1).await;
	bridges_mock.assert_calls_async(4).await;

	assert_eq!(client.session().access_token().map(|t| t.expose()), Some(fresh.as_str()));
}

#[tokio::test]
async fn failed_refresh_keeps_the_stale_session_and_retries_next_time() {
	let server = MockServer::start_async().await;
	let stale = expired_token();
	let client = login(&server, &stale).await;
	let mut failing = server
		.mock_async(|when, then| {
			when.method(POST).path(refresh_path());
			then.status(500);
		})
		.await;
	let err = client.sensors().all().await.expect_err("A failed refresh must fail the request.");

	failing.assert_async().await;

	match err {
		Error::RequestFailed(RequestError::Api { status, message, .. }) => {
			assert_eq!(status, 500);
			assert_eq!(message, "HTTP 500");
		},
		other => panic!("Expected an API failure, got {other:?}."),
	}
	assert_eq!(client.session().access_token().map(|t| t.expose()), Some(stale.as_str()));
	assert_eq!(client.refresh_token().as_ref().map(|t| t.expose()), Some(TEST_REFRESH_TOKEN));
	assert_eq!(client.refresh_metrics().failures(), 1);

	failing.delete_async().await;

	let fresh = fresh_token();
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(refresh_path());
			then.status(200)
				.header("content-type", "application/json")
				.body(refresh_body(&fresh, "rotated-refresh-token"));
		})
		.await;
	let sensors_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/sensors");
			then.status(200).header("content-type", "application/json").body(SENSOR_ALL);
		})
		.await;

	client.sensors().all().await.expect("The retried refresh should succeed.");
	refresh_mock.assert_async().await;
	sensors_mock.assert_async().await;

	assert_eq!(client.refresh_metrics().attempts(), 2);
	assert_eq!(client.refresh_metrics().successes(), 1);
}

#[tokio::test]
async fn schema_mismatches_name_the_endpoint() {
	let server = MockServer::start_async().await;
	let client = login(&server, &fresh_token()).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/sensors");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let err = client.sensors().all().await.expect_err("An empty object is not a sensor list.");

	mock.assert_async().await;

	match err {
		Error::RequestFailed(RequestError::Validation { endpoint, source }) => {
			assert_eq!(endpoint, "/sensors");
			assert!(source.to_string().contains("missing field `sensors`"));
		},
		other => panic!("Expected a validation failure, got {other:?}."),
	}
}

#[tokio::test]
async fn api_errors_carry_the_first_error_title() {
	let server = MockServer::start_async().await;
	let client = login(&server, &fresh_token()).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/bad_endpoint");
			then.status(400).header("content-type", "application/json").body(BAD_API_RESPONSE);
		})
		.await;
	let err = client
		.request(Method::Get, "/bad_endpoint", RequestOptions::new())
		.await
		.expect_err("A 400 must fail the request.");

	mock.assert_async().await;

	assert_eq!(err.to_string(), "Request to /bad_endpoint failed with HTTP 400: No records found.");
}

#[tokio::test]
async fn deletes_accept_empty_bodies_and_surface_failures() {
	let server = MockServer::start_async().await;
	let client = login(&server, &fresh_token()).await;
	let deleted = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/devices/12345");
			then.status(204);
		})
		.await;
	let missing = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/devices/99999");
			then.status(404).header("content-type", "application/json").body(BAD_API_RESPONSE);
		})
		.await;

	client.devices().delete(12345).await.expect("Deleting an existing device should succeed.");

	let err =
		client.devices().delete(99999).await.expect_err("Deleting a missing device must fail.");

	deleted.assert_async().await;
	missing.assert_async().await;

	assert!(matches!(
		err,
		Error::RequestFailed(RequestError::Api { status: 404, ref message, .. })
			if message == "No records found"
	));
}

#[tokio::test]
async fn task_history_sends_rfc3339_bounds() {
	let server = MockServer::start_async().await;
	let client = login(&server, &fresh_token()).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/tasks/task-1/data")
				.query_param("data_before", "2024-01-02T03:04:05Z")
				.query_param("data_after", "2024-01-01T03:04:05Z");
			then.status(200).header("content-type", "application/json").body(
				serde_json::json!({
					"task": { "id": "task-1", "data": [{ "time": 1704164645, "value": "open" }] }
				})
				.to_string(),
			);
		})
		.await;
	let task_id = TaskId::new("task-1").expect("Task id fixture should be valid.");
	let data = client
		.tasks()
		.history(
			&task_id,
			macros::datetime!(2024-01-02 03:04:05 UTC),
			macros::datetime!(2024-01-01 03:04:05 UTC),
		)
		.await
		.expect("Task history should succeed.");

	mock.assert_async().await;

	assert_eq!(data[0]["value"], "open");
}

#[tokio::test]
async fn user_info_is_scoped_to_the_authenticated_user() {
	let server = MockServer::start_async().await;
	let client = login(&server, &fresh_token()).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/api/users/{TEST_USER_UUID}"));
			then.status(200).header("content-type", "application/json").body(USER_INFO);
		})
		.await;
	let user = client.users().info().await.expect("User info should succeed.");

	mock.assert_async().await;

	assert_eq!(user.email, TEST_EMAIL);
	assert_eq!(&*user.uuid, TEST_USER_UUID);
}

#[tokio::test]
async fn device_creation_wraps_attributes() {
	let server = MockServer::start_async().await;
	let client = login(&server, &fresh_token()).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/devices").json_body(serde_json::json!({
				"devices": { "token": "123456abcde", "platform": "ios" }
			}));
			then.status(200).header("content-type", "application/json").body(
				serde_json::json!({
					"devices": {
						"id": 12345,
						"token": "123456abcde",
						"platform": "ios",
						"endpoint": "arn:aws:sns:us-west-2:307936840629:...",
						"created_at": "2019-06-17T00:57:09.937Z",
						"updated_at": "2019-06-17T00:57:09.937Z"
					}
				})
				.to_string(),
			);
		})
		.await;
	let device = client
		.devices()
		.create(serde_json::json!({ "token": "123456abcde", "platform": "ios" }))
		.await
		.expect("Device creation should succeed.");

	mock.assert_async().await;

	assert_eq!(device.id, 12345);
}
