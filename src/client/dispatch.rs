//! Request dispatch: pre-flight refresh, header assembly, transport, and classification.

// self
use crate::{
	_prelude::*,
	client::Client,
	error::RequestError,
	http::{ApiRequest, ApiResponse, HttpTransport, Method},
	obs,
};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Per-call headers, query pairs, and JSON body.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
	headers: BTreeMap<String, String>,
	query: Vec<(String, String)>,
	body: Option<JsonValue>,
}
impl RequestOptions {
	/// Creates an empty option set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds (or replaces) a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Appends a query string pair.
	pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((name.into(), value.into()));

		self
	}

	/// Sets the JSON body.
	pub fn json(mut self, body: JsonValue) -> Self {
		self.body = Some(body);

		self
	}
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Sends one request and returns the decoded JSON body.
	///
	/// An expired access token is refreshed first, and calls arriving while a refresh is in
	/// flight wait for it. A 401 surfaces as [`Error::InvalidCredentials`]; any other non-2xx
	/// status surfaces as [`RequestError::Api`] carrying the first error title the API
	/// returned. An empty body decodes to an empty JSON object.
	pub async fn request(
		&self,
		method: Method,
		endpoint: &str,
		options: RequestOptions,
	) -> Result<JsonValue> {
		self.preflight().await?;
		self.send(method, endpoint, options).await
	}

	/// Sends one request and deserializes the body into `T`.
	///
	/// Schema mismatches surface as [`RequestError::Validation`], which names the endpoint and
	/// the JSON path that failed.
	pub async fn request_and_validate<T>(
		&self,
		method: Method,
		endpoint: &str,
		options: RequestOptions,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let value = self.request(method, endpoint, options).await?;

		validate(endpoint, value)
	}

	/// Sends and validates without the pre-flight check.
	///
	/// Login and refresh calls go through here; they must neither refresh nor wait on the guard
	/// a refresh holds.
	pub(crate) async fn send_and_validate<T>(
		&self,
		method: Method,
		endpoint: &str,
		options: RequestOptions,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let value = self.send(method, endpoint, options).await?;

		validate(endpoint, value)
	}

	async fn send(
		&self,
		method: Method,
		endpoint: &str,
		options: RequestOptions,
	) -> Result<JsonValue> {
		let request = self.build_request(method, endpoint, options)?;
		let response = self
			.transport
			.execute(request)
			.await
			.map_err(|source| RequestError::Transport { endpoint: endpoint.into(), source })?;

		obs::response_received(method, endpoint, response.status);

		classify(endpoint, response)
	}

	async fn preflight(&self) -> Result<()> {
		let stale = self.session.lock().expired_access_token(OffsetDateTime::now_utc());

		match stale {
			Some(stale) => self.refresh_expired(stale).await,
			None => {
				if self.refresh_guard.is_refreshing() {
					self.refresh_guard.wait().await;
				}

				Ok(())
			},
		}
	}

	fn build_request(
		&self,
		method: Method,
		endpoint: &str,
		options: RequestOptions,
	) -> Result<ApiRequest> {
		let RequestOptions { headers: extra, query, body } = options;
		let url = format!("{}{endpoint}", self.base_url.as_str().trim_end_matches('/'));
		let url = Url::parse(&url)
			.map_err(|source| RequestError::InvalidEndpoint { endpoint: endpoint.into(), source })?;
		let mut headers = BTreeMap::from_iter([("Accept".to_owned(), JSON_MEDIA_TYPE.to_owned())]);
		let body = match body {
			Some(body) => {
				let bytes = serde_json::to_vec(&body)
					.map_err(|source| RequestError::Encode { endpoint: endpoint.into(), source })?;

				headers.insert("Content-Type".into(), JSON_MEDIA_TYPE.into());

				Some(bytes)
			},
			None => None,
		};

		headers.extend(extra);

		if let Some(authorization) = self.session.lock().authorization_header() {
			headers.insert("Authorization".into(), authorization);
		}

		Ok(ApiRequest { method, url, headers, query, body, timeout: self.request_timeout })
	}
}

fn classify(endpoint: &str, response: ApiResponse) -> Result<JsonValue> {
	let parsed = parse_body(&response.body);
	let status = response.status;

	if response.is_success() {
		return parsed
			.map_err(|source| RequestError::Decode { endpoint: endpoint.into(), source }.into());
	}

	let title = parsed.ok().as_ref().and_then(first_error_title);

	if status == 401 {
		return Err(Error::invalid_credentials(title.unwrap_or_else(|| "HTTP 401".into())));
	}

	let message = title.unwrap_or_else(|| format!("HTTP {status}"));

	Err(RequestError::Api { endpoint: endpoint.into(), status, message }.into())
}

fn parse_body(body: &[u8]) -> Result<JsonValue, serde_json::Error> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return Ok(JsonValue::Object(Default::default()));
	}

	serde_json::from_slice(body)
}

fn first_error_title(body: &JsonValue) -> Option<String> {
	body.get("errors")?.as_array()?.first()?.get("title")?.as_str().map(str::to_owned)
}

fn validate<T>(endpoint: &str, value: JsonValue) -> Result<T>
where
	T: DeserializeOwned,
{
	serde_path_to_error::deserialize(value)
		.map_err(|source| RequestError::Validation { endpoint: endpoint.into(), source }.into())
}
