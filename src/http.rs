//! Transport primitives for Notion API calls.
//!
//! The client depends on an HTTP stack only through [`HttpTransport`]. The crate ships
//! [`ReqwestHttpClient`], which either reuses a caller-supplied connection pool or opens a
//! short-lived pool for every call and drops it once the call resolves. Custom transports
//! (fakes in tests, proxies, recorders) implement the trait directly.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, error::TransportError};

/// Total timeout applied to every outbound call unless the builder overrides it.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// HTTP verbs used by the Notion API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `DELETE`
	Delete,
}
impl Method {
	/// Returns the canonical verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved request handed to a transport.
#[derive(Clone)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: Method,
	/// Absolute URL (base URL plus endpoint).
	pub url: Url,
	/// Header name/value pairs, including `Authorization` when a token is held.
	pub headers: BTreeMap<String, String>,
	/// Query string pairs.
	pub query: Vec<(String, String)>,
	/// Serialized JSON body.
	pub body: Option<Vec<u8>>,
	/// Total duration budget for the call.
	pub timeout: StdDuration,
}
impl Debug for ApiRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers = self
			.headers
			.iter()
			.map(|(name, value)| {
				let value = if name.eq_ignore_ascii_case("authorization") {
					"<redacted>"
				} else {
					value.as_str()
				};

				(name.as_str(), value)
			})
			.collect::<BTreeMap<_, _>>();

		f.debug_struct("ApiRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &headers)
			.field("query", &self.query)
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Raw response returned by a transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Unparsed response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP stacks capable of executing Notion API calls.
///
/// Implementations must honor [`ApiRequest::timeout`] and must report every HTTP response,
/// successful or not, as `Ok`; only failures that produced no response belong in the error
/// branch.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes `request` and returns the raw response.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// Reqwest-backed transport.
///
/// With [`ReqwestHttpClient::with_client`] the given pool is reused for every call and never
/// closed by this crate. The default value owns no pool: each call builds one with the
/// request's timeout and drops it when the call resolves, on success and error alike.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(Option<ReqwestClient>);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing, caller-owned reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(Some(client))
	}

	/// Returns `true` when calls reuse a caller-supplied pool.
	pub fn is_shared(&self) -> bool {
		self.0.is_some()
	}

	fn ephemeral(timeout: StdDuration) -> Result<ReqwestClient, TransportError> {
		ReqwestClient::builder().timeout(timeout).build().map_err(TransportError::from)
	}

	async fn send(
		client: &ReqwestClient,
		request: ApiRequest,
	) -> Result<ApiResponse, TransportError> {
		let method = match request.method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Delete => reqwest::Method::DELETE,
		};
		let mut builder = client.request(method, request.url).timeout(request.timeout);

		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}
		if !request.query.is_empty() {
			builder = builder.query(&request.query);
		}
		if let Some(body) = request.body {
			builder = builder.body(body);
		}

		let response = builder.send().await?;
		let status = response.status().as_u16();
		let body = response.bytes().await?.to_vec();

		Ok(ApiResponse { status, body })
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			match &self.0 {
				Some(shared) => Self::send(shared, request).await,
				None => {
					let scoped = Self::ephemeral(request.timeout)?;

					Self::send(&scoped, request).await
				},
			}
		})
	}
}
