//! Typed async client for the Notion home-monitoring cloud API.
//!
//! A [`Client`](client::Client) authenticates once, detects access-token expiry locally, and
//! converges concurrent callers on a single refresh before any resource call goes out.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod obs;
pub mod resource;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// crates.io
	use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
	// self
	use crate::{
		client::{Client, ClientBuilder},
		http::ReqwestHttpClient,
	};

	/// Email used by every mocked login.
	pub const TEST_EMAIL: &str = "user@email.com";
	/// Password used by every mocked login.
	pub const TEST_PASSWORD: &str = "password123";
	/// Refresh token returned by the mocked login fixture.
	pub const TEST_REFRESH_TOKEN: &str = "abcde12345";
	/// User UUID returned by the mocked login fixture.
	pub const TEST_USER_UUID: &str = "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx";

	/// Mints an unsigned (HS256-shaped) access token whose `exp` claim is `expires_at`.
	///
	/// The signature segment is garbage; the client never verifies it.
	pub fn mint_access_token(expires_at: OffsetDateTime) -> String {
		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
		let claims = serde_json::json!({
			"sub": TEST_USER_UUID,
			"roles": ["delete_system", "manage_users"],
			"rtid": format!("{:032x}", rand::random::<u128>()),
			"exp": expires_at.unix_timestamp(),
		});
		let payload = URL_SAFE_NO_PAD.encode(claims.to_string());

		format!("{header}.{payload}.c2lnbmF0dXJl")
	}

	/// Builds the JSON body returned by `POST /auth/login`.
	pub fn credentials_login_body(access_token: &str, refresh_token: &str) -> String {
		serde_json::json!({
			"user": {
				"id": 12345,
				"uuid": TEST_USER_UUID,
				"first_name": "John",
				"last_name": "Doe",
				"email": TEST_EMAIL,
				"phone_number": null,
				"role": "user",
				"organization": "Notion User",
				"created_at": "2019-04-30T01:35:03.781Z",
				"updated_at": "2023-12-12T22:33:01.073Z"
			},
			"auth": { "jwt": access_token, "refresh_token": refresh_token }
		})
		.to_string()
	}

	/// Builds the JSON body returned by `POST /auth/{uuid}/refresh`.
	pub fn refresh_body(access_token: &str, refresh_token: &str) -> String {
		serde_json::json!({ "auth": { "jwt": access_token, "refresh_token": refresh_token } })
			.to_string()
	}

	/// Builds a client builder whose base URL points at `base_url` and whose transport reuses a
	/// shared reqwest pool.
	pub fn test_client_builder(base_url: &str) -> ClientBuilder<ReqwestHttpClient> {
		let base_url = Url::parse(base_url).expect("Mock server base URL should parse.");

		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		Client::builder().base_url(base_url).with_transport(ReqwestHttpClient::with_client(client))
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
