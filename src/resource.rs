//! Per-entity facades and the response models they validate against.
//!
//! Every facade borrows the [`Client`](crate::client::Client) and routes through
//! [`Client::request_and_validate`](crate::client::Client::request_and_validate) (or
//! [`Client::request`](crate::client::Client::request) for untyped payloads), so token expiry,
//! refresh convergence, and error classification apply uniformly. Responses wrap their payload
//! under a single key named after the entity; the facades unwrap it.

pub mod bridge;
pub mod device;
pub mod listener;
pub mod sensor;
pub mod system;
pub mod task;
pub mod user;

mod timestamp;

// self
use crate::_prelude::*;

/// Value of an entry in a `links` object: a numeric identifier or an opaque key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum LinkTarget {
	/// Numeric identifier of the linked entity.
	Id(i64),
	/// String key of the linked entity.
	Key(String),
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn link_targets_accept_numbers_and_strings() {
		let links: BTreeMap<String, LinkTarget> =
			serde_json::from_str(r#"{"system":12345,"location":"abc"}"#)
				.expect("Links fixture should deserialize.");

		assert_eq!(links["system"], LinkTarget::Id(12345));
		assert_eq!(links["location"], LinkTarget::Key("abc".into()));
	}
}
