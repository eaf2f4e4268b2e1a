//! RFC 3339 timestamp (de)serialization for response models.

// crates.io
use serde::{Deserializer, de::Error as _};
use time::format_description::well_known::Rfc3339;
// self
use crate::_prelude::*;

pub(crate) fn rfc3339<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;

	OffsetDateTime::parse(&raw, &Rfc3339).map_err(D::Error::custom)
}

/// Like [`rfc3339`], but `null`, a missing field (with `#[serde(default)]`), or an empty
/// string yield `None`.
pub(crate) fn rfc3339_option<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
	D: Deserializer<'de>,
{
	match Option::<String>::deserialize(deserializer)? {
		Some(raw) if !raw.is_empty() =>
			OffsetDateTime::parse(&raw, &Rfc3339).map(Some).map_err(D::Error::custom),
		_ => Ok(None),
	}
}

/// Formats a timestamp for query parameters.
pub(crate) fn format(value: OffsetDateTime) -> Result<String, time::error::Format> {
	value.format(&Rfc3339)
}
