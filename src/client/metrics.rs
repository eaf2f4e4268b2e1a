//! Refresh counters kept per client.
//!
//! `attempts` counts rotations that reached the API and is always `successes + failures`.
//! `coalesced` counts callers that found the access token expired but adopted a rotation run by
//! someone else, which is what the single-flight guard saves on the wire.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::_prelude::*;

/// Refresh counters shared by all clones of a client.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	successes: AtomicU64,
	failures: AtomicU64,
	coalesced: AtomicU64,
}
impl RefreshMetrics {
	/// Refresh calls sent to the API.
	pub fn attempts(&self) -> u64 {
		self.successes() + self.failures()
	}

	/// Refresh calls that rotated the token pair.
	pub fn successes(&self) -> u64 {
		self.successes.load(Ordering::Relaxed)
	}

	/// Refresh calls that failed, including rotations whose new access token was unreadable.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	/// Expired-token callers that adopted another caller's rotation instead of sending their own.
	pub fn coalesced(&self) -> u64 {
		self.coalesced.load(Ordering::Relaxed)
	}

	pub(crate) fn record_rotation<T>(&self, result: &Result<T>) {
		let counter = if result.is_ok() { &self.successes } else { &self.failures };

		counter.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_coalesced(&self) {
		self.coalesced.fetch_add(1, Ordering::Relaxed);
	}
}
