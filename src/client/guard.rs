//! Single-flight guard serializing refresh-token rotations.
//!
//! The guard pairs an async mutex with an in-flight counter. A caller about to refresh raises
//! the counter before queuing on the mutex, so requests that arrive in the meantime know a
//! refresh is pending and wait for it by acquiring and releasing the same mutex. The counter
//! is lowered by a drop guard, which keeps it balanced when a refresh fails or its future is
//! cancelled mid-flight.
//!
//! Every finished rotation bumps a generation counter and leaves its outcome behind the mutex.
//! A ticket remembers the generation current when its caller arrived, so a caller that queued
//! behind a rotation adopts that rotation's outcome instead of sending the same refresh token
//! again.

// std
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
// crates.io
use async_lock::MutexGuard as AsyncMutexGuard;
// self
use crate::{_prelude::*, error::RequestError};

/// Outcome of a failed rotation, replayed to the callers that queued behind it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum RefreshFailure {
	/// The API rejected the refresh token.
	Rejected(String),
	/// Any other failure, kept as its rendered message.
	Failed(String),
}
impl RefreshFailure {
	pub(crate) fn of(error: &Error) -> Self {
		match error {
			Error::InvalidCredentials { reason } => Self::Rejected(reason.clone()),
			other => Self::Failed(other.to_string()),
		}
	}

	pub(crate) fn to_error(&self) -> Error {
		match self {
			Self::Rejected(reason) => Error::invalid_credentials(reason.clone()),
			Self::Failed(message) =>
				RequestError::RefreshFailed { message: message.clone() }.into(),
		}
	}
}

#[derive(Debug, Default)]
pub(crate) struct RefreshGuard {
	last_failure: AsyncMutex<Option<RefreshFailure>>,
	in_flight: AtomicUsize,
	generation: AtomicU64,
}
impl RefreshGuard {
	/// Announces a refresh and waits for exclusive access.
	pub(crate) async fn enter(&self) -> RefreshTicket<'_> {
		let arrived_at = self.generation.load(Ordering::SeqCst);

		self.in_flight.fetch_add(1, Ordering::SeqCst);

		let announced = InFlight(&self.in_flight);
		let last_failure = self.last_failure.lock().await;

		RefreshTicket {
			last_failure,
			generation: &self.generation,
			arrived_at,
			_announced: announced,
		}
	}

	/// Returns `true` while any caller holds or waits for a ticket.
	pub(crate) fn is_refreshing(&self) -> bool {
		self.in_flight.load(Ordering::SeqCst) > 0
	}

	/// Resolves once the refresh currently holding the lock (if any) releases it.
	pub(crate) async fn wait(&self) {
		drop(self.last_failure.lock().await);
	}
}

/// Exclusive right to run one refresh; releases the lock and the announcement on drop.
pub(crate) struct RefreshTicket<'a> {
	last_failure: AsyncMutexGuard<'a, Option<RefreshFailure>>,
	generation: &'a AtomicU64,
	arrived_at: u64,
	_announced: InFlight<'a>,
}
impl RefreshTicket<'_> {
	/// Returns the outcome of the latest rotation if one finished after this ticket's caller
	/// arrived.
	pub(crate) fn finished_since_arrival(&self) -> Option<Result<(), RefreshFailure>> {
		if self.generation.load(Ordering::SeqCst) == self.arrived_at {
			return None;
		}

		Some(match &*self.last_failure {
			Some(failure) => Err(failure.clone()),
			None => Ok(()),
		})
	}

	/// Records the outcome of the rotation this ticket ran.
	pub(crate) fn finish<T>(&mut self, result: &Result<T>) {
		*self.last_failure = result.as_ref().err().map(RefreshFailure::of);

		self.generation.fetch_add(1, Ordering::SeqCst);
	}
}

struct InFlight<'a>(&'a AtomicUsize);
impl Drop for InFlight<'_> {
	fn drop(&mut self) {
		self.0.fetch_sub(1, Ordering::SeqCst);
	}
}
