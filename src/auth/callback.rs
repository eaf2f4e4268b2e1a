//! Instance-scoped registry of callbacks notified whenever the refresh token rotates.

// std
use std::sync::{
	Weak,
	atomic::{AtomicU64, Ordering},
};
// self
use crate::_prelude::*;

type Callback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct Registry {
	next_id: AtomicU64,
	entries: Mutex<Vec<(u64, Callback)>>,
}

/// Ordered list of refresh-token callbacks owned by one client.
///
/// Clones share the same list.
#[derive(Clone, Default)]
pub struct RefreshTokenCallbacks(Arc<Registry>);
impl RefreshTokenCallbacks {
	/// Registers `callback` and returns the handle that removes it again.
	pub fn add<F>(&self, callback: F) -> RefreshTokenCallbackHandle
	where
		F: 'static + Fn(&str) + Send + Sync,
	{
		let id = self.0.next_id.fetch_add(1, Ordering::Relaxed);

		self.0.entries.lock().push((id, Arc::new(callback)));

		RefreshTokenCallbackHandle { id, registry: Arc::downgrade(&self.0) }
	}

	/// Returns the number of registered callbacks.
	pub fn len(&self) -> usize {
		self.0.entries.lock().len()
	}

	/// Returns `true` when no callback is registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Invokes every callback in registration order.
	///
	/// The list is snapshotted first so callbacks may add or remove entries without deadlocking.
	pub(crate) fn notify(&self, refresh_token: &str) {
		let snapshot =
			self.0.entries.lock().iter().map(|(_, callback)| callback.clone()).collect::<Vec<_>>();

		for callback in snapshot {
			callback(refresh_token);
		}
	}
}
impl Debug for RefreshTokenCallbacks {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RefreshTokenCallbacks").field("len", &self.len()).finish()
	}
}

/// De-registration handle returned by [`RefreshTokenCallbacks::add`].
///
/// Dropping the handle keeps the callback registered; call [`remove`](Self::remove) to detach it.
#[derive(Debug)]
pub struct RefreshTokenCallbackHandle {
	id: u64,
	registry: Weak<Registry>,
}
impl RefreshTokenCallbackHandle {
	/// Removes the callback; returns `false` if the owning client is already gone.
	pub fn remove(self) -> bool {
		let Some(registry) = self.registry.upgrade() else {
			return false;
		};
		let mut entries = registry.entries.lock();
		let before = entries.len();

		entries.retain(|(id, _)| *id != self.id);

		entries.len() != before
	}
}
