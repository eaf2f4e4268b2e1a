// self
use crate::{_prelude::*, http::Method, obs::FlowKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by authentication flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("notion_client.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits the debug event logged right before an expired access token is refreshed.
pub(crate) fn token_expired() {
	#[cfg(feature = "tracing")]
	tracing::debug!("Access token expired, refreshing...");
}

/// Emits the deprecation warning for the legacy sign-in endpoint.
pub(crate) fn legacy_authentication() {
	#[cfg(feature = "tracing")]
	tracing::warn!(
		"Using the deprecated legacy sign-in endpoint; it will be removed in a future release."
	);
}

/// Emits a debug event for every response received, without payloads or tokens.
pub(crate) fn response_received(method: Method, endpoint: &str, status: u16) {
	#[cfg(feature = "tracing")]
	tracing::debug!(method = method.as_str(), endpoint, status, "Received response from the API.");

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, endpoint, status);
	}
}
