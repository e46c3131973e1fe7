// self
use crate::{_prelude::*, error::Error, obs::TokenOutcome};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedToken<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedToken<F> = F;

/// Span wrapping a single `access_token` call.
#[derive(Clone, Debug)]
pub struct TokenSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl TokenSpan {
	/// Creates a new span tagged with the call site and target resource.
	pub fn new(stage: &'static str, resource: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("oauth2_client_credentials.token", stage, resource);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, resource);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedToken<Fut>
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

/// Emits an event describing `outcome` inside the current span.
pub fn trace_token_outcome(outcome: TokenOutcome, expires_at: Option<OffsetDateTime>) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(outcome = outcome.as_str(), ?expires_at, "token provider outcome");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (outcome, expires_at);
	}
}

/// Emits a warning for a failed acquisition.
pub fn trace_token_failure(error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(%error, "token acquisition failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}
