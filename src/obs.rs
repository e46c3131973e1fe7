//! Optional observability helpers for token acquisition.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `oauth2_client_credentials.token` with `stage` and
//!   `resource` fields, plus debug/warn events for cache hits, exchanges, and failures.
//! - Enable `metrics` to increment the `oauth2_client_credentials_token_total` counter labeled by
//!   `outcome`.
//!
//! Token values and client secrets are never recorded.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Outcome labels recorded for each `access_token` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenOutcome {
	/// Served from the cache without network I/O.
	CacheHit,
	/// Cache miss or expired entry; an exchange was started.
	Exchange,
	/// Exchange completed and the cache was updated.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl TokenOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenOutcome::CacheHit => "cache_hit",
			TokenOutcome::Exchange => "exchange",
			TokenOutcome::Success => "success",
			TokenOutcome::Failure => "failure",
		}
	}
}
impl Display for TokenOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
