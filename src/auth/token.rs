//! Cached access token records and their expiry lifecycle.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Lifecycle status for a cached token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenStatus {
	/// Token may still be handed to callers.
	Valid,
	/// Token reached its buffered expiry and must be replaced.
	Expired,
}

/// Access token cached for a single resource.
#[derive(Clone, PartialEq, Eq)]
pub struct CachedToken {
	/// Bearer token; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Instant the token response was received.
	pub received_at: OffsetDateTime,
	/// Buffered expiry: server expiry minus the safety buffer.
	pub expires_at: OffsetDateTime,
}
impl CachedToken {
	/// Builds a record from a token response received at `received_at`.
	///
	/// `expires_at = received_at + expires_in - buffer`, saturating at the representable range.
	pub fn from_response(
		access_token: impl Into<String>,
		received_at: OffsetDateTime,
		expires_in: Duration,
		buffer: Duration,
	) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			received_at,
			expires_at: received_at.saturating_add(expires_in).saturating_sub(buffer),
		}
	}

	/// Computes the lifecycle status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		if instant < self.expires_at { TokenStatus::Valid } else { TokenStatus::Expired }
	}

	/// Returns `true` if the token may be served at `instant`.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Valid)
	}

	/// Returns `true` if the token must be replaced at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Expired)
	}

	/// Buffered expiry in milliseconds since the Unix epoch.
	pub fn expires_at_millis(&self) -> i64 {
		(self.expires_at.unix_timestamp_nanos() / 1_000_000) as i64
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("access_token", &"<redacted>")
			.field("received_at", &self.received_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
