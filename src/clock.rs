//! Time source used for cache expiry decisions.

// self
use crate::_prelude::*;

/// Supplies the current instant to the token provider.
pub trait Clock
where
	Self: 'static + Send + Sync,
{
	/// Returns the current UTC instant.
	fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time via [`OffsetDateTime::now_utc`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// Manually driven clock for tests and simulations.
#[derive(Clone, Debug)]
pub struct ManualClock(Arc<Mutex<OffsetDateTime>>);
impl ManualClock {
	/// Creates a clock frozen at `instant`.
	pub fn new(instant: OffsetDateTime) -> Self {
		Self(Arc::new(Mutex::new(instant)))
	}

	/// Moves the clock to `instant`.
	pub fn set(&self, instant: OffsetDateTime) {
		*self.0.lock() = instant;
	}

	/// Moves the clock forward by `delta`.
	pub fn advance(&self, delta: Duration) {
		*self.0.lock() += delta;
	}
}
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.lock()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn manual_clock_moves_only_when_told() {
		let clock = ManualClock::new(macros::datetime!(2025-01-01 00:00 UTC));
		let shared = clock.clone();

		assert_eq!(clock.now(), macros::datetime!(2025-01-01 00:00 UTC));

		shared.advance(Duration::milliseconds(1_500));

		assert_eq!(clock.now(), macros::datetime!(2025-01-01 00:00:01.5 UTC));

		shared.set(macros::datetime!(2030-01-01 00:00 UTC));

		assert_eq!(clock.now(), macros::datetime!(2030-01-01 00:00 UTC));
	}
}
