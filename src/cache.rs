//! Thread-safe per-resource token cache owned by a token provider.

// self
use crate::{
	_prelude::*,
	auth::{CachedToken, Resource},
};

type CacheMap = Arc<RwLock<HashMap<Resource, CachedToken>>>;

/// Mapping from resource identifier to its most recent token.
///
/// Entries are only ever inserted or overwritten. Locks are held for the duration of a single
/// map operation and never across an `.await`.
#[derive(Clone, Debug, Default)]
pub struct TokenCache(CacheMap);
impl TokenCache {
	/// Returns the cached token for `resource` if it is still valid at `now`.
	pub fn fresh(&self, resource: &str, now: OffsetDateTime) -> Option<CachedToken> {
		self.0.read().get(resource).filter(|token| token.is_valid_at(now)).cloned()
	}

	/// Returns the entry for `resource` regardless of its expiry.
	pub fn get(&self, resource: &str) -> Option<CachedToken> {
		self.0.read().get(resource).cloned()
	}

	/// Stores `token` for `resource`, replacing any previous entry.
	///
	/// Returns the replaced entry, if one existed.
	pub fn insert(&self, resource: Resource, token: CachedToken) -> Option<CachedToken> {
		self.0.write().insert(resource, token)
	}

	/// Number of resources with an entry.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` if no resource has an entry.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn resource(value: &str) -> Resource {
		Resource::new(value).expect("Resource fixture should be valid.")
	}

	fn token(value: &str, received_at: OffsetDateTime) -> CachedToken {
		CachedToken::from_response(value, received_at, Duration::hours(1), Duration::minutes(5))
	}

	#[test]
	fn fresh_filters_expired_entries() {
		let cache = TokenCache::default();
		let now = macros::datetime!(2025-06-01 12:00 UTC);

		cache.insert(resource("https://graph.microsoft.com"), token("graph", now));

		let hit = cache
			.fresh("https://graph.microsoft.com", now + Duration::minutes(54))
			.expect("Token should still be valid before the buffered expiry.");

		assert_eq!(hit.access_token.expose(), "graph");
		assert!(cache.fresh("https://graph.microsoft.com", now + Duration::minutes(55)).is_none());
		assert!(cache.get("https://graph.microsoft.com").is_some());
	}

	#[test]
	fn resources_are_cached_independently() {
		let cache = TokenCache::default();
		let early = macros::datetime!(2025-06-01 12:00 UTC);
		let late = early + Duration::minutes(30);

		cache.insert(resource("https://a.example"), token("a", early));
		cache.insert(resource("https://b.example"), token("b", late));

		let probe = early + Duration::minutes(60);

		assert!(cache.fresh("https://a.example", probe).is_none());
		assert_eq!(
			cache.fresh("https://b.example", probe).map(|t| t.access_token.expose().to_owned()),
			Some("b".into())
		);
		assert_eq!(cache.len(), 2);
	}

	#[test]
	fn insert_overwrites_previous_entry() {
		let cache = TokenCache::default();
		let first = macros::datetime!(2025-06-01 12:00 UTC);
		let second = first + Duration::hours(2);

		assert!(cache.insert(resource("https://a.example"), token("old", first)).is_none());

		let replaced = cache
			.insert(resource("https://a.example"), token("new", second))
			.expect("Previous entry should be returned on overwrite.");
		let current = cache.get("https://a.example").expect("Entry should remain present.");

		assert_eq!(replaced.access_token.expose(), "old");
		assert_eq!(current.access_token.expose(), "new");
		assert_eq!(current.received_at, second);
		assert_eq!(cache.len(), 1);
	}
}
