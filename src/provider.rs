//! Client-credentials token provider with a per-resource, expiry-buffered cache.
//!
//! [`TokenProvider::access_token`] serves a cached token while `now < expires_at` and
//! otherwise performs one form-encoded POST to the tenant's token endpoint, caching the result
//! under the requested resource. Concurrent misses for the same resource are not coalesced:
//! each caller performs its own exchange and the last one to finish owns the cache entry.

// self
use crate::{
	_prelude::*,
	auth::{CachedToken, Resource, TokenSecret},
	cache::TokenCache,
	clock::{Clock, SystemClock},
	config::ProviderConfig,
	exchange,
	http::TokenHttpClient,
	obs::{self, TokenOutcome, TokenSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Provider specialized for the crate's default reqwest transport.
pub type ReqwestTokenProvider = TokenProvider<ReqwestHttpClient>;

/// Acquires and caches client-credentials access tokens for one tenant + client pair.
///
/// The provider is `Send + Sync` when its transport is, so one instance can be shared behind an
/// [`Arc`] across tasks. The cache lives as long as the provider.
pub struct TokenProvider<C>
where
	C: ?Sized + TokenHttpClient,
{
	config: ProviderConfig,
	http_client: Arc<C>,
	clock: Arc<dyn Clock>,
	cache: TokenCache,
}
impl<C> TokenProvider<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a provider that sends exchanges through the caller-provided transport.
	pub fn with_http_client(config: ProviderConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			config,
			http_client: http_client.into(),
			clock: Arc::new(SystemClock),
			cache: TokenCache::default(),
		}
	}

	/// Replaces the time source used for expiry decisions.
	pub fn with_clock(mut self, clock: impl Clock) -> Self {
		self.clock = Arc::new(clock);

		self
	}

	/// Returns the validated configuration.
	pub fn config(&self) -> &ProviderConfig {
		&self.config
	}

	/// Returns the underlying cache.
	pub fn cache(&self) -> &TokenCache {
		&self.cache
	}

	/// Returns the cache entry for `resource` without checking expiry or touching the network.
	pub fn cached_token(&self, resource: &str) -> Option<CachedToken> {
		self.cache.get(resource)
	}

	/// Returns a valid access token for `resource`, exchanging credentials when the cached one
	/// is missing or past its buffered expiry.
	///
	/// # Errors
	///
	/// - [`Error::Config`] when `resource` is empty, or when the endpoint returns a success body
	///   without a usable `access_token`/`expires_in`. Any non-empty `resource` is sent as is.
	/// - [`Error::OAuth`] when the endpoint body carries an `error` field.
	/// - [`Error::Transport`] when the transport fails; the transport's error is the source.
	/// - [`Error::Transient`] for non-JSON bodies or error statuses without an `error` field.
	///
	/// The cache is left untouched on every error path.
	pub async fn access_token(&self, resource: &str) -> Result<TokenSecret> {
		self.token(resource).await.map(|token| token.access_token)
	}

	/// Same as [`access_token`](Self::access_token) but returns the whole cache entry.
	pub async fn token(&self, resource: &str) -> Result<CachedToken> {
		let span = TokenSpan::new("access_token", resource);
		let result = span.instrument(self.acquire(resource)).await;

		if let Err(e) = &result {
			obs::record_token_outcome(TokenOutcome::Failure);
			obs::trace_token_failure(e);
		}

		result
	}

	async fn acquire(&self, resource: &str) -> Result<CachedToken> {
		let resource = Resource::new(resource)?;

		if let Some(token) = self.cache.fresh(&resource, self.clock.now()) {
			obs::record_token_outcome(TokenOutcome::CacheHit);
			obs::trace_token_outcome(TokenOutcome::CacheHit, Some(token.expires_at));

			return Ok(token);
		}

		obs::record_token_outcome(TokenOutcome::Exchange);
		obs::trace_token_outcome(TokenOutcome::Exchange, None);

		let token = self.exchange(&resource).await?;

		self.cache.insert(resource, token.clone());

		obs::record_token_outcome(TokenOutcome::Success);
		obs::trace_token_outcome(TokenOutcome::Success, Some(token.expires_at));

		Ok(token)
	}

	async fn exchange(&self, resource: &Resource) -> Result<CachedToken> {
		let request = exchange::build_token_request(&self.config, resource)?;
		let response =
			self.http_client.execute(request).await.map_err(exchange::map_transport_error)?;
		let received_at = self.clock.now();

		exchange::map_token_response(&response, received_at, self.config.expiry_buffer)
	}
}
#[cfg(feature = "reqwest")]
impl TokenProvider<ReqwestHttpClient> {
	/// Creates a provider for the public Azure AD authority with the default 5 minute buffer.
	///
	/// Fails with [`Error::Config`] when any argument is empty or malformed.
	pub fn new(
		tenant: impl AsRef<str>,
		client_id: impl AsRef<str>,
		client_secret: impl Into<String>,
	) -> Result<Self> {
		Self::from_config(ProviderConfig::new(tenant, client_id, client_secret)?)
	}

	/// Creates a provider from a prepared configuration using a fresh reqwest transport.
	pub fn from_config(config: ProviderConfig) -> Result<Self> {
		Ok(Self::with_http_client(config, ReqwestHttpClient::new()?))
	}
}
impl<C> Debug for TokenProvider<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenProvider")
			.field("config", &self.config)
			.field("cached_resources", &self.cache.len())
			.finish()
	}
}
