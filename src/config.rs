//! Validated token provider configuration and its builder.
//!
//! A [`ProviderConfig`] pins the credential, the login authority, and the expiry buffer. The
//! token endpoint is derived once at build time as `{login_base_url}/{tenant}/oauth2/token`.

// crates.io
use url::Host;
// self
use crate::{_prelude::*, auth::Credential, error::ConfigError, exchange::MAX_EXPIRES_IN_SECS};

/// Default Azure AD login authority.
pub const DEFAULT_LOGIN_BASE_URL: &str = "https://login.microsoftonline.com";
/// Default safety margin subtracted from server-reported expiry.
pub const DEFAULT_EXPIRY_BUFFER: Duration = Duration::minutes(5);

/// Immutable configuration consumed by [`TokenProvider`](crate::provider::TokenProvider).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
	/// Tenant, client identifier, and secret.
	pub credential: Credential,
	/// Login authority the tenant path is appended to.
	pub login_base_url: Url,
	/// Margin subtracted from every `expires_in`.
	pub expiry_buffer: Duration,
	token_endpoint: Url,
}
impl ProviderConfig {
	/// Creates a builder seeded with the provided credential.
	pub fn builder(credential: Credential) -> ProviderConfigBuilder {
		ProviderConfigBuilder::new(credential)
	}

	/// Validates the raw credential parts and applies the default authority and buffer.
	pub fn new(
		tenant: impl AsRef<str>,
		client_id: impl AsRef<str>,
		client_secret: impl Into<String>,
	) -> Result<Self, ConfigError> {
		Self::builder(Credential::new(tenant, client_id, client_secret)?).build()
	}

	/// Token endpoint derived from the login base URL and tenant.
	pub fn token_endpoint(&self) -> &Url {
		&self.token_endpoint
	}
}

/// Builder for [`ProviderConfig`] values.
#[derive(Debug)]
pub struct ProviderConfigBuilder {
	/// Credential for the configuration being constructed.
	pub credential: Credential,
	/// Raw login base URL; parsed during [`build`](Self::build).
	pub login_base_url: String,
	/// Safety margin subtracted from server-reported expiry.
	pub expiry_buffer: Duration,
}
impl ProviderConfigBuilder {
	/// Creates a new builder with the default authority and buffer.
	pub fn new(credential: Credential) -> Self {
		Self {
			credential,
			login_base_url: DEFAULT_LOGIN_BASE_URL.into(),
			expiry_buffer: DEFAULT_EXPIRY_BUFFER,
		}
	}

	/// Overrides the login authority (sovereign clouds, test servers).
	pub fn login_base_url(mut self, url: impl AsRef<str>) -> Self {
		self.login_base_url = url.as_ref().to_owned();

		self
	}

	/// Overrides the expiry buffer.
	pub fn expiry_buffer(mut self, buffer: Duration) -> Self {
		self.expiry_buffer = buffer;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ProviderConfig, ConfigError> {
		if self.expiry_buffer.is_negative() {
			return Err(ConfigError::NegativeExpiryBuffer);
		}
		if self.expiry_buffer > Duration::seconds(MAX_EXPIRES_IN_SECS) {
			return Err(ConfigError::ExpiryBufferOutOfRange);
		}

		let login_base_url = Url::parse(&self.login_base_url)
			.map_err(|source| ConfigError::InvalidLoginBaseUrl { source })?;

		validate_endpoint(&login_base_url)?;

		let token_endpoint = derive_token_endpoint(&login_base_url, &self.credential)?;

		Ok(ProviderConfig {
			credential: self.credential,
			login_base_url,
			expiry_buffer: self.expiry_buffer,
			token_endpoint,
		})
	}
}

fn validate_endpoint(url: &Url) -> Result<(), ConfigError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ConfigError::InsecureEndpoint { url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => ip.is_loopback(),
		Some(Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}

fn derive_token_endpoint(base: &Url, credential: &Credential) -> Result<Url, ConfigError> {
	let mut endpoint = base.clone();

	endpoint
		.path_segments_mut()
		.map_err(|_| ConfigError::CannotBeABase { url: base.to_string() })?
		.pop_if_empty()
		.extend([credential.tenant.as_ref(), "oauth2", "token"]);
	endpoint.set_query(None);
	endpoint.set_fragment(None);

	Ok(endpoint)
}
