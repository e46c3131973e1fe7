//! Immutable client credential held by a token provider.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, ClientSecret, TenantId},
	error::ConfigError,
};

/// Tenant + client identifier + client secret triple.
///
/// Values are validated once at construction and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	/// Directory tenant the client is registered in.
	pub tenant: TenantId,
	/// Application (client) identifier.
	pub client_id: ClientId,
	client_secret: ClientSecret,
}
impl Credential {
	/// Validates and assembles a credential.
	pub fn new(
		tenant: impl AsRef<str>,
		client_id: impl AsRef<str>,
		client_secret: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let tenant = TenantId::new(tenant)?;
		let client_id = ClientId::new(client_id)?;
		let client_secret = client_secret.into();

		if client_secret.is_empty() {
			return Err(ConfigError::EmptyClientSecret);
		}

		Ok(Self { tenant, client_id, client_secret: ClientSecret::new(client_secret) })
	}

	/// Returns the client secret.
	pub fn client_secret(&self) -> &ClientSecret {
		&self.client_secret
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("tenant", &self.tenant)
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.finish()
	}
}
