//! Acquires a client-credentials token twice to show the per-resource cache.
//!
//! Runs against a local mock endpoint by default. Set `AAD_TENANT`, `AAD_CLIENT_ID`, and
//! `AAD_CLIENT_SECRET` (plus optionally `AAD_RESOURCE`) to talk to the real Azure AD authority.

// std
use std::env;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use oauth2_client_credentials::{
	auth::Credential, config::ProviderConfig, provider::ReqwestTokenProvider,
};

const DEFAULT_RESOURCE: &str = "https://graph.microsoft.com";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let resource = env::var("AAD_RESOURCE").unwrap_or_else(|_| DEFAULT_RESOURCE.into());

	if let (Ok(tenant), Ok(client_id), Ok(client_secret)) =
		(env::var("AAD_TENANT"), env::var("AAD_CLIENT_ID"), env::var("AAD_CLIENT_SECRET"))
	{
		let provider = ReqwestTokenProvider::new(tenant, client_id, client_secret)?;

		return acquire_twice(&provider, &resource).await;
	}

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/demo-tenant/oauth2/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"token_type\":\"Bearer\",\"expires_in\":\"3599\",\"access_token\":\"demo-access\"}",
			);
		})
		.await;
	let config =
		ProviderConfig::builder(Credential::new("demo-tenant", "demo-client", "super-secret")?)
			.login_base_url(server.base_url())
			.build()?;
	let provider = ReqwestTokenProvider::from_config(config)?;

	acquire_twice(&provider, &resource).await?;

	token_mock.assert_calls_async(1).await;

	Ok(())
}

async fn acquire_twice(provider: &ReqwestTokenProvider, resource: &str) -> Result<()> {
	let first = provider.token(resource).await?;
	let second = provider.token(resource).await?;

	println!("Token for {resource} valid until {}.", first.expires_at);
	println!("Second call served from cache: {}.", first == second);

	Ok(())
}
