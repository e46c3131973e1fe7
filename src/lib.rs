//! OAuth 2.0 client-credentials tokens for Azure AD style token endpoints, cached per resource
//! with an expiry safety buffer.
//!
//! ```no_run
//! # async fn run() -> oauth2_client_credentials::error::Result<()> {
//! use oauth2_client_credentials::provider::TokenProvider;
//!
//! let provider = TokenProvider::new("contoso.onmicrosoft.com", "client-id", "client-secret")?;
//! let token = provider.access_token("https://graph.microsoft.com").await?;
//!
//! println!("Authorization: Bearer {}", token.expose());
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod exchange;
pub mod http;
pub mod obs;
pub mod provider;

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
