//! Provider-level error types shared by configuration, transport, and token exchange code.

// self
use crate::{_prelude::*, auth::IdentifierError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem or a response that violates the token contract.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; the caller may retry.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token endpoint answered with an OAuth error body.
	#[error(transparent)]
	OAuth(#[from] OAuthError),
}
impl From<IdentifierError> for Error {
	fn from(e: IdentifierError) -> Self {
		ConfigError::from(e).into()
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Tenant, client, or resource identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] IdentifierError),
	/// Client secret was empty.
	#[error("Client secret cannot be empty.")]
	EmptyClientSecret,
	/// Login base URL cannot be parsed.
	#[error("Login base URL is invalid.")]
	InvalidLoginBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Login base URL cannot carry the tenant path segments.
	#[error("Login base URL `{url}` cannot be used as a path base.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// Login base URL must use HTTPS outside loopback hosts.
	#[error("The login base URL must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Offending URL.
		url: String,
	},
	/// Expiry buffer was negative.
	#[error("The expiry buffer must not be negative.")]
	NegativeExpiryBuffer,
	/// Expiry buffer exceeded the longest supported token lifetime.
	#[error("The expiry buffer exceeds the longest supported token lifetime.")]
	ExpiryBufferOutOfRange,

	/// Token endpoint response omitted `access_token`.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned an `expires_in` that is not an integer.
	#[error("The expires_in value `{value}` is not a whole number of seconds.")]
	InvalidExpiresIn {
		/// Raw value returned by the endpoint.
		value: String,
	},
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// Token endpoint returned a non-positive duration.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Endpoint returned a non-success status without an OAuth error body.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with a body that is not the expected JSON.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
///
/// The transport's own error value is kept as the [`source`](std::error::Error::source) so
/// callers can downcast to it.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
	/// Transport failed without a typed error.
	#[error("HTTP client error occurred while calling the token endpoint: {message}.")]
	Other {
		/// Message supplied by the transport.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Returns the transport's own error when it has the requested type.
	pub fn downcast_ref<E>(&self) -> Option<&E>
	where
		E: 'static + std::error::Error,
	{
		match self {
			Self::Network { source } => source.downcast_ref::<E>(),
			Self::Io(e) => (e as &(dyn std::error::Error + 'static)).downcast_ref::<E>(),
			Self::Other { .. } => None,
		}
	}
}

/// OAuth error returned by the token endpoint (`error` + `error_description`).
///
/// `message` holds only the first line of `error_description`; providers such as Azure AD append
/// trace and correlation identifiers on following lines.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct OAuthError {
	/// OAuth error code, e.g. `invalid_client`.
	pub code: String,
	/// First line of the error description, or the code when no description was sent.
	pub message: String,
	/// HTTP status code of the response, when available.
	pub status: Option<u16>,
}
impl OAuthError {
	/// Builds an error from the raw `error` and `error_description` fields.
	pub fn from_fields(
		code: impl Into<String>,
		description: Option<&str>,
		status: Option<u16>,
	) -> Self {
		let code = code.into();
		let message = match description.and_then(|d| d.lines().next()) {
			Some(line) => line.to_owned(),
			None => code.clone(),
		};

		Self { code, message, status }
	}

	/// Returns the OAuth error code.
	pub fn code(&self) -> &str {
		&self.code
	}
}
