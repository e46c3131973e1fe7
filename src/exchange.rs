//! Client-credentials request construction and token endpoint response mapping.

// crates.io
use oauth2::{
	HttpClientError, HttpRequest, HttpResponse,
	http::{
		HeaderValue, Method, Request,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
use serde_json::Value;
use url::form_urlencoded::Serializer;
// self
use crate::{
	_prelude::*,
	auth::{CachedToken, Resource},
	config::ProviderConfig,
	error::{ConfigError, OAuthError, TransientError, TransportError},
};

/// RFC 6749 identifier for the only grant this crate performs.
pub const GRANT_TYPE: &str = "client_credentials";

// Ten years; keeps `received_at + expires_in` inside `OffsetDateTime` range.
pub(crate) const MAX_EXPIRES_IN_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Raw token endpoint body. Success and error shapes share one struct; failure is signaled by
/// the presence of `error`.
#[derive(Debug, Deserialize)]
struct TokenEndpointBody {
	access_token: Option<String>,
	expires_in: Option<Value>,
	error: Option<String>,
	error_description: Option<String>,
}

/// Reads `expires_in` as whole seconds.
///
/// Azure AD v1 sends a numeric string; RFC 6749 endpoints send a number. Fractional values are
/// truncated. Any other shape is a contract violation, not a parse failure of the body.
fn expires_in_duration(value: &Value) -> Result<Duration, ConfigError> {
	let secs = match value {
		Value::Number(number) =>
			number.as_i64().or_else(|| number.as_f64().and_then(truncate_secs)),
		Value::String(raw) => {
			let raw = raw.trim();

			raw.parse::<i64>().ok().or_else(|| raw.parse::<f64>().ok().and_then(truncate_secs))
		},
		_ => None,
	}
	.ok_or_else(|| ConfigError::InvalidExpiresIn {
		value: match value {
			Value::String(raw) => raw.clone(),
			other => other.to_string(),
		},
	})?;

	if secs <= 0 {
		return Err(ConfigError::NonPositiveExpiresIn);
	}
	if secs > MAX_EXPIRES_IN_SECS {
		return Err(ConfigError::ExpiresInOutOfRange);
	}

	Ok(Duration::seconds(secs))
}

// `as` saturates, so huge values still hit the range check.
fn truncate_secs(secs: f64) -> Option<i64> {
	secs.is_finite().then(|| secs.trunc() as i64)
}

/// Builds the form-encoded POST for `resource`.
pub(crate) fn build_token_request(
	config: &ProviderConfig,
	resource: &Resource,
) -> Result<HttpRequest> {
	let credential = &config.credential;
	let body = Serializer::new(String::new())
		.append_pair("grant_type", GRANT_TYPE)
		.append_pair("client_id", &credential.client_id)
		.append_pair("client_secret", credential.client_secret().expose())
		.append_pair("resource", resource)
		.finish();

	Request::builder()
		.method(Method::POST)
		.uri(config.token_endpoint().as_str())
		.header(CONTENT_TYPE, HeaderValue::from_static("application/x-www-form-urlencoded"))
		.header(ACCEPT, HeaderValue::from_static("application/json"))
		.body(body.into_bytes())
		.map_err(|e| ConfigError::from(e).into())
}

/// Maps a token endpoint response received at `received_at` into a cache entry.
///
/// An `error` field wins over the HTTP status so providers that answer OAuth errors with `200`
/// are still reported as [`OAuthError`].
pub(crate) fn map_token_response(
	response: &HttpResponse,
	received_at: OffsetDateTime,
	expiry_buffer: Duration,
) -> Result<CachedToken> {
	let status = response.status();
	let status_code = Some(status.as_u16());
	let deserializer = &mut serde_json::Deserializer::from_slice(response.body());
	let body: TokenEndpointBody = serde_path_to_error::deserialize(deserializer)
		.map_err(|source| TransientError::TokenResponseParse { source, status: status_code })?;

	if let Some(code) = body.error {
		return Err(OAuthError::from_fields(code, body.error_description.as_deref(), status_code)
			.into());
	}
	if !status.is_success() {
		return Err(TransientError::TokenEndpoint {
			message: format!("HTTP {status} without an OAuth error body"),
			status: status_code,
		}
		.into());
	}

	let access_token = body
		.access_token
		.filter(|token| !token.is_empty())
		.ok_or(ConfigError::MissingAccessToken)?;
	let expires_in =
		expires_in_duration(&body.expires_in.ok_or(ConfigError::MissingExpiresIn)?)?;

	Ok(CachedToken::from_response(access_token, received_at, expires_in, expiry_buffer))
}

/// Converts a transport failure into [`Error`], keeping the transport's error as the source.
pub(crate) fn map_transport_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		_ => TransportError::Other { message: "unrecognized HTTP client failure".into() }.into(),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http::{Response, StatusCode};
	use time::macros;
	// self
	use super::*;

	const RECEIVED: OffsetDateTime = macros::datetime!(2025-04-01 10:00 UTC);

	fn response(status: u16, body: &str) -> HttpResponse {
		Response::builder()
			.status(StatusCode::from_u16(status).expect("Status fixture should be valid."))
			.body(body.as_bytes().to_vec())
			.expect("Response fixture should build.")
	}

	fn map(status: u16, body: &str) -> Result<CachedToken> {
		map_token_response(&response(status, body), RECEIVED, Duration::minutes(5))
	}

	#[test]
	fn request_carries_form_parameters() {
		let config = ProviderConfig::new("contoso", "client-1", "s3cr=t&x")
			.expect("Configuration fixture should build.");
		let resource =
			Resource::new("https://graph.microsoft.com").expect("Resource fixture should be valid.");
		let request =
			build_token_request(&config, &resource).expect("Token request should build.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(
			request.uri().to_string(),
			"https://login.microsoftonline.com/contoso/oauth2/token"
		);
		assert_eq!(
			request.headers().get(CONTENT_TYPE).map(HeaderValue::as_bytes),
			Some(&b"application/x-www-form-urlencoded"[..])
		);
		assert_eq!(
			String::from_utf8_lossy(request.body()),
			"grant_type=client_credentials&client_id=client-1&client_secret=s3cr%3Dt%26x&resource=https%3A%2F%2Fgraph.microsoft.com"
		);
	}

	#[test]
	fn success_accepts_string_and_numeric_lifetimes() {
		let from_text =
			map(200, r#"{"token_type":"Bearer","access_token":"abc","expires_in":"3600"}"#)
				.expect("String lifetimes should map.");
		let from_number = map(200, r#"{"access_token":"abc","expires_in":3600}"#)
			.expect("Numeric lifetimes should map.");

		assert_eq!(from_text.expires_at, macros::datetime!(2025-04-01 10:55 UTC));
		assert_eq!(from_text, from_number);
		assert_eq!(from_text.received_at, RECEIVED);
	}

	#[test]
	fn fractional_lifetimes_truncate_to_whole_seconds() {
		let expected = macros::datetime!(2025-04-01 10:55 UTC);

		for expires_in in ["3600.0", "3600.9", r#""3600.0""#, "3.6e3"] {
			let body = format!(r#"{{"access_token":"abc","expires_in":{expires_in}}}"#);
			let token = map(200, &body).expect("Fractional lifetimes should map.");

			assert_eq!(token.expires_at, expected, "Lifetime {expires_in} should truncate.");
		}
		assert!(matches!(
			map(200, r#"{"access_token":"abc","expires_in":1e300}"#),
			Err(Error::Config(ConfigError::ExpiresInOutOfRange))
		));
	}

	#[test]
	fn error_field_maps_to_oauth_error_regardless_of_status() {
		let body = r#"{"error":"invalid_client","error_description":"AADSTS7000215: Invalid client secret.\r\nTrace ID: 0000\r\nCorrelation ID: 1111"}"#;

		for status in [200, 401] {
			match map(status, body) {
				Err(Error::OAuth(err)) => {
					assert_eq!(err.code, "invalid_client");
					assert_eq!(err.message, "AADSTS7000215: Invalid client secret.");
					assert_eq!(err.status, Some(status));
				},
				other => panic!("Unexpected mapping result: {other:?}."),
			}
		}
	}

	#[test]
	fn malformed_success_bodies_are_rejected() {
		assert!(matches!(
			map(200, r#"{"expires_in":"3600"}"#),
			Err(Error::Config(ConfigError::MissingAccessToken))
		));
		assert!(matches!(
			map(200, r#"{"access_token":"","expires_in":"3600"}"#),
			Err(Error::Config(ConfigError::MissingAccessToken))
		));
		assert!(matches!(
			map(200, r#"{"access_token":"abc"}"#),
			Err(Error::Config(ConfigError::MissingExpiresIn))
		));
		assert!(matches!(
			map(200, r#"{"access_token":"abc","expires_in":"soon"}"#),
			Err(Error::Config(ConfigError::InvalidExpiresIn { .. }))
		));
		assert!(matches!(
			map(200, r#"{"access_token":"abc","expires_in":0}"#),
			Err(Error::Config(ConfigError::NonPositiveExpiresIn))
		));
		assert!(matches!(
			map(200, r#"{"access_token":"abc","expires_in":0.5}"#),
			Err(Error::Config(ConfigError::NonPositiveExpiresIn))
		));
		assert!(matches!(
			map(200, r#"{"access_token":"abc","expires_in":null}"#),
			Err(Error::Config(ConfigError::MissingExpiresIn))
		));

		for wrong in ["true", "[3600]", r#"{"seconds":3600}"#, r#""NaN""#] {
			let body = format!(r#"{{"access_token":"abc","expires_in":{wrong}}}"#);

			match map(200, &body) {
				Err(Error::Config(ConfigError::InvalidExpiresIn { value })) =>
					assert!(wrong.contains(value.as_str()), "Unexpected value: {value}."),
				other => panic!("Unexpected mapping result for {wrong}: {other:?}."),
			}
		}
		assert!(matches!(
			map(200, r#"{"access_token":"abc","expires_in":"99999999999"}"#),
			Err(Error::Config(ConfigError::ExpiresInOutOfRange))
		));
	}

	#[test]
	fn non_json_and_bare_failures_are_transient() {
		match map(502, "<html>Bad Gateway</html>") {
			Err(Error::Transient(TransientError::TokenResponseParse { status, .. })) =>
				assert_eq!(status, Some(502)),
			other => panic!("Unexpected mapping result: {other:?}."),
		}
		match map(503, "{}") {
			Err(Error::Transient(TransientError::TokenEndpoint { status, .. })) =>
				assert_eq!(status, Some(503)),
			other => panic!("Unexpected mapping result: {other:?}."),
		}
	}

	#[test]
	fn transport_errors_keep_their_source() {
		let err = map_transport_error(HttpClientError::Reqwest(Box::new(std::io::Error::new(
			std::io::ErrorKind::TimedOut,
			"dns lookup timed out",
		))));

		match err {
			Error::Transport(inner) => {
				let original = inner
					.downcast_ref::<std::io::Error>()
					.expect("Transport error should expose the original error.");

				assert_eq!(original.kind(), std::io::ErrorKind::TimedOut);
			},
			other => panic!("Unexpected mapping result: {other:?}."),
		}
	}
}
