//! Secret wrappers that keep bearer tokens and client secrets out of logs.

// self
use crate::_prelude::*;

macro_rules! def_secret {
	($name:ident, $doc:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq)]
		pub struct $name(String);
		impl $name {
			/// Wraps a new secret string.
			pub fn new(value: impl Into<String>) -> Self {
				Self(value.into())
			}

			/// Returns the inner value. Callers must avoid logging this string.
			pub fn expose(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				self.expose()
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(stringify!($name)).field(&"<redacted>").finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str("<redacted>")
			}
		}
	};
}

def_secret! { TokenSecret, "Opaque bearer access token. Never parsed, never logged." }
def_secret! { ClientSecret, "Confidential client secret sent to the token endpoint." }

#[cfg(test)]
mod tests {
	// std
	use std::marker::PhantomData;
	// self
	use super::*;
	use crate::auth::{CachedToken, TokenStatus};

	// Resolves to the inherent `true` only when `T: Serialize`.
	trait SerializeFallback {
		const SERIALIZABLE: bool = false;
	}
	impl<T> SerializeFallback for T {}

	struct SerializeCheck<T>(PhantomData<T>);
	impl<T> SerializeCheck<T>
	where
		T: Serialize,
	{
		const SERIALIZABLE: bool = true;
	}

	#[test]
	fn secrets_and_tokens_cannot_be_serialized() {
		assert!(SerializeCheck::<String>::SERIALIZABLE);
		assert!(!SerializeCheck::<ClientSecret>::SERIALIZABLE);
		assert!(!SerializeCheck::<TokenSecret>::SERIALIZABLE);
		assert!(!SerializeCheck::<CachedToken>::SERIALIZABLE);
		assert!(!SerializeCheck::<TokenStatus>::SERIALIZABLE);
	}

	#[test]
	fn secret_formatters_redact() {
		let token = TokenSecret::new("super-secret");
		let secret = ClientSecret::new("client-secret");

		assert_eq!(format!("{token:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
		assert_eq!(format!("{secret:?}"), "ClientSecret(\"<redacted>\")");
		assert_eq!(secret.expose(), "client-secret");
	}
}
