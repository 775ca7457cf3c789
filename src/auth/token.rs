//! Token payloads produced by the two exchange steps.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Intermediate identity assertion returned by the password grant.
///
/// Both values feed the jwt-bearer step and are dropped once it completes.
#[derive(Clone, Debug, Deserialize)]
pub struct IdentityToken {
	/// Signed identity assertion, sent back as the jwt-bearer `assertion`.
	pub id_token: TokenSecret,
	/// Short-lived access token sent alongside the assertion.
	pub access_token: TokenSecret,
}

/// Step-two response body. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct BearerTokenResponse {
	pub(crate) access_token: TokenSecret,
	#[serde(default)]
	pub(crate) token_type: Option<String>,
	#[serde(default)]
	pub(crate) expires_in: Option<u64>,
}

/// Final bearer credential handed to the caller.
#[derive(Clone, Debug)]
pub struct BearerToken {
	/// Opaque token attached to subsequent authorized requests.
	pub secret: TokenSecret,
	/// Token type reported by the provider, when present.
	pub token_type: Option<String>,
	/// Expiry derived from `expires_in`, when the provider reported one.
	pub expires_at: Option<OffsetDateTime>,
}
impl BearerToken {
	/// Wraps a raw token without expiry metadata.
	pub fn new(secret: impl Into<String>) -> Self {
		Self { secret: TokenSecret::new(secret), token_type: None, expires_at: None }
	}

	pub(crate) fn from_response(response: BearerTokenResponse, issued_at: OffsetDateTime) -> Self {
		let expires_at = response
			.expires_in
			.and_then(|secs| i64::try_from(secs).ok())
			.and_then(|secs| issued_at.checked_add(Duration::seconds(secs)));

		Self { secret: response.access_token, token_type: response.token_type, expires_at }
	}

	/// Returns the raw bearer value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.secret.expose()
	}

	/// Returns `true` if the token is known to be expired at `instant`.
	///
	/// Tokens without an expiry never report expiration.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}

	/// Formats the value for an `Authorization` header.
	pub fn authorization_header(&self) -> String {
		format!("Bearer {}", self.expose())
	}
}
impl AsRef<str> for BearerToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
