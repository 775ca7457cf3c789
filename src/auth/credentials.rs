//! Caller-supplied credentials for the service-account exchange.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Service-account credentials and the identity provider endpoint they authenticate against.
///
/// The exchange borrows the credentials for the duration of a call and never persists them.
#[derive(Clone)]
pub struct Credentials {
	/// OAuth client identifier sent with both exchange steps.
	pub client_id: String,
	/// Service-account username for the password grant.
	pub username: String,
	/// Service-account password; redacted in `Debug` output.
	pub password: TokenSecret,
	/// Token endpoint receiving both form posts.
	pub auth_url: Url,
}
impl Credentials {
	/// Validates and bundles the credential fields.
	pub fn new(
		client_id: impl Into<String>,
		username: impl Into<String>,
		password: impl Into<String>,
		auth_url: &str,
	) -> Result<Self, ConfigError> {
		let client_id = client_id.into();
		let username = username.into();

		if client_id.trim().is_empty() {
			return Err(ConfigError::MissingField { field: "client_id" });
		}
		if username.trim().is_empty() {
			return Err(ConfigError::MissingField { field: "username" });
		}

		let auth_url = Url::parse(auth_url).map_err(|source| ConfigError::InvalidAuthUrl { source })?;

		Ok(Self { client_id, username, password: TokenSecret::new(password), auth_url })
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("client_id", &self.client_id)
			.field("username", &self.username)
			.field("password", &self.password)
			.field("auth_url", &self.auth_url.as_str())
			.finish()
	}
}
