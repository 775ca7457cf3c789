//! Fixed form parameters sent to the identity provider.

// self
use crate::_prelude::*;

/// Grant type of the first exchange step.
pub const PASSWORD_GRANT: &str = "password";
/// Grant type of the second exchange step.
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Connection and scope values that vary between identity provider tenants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeProfile {
	/// Identity provider connection (database) holding the service accounts.
	pub connection: String,
	/// Scope requested by the password grant.
	pub identity_scope: String,
	/// Scope requested by the jwt-bearer grant.
	pub bearer_scope: String,
}
impl ExchangeProfile {
	/// Overrides the connection name.
	pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
		self.connection = connection.into();

		self
	}

	/// Overrides the scope requested by the password grant.
	pub fn with_identity_scope(mut self, scope: impl Into<String>) -> Self {
		self.identity_scope = scope.into();

		self
	}

	/// Overrides the scope requested by the jwt-bearer grant.
	pub fn with_bearer_scope(mut self, scope: impl Into<String>) -> Self {
		self.bearer_scope = scope.into();

		self
	}
}
impl Default for ExchangeProfile {
	fn default() -> Self {
		Self {
			connection: "service-account".into(),
			identity_scope: "openid service_account_id".into(),
			bearer_scope: "openid pib".into(),
		}
	}
}
