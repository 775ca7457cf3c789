//! Form-encoded request construction for both exchange steps.

// crates.io
use oauth2::{
	HttpRequest,
	http::{
		Method, Request,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
use url::form_urlencoded::Serializer;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, IdentityToken},
	error::ConfigError,
	exchange::{ExchangeProfile, JWT_BEARER_GRANT, PASSWORD_GRANT},
};

pub(crate) type FormFields<'a> = Vec<(&'static str, &'a str)>;

/// Fields of the password grant, in the order the provider documents them.
pub(crate) fn identity_fields<'a>(
	credentials: &'a Credentials,
	profile: &'a ExchangeProfile,
) -> FormFields<'a> {
	vec![
		("client_id", credentials.client_id.as_str()),
		("username", credentials.username.as_str()),
		("grant_type", PASSWORD_GRANT),
		("connection", profile.connection.as_str()),
		("scope", profile.identity_scope.as_str()),
		("password", credentials.password.expose()),
	]
}

/// Fields of the jwt-bearer grant.
pub(crate) fn bearer_fields<'a>(
	credentials: &'a Credentials,
	profile: &'a ExchangeProfile,
	identity: &'a IdentityToken,
) -> FormFields<'a> {
	vec![
		("client_id", credentials.client_id.as_str()),
		("grant_type", JWT_BEARER_GRANT),
		("connection", profile.connection.as_str()),
		("scope", profile.bearer_scope.as_str()),
		("access_token", identity.access_token.expose()),
		("assertion", identity.id_token.expose()),
	]
}

pub(crate) fn encode(fields: &FormFields) -> String {
	Serializer::new(String::new()).extend_pairs(fields.iter()).finish()
}

pub(crate) fn post_form(url: &Url, fields: &FormFields) -> Result<HttpRequest> {
	Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
		.header(ACCEPT, "application/json")
		.body(encode(fields).into_bytes())
		.map_err(|e| ConfigError::from(e).into())
}
